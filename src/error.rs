//! Error types for texture loading.

use thiserror::Error;

/// Reasons an earth texture could not be loaded. None of these are fatal:
/// the globe falls back to flat shading with continent outlines.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Reading a local file:// texture failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes were fetched but did not decode as an image
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Response larger than the download cap
    #[error("texture exceeds {0} bytes")]
    TooLarge(u64),

    /// URL scheme other than http(s):// or file://
    #[error("unsupported texture URL: {0}")]
    UnsupportedUrl(String),
}

impl From<ureq::Error> for TextureError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err.to_string())
    }
}
