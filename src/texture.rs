//! Earth surface textures, fetched in the background
//!
//! The globe renders immediately with a flat fallback; textures replace it
//! whenever (and if ever) they arrive.

use crate::error::TextureError;
use glam::Vec3;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Maximum size for a downloaded texture (16MB)
const MAX_TEXTURE_SIZE: u64 = 16 * 1024 * 1024;

/// Textures are downsampled to this size; a terminal never needs more
const SAMPLE_WIDTH: u32 = 512;
const SAMPLE_HEIGHT: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Day,
    Night,
}

/// Equirectangular RGB texture
#[derive(Clone, Debug)]
pub struct EarthTexture {
    width: u32,
    height: u32,
    rgb: Vec<[u8; 3]>,
}

impl EarthTexture {
    pub fn from_image(image: &DynamicImage) -> Self {
        let small = image.resize_exact(SAMPLE_WIDTH, SAMPLE_HEIGHT, FilterType::Triangle).to_rgb8();
        let (width, height) = small.dimensions();
        let rgb = small.pixels().map(|p| p.0).collect();
        Self { width, height, rgb }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Color at texture coordinates (u right, v down from the north pole)
    pub fn sample_uv(&self, u: f32, v: f32) -> [u8; 3] {
        if self.rgb.is_empty() {
            return [0, 0, 0];
        }
        let x = ((u.rem_euclid(1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.rgb[(y * self.width + x) as usize]
    }

    /// Color under a point on the sphere (any radius)
    pub fn sample(&self, point: Vec3) -> [u8; 3] {
        let (u, v) = sphere_uv(point);
        self.sample_uv(u, v)
    }
}

/// Texture coordinates of a sphere point, wrapped the way a UV sphere is:
/// u = 0 at longitude -180, v = 0 at the north pole
pub fn sphere_uv(point: Vec3) -> (f32, f32) {
    let r = point.length();
    if r <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let u = (point.z.atan2(-point.x) / std::f32::consts::TAU).rem_euclid(1.0);
    let v = (point.y / r).clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
    (u, v)
}

/// Scene-space point for a latitude/longitude in degrees, matching `sphere_uv`
pub fn geo_to_vec(lat_deg: f32, lon_deg: f32, radius: f32) -> Vec3 {
    let u = (lon_deg + 180.0) / 360.0 * std::f32::consts::TAU;
    let v = (90.0 - lat_deg) / 180.0 * std::f32::consts::PI;
    Vec3::new(
        -radius * u.cos() * v.sin(),
        radius * v.cos(),
        radius * u.sin() * v.sin(),
    )
}

/// Rec. 601 luma
pub fn luminance(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Land vs ocean on a day map: oceans are blue dominant and dark
pub fn is_land(rgb: [u8; 3]) -> bool {
    let [r, g, b] = rgb;
    let warm = (r as i32 + g as i32) / 2;
    warm > b as i32 + 4 || luminance(rgb) > 170
}

/// Whatever textures have arrived so far
#[derive(Default)]
pub struct EarthTextures {
    pub day: Option<EarthTexture>,
    pub night: Option<EarthTexture>,
}

impl EarthTextures {
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.night.is_none()
    }
}

type LoadResult = (TextureKind, Result<EarthTexture, TextureError>);

/// Background texture fetcher
pub struct TextureLoader {
    textures: EarthTextures,
    pending: usize,
    receiver: Receiver<LoadResult>,
    sender: Sender<LoadResult>,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            textures: EarthTextures::default(),
            pending: 0,
            receiver: rx,
            sender: tx,
        }
    }

    /// Start loading a texture (non-blocking)
    pub fn request(&mut self, kind: TextureKind, url: &str) {
        let url = url.to_string();
        let tx = self.sender.clone();
        self.pending += 1;
        thread::spawn(move || {
            let result = load_texture(&url).map(|img| EarthTexture::from_image(&img));
            let _ = tx.send((kind, result));
        });
    }

    /// Collect finished loads; returns true when anything changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok((kind, result)) => {
                    self.pending = self.pending.saturating_sub(1);
                    changed |= self.accept(kind, result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn accept(&mut self, kind: TextureKind, result: Result<EarthTexture, TextureError>) -> bool {
        match result {
            Ok(texture) => {
                info!(?kind, "texture loaded");
                match kind {
                    TextureKind::Day => self.textures.day = Some(texture),
                    TextureKind::Night => self.textures.night = Some(texture),
                }
                true
            }
            Err(e) => {
                warn!(?kind, error = %e, "texture unavailable, using flat globe");
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn textures(&self) -> &EarthTextures {
        &self.textures
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch and decode one texture from http(s):// or file://
pub fn load_texture(url: &str) -> Result<DynamicImage, TextureError> {
    let bytes = if let Some(path) = url.strip_prefix("file://") {
        let path = urlencoding::decode(path)
            .map_err(|_| TextureError::UnsupportedUrl(url.to_string()))?;
        std::fs::read(Path::new(path.as_ref()))?
    } else if url.starts_with("http://") || url.starts_with("https://") {
        fetch(url)?
    } else {
        return Err(TextureError::UnsupportedUrl(url.to_string()));
    };
    Ok(image::load_from_memory(&bytes)?)
}

fn fetch(url: &str) -> Result<Vec<u8>, TextureError> {
    let response = ureq::get(url).timeout(Duration::from_secs(10)).call()?;

    if let Some(len) = response
        .header("Content-Length")
        .and_then(|s| s.parse::<u64>().ok())
    {
        if len > MAX_TEXTURE_SIZE {
            return Err(TextureError::TooLarge(MAX_TEXTURE_SIZE));
        }
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_TEXTURE_SIZE + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_TEXTURE_SIZE {
        return Err(TextureError::TooLarge(MAX_TEXTURE_SIZE));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};

    #[test]
    fn geo_and_uv_agree() {
        for (lat, lon) in [(0.0, 0.0), (45.0, 90.0), (-30.0, -120.0), (60.0, 179.0)] {
            let p = geo_to_vec(lat, lon, 2.0);
            assert_relative_eq!(p.length(), 2.0, epsilon = 1e-5);
            let (u, v) = sphere_uv(p);
            assert_relative_eq!(u, (lon + 180.0) / 360.0, epsilon = 1e-4);
            assert_relative_eq!(v, (90.0 - lat) / 180.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn north_pole_is_top_row() {
        let (_, v) = sphere_uv(Vec3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(v, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn sample_reads_the_right_hemisphere() {
        // Left half red (western), right half blue (eastern)
        let img = RgbImage::from_fn(64, 32, |x, _| if x < 32 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let tex = EarthTexture::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(tex.size(), (SAMPLE_WIDTH, SAMPLE_HEIGHT));
        let west = tex.sample(geo_to_vec(0.0, -90.0, 1.0));
        let east = tex.sample(geo_to_vec(0.0, 90.0, 1.0));
        assert!(west[0] > 200 && west[2] < 50);
        assert!(east[2] > 200 && east[0] < 50);
    }

    #[test]
    fn land_classification() {
        assert!(!is_land([10, 30, 70]));   // ocean
        assert!(is_land([70, 90, 40]));    // forest
        assert!(is_land([210, 180, 130])); // desert
        assert!(is_land([235, 240, 250])); // ice
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_texture("file:///definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = load_texture("ftp://example.com/earth.jpg").unwrap_err();
        assert!(matches!(err, TextureError::UnsupportedUrl(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_texture(&format!("file://{}", path.display())).unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn loader_falls_back_on_failure() {
        let mut loader = TextureLoader::new();
        loader.request(TextureKind::Day, "file:///definitely/not/here.png");
        let start = std::time::Instant::now();
        while loader.is_loading() && start.elapsed() < Duration::from_secs(5) {
            loader.poll();
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!loader.is_loading());
        assert!(loader.textures().is_empty());
    }

    #[test]
    fn loader_accepts_local_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earth.png");
        RgbImage::from_pixel(8, 4, Rgb([90, 90, 40])).save(&path).unwrap();
        let mut loader = TextureLoader::new();
        loader.request(TextureKind::Night, &format!("file://{}", path.display()));
        let start = std::time::Instant::now();
        while loader.is_loading() && start.elapsed() < Duration::from_secs(5) {
            loader.poll();
            thread::sleep(Duration::from_millis(10));
        }
        assert!(loader.textures().night.is_some());
        assert!(loader.textures().day.is_none());
    }
}
