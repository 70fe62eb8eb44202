use crate::config::GlobeConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
    #[serde(default)]
    pub log: LogSettings,
    /// Parse failure of the config file, reported once logging is up
    #[serde(skip)]
    pub load_error: Option<String>,
}

/// Optional overrides for `GlobeConfig`; unset fields keep the defaults
#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    pub day_texture: Option<String>,   // URL or file:// path; "" disables
    pub night_texture: Option<String>,
    pub node_count: Option<usize>,
    pub arc_count: Option<usize>,
    pub min_arc_distance: Option<f32>,
    pub bow: Option<f32>,
    pub step: Option<f32>,
    pub lag: Option<f32>,
    pub spin: Option<f32>,
    pub tilt: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
    pub level: Option<String>,  // tracing filter directive, e.g. "info" or "sitcen=debug"
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| Self {
                load_error: Some(format!("{}: {}", path.display(), e)),
                ..Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Emit the deferred parse failure, if any
    pub fn report(&self) {
        if let Some(err) = &self.load_error {
            warn!(error = %err, "ignoring malformed config");
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitcen")
            .join("config.toml")
    }
}

impl GlobeSettings {
    /// Overlay the configured values onto `config`
    pub fn apply(&self, config: &mut GlobeConfig) {
        if let Some(url) = &self.day_texture {
            config.day_texture = non_empty(url);
        }
        if let Some(url) = &self.night_texture {
            config.night_texture = non_empty(url);
        }
        if let Some(n) = self.node_count {
            config.node_count = n;
        }
        if let Some(n) = self.arc_count {
            config.arc_count = n;
        }
        if let Some(d) = self.min_arc_distance {
            config.min_arc_distance = d.max(0.0);
        }
        if let Some(b) = self.bow {
            config.bow = b;
        }
        if let Some(s) = self.step {
            config.motion.step = s;
        }
        if let Some(l) = self.lag {
            config.motion.lag = l;
        }
        if let Some(s) = self.spin {
            config.spin = s;
        }
        if let Some(t) = self.tilt {
            config.tilt = t.clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
