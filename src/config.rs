use crate::scene::motion::MotionParams;
use serde::{Deserialize, Serialize};

/// Default earth textures (day surface and night lights)
pub const DEFAULT_DAY_TEXTURE: &str = "https://threejs.org/examples/textures/planets/earth_atmos_2048.jpg";
pub const DEFAULT_NIGHT_TEXTURE: &str = "https://threejs.org/examples/textures/planets/earth_lights_2048.png";

/// Time window shown by the trend chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Day,
    Week,
    Month,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Day, TimeRange::Week, TimeRange::Month];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "DAY",
            TimeRange::Week => "WEEK",
            TimeRange::Month => "MONTH",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeRange::Day => TimeRange::Week,
            TimeRange::Week => TimeRange::Month,
            TimeRange::Month => TimeRange::Day,
        }
    }
}

/// Globe scene construction and animation constants
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeConfig {
    /// Sphere radius in scene units
    pub radius: f32,
    pub node_count: usize,
    pub arc_count: usize,
    /// Endpoints closer than this are not connected
    pub min_arc_distance: f32,
    /// Candidate pairs tried per requested arc before giving up
    pub attempt_factor: usize,
    /// Control point lift per unit of endpoint distance
    pub bow: f32,
    pub motion: MotionParams,
    /// Globe rotation per frame (radians)
    pub spin: f32,
    /// Camera elevation (radians)
    pub tilt: f32,
    pub day_texture: Option<String>,
    pub night_texture: Option<String>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            node_count: 12,
            arc_count: 10,
            min_arc_distance: 0.8,
            attempt_factor: 10,
            bow: 0.5,
            motion: MotionParams::default(),
            spin: 0.0004,
            tilt: (1.8_f32 / 6.8).atan(),
            day_texture: Some(DEFAULT_DAY_TEXTURE.to_string()),
            night_texture: Some(DEFAULT_NIGHT_TEXTURE.to_string()),
        }
    }
}

/// What the full-screen loop shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Panels around the globe
    Dashboard,
    /// Globe fills the screen
    GlobeOnly,
}

/// Configuration for a dashboard run
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub mode: ViewMode,
    /// Seconds per frame
    pub time_step: f32,
    pub seed: Option<u64>,
    pub range: TimeRange,
    pub offline: bool,
    pub globe: GlobeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_cycles_through_all() {
        let mut r = TimeRange::Day;
        for expected in [TimeRange::Week, TimeRange::Month, TimeRange::Day] {
            r = r.next();
            assert_eq!(r, expected);
        }
    }

    #[test]
    fn default_tilt_matches_camera_elevation() {
        let cfg = GlobeConfig::default();
        assert!(cfg.tilt > 0.25 && cfg.tilt < 0.27);
        assert_eq!(cfg.node_count, 12);
        assert_eq!(cfg.arc_count, 10);
    }
}
