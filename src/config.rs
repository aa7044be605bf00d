//! Scene configuration with defaults and RON persistence.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dynamics::state::{EARTH_RADIUS, GRAVITY, ORBIT_RATE};
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Flight timeline constants.
    pub timeline: TimelineConfig,
    /// Interactive viewer settings.
    pub viewer: ViewerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Constants driving the scripted flight. Fixed once the timeline is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// First stage release, s.
    pub first_separation_time: f64,
    /// Second stage release, s.
    pub second_separation_time: f64,
    /// Ascent ends and the payload starts orbiting, s.
    pub orbit_start_time: f64,
    /// Gravity as an upward-pointing magnitude vector (subtracted).
    pub gravity: [f64; 3],
    /// Constant velocity of the attached stack.
    pub ascent_velocity: [f64; 3],
    /// Planet radius; the planet centre sits at (0, 0, -earth_radius).
    pub earth_radius: f64,
    /// Angular rate of the orbit phase, rad/s.
    pub orbit_rate: f64,
}

/// Viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    pub width: f32,
    /// Window height in logical pixels.
    pub height: f32,
    /// Initial time-scale multiplier (0 pauses).
    pub time_scale: f64,
    /// Draw the world axes.
    pub display_frame: bool,
    /// Start with the follow camera enabled.
    pub follow_camera: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Tracing filter (e.g. "info", "rocket_launch=debug").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            first_separation_time: 10.0,
            second_separation_time: 15.0,
            orbit_start_time: 20.0,
            gravity: [0.0, 0.0, GRAVITY],
            ascent_velocity: [0.0, 0.0, 5.0],
            earth_radius: EARTH_RADIUS,
            orbit_rate: ORBIT_RATE,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 1024.0,
            time_scale: 1.0,
            display_frame: false,
            follow_camera: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Timeline accessors and validation ---

impl TimelineConfig {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn gravity(&self) -> Vector3<f64> {
        Vector3::from(self.gravity)
    }

    pub fn ascent_velocity(&self) -> Vector3<f64> {
        Vector3::from(self.ascent_velocity)
    }

    /// Range checks only. Separation times are not ordered
    /// against each other or against the orbit start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_time("timeline.first_separation_time", self.first_separation_time)?;
        check_time("timeline.second_separation_time", self.second_separation_time)?;
        check_time("timeline.orbit_start_time", self.orbit_start_time)?;
        check_vector("timeline.gravity", &self.gravity)?;
        check_vector("timeline.ascent_velocity", &self.ascent_velocity)?;
        if !(self.earth_radius.is_finite() && self.earth_radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "timeline.earth_radius",
                reason: format!("must be finite and > 0, got {}", self.earth_radius),
            });
        }
        if !self.orbit_rate.is_finite() {
            return Err(ConfigError::Invalid {
                field: "timeline.orbit_rate",
                reason: format!("must be finite, got {}", self.orbit_rate),
            });
        }
        Ok(())
    }
}

fn check_time(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and >= 0, got {value}"),
        })
    }
}

fn check_vector(field: &'static str, value: &[f64; 3]) -> Result<(), ConfigError> {
    if value.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("components must be finite, got {value:?}"),
        })
    }
}

// --- Whole-config load/save ---

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeline.validate()?;
        if !(self.viewer.time_scale.is_finite() && self.viewer.time_scale >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "viewer.time_scale",
                reason: format!("must be finite and >= 0, got {}", self.viewer.time_scale),
            });
        }
        Ok(())
    }

    /// Parse and validate RON text.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config = Self::from_ron_str(&contents)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)
    }

    /// Write the config as pretty RON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
        let serialized = self.to_ron_string()?;
        std::fs::write(path, serialized).map_err(ConfigError::WriteError)?;
        info!(path = %path.display(), "Wrote config");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timeline builder
// ---------------------------------------------------------------------------

pub struct TimelineBuilder {
    config: TimelineConfig,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self { config: TimelineConfig::default() }
    }

    pub fn first_separation(mut self, t: f64) -> Self { self.config.first_separation_time = t; self }
    pub fn second_separation(mut self, t: f64) -> Self { self.config.second_separation_time = t; self }
    pub fn orbit_start(mut self, t: f64) -> Self { self.config.orbit_start_time = t; self }
    pub fn gravity(mut self, g: Vector3<f64>) -> Self { self.config.gravity = g.into(); self }
    pub fn ascent_velocity(mut self, v: Vector3<f64>) -> Self { self.config.ascent_velocity = v.into(); self }
    pub fn earth_radius(mut self, r: f64) -> Self { self.config.earth_radius = r; self }
    pub fn orbit_rate(mut self, w: f64) -> Self { self.config.orbit_rate = w; self }

    pub fn build(self) -> TimelineConfig {
        self.config
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_config_serializes() {
        let ron_str = Config::default().to_ron_string().unwrap();
        assert!(ron_str.contains("first_separation_time: 10.0"));
        assert!(ron_str.contains("orbit_rate: 0.5"));
    }

    #[test]
    fn config_roundtrip() {
        let config = Config::default();
        let ron_str = config.to_ron_string().unwrap();
        let back = Config::from_ron_str(&ron_str).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::from_ron_str("(timeline: (orbit_start_time: 30.0))").unwrap();
        assert_eq!(config.timeline.orbit_start_time, 30.0);
        assert_eq!(config.timeline.first_separation_time, 10.0);
        assert_eq!(config.viewer, ViewerConfig::default());
    }

    #[test]
    fn invalid_ron_produces_parse_error() {
        let err = Config::from_ron_str("{{not valid}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn negative_time_rejected() {
        let err = Config::from_ron_str("(timeline: (second_separation_time: -1.0))").unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "timeline.second_separation_time"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unordered_separations_are_accepted() {
        let t = TimelineConfig::builder()
            .first_separation(18.0)
            .second_separation(12.0)
            .orbit_start(18.0)
            .build();
        assert!(t.validate().is_ok());
    }

    #[test]
    fn zero_earth_radius_rejected() {
        let t = TimelineConfig::builder().earth_radius(0.0).build();
        assert!(matches!(t.validate(), Err(ConfigError::Invalid { field: "timeline.earth_radius", .. })));
    }

    #[test]
    fn negative_time_scale_rejected() {
        let mut config = Config::default();
        config.viewer.time_scale = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.ron");
        let mut config = Config::default();
        config.timeline.orbit_rate = 0.25;
        config.debug.log_level = "debug".into();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn builder_vectors_convert() {
        let t = TimelineConfig::builder()
            .gravity(Vector3::new(0.0, 0.0, 1.62))
            .ascent_velocity(Vector3::new(1.0, 0.0, 4.0))
            .build();
        assert_eq!(t.gravity(), Vector3::new(0.0, 0.0, 1.62));
        assert_eq!(t.ascent_velocity, [1.0, 0.0, 4.0]);
    }
}
