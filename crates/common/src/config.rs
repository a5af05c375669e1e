//! Application configuration.
//!
//! Every tunable of the motion pipeline lives here with the defaults the
//! controller was calibrated with. A config file only needs to name the
//! values it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JumpcamError, JumpcamResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame differencing parameters.
    pub detector: DetectorSettings,

    /// Zone geometry, as ratios of the frame size.
    pub zones: ZoneSettings,

    /// Hysteresis thresholds for key transitions.
    pub debounce: DebounceSettings,

    /// Webcam acquisition settings.
    pub camera: CameraSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Frame differencing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    /// A pixel counts as motion when the blurred difference exceeds this.
    pub threshold_sensitivity: u8,

    /// Contours smaller than this (in pixels²) are treated as noise.
    pub min_contour_area: f64,

    /// Side length of the square Gaussian kernel. Must be odd.
    pub blur_kernel_size: u32,
}

/// Zone geometry, as ratios of the frame size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Width of each lateral zone relative to frame width.
    pub zone_width_ratio: f64,

    /// Height of each lateral zone relative to frame height.
    pub zone_height_ratio: f64,

    /// Gap between a lateral zone and its frame edge, relative to frame width.
    pub margin_x_ratio: f64,

    /// Jump line position relative to frame height (0.0 = top).
    pub jump_line_y_ratio: f64,
}

/// Hysteresis thresholds shared by every key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceSettings {
    /// Consecutive motion frames needed before a key goes down.
    pub frames_to_enter: u32,

    /// Consecutive still frames needed before a held key goes up.
    pub frames_to_leave: u32,
}

/// Webcam acquisition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// V4L2 device node. `None` picks the best detected webcam.
    pub device: Option<String>,

    pub width: u32,

    pub height: u32,

    pub fps: u32,

    /// Flip frames horizontally so the player sees a mirror image.
    pub mirror: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "jumpcam_motion_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            threshold_sensitivity: 25,
            min_contour_area: 700.0,
            blur_kernel_size: 25,
        }
    }
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            zone_width_ratio: 0.25,
            zone_height_ratio: 0.40,
            margin_x_ratio: 0.05,
            jump_line_y_ratio: 0.4,
        }
    }
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            frames_to_enter: 2,
            frames_to_leave: 4,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: None,
            width: 640,
            height: 480,
            fps: 30,
            mirror: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> JumpcamResult<Self> {
        if !path.exists() {
            return Err(JumpcamError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> JumpcamResult<()> {
        let d = &self.detector;
        if d.blur_kernel_size == 0 || d.blur_kernel_size % 2 == 0 {
            return Err(JumpcamError::config(format!(
                "detector.blur_kernel_size must be a positive odd number, got {}",
                d.blur_kernel_size
            )));
        }
        if !d.min_contour_area.is_finite() || d.min_contour_area < 0.0 {
            return Err(JumpcamError::config(format!(
                "detector.min_contour_area must be non-negative, got {}",
                d.min_contour_area
            )));
        }

        let z = &self.zones;
        for (name, value) in [
            ("zones.zone_width_ratio", z.zone_width_ratio),
            ("zones.zone_height_ratio", z.zone_height_ratio),
            ("zones.jump_line_y_ratio", z.jump_line_y_ratio),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(JumpcamError::config(format!(
                    "{name} must be in (0, 1), got {value}"
                )));
            }
        }
        if !(z.margin_x_ratio >= 0.0 && z.margin_x_ratio < 0.5) {
            return Err(JumpcamError::config(format!(
                "zones.margin_x_ratio must be in [0, 0.5), got {}",
                z.margin_x_ratio
            )));
        }
        if z.zone_width_ratio + 2.0 * z.margin_x_ratio > 1.0 {
            return Err(JumpcamError::config(
                "lateral zones plus margins are wider than the frame",
            ));
        }

        let b = &self.debounce;
        if b.frames_to_enter == 0 || b.frames_to_leave == 0 {
            return Err(JumpcamError::config(
                "debounce.frames_to_enter and debounce.frames_to_leave must be at least 1",
            ));
        }

        let c = &self.camera;
        if c.width == 0 || c.height == 0 || c.fps == 0 {
            return Err(JumpcamError::config(format!(
                "camera mode {}x{} @ {}fps is invalid",
                c.width, c.height, c.fps
            )));
        }

        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("jumpcam").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibrated_constants() {
        let config = AppConfig::default();
        assert_eq!(config.detector.threshold_sensitivity, 25);
        assert_eq!(config.detector.min_contour_area, 700.0);
        assert_eq!(config.debounce.frames_to_enter, 2);
        assert_eq!(config.debounce.frames_to_leave, 4);
        assert!(config.camera.mirror);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "debounce": { "frames_to_leave": 6 } }"#).unwrap();
        assert_eq!(config.debounce.frames_to_leave, 6);
        assert_eq!(config.debounce.frames_to_enter, 2);
        assert_eq!(config.zones, ZoneSettings::default());
    }

    #[test]
    fn even_kernel_is_rejected() {
        let mut config = AppConfig::default();
        config.detector.blur_kernel_size = 24;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blur_kernel_size"));
    }

    #[test]
    fn overlapping_margins_are_rejected() {
        let mut config = AppConfig::default();
        config.zones.zone_width_ratio = 0.6;
        config.zones.margin_x_ratio = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_frame_thresholds_are_rejected() {
        let mut config = AppConfig::default();
        config.debounce.frames_to_enter = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_missing_path_reports_file_not_found() {
        let err = AppConfig::load_from(Path::new("/nonexistent/jumpcam.json")).unwrap_err();
        assert!(matches!(err, JumpcamError::FileNotFound { .. }));
    }
}
