//! Runtime configuration loaded from TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::brush::{BrushError, BrushSettings};
use crate::domain::smoothing::DEFAULT_ALPHA;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid brush settings: {0}")]
    Brush(#[from] BrushError),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub brush: BrushSettings,
    pub tracking: TrackingConfig,
    pub gallery: GalleryConfig,
    pub output: OutputConfig,
}

/// Drawing surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Tuning for the per-frame tracking pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// EMA weight of each new sample, in (0, 1]
    pub smoothing_alpha: f32,
    /// Non-pointing frames tolerated before a stroke ends
    pub debounce_frames: u8,
    /// Strokes shorter than this are discarded as taps
    pub min_stroke_ms: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_ALPHA,
            debounce_frames: 5,
            min_stroke_ms: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Most-recent snapshots kept
    pub capacity: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives fist/download captures
    pub capture_dir: PathBuf,
    /// TrueType/OpenType font for the status HUD; no HUD text when unset
    pub font_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            capture_dir: PathBuf::from("captures"),
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Checks invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid {
                field: "canvas",
                reason: format!("{}x{} has no area", self.canvas.width, self.canvas.height),
            });
        }

        let alpha = self.tracking.smoothing_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "tracking.smoothing_alpha",
                reason: format!("must be in (0, 1], got {alpha}"),
            });
        }

        if self.tracking.min_stroke_ms < 0.0 || !self.tracking.min_stroke_ms.is_finite() {
            return Err(ConfigError::Invalid {
                field: "tracking.min_stroke_ms",
                reason: format!("must be a non-negative duration, got {}", self.tracking.min_stroke_ms),
            });
        }

        if self.gallery.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "gallery.capacity",
                reason: "must keep at least one snapshot".to_string(),
            });
        }

        self.brush.brush()?;
        Ok(())
    }

    /// Loads and validates a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracking.debounce_frames, 5);
        assert_eq!(config.tracking.min_stroke_ms, 200.0);
        assert_eq!(config.gallery.capacity, 10);
    }

    #[test]
    fn save_and_load() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("nested").join("air-canvas.toml");

        let mut config = AppConfig::default();
        config.brush.set_width(14);
        config.tracking.smoothing_alpha = 0.6;
        config.save(&path).expect("save");

        let loaded = AppConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [brush]
            width = 20
            "#,
        )
        .expect("parse");
        assert_eq!(config.brush.width, 20);
        assert_eq!(config.brush.color, "#ff3e3e");
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn rejects_out_of_range_alpha() {
        let mut config = AppConfig::default();
        config.tracking.smoothing_alpha = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "tracking.smoothing_alpha", .. })
        ));
    }

    #[test]
    fn rejects_off_palette_brush() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[brush]\ncolor = \"#010203\"\n").expect("write");
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Brush(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("temp dir");
        let result = AppConfig::load(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_or_default_without_path() {
        assert_eq!(AppConfig::load_or_default(None).unwrap(), AppConfig::default());
    }
}
