use std::path::Path;

use cubefield_scene::OptionsMap;
use serde::{Deserialize, Serialize};

/// Errors from loading a surface configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Surface creation options, fixed for the lifetime of a mount.
///
/// Views compare configurations by `Arc` identity: handing a view a different
/// `Arc<SurfaceConfig>` re-runs the whole mount sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceConfig {
    pub antialias: bool,
    /// Render at physical pixels rather than logical pixels.
    pub adapt_to_device_ratio: bool,
    /// Passed to the engine untouched.
    pub engine_options: OptionsMap,
    /// Passed to the scene untouched.
    pub scene_options: OptionsMap,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let mut engine_options = OptionsMap::new();
        engine_options.insert("preserveDrawingBuffer".into(), true.into());
        engine_options.insert("stencil".into(), true.into());
        Self {
            antialias: true,
            adapt_to_device_ratio: true,
            engine_options,
            scene_options: OptionsMap::new(),
        }
    }
}

impl SurfaceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded surface config");
        Ok(config)
    }

    /// Drawing-buffer dimensions for a surface of the given size.
    pub fn render_size(&self, size: SurfaceSize) -> (u32, u32) {
        if self.adapt_to_device_ratio {
            (size.width.max(1), size.height.max(1))
        } else {
            let (w, h) = size.logical();
            (w.max(1), h.max(1))
        }
    }
}

/// Size of the host drawable in physical pixels, with its scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn logical(&self) -> (u32, u32) {
        let scale = if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        (
            (self.width as f64 / scale).round() as u32,
            (self.height as f64 / scale).round() as u32,
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_matches_demo_options() {
        let cfg = SurfaceConfig::default();
        assert!(cfg.antialias);
        assert!(cfg.adapt_to_device_ratio);
        assert_eq!(cfg.engine_options.get("stencil"), Some(&true.into()));
        assert!(cfg.scene_options.is_empty());
    }

    #[test]
    fn render_size_follows_device_ratio_flag() {
        let size = SurfaceSize::new(2560, 1440, 2.0);
        let mut cfg = SurfaceConfig::default();
        assert_eq!(cfg.render_size(size), (2560, 1440));
        cfg.adapt_to_device_ratio = false;
        assert_eq!(cfg.render_size(size), (1280, 720));
        assert_eq!(cfg.render_size(SurfaceSize::new(0, 0, 1.0)), (1, 1));
    }

    #[test]
    fn partial_json_fills_defaults_and_keeps_unknown_options() {
        let cfg = SurfaceConfig::from_json_str(
            r#"{ "antialias": false, "engineOptions": { "powerPreference": "low-power", "custom": 3 } }"#,
        )
        .unwrap();
        assert!(!cfg.antialias);
        assert!(cfg.adapt_to_device_ratio);
        assert_eq!(cfg.engine_options.get("custom"), Some(&3.into()));
        assert!(cfg.engine_options.get("stencil").is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "adaptToDeviceRatio": false }}"#).unwrap();
        let cfg = SurfaceConfig::from_json_file(file.path()).unwrap();
        assert!(!cfg.adapt_to_device_ratio);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SurfaceConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
