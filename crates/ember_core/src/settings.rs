//! Render settings shared by the raytracer and the tile scheduler.
//!
//! Settings are immutable once constructed. Every constructor validates, so a
//! `RenderSettings` value that exists is always usable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted reflection depth.
///
/// Tracing recurses once per bounce on a worker thread's stack.
pub const MAX_RECURSION_DEPTH: u32 = 256;

/// Errors that can occur while building or loading render settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("At least one render thread is required")]
    InvalidThreadCount,

    #[error("Secondary ray offset must be finite and non-negative, got {0}")]
    InvalidRayOffset(f32),

    #[error("Recursion depth must be at most {max}, got {depth}")]
    InvalidRecursionDepth { depth: u32, max: u32 },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    width: u32,
    /// Output height in pixels
    height: u32,
    /// Number of worker threads pulling tiles
    amount_threads: usize,
    /// Maximum number of reflection bounces
    recursion_depth: u32,
    /// Distance secondary rays are pushed off the surface they start on
    secondary_ray_offset: f32,
    /// When false, shaders fall back to unlit material colors
    lighting_enabled: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            amount_threads: 1,
            recursion_depth: 5,
            secondary_ray_offset: 0.003,
            lighting_enabled: true,
        }
    }
}

impl RenderSettings {
    /// Create validated settings.
    pub fn new(
        (width, height): (u32, u32),
        amount_threads: usize,
        recursion_depth: u32,
        secondary_ray_offset: f32,
        lighting_enabled: bool,
    ) -> SettingsResult<Self> {
        Self {
            width,
            height,
            amount_threads,
            recursion_depth,
            secondary_ray_offset,
            lighting_enabled,
        }
        .validated()
    }

    /// Parse settings from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validated()
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!(
            "Loaded render settings from {}: {}x{}, {} threads",
            path.display(),
            settings.width,
            settings.height,
            settings.amount_threads
        );
        Ok(settings)
    }

    /// Copy with a different worker count.
    pub fn with_threads(self, amount_threads: usize) -> SettingsResult<Self> {
        Self {
            amount_threads,
            ..self
        }
        .validated()
    }

    /// Copy with a different resolution.
    pub fn with_resolution(self, width: u32, height: u32) -> SettingsResult<Self> {
        Self {
            width,
            height,
            ..self
        }
        .validated()
    }

    /// Copy with a different maximum reflection depth.
    pub fn with_recursion_depth(self, recursion_depth: u32) -> SettingsResult<Self> {
        Self {
            recursion_depth,
            ..self
        }
        .validated()
    }

    /// Copy with lighting switched on or off.
    pub fn with_lighting(self, lighting_enabled: bool) -> Self {
        Self {
            lighting_enabled,
            ..self
        }
    }

    fn validated(self) -> SettingsResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.amount_threads == 0 {
            return Err(SettingsError::InvalidThreadCount);
        }
        if !self.secondary_ray_offset.is_finite() || self.secondary_ray_offset < 0.0 {
            return Err(SettingsError::InvalidRayOffset(self.secondary_ray_offset));
        }
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(SettingsError::InvalidRecursionDepth {
                depth: self.recursion_depth,
                max: MAX_RECURSION_DEPTH,
            });
        }
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn amount_threads(&self) -> usize {
        self.amount_threads
    }

    pub fn recursion_depth(&self) -> u32 {
        self.recursion_depth
    }

    pub fn secondary_ray_offset(&self) -> f32 {
        self.secondary_ray_offset
    }

    pub fn lighting_enabled(&self) -> bool {
        self.lighting_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.resolution(), (1920, 1080));
        assert_eq!(settings.amount_threads(), 1);
        assert_eq!(settings.recursion_depth(), 5);
        assert!((settings.secondary_ray_offset() - 0.003).abs() < 1e-9);
        assert!(settings.lighting_enabled());
    }

    #[test]
    fn test_with_threads() {
        let settings = RenderSettings::default().with_threads(8).unwrap();
        assert_eq!(settings.amount_threads(), 8);
        assert!(RenderSettings::default().with_threads(0).is_err());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let err = RenderSettings::new((0, 10), 1, 5, 0.003, true).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidResolution { width: 0, height: 10 }
        ));
    }

    #[test]
    fn test_rejects_bad_offset() {
        assert!(RenderSettings::new((4, 4), 1, 5, -1.0, true).is_err());
        assert!(RenderSettings::new((4, 4), 1, 5, f32::NAN, true).is_err());
    }

    #[test]
    fn test_rejects_excessive_recursion_depth() {
        let max = RenderSettings::new((4, 4), 1, MAX_RECURSION_DEPTH, 0.003, true).unwrap();
        assert_eq!(max.recursion_depth(), MAX_RECURSION_DEPTH);

        let err = RenderSettings::new((4, 4), 1, 10_000, 0.003, true).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidRecursionDepth { depth: 10_000, max: MAX_RECURSION_DEPTH }
        ));

        assert!(max.with_recursion_depth(MAX_RECURSION_DEPTH + 1).is_err());
        assert_eq!(max.with_recursion_depth(2).unwrap().recursion_depth(), 2);

        let json = RenderSettings::from_json_str(r#"{ "recursion_depth": 30000 }"#);
        assert!(matches!(json, Err(SettingsError::InvalidRecursionDepth { .. })));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{ "width": 64, "height": 48, "amount_threads": 4 }"#)
                .unwrap();
        assert_eq!(settings.resolution(), (64, 48));
        assert_eq!(settings.amount_threads(), 4);
        assert_eq!(settings.recursion_depth(), 5);
        assert!(settings.lighting_enabled());
    }

    #[test]
    fn test_json_is_validated() {
        let err = RenderSettings::from_json_str(r#"{ "amount_threads": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidThreadCount));
    }

    #[test]
    fn test_json_syntax_error() {
        let err = RenderSettings::from_json_str("{ width: ").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_json_file_round_trip() {
        let _ = env_logger::builder().is_test(true).try_init();

        let settings = RenderSettings::new((32, 16), 2, 3, 0.01, false).unwrap();
        let path = std::env::temp_dir().join(format!("ember_settings_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

        let loaded = RenderSettings::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
