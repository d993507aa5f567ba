//! Shared types for the img-preview conversion pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can reference decoded
/// raster data without depending on `image` directly.
pub use image::RgbImage;

/// A 2D point in image coordinates.
///
/// Pipeline-produced coordinates are always integral, but the SVG
/// element model allows fractional values, so they are carried as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Conversion speed tier.
///
/// A request rather than a command: each tier trades quality for time.
/// For the bitmap path it selects the resampling filter; for the SVG
/// path it selects the vectorization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Speed {
    /// Fastest, lowest quality (nearest-neighbor / per-pixel rects).
    Fast,
    /// Balanced default (bilinear / run-length rects).
    #[default]
    Normal,
    /// Slowest, highest quality (progressive scaling / region growing).
    Slow,
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => f.write_str("fast"),
            Self::Normal => f.write_str("normal"),
            Self::Slow => f.write_str("slow"),
        }
    }
}

/// Configuration for the vectorization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizeConfig {
    /// Euclidean RGB distance below which two pixels are considered the
    /// same flat color during region growing and run extension.
    pub threshold: f64,

    /// Which vectorization strategy runs.
    pub speed: Speed,
}

impl VectorizeConfig {
    /// Default color-distance threshold for region growing and run
    /// extension.
    pub const DEFAULT_THRESHOLD: f64 = 32.0;

    /// Check the configuration for invalid values.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `threshold` is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "threshold must be positive and finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            speed: Speed::default(),
        }
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input image has zero width or height.
    #[error("input image is empty")]
    EmptyImage,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// An internal invariant was violated. Indicates a defect in the
    /// pipeline, not a recoverable input condition.
    #[error("pipeline invariant violated: {0}")]
    Invariant(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_new() {
        let p = Point::new(3.0, 4.5);
        assert!((p.x - 3.0).abs() < f64::EPSILON);
        assert!((p.y - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn dimensions_equality() {
        assert_eq!(
            Dimensions {
                width: 100,
                height: 200
            },
            Dimensions {
                width: 100,
                height: 200
            },
        );
        assert_ne!(
            Dimensions {
                width: 100,
                height: 200
            },
            Dimensions {
                width: 100,
                height: 201
            },
        );
    }

    #[test]
    fn speed_default_is_normal() {
        assert_eq!(Speed::default(), Speed::Normal);
    }

    #[test]
    fn speed_display() {
        assert_eq!(Speed::Fast.to_string(), "fast");
        assert_eq!(Speed::Normal.to_string(), "normal");
        assert_eq!(Speed::Slow.to_string(), "slow");
    }

    #[test]
    fn config_defaults() {
        let config = VectorizeConfig::default();
        assert!((config.threshold - 32.0).abs() < f64::EPSILON);
        assert_eq!(config.speed, Speed::Normal);
    }

    #[test]
    fn config_default_validates() {
        assert!(VectorizeConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rejects_nonpositive_threshold() {
        let config = VectorizeConfig {
            threshold: 0.0,
            ..VectorizeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_rejects_nan_threshold() {
        let config = VectorizeConfig {
            threshold: f64::NAN,
            ..VectorizeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_serde_round_trip() {
        let config = VectorizeConfig {
            threshold: 48.0,
            speed: Speed::Slow,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: VectorizeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn error_invariant_display() {
        let err = PipelineError::Invariant("region 3 has no spans".to_string());
        assert_eq!(
            err.to_string(),
            "pipeline invariant violated: region 3 has no spans",
        );
    }
}
