//! Tunable canvas limits parsed from defaults, environment variables, or a
//! host settings document.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MAX_ZOOM, DEFAULT_MIN_VISIBLE_FRACTION, DEFAULT_MIN_ZOOM, HANDLE_SIZE_PX, MIN_BLOCK_SIZE,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid zoom range: min {min} max {max} (need 0 < min <= max)")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("invalid minimum visible fraction: {0} (need 0..=1)")]
    InvalidVisibleFraction(f64),
    #[error("invalid handle size: {0} (need > 0)")]
    InvalidHandleSize(f64),
    #[error("invalid minimum block size: {0} (need > 0)")]
    InvalidMinimumSize(f64),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the displayed image kept inside the canvas on each axis.
    pub min_visible_fraction: f64,
    /// Handle hit slop in canvas pixels.
    pub handle_size_px: f64,
    /// Minimum block width/height in image pixels.
    pub min_block_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            min_visible_fraction: DEFAULT_MIN_VISIBLE_FRACTION,
            handle_size_px: HANDLE_SIZE_PX,
            min_block_size: MIN_BLOCK_SIZE,
        }
    }
}

impl CanvasConfig {
    /// Build config from environment variables, falling back per key.
    ///
    /// Optional:
    /// - `CANVAS_MIN_ZOOM`: default 0.2
    /// - `CANVAS_MAX_ZOOM`: default 6.0
    /// - `CANVAS_MIN_VISIBLE_FRACTION`: default 0.2
    /// - `CANVAS_HANDLE_SIZE_PX`: default 8
    /// - `CANVAS_MIN_BLOCK_SIZE`: default 10
    ///
    /// # Errors
    ///
    /// Returns `Err` if the combined values fail [`CanvasConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cfg = Self {
            min_zoom: env_parse("CANVAS_MIN_ZOOM", defaults.min_zoom),
            max_zoom: env_parse("CANVAS_MAX_ZOOM", defaults.max_zoom),
            min_visible_fraction: env_parse("CANVAS_MIN_VISIBLE_FRACTION", defaults.min_visible_fraction),
            handle_size_px: env_parse("CANVAS_HANDLE_SIZE_PX", defaults.handle_size_px),
            min_block_size: env_parse("CANVAS_MIN_BLOCK_SIZE", defaults.min_block_size),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a (possibly partial) JSON settings fragment. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `Err` on malformed JSON or a config that fails validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns the first violated limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom_ok = self.min_zoom.is_finite()
            && self.max_zoom.is_finite()
            && self.min_zoom > 0.0
            && self.min_zoom <= self.max_zoom;
        if !zoom_ok {
            return Err(ConfigError::InvalidZoomRange { min: self.min_zoom, max: self.max_zoom });
        }
        if !(0.0..=1.0).contains(&self.min_visible_fraction) {
            return Err(ConfigError::InvalidVisibleFraction(self.min_visible_fraction));
        }
        if !(self.handle_size_px.is_finite() && self.handle_size_px > 0.0) {
            return Err(ConfigError::InvalidHandleSize(self.handle_size_px));
        }
        if !(self.min_block_size.is_finite() && self.min_block_size > 0.0) {
            return Err(ConfigError::InvalidMinimumSize(self.min_block_size));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(%key, value = %raw, "unparsable canvas setting, using default");
                default
            }
        },
        Err(_) => default,
    }
}
