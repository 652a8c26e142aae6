#![forbid(unsafe_code)]

//! Board tuning loaded from TOML or JSON.
//!
//! ```toml
//! # laneboard.toml
//! [auto_scroll]
//! threshold_px = 140.0
//! min_speed_px = 2.0
//! max_speed_px = 20.0
//!
//! [preview]
//! width = 280.0
//! height = 96.0
//! ```
//!
//! Every field has a default, so a partial (or empty) file is valid. Loaders
//! run [`BoardConfig::validate`] and refuse configs with problems.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default edge margin that activates auto-scroll, in pixels.
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 140.0;
/// Default per-frame scroll at the threshold boundary.
pub const DEFAULT_MIN_SCROLL_SPEED_PX: f64 = 2.0;
/// Default per-frame scroll at (or past) the edge.
pub const DEFAULT_MAX_SCROLL_SPEED_PX: f64 = 20.0;
/// Default floating preview width; matches the rendered card width.
pub const DEFAULT_PREVIEW_WIDTH_PX: f64 = 280.0;
pub const DEFAULT_PREVIEW_HEIGHT_PX: f64 = 96.0;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Edge auto-scroll tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Distance from a visible edge below which scrolling starts.
    pub threshold_px: f64,
    /// Pixels per frame right at the threshold.
    pub min_speed_px: f64,
    /// Pixels per frame at the edge; bounds per-frame jumps.
    pub max_speed_px: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            min_speed_px: DEFAULT_MIN_SCROLL_SPEED_PX,
            max_speed_px: DEFAULT_MAX_SCROLL_SPEED_PX,
        }
    }
}

/// Floating touch preview size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREVIEW_WIDTH_PX,
            height: DEFAULT_PREVIEW_HEIGHT_PX,
        }
    }
}

// ---------------------------------------------------------------------------
// BoardConfig
// ---------------------------------------------------------------------------

/// Top-level board configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub auto_scroll: AutoScrollConfig,
    pub preview: PreviewConfig,
}

impl BoardConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// List every out-of-range parameter. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let scroll = &self.auto_scroll;

        if !(scroll.threshold_px.is_finite() && scroll.threshold_px > 0.0) {
            errors.push(format!(
                "auto_scroll.threshold_px must be > 0, got {}",
                scroll.threshold_px
            ));
        }
        if !(scroll.min_speed_px.is_finite() && scroll.min_speed_px >= 0.0) {
            errors.push(format!(
                "auto_scroll.min_speed_px must be >= 0, got {}",
                scroll.min_speed_px
            ));
        }
        if !(scroll.max_speed_px.is_finite() && scroll.max_speed_px > 0.0) {
            errors.push(format!(
                "auto_scroll.max_speed_px must be > 0, got {}",
                scroll.max_speed_px
            ));
        }
        if scroll.max_speed_px < scroll.min_speed_px {
            errors.push(format!(
                "auto_scroll.max_speed_px ({}) must be >= min_speed_px ({})",
                scroll.max_speed_px, scroll.min_speed_px
            ));
        }

        if !(self.preview.width.is_finite() && self.preview.width > 0.0) {
            errors.push(format!("preview.width must be > 0, got {}", self.preview.width));
        }
        if !(self.preview.height.is_finite() && self.preview.height > 0.0) {
            errors.push(format!(
                "preview.height must be > 0, got {}",
                self.preview.height
            ));
        }

        errors
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
