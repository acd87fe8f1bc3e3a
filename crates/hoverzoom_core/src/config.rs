//! Tunable constants for the hover preview.
//!
//! The defaults are what the content script ships with. An embedding loader
//! may hand over a JSON object instead; any field it omits keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Size;
use crate::messages::Locale;

/// Log level setting for the developer console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Disable logging entirely
    Off,
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Attributes that commonly carry a full-size image URL, in priority order.
pub const DEFAULT_HIGH_RES_ATTRIBUTES: [&str; 7] = [
    "data-large-src",
    "data-original-src",
    "data-highres-src",
    "data-full-src",
    "data-zoom-src",
    "data-src",
    "data-original",
];

/// Preview configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverZoomConfig {
    /// Magnification applied to the natural image size
    pub zoom_factor: f64,
    /// Largest preview as a fraction of each viewport dimension
    pub viewport_fraction: f64,
    /// Distance between the pointer and the preview corner
    pub pointer_offset: f64,
    /// Hover targets smaller than this in either dimension are ignored
    pub min_target_size: f64,
    /// How long the on/off banner stays visible
    pub notification_duration_ms: u32,
    /// Placeholder size for elements that report no dimensions
    pub placeholder_size: Size,
    /// Whether previews are enabled when the script loads
    pub active_on_start: bool,
    /// Attributes scanned for a full-size URL, highest priority first
    pub high_res_attributes: Vec<String>,
    /// Developer console verbosity
    pub log_level: LogLevel,
    /// Banner language; `None` follows the browser
    pub locale: Option<Locale>,
}

impl Default for HoverZoomConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.5,
            viewport_fraction: 0.8,
            pointer_offset: 15.0,
            min_target_size: 30.0,
            notification_duration_ms: 2000,
            placeholder_size: Size::new(200.0, 150.0),
            active_on_start: true,
            high_res_attributes: DEFAULT_HIGH_RES_ATTRIBUTES
                .iter()
                .map(|attr| attr.to_string())
                .collect(),
            log_level: LogLevel::default(),
            locale: None,
        }
    }
}

impl HoverZoomConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 0.0) {
            return Err(ConfigError::invalid(format!(
                "zoom_factor must be positive, got {}",
                self.zoom_factor
            )));
        }
        if !(self.viewport_fraction > 0.0 && self.viewport_fraction <= 1.0) {
            return Err(ConfigError::invalid(format!(
                "viewport_fraction must be in (0, 1], got {}",
                self.viewport_fraction
            )));
        }
        if self.pointer_offset.is_nan() || self.pointer_offset < 0.0 {
            return Err(ConfigError::invalid(format!(
                "pointer_offset must not be negative, got {}",
                self.pointer_offset
            )));
        }
        if self.min_target_size.is_nan() || self.min_target_size < 0.0 {
            return Err(ConfigError::invalid(format!(
                "min_target_size must not be negative, got {}",
                self.min_target_size
            )));
        }
        if !self.placeholder_size.is_positive() {
            return Err(ConfigError::invalid("placeholder_size must be positive"));
        }
        Ok(())
    }
}
