//! Configuration file support for the drawing viewer.
//!
//! This module provides serialization and deserialization of viewer
//! settings, allowing them to be exported, imported and validated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, ViewerError};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
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
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Pan/zoom limits and factors
    #[serde(default)]
    pub viewer: ViewSettings,

    /// Markup defaults
    #[serde(default)]
    pub markup: MarkupSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            viewer: ViewSettings::default(),
            markup: MarkupSettings::default(),
        }
    }
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory the drawing images are served from
    #[serde(default = "default_drawings_dir")]
    pub drawings_dir: PathBuf,

    /// Font used by the text markup tool
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Where merged markup exports are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_drawings_dir() -> PathBuf {
    PathBuf::from("drawings")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            drawings_dir: default_drawings_dir(),
            font_path: None,
            export_dir: default_export_dir(),
        }
    }
}

/// Pan/zoom limits and factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Smallest zoom level
    pub min_zoom: f32,
    /// Largest zoom level
    pub max_zoom: f32,
    /// Zoom button multiplier
    pub zoom_step: f32,
    /// Wheel-up multiplier
    pub wheel_zoom_in: f32,
    /// Wheel-down multiplier
    pub wheel_zoom_out: f32,
    /// Base width assumed before an image has loaded
    pub default_base_width: f32,
    /// Base height assumed before an image has loaded
    pub default_base_height: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: constants::MIN_ZOOM,
            max_zoom: constants::MAX_ZOOM,
            zoom_step: constants::ZOOM_STEP,
            wheel_zoom_in: constants::WHEEL_ZOOM_IN,
            wheel_zoom_out: constants::WHEEL_ZOOM_OUT,
            default_base_width: constants::DEFAULT_BASE_WIDTH,
            default_base_height: constants::DEFAULT_BASE_HEIGHT,
        }
    }
}

/// Markup tool defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSettings {
    /// Initial stroke color as `#rrggbb`
    pub default_color: String,
    /// Initial stroke width
    pub default_line_width: f32,
    /// Number of raster snapshots kept for undo
    pub history_limit: usize,
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            default_color: constants::DEFAULT_MARKUP_COLOR.to_string(),
            default_line_width: constants::DEFAULT_LINE_WIDTH,
            history_limit: constants::MARKUP_HISTORY_LIMIT,
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ViewerConfig = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ViewerError::config(format!(
                "config version {} is newer than supported version {}",
                config.version, CONFIG_VERSION
            )));
        }
        config.validate();
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save to a configuration file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default location of the configuration file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("drawview").join("config.json"))
    }

    /// Clamp out-of-range values back to usable ones.
    pub fn validate(&mut self) {
        let defaults = ViewSettings::default();
        let v = &mut self.viewer;

        if !(v.min_zoom.is_finite() && v.min_zoom > 0.0) {
            log::warn!("Invalid min_zoom {}, using {}", v.min_zoom, defaults.min_zoom);
            v.min_zoom = defaults.min_zoom;
        }
        if !(v.max_zoom.is_finite() && v.max_zoom >= v.min_zoom) {
            log::warn!("Invalid max_zoom {}, using {}", v.max_zoom, defaults.max_zoom);
            v.max_zoom = defaults.max_zoom.max(v.min_zoom);
        }
        for (name, value, default) in [
            ("zoom_step", &mut v.zoom_step, defaults.zoom_step),
            ("wheel_zoom_in", &mut v.wheel_zoom_in, defaults.wheel_zoom_in),
        ] {
            if !(value.is_finite() && *value > 1.0) {
                log::warn!("Invalid {} {}, using {}", name, value, default);
                *value = default;
            }
        }
        if !(v.wheel_zoom_out.is_finite() && v.wheel_zoom_out > 0.0 && v.wheel_zoom_out < 1.0) {
            log::warn!(
                "Invalid wheel_zoom_out {}, using {}",
                v.wheel_zoom_out,
                defaults.wheel_zoom_out
            );
            v.wheel_zoom_out = defaults.wheel_zoom_out;
        }
        if !(v.default_base_width > 0.0 && v.default_base_height > 0.0) {
            v.default_base_width = defaults.default_base_width;
            v.default_base_height = defaults.default_base_height;
        }

        let m = &mut self.markup;
        let clamped = m
            .default_line_width
            .clamp(constants::MIN_LINE_WIDTH, constants::MAX_LINE_WIDTH);
        if clamped != m.default_line_width {
            log::warn!("Line width {} clamped to {}", m.default_line_width, clamped);
            m.default_line_width = clamped;
        }
        if crate::markup::Rgb::from_hex(&m.default_color).is_none() {
            log::warn!("Invalid markup color '{}'", m.default_color);
            m.default_color = constants::DEFAULT_MARKUP_COLOR.to_string();
        }
        if m.history_limit == 0 {
            m.history_limit = constants::MARKUP_HISTORY_LIMIT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = ViewerConfig::default();
        let json = config.to_json().unwrap();
        let back = ViewerConfig::from_json(&json).unwrap();
        assert_eq!(back.viewer, config.viewer);
        assert_eq!(back.markup, config.markup);
        assert_eq!(back.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let config = ViewerConfig::from_json(r#"{"preferences": {"log_level": "debug"}}"#).unwrap();
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.drawings_dir, PathBuf::from("drawings"));
        assert_eq!(config.viewer.max_zoom, 5.0);
        assert_eq!(config.markup.history_limit, 20);
    }

    #[test]
    fn test_validate_repairs_bad_values() {
        let config = ViewerConfig::from_json(
            r##"{"viewer": {"min_zoom": -1, "zoom_step": 0.5, "wheel_zoom_out": 2},
                 "markup": {"default_line_width": 50, "default_color": "red", "history_limit": 0}}"##,
        )
        .unwrap();
        assert_eq!(config.viewer.min_zoom, 0.1);
        assert_eq!(config.viewer.zoom_step, 1.2);
        assert_eq!(config.viewer.wheel_zoom_out, 0.85);
        assert_eq!(config.markup.default_line_width, 10.0);
        assert_eq!(config.markup.default_color, "#ff0000");
        assert_eq!(config.markup.history_limit, 20);
    }

    #[test]
    fn test_newer_version_rejected() {
        assert!(ViewerConfig::from_json(r#"{"version": 99}"#).is_err());
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.name(), "Trace");
    }
}
