//! Configuration and settings management for Vellum
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Pen and eraser defaults
//! - Shape and polygon defaults
//! - Text defaults
//! - Canvas background and live view size
//! - Export options
//! - Font families offered to the outline provider

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vellum_core::Rgba;

/// Directory name under the platform config dir.
const APP_DIR: &str = "vellum";

/// Pen and eraser defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PenSettings {
    /// Pen color
    pub color: String,
    /// Pen width in document units
    pub width: f64,
    /// Eraser width in document units
    pub eraser_width: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            color: "#111111".to_string(),
            width: 20.0,
            eraser_width: 20.0,
        }
    }
}

/// Primitive created by the shape tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKindSetting {
    Rect,
    Ellipse,
    Line,
}

impl std::fmt::Display for ShapeKindSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rect => write!(f, "rect"),
            Self::Ellipse => write!(f, "ellipse"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// Shape tool defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub kind: ShapeKindSetting,
    /// Fill color, used when `has_fill` is set
    pub fill: String,
    pub has_fill: bool,
    /// Outline color
    pub stroke: String,
    pub stroke_width: f64,
    /// Corner radius for rectangles
    pub corner_radius: f64,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKindSetting::Rect,
            fill: "#0099ff".to_string(),
            has_fill: true,
            stroke: "#111111".to_string(),
            stroke_width: 2.0,
            corner_radius: 12.0,
        }
    }
}

/// Polygon tool defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonSettings {
    pub fill: String,
    pub has_fill: bool,
    pub stroke: String,
    pub stroke_width: f64,
    /// Distance to the first vertex that closes a draft
    pub close_radius: f64,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            fill: "#0099ff".to_string(),
            has_fill: true,
            stroke: "#111111".to_string(),
            stroke_width: 2.0,
            close_radius: vellum_core::constants::POLYGON_CLOSE_RADIUS,
        }
    }
}

/// Text tool defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub font_family: String,
    pub fill: String,
    pub size: f64,
    /// Multiple of the font size between baselines
    pub line_height: f64,
    /// Extra spacing between glyphs, in document units
    pub letter_spacing: f64,
    /// Text inserted by a fresh text stroke
    pub placeholder: String,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            fill: "#111111".to_string(),
            size: 64.0,
            line_height: 1.2,
            letter_spacing: 0.0,
            placeholder: "Text".to_string(),
        }
    }
}

/// Canvas defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub background: String,
    pub transparent_background: bool,
    /// Live view width in pixels
    pub width: u32,
    /// Live view height in pixels
    pub height: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            transparent_background: true,
            width: 1200,
            height: 800,
        }
    }
}

/// Export options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Let live erasers cut through the background too
    pub erase_background: bool,
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            erase_background: false,
            file_name: "vellum.svg".to_string(),
        }
    }
}

/// A font family and where to fetch it from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    pub family: String,
    /// Local path or URL of the font file
    pub url: String,
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pen: PenSettings,
    pub shape: ShapeSettings,
    pub polygon: PolygonSettings,
    pub text: TextSettings,
    pub canvas: CanvasSettings,
    pub export: ExportSettings,
    pub fonts: Vec<FontEntry>,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform config file location (`<config dir>/vellum/config.toml`)
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or_else(|| ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
    }

    /// Load the config at the default path, falling back to defaults when it
    /// is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = match Self::default_config_path() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("No config directory: {}", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        positive("pen.width", self.pen.width)?;
        positive("pen.eraser_width", self.pen.eraser_width)?;
        non_negative("shape.stroke_width", self.shape.stroke_width)?;
        non_negative("shape.corner_radius", self.shape.corner_radius)?;
        non_negative("polygon.stroke_width", self.polygon.stroke_width)?;
        positive("polygon.close_radius", self.polygon.close_radius)?;
        positive("text.size", self.text.size)?;
        positive("text.line_height", self.text.line_height)?;
        if !self.text.letter_spacing.is_finite() {
            return Err(SettingsError::invalid("text.letter_spacing", "must be finite"));
        }
        if self.text.font_family.trim().is_empty() {
            return Err(SettingsError::invalid("text.font_family", "must not be empty"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SettingsError::invalid("canvas", "dimensions must be > 0"));
        }

        color("pen.color", &self.pen.color)?;
        color("shape.fill", &self.shape.fill)?;
        color("shape.stroke", &self.shape.stroke)?;
        color("polygon.fill", &self.polygon.fill)?;
        color("polygon.stroke", &self.polygon.stroke)?;
        color("text.fill", &self.text.fill)?;
        color("canvas.background", &self.canvas.background)?;

        for entry in &self.fonts {
            if entry.family.trim().is_empty() || entry.url.trim().is_empty() {
                return Err(SettingsError::invalid(
                    "fonts",
                    "entries need a family and a url",
                ));
            }
        }
        Ok(())
    }

    /// Look up the configured source of a font family
    pub fn font_url(&self, family: &str) -> Option<&str> {
        self.fonts
            .iter()
            .find(|f| f.family == family)
            .map(|f| f.url.as_str())
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

fn color(key: &str, value: &str) -> SettingsResult<()> {
    Rgba::parse(value)
        .map(|_| ())
        .map_err(|e| SettingsError::invalid(key, e.to_string()))
}
