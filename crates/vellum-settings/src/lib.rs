//! Vellum Settings Crate
//!
//! Handles editor configuration: tool defaults, canvas background, export
//! options and the font list offered to the outline provider.

pub mod config;
pub mod error;

pub use config::{
    CanvasSettings, Config, ExportSettings, FontEntry, PenSettings, PolygonSettings,
    ShapeKindSetting, ShapeSettings, TextSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
