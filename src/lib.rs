//! # Vellum
//!
//! A layered drawing document with freehand pen strokes, targeted erasers,
//! text, shapes, polygons and embedded vector artwork. Documents render to a
//! raster preview and export to a standalone SVG that matches it.
//!
//! ## Architecture
//!
//! Vellum is organized as a workspace with multiple crates:
//!
//! 1. **vellum-core** - Geometry, colors, constants and error types
//! 2. **vellum-settings** - Tool defaults, canvas and export settings, font sources
//! 3. **vellum-designer** - Stroke model, hit-testing, transforms, raster and SVG output
//! 4. **vellum** - Command-line front end that integrates all crates

pub use vellum_designer as designer;
pub use vellum_settings as settings;

pub use vellum_core::{DocumentError, Error, ExportError, ImportError, Result, Rgba};
pub use vellum_designer::{
    encode_png, Document, DocumentSnapshot, ExportOptions, ExportReport, Modifiers, RasterOptions,
    Stroke, StrokeKind, SystemFontSource, Tool,
};
pub use vellum_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so command output can be piped. `RUST_LOG` overrides
/// the default `info` level; `json` switches to one JSON object per event.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    Ok(())
}
