use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use vellum::{
    encode_png, init_logging, Config, Document, DocumentSnapshot, StrokeKind, SystemFontSource,
    BUILD_DATE, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Render and export Vellum documents")]
struct Cli {
    /// Settings file (JSON or TOML); defaults to the user config
    #[arg(long, global = true, env = "VELLUM_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the document as a standalone SVG
    Export {
        document: PathBuf,
        /// Output file; defaults to the configured export file name
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Let erasers cut through the background too
        #[arg(long)]
        erase_background: bool,
    },
    /// Rasterize to PNG: the exported area, or a fixed view from the origin
    /// when a size is given
    Render {
        document: PathBuf,
        /// Output file; defaults to the document path with a .png extension
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// View width; defaults to the canvas width when only --height is set
        #[arg(long)]
        width: Option<u32>,
        /// View height; defaults to the canvas height when only --width is set
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print a summary of the document
    Info { document: PathBuf },
    /// List font families the outline provider can resolve
    Fonts,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn open(path: &Path, config: Config) -> Result<Document> {
    let snapshot = DocumentSnapshot::load_from_file(path)?;
    Document::from_snapshot(config, snapshot)
        .with_context(|| format!("Invalid document {}", path.display()))
}

async fn resolve_fonts(doc: &mut Document) {
    let missing = doc.missing_fonts();
    if missing.is_empty() {
        return;
    }
    let source = SystemFontSource::new().with_entries(&doc.config().fonts);
    let ready = doc.load_fonts(&source).await;
    if ready < missing.len() {
        tracing::warn!(
            "Resolved {} of {} font(s); unresolved text is left out",
            ready,
            missing.len()
        );
    }
}

async fn export(doc: &mut Document, output: PathBuf, erase_background: bool) -> Result<()> {
    if erase_background {
        doc.config_mut().export.erase_background = true;
    }
    resolve_fonts(doc).await;
    let report = doc.export_svg()?;
    for id in &report.skipped_text {
        tracing::warn!("Text {} was not exported", id);
    }
    fs::write(&output, report.svg)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        "Wrote {}x{} SVG to {}",
        report.width,
        report.height,
        output.display()
    );
    Ok(())
}

async fn render(doc: &mut Document, output: PathBuf, view: Option<(u32, u32)>) -> Result<()> {
    resolve_fonts(doc).await;
    let pixmap = match view {
        Some((width, height)) => {
            let opts = doc.raster_options(width, height);
            doc.render(&opts)?
        }
        None => doc.rasterize()?,
    };
    let png = encode_png(&pixmap)?;
    fs::write(&output, png).with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        "Wrote {}x{} PNG to {}",
        pixmap.width(),
        pixmap.height(),
        output.display()
    );
    Ok(())
}

async fn info(doc: &mut Document) -> Result<()> {
    resolve_fonts(doc).await;
    println!("Strokes: {}", doc.store().len());
    for kind in [
        StrokeKind::Pen,
        StrokeKind::Eraser,
        StrokeKind::Text,
        StrokeKind::Embedded,
        StrokeKind::Shape,
        StrokeKind::Polygon,
    ] {
        let count = doc.store().iter().filter(|s| s.kind() == kind).count();
        if count > 0 {
            println!("  {:<9} {}", kind.to_string(), count);
        }
    }
    let bg = if doc.is_transparent() {
        "transparent".to_string()
    } else {
        doc.background().to_hex()
    };
    println!("Background: {}", bg);
    match doc.export_svg() {
        Ok(report) => println!(
            "Export size: {}x{} at ({}, {})",
            report.width, report.height, report.bounds.x, report.bounds.y
        ),
        Err(e) => println!("Export size: none ({})", e),
    }
    let missing = doc.missing_fonts();
    if !missing.is_empty() {
        println!("Unresolved fonts: {}", missing.join(", "));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;
    tracing::debug!("vellum {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Export {
            document,
            output,
            erase_background,
        } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&config.export.file_name));
            let mut doc = open(&document, config)?;
            export(&mut doc, output, erase_background).await
        }
        Command::Render {
            document,
            output,
            width,
            height,
        } => {
            let output = output.unwrap_or_else(|| document.with_extension("png"));
            let view = (width.is_some() || height.is_some()).then(|| {
                (
                    width.unwrap_or(config.canvas.width),
                    height.unwrap_or(config.canvas.height),
                )
            });
            let mut doc = open(&document, config)?;
            render(&mut doc, output, view).await
        }
        Command::Info { document } => {
            let mut doc = open(&document, config)?;
            info(&mut doc).await
        }
        Command::Fonts => {
            for family in SystemFontSource::new()
                .with_entries(&config.fonts)
                .families()
            {
                println!("{}", family);
            }
            Ok(())
        }
    }
}
