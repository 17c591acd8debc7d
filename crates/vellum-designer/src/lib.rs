//! # Vellum Designer
//!
//! This crate is the editing core of Vellum: a layered document of pen
//! strokes, erasers, text, shapes, polygons and embedded vector artwork,
//! with a raster preview and a standalone SVG export that matches it.
//!
//! ## Core Components
//!
//! ### Document Model
//! - **Model**: the closed [`Stroke`] union and its per-variant payloads
//! - **Store**: z-ranked storage, reordering and freehand coalescing
//! - **Selection**: transient selected ids, first one primary
//!
//! ### Geometry
//! - **Bounds**: local boxes, rotation pivots and export bounds
//! - **Hit**: topmost-stroke and handle queries in each stroke's frame
//! - **Transform**: translate, anchored resize and rotation
//! - **Text Layout**: glyph placement shared by every consumer
//!
//! ### Output
//! - **Raster**: tiny-skia compositing with per-target erasure
//! - **SVG Export**: per-target masks, rotation groups, glyph paths
//!
//! ### Editing
//! - **Session**: modal pointer interactions and polygon drafts
//! - **History**: snapshot undo/redo
//! - **Document**: composition root for hosts
//! - **Serialization**: versioned JSON snapshots
//!
//! ## Architecture
//!
//! ```text
//! Document
//!   ├── StrokeStore (strokes, z-order)
//!   ├── Selection / Session / History
//!   ├── FontRegistry (resolved faces, pending loads)
//!   └── EmbedCache (parsed embedded artwork)
//!
//! bounds ── hit ── transform
//!    └── text_layout ── raster / svg_export
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vellum_designer::{Document, Modifiers, Point, Tool};
//!
//! let mut doc = Document::new();
//! doc.set_tool(Tool::Shape);
//! doc.pointer_down(Point::new(10.0, 10.0), Modifiers::NONE);
//! doc.pointer_move(Point::new(110.0, 60.0), Modifiers::NONE);
//! doc.pointer_up();
//!
//! let report = doc.export_svg()?;
//! ```

pub mod bounds;
pub mod document;
pub mod embed;
pub mod fonts;
pub mod history;
pub mod hit;
pub mod model;
pub mod raster;
pub mod selection;
pub mod serialization;
pub mod session;
pub mod store;
pub mod svg_export;
pub mod text_layout;
pub mod transform;

pub use bounds::{export_box, local_bounds, rotation_center, selection_frame, union_bounds};
pub use document::{Document, Modifiers};
pub use embed::{extract_inner, parse_meta, sanitize_for_embed, SvgMeta};
pub use fonts::{
    FontRegistry, FontSource, FontState, GlyphOutlines, GlyphPath, MemoryFontSource,
    RustTypeFace, SystemFontSource,
};
pub use history::History;
pub use hit::{hit_handle, hit_test};
pub use model::{
    EmbeddedVector, EraserStroke, LineCap, LineJoin, PenStroke, Point, PolygonStroke, Rect,
    ShapeKind, ShapeStroke, Stroke, StrokeId, StrokeKind, StrokeMeta, TextAlign, TextOutline,
    TextStroke, ViewBox,
};
pub use raster::{encode_png, EmbedCache, RasterOptions};
pub use selection::Selection;
pub use serialization::{DocumentSnapshot, EmbeddedFont, FontSourceKind, SnapshotMetadata};
pub use session::{DraftStep, PolygonDraft, Session, Tool};
pub use store::{ReorderOp, StrokeStore};
pub use svg_export::{export_svg, ExportOptions, ExportReport};
pub use text_layout::{layout_text, layout_with, PlacedGlyph, TextLayout};
pub use transform::{resize, rotate_by, rotate_to, translate, Handle, ResizeRequest};
