//! # Vellum Core
//!
//! Shared building blocks for the Vellum editor crates: document-space
//! geometry (points, rectangles, rotation helpers), color parsing, numeric
//! constants and the error hierarchy.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

pub use color::Rgba;
pub use error::{
    ColorError, DocumentError, Error, ExportError, FontError, GeometryError, ImportError, Result,
};
pub use geometry::{
    dist_to_segment, point_in_polygon, rotate_point, unrotate_point, Extent, Point, Rect,
};
pub use types::{ReadyCallback, StatusCallback};
