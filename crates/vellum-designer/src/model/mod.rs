//! Stroke data model.
//!
//! A document is a flat list of [`Stroke`]s. Every variant carries a
//! [`StrokeMeta`] with its id, paint-order rank and layer flags; the
//! variant payload holds the geometry and styling.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use vellum_core::constants::MIN_POLYGON_VERTICES;
use vellum_core::GeometryError;

mod embedded;
mod pen;
mod polygon;
mod shape;
mod text;

pub use embedded::{EmbeddedVector, ViewBox};
pub use pen::{EraserStroke, PenStroke};
pub use polygon::PolygonStroke;
pub use shape::{ShapeKind, ShapeStroke};
pub use text::{TextAlign, TextOutline, TextStroke};

pub use vellum_core::{Point, Rect};

/// Opaque stroke identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeId(Uuid);

impl StrokeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id, mainly for tests and fixtures.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_true() -> bool {
    true
}

/// Fields shared by every stroke variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeMeta {
    pub id: StrokeId,
    /// Paint-order rank; higher paints later. Unique after normalization.
    pub z: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
}

impl StrokeMeta {
    pub fn new() -> Self {
        Self {
            id: StrokeId::new(),
            z: 0,
            visible: true,
            locked: false,
        }
    }
}

impl Default for StrokeMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Stroke join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_svg(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Stroke cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    pub fn as_svg(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Variant discriminant, used as a type filter for batch patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    Pen,
    Eraser,
    Text,
    Embedded,
    Shape,
    Polygon,
}

impl fmt::Display for StrokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrokeKind::Pen => "pen",
            StrokeKind::Eraser => "eraser",
            StrokeKind::Text => "text",
            StrokeKind::Embedded => "embedded",
            StrokeKind::Shape => "shape",
            StrokeKind::Polygon => "polygon",
        };
        f.write_str(name)
    }
}

/// One drawable document object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stroke {
    Pen(PenStroke),
    Eraser(EraserStroke),
    Text(TextStroke),
    Embedded(EmbeddedVector),
    Shape(ShapeStroke),
    Polygon(PolygonStroke),
}

impl Stroke {
    pub fn meta(&self) -> &StrokeMeta {
        match self {
            Stroke::Pen(s) => &s.meta,
            Stroke::Eraser(s) => &s.meta,
            Stroke::Text(s) => &s.meta,
            Stroke::Embedded(s) => &s.meta,
            Stroke::Shape(s) => &s.meta,
            Stroke::Polygon(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut StrokeMeta {
        match self {
            Stroke::Pen(s) => &mut s.meta,
            Stroke::Eraser(s) => &mut s.meta,
            Stroke::Text(s) => &mut s.meta,
            Stroke::Embedded(s) => &mut s.meta,
            Stroke::Shape(s) => &mut s.meta,
            Stroke::Polygon(s) => &mut s.meta,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.meta().id
    }

    pub fn z(&self) -> i64 {
        self.meta().z
    }

    pub fn is_visible(&self) -> bool {
        self.meta().visible
    }

    pub fn is_locked(&self) -> bool {
        self.meta().locked
    }

    pub fn kind(&self) -> StrokeKind {
        match self {
            Stroke::Pen(_) => StrokeKind::Pen,
            Stroke::Eraser(_) => StrokeKind::Eraser,
            Stroke::Text(_) => StrokeKind::Text,
            Stroke::Embedded(_) => StrokeKind::Embedded,
            Stroke::Shape(_) => StrokeKind::Shape,
            Stroke::Polygon(_) => StrokeKind::Polygon,
        }
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self, Stroke::Eraser(_))
    }

    /// Stored rotation in degrees; freehand strokes never rotate.
    pub fn rotation(&self) -> f64 {
        match self {
            Stroke::Pen(_) | Stroke::Eraser(_) => 0.0,
            Stroke::Text(s) => s.rotation,
            Stroke::Embedded(s) => s.rotation,
            Stroke::Shape(s) => s.rotation,
            Stroke::Polygon(s) => s.rotation,
        }
    }

    /// Set the rotation. Returns false for variants without one.
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        match self {
            Stroke::Pen(_) | Stroke::Eraser(_) => false,
            Stroke::Text(s) => {
                s.rotation = degrees;
                true
            }
            Stroke::Embedded(s) => {
                s.rotation = degrees;
                true
            }
            Stroke::Shape(s) => {
                s.rotation = degrees;
                true
            }
            Stroke::Polygon(s) => {
                s.rotation = degrees;
                true
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextStroke> {
        match self {
            Stroke::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Reject NaN or infinite geometry, and closed polygons that cannot
    /// enclose an area. Pen gap markers are allowed.
    pub fn check_geometry(&self) -> Result<(), GeometryError> {
        let fields: Vec<(&str, f64)> = match self {
            Stroke::Pen(s) => vec![("size", s.size)],
            Stroke::Eraser(s) => vec![("size", s.size)],
            Stroke::Text(s) => vec![
                ("x", s.x),
                ("y", s.y),
                ("size", s.size),
                ("line_height", s.line_height),
                ("letter_spacing", s.letter_spacing),
                ("rotation", s.rotation),
            ],
            Stroke::Embedded(s) => vec![
                ("x", s.x),
                ("y", s.y),
                ("scale", s.scale),
                ("iw", s.iw),
                ("ih", s.ih),
                ("rotation", s.rotation),
            ],
            Stroke::Shape(s) => vec![
                ("x", s.x),
                ("y", s.y),
                ("w", s.w),
                ("h", s.h),
                ("stroke_width", s.stroke_width),
                ("rotation", s.rotation),
            ],
            Stroke::Polygon(s) => {
                if s.points.iter().any(|p| !p.is_finite()) {
                    return Err(self.non_finite("points"));
                }
                if s.closed && s.points.len() < MIN_POLYGON_VERTICES {
                    return Err(GeometryError::TooFewVertices {
                        count: s.points.len(),
                    });
                }
                vec![("stroke_width", s.stroke_width), ("rotation", s.rotation)]
            }
        };
        match fields.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, _)) => Err(self.non_finite(field)),
            None => Ok(()),
        }
    }

    fn non_finite(&self, field: &str) -> GeometryError {
        GeometryError::NonFinite {
            id: self.id().to_string(),
            field: field.to_string(),
        }
    }
}

impl From<PenStroke> for Stroke {
    fn from(s: PenStroke) -> Self {
        Stroke::Pen(s)
    }
}

impl From<EraserStroke> for Stroke {
    fn from(s: EraserStroke) -> Self {
        Stroke::Eraser(s)
    }
}

impl From<TextStroke> for Stroke {
    fn from(s: TextStroke) -> Self {
        Stroke::Text(s)
    }
}

impl From<EmbeddedVector> for Stroke {
    fn from(s: EmbeddedVector) -> Self {
        Stroke::Embedded(s)
    }
}

impl From<ShapeStroke> for Stroke {
    fn from(s: ShapeStroke) -> Self {
        Stroke::Shape(s)
    }
}

impl From<PolygonStroke> for Stroke {
    fn from(s: PolygonStroke) -> Self {
        Stroke::Polygon(s)
    }
}

/// Convert a polyline with gap markers into a lyon path, one sub-path per run.
pub(crate) fn polyline_path(points: &[Point], close: bool) -> lyon::path::Path {
    let mut builder = lyon::path::Path::builder();
    let mut open = false;
    for p in points {
        if p.is_gap() {
            if open {
                builder.end(close);
                open = false;
            }
            continue;
        }
        let at = lyon::math::point(p.x as f32, p.y as f32);
        if open {
            builder.line_to(at);
        } else {
            builder.begin(at);
            open = true;
        }
    }
    if open {
        builder.end(close);
    }
    builder.build()
}
