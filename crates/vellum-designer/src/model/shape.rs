//! Primitive shapes: rectangle, ellipse and line.

use lyon::math::{point, vector, Angle, Box2D};
use lyon::path::{builder::BorderRadii, Path, Winding};
use serde::{Deserialize, Serialize};

use super::{Rect, StrokeMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Line,
}

/// A primitive anchored at `(x, y)` with signed extents `(w, h)`.
///
/// For rectangles and ellipses the extents may be negative while the shape
/// is being dragged out; the drawn box is always the normalized one. A line
/// runs from `(x, y)` to `(x + w, y + h)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStroke {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// `None` draws no fill
    #[serde(default)]
    pub fill: Option<String>,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub rotation: f64,
}

impl ShapeStroke {
    pub fn new(kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            meta: StrokeMeta::new(),
            kind,
            x,
            y,
            w: 0.0,
            h: 0.0,
            fill: None,
            stroke: "#111111".to_string(),
            stroke_width: 2.0,
            corner_radius: None,
            rotation: 0.0,
        }
    }

    /// Builder-style geometry setter.
    pub fn with_size(mut self, w: f64, h: f64) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Normalized box of a rect or ellipse (top-left plus absolute extents).
    pub fn normalized_box(&self) -> Rect {
        let x = if self.w >= 0.0 { self.x } else { self.x + self.w };
        let y = if self.h >= 0.0 { self.y } else { self.y + self.h };
        Rect::new(x, y, self.w.abs(), self.h.abs())
    }

    /// Corner radius clamped to half the shorter side.
    pub fn effective_radius(&self) -> f64 {
        let b = self.normalized_box();
        self.corner_radius
            .unwrap_or(0.0)
            .min(b.w.min(b.h) / 2.0)
            .max(0.0)
    }

    pub fn has_fill(&self) -> bool {
        self.kind != ShapeKind::Line && self.fill.is_some()
    }

    /// Unrotated outline in document space.
    pub fn path(&self) -> Path {
        let mut builder = Path::builder();
        match self.kind {
            ShapeKind::Rect => {
                let b = self.normalized_box();
                let rect = Box2D::new(
                    point(b.x as f32, b.y as f32),
                    point(b.max_x() as f32, b.max_y() as f32),
                );
                let r = self.effective_radius();
                if r > 0.0 {
                    builder.add_rounded_rectangle(
                        &rect,
                        &BorderRadii::new(r as f32),
                        Winding::Positive,
                    );
                } else {
                    builder.add_rectangle(&rect, Winding::Positive);
                }
            }
            ShapeKind::Ellipse => {
                let b = self.normalized_box();
                let c = b.center();
                builder.add_ellipse(
                    point(c.x as f32, c.y as f32),
                    vector((b.w / 2.0) as f32, (b.h / 2.0) as f32),
                    Angle::radians(0.0),
                    Winding::Positive,
                );
            }
            ShapeKind::Line => {
                builder.begin(point(self.x as f32, self.y as f32));
                builder.line_to(point((self.x + self.w) as f32, (self.y + self.h) as f32));
                builder.end(false);
            }
        }
        builder.build()
    }
}
