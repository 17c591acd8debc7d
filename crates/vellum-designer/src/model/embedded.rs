//! Embedded vector artwork.

use serde::{Deserialize, Serialize};

use super::{Rect, StrokeMeta};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Sanitized SVG markup placed at `(x, y)` with a uniform scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedVector {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    pub svg: String,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
    /// Intrinsic width
    pub iw: f64,
    /// Intrinsic height
    pub ih: f64,
    #[serde(default)]
    pub view_box: Option<ViewBox>,
}

impl EmbeddedVector {
    /// Placed box before rotation.
    pub fn placed_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.iw * self.scale, self.ih * self.scale)
    }
}
