//! Freehand pen and targeted eraser strokes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vellum_core::geometry::serde_points;

use super::{polyline_path, Point, StrokeId, StrokeMeta};

/// Freehand polyline; may hold several sub-paths split by [`Point::GAP`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenStroke {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    #[serde(with = "serde_points")]
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
}

impl PenStroke {
    pub fn new(color: impl Into<String>, size: f64) -> Self {
        Self {
            meta: StrokeMeta::new(),
            points: Vec::new(),
            color: color.into(),
            size,
        }
    }

    /// Number of drawable sub-paths.
    pub fn sub_path_count(&self) -> usize {
        let mut count = 0;
        let mut in_run = false;
        for p in &self.points {
            if p.is_gap() {
                in_run = false;
            } else if !in_run {
                in_run = true;
                count += 1;
            }
        }
        count
    }

    pub fn path(&self) -> lyon::path::Path {
        polyline_path(&self.points, false)
    }
}

/// Freehand eraser whose effect is limited to `target_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraserStroke {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    #[serde(with = "serde_points")]
    pub points: Vec<Point>,
    pub size: f64,
    #[serde(default)]
    pub target_ids: BTreeSet<StrokeId>,
}

impl EraserStroke {
    pub fn new(size: f64) -> Self {
        Self {
            meta: StrokeMeta::new(),
            points: Vec::new(),
            size,
            target_ids: BTreeSet::new(),
        }
    }

    pub fn targets(&self, id: StrokeId) -> bool {
        self.target_ids.contains(&id)
    }

    pub fn path(&self) -> lyon::path::Path {
        polyline_path(&self.points, false)
    }
}
