//! Free polygons built vertex by vertex.

use serde::{Deserialize, Serialize};

use super::{polyline_path, LineCap, LineJoin, Point, StrokeMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStroke {
    #[serde(flatten)]
    pub meta: StrokeMeta,
    pub points: Vec<Point>,
    pub closed: bool,
    /// `None` draws no fill; fill only applies when `closed`
    #[serde(default)]
    pub fill: Option<String>,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub join: LineJoin,
    #[serde(default)]
    pub cap: LineCap,
}

impl PolygonStroke {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self {
            meta: StrokeMeta::new(),
            points,
            closed,
            fill: None,
            stroke: "#111111".to_string(),
            stroke_width: 2.0,
            rotation: 0.0,
            join: LineJoin::default(),
            cap: LineCap::default(),
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn is_filled(&self) -> bool {
        self.closed && self.fill.is_some()
    }

    pub fn path(&self) -> lyon::path::Path {
        polyline_path(&self.points, self.closed)
    }
}
