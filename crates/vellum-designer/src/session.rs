//! Pointer interaction sessions.
//!
//! Exactly one session is active at a time. Drag, resize, freehand input,
//! shape creation and polygon editing exclude each other until the pointer
//! is released or the session is cancelled.

use crate::model::{Stroke, StrokeId};
use crate::transform::Handle;
use vellum_core::constants::{HIT_TOLERANCE, MIN_POLYGON_VERTICES};
use vellum_core::{Point, Rect};

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Pen,
    Eraser,
    Shape,
    Polygon,
    Text,
}

/// The interaction in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    /// Moving a stroke with the pointer
    Drag {
        id: StrokeId,
        last: Point,
        moved: bool,
    },
    /// Dragging a corner handle of the primary selection
    Resize {
        id: StrokeId,
        handle: Handle,
        start_bounds: Rect,
        start: Box<Stroke>,
    },
    /// Pen or eraser samples being collected
    Freehand {
        id: StrokeId,
        eraser: bool,
        /// Eraser adds every stroke its samples pass over to its targets
        capture_hits: bool,
    },
    /// Rubber-banding a new shape from its first corner
    ShapeCreate { id: StrokeId, origin: Point },
    /// Multi-click polygon construction
    PolygonEdit(PolygonDraft),
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::Drag { .. } => "drag",
            Session::Resize { .. } => "resize",
            Session::Freehand { .. } => "freehand",
            Session::ShapeCreate { .. } => "shape-create",
            Session::PolygonEdit(_) => "polygon-edit",
        }
    }
}

/// Outcome of adding a vertex to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftStep {
    Added,
    /// The draft closed; these are its vertices
    Closed(Vec<Point>),
}

/// Polygon under construction.
///
/// Holds the committed vertices and an ephemeral trailing vertex that
/// follows the pointer. Nothing reaches the stroke store until the draft
/// closes with at least [`MIN_POLYGON_VERTICES`] vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonDraft {
    vertices: Vec<Point>,
    trailing: Option<Point>,
    close_radius: f64,
}

impl PolygonDraft {
    pub fn new(first: Point, close_radius: f64) -> Self {
        Self {
            vertices: vec![first],
            trailing: None,
            close_radius,
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn can_close(&self) -> bool {
        self.vertices.len() >= MIN_POLYGON_VERTICES
    }

    /// Move the trailing vertex.
    pub fn hover(&mut self, at: Point) {
        self.trailing = Some(at);
    }

    /// Committed vertices plus the trailing one, for previews.
    pub fn preview(&self) -> Vec<Point> {
        let mut pts = self.vertices.clone();
        pts.extend(self.trailing);
        pts
    }

    /// Add a vertex at `at`.
    ///
    /// Closes instead when the draft can close and `at` lands within the
    /// close radius of the first vertex, or repeats the last vertex (the
    /// second click of a double confirm).
    pub fn push(&mut self, at: Point) -> DraftStep {
        if self.can_close() {
            let near_first = self.vertices[0].distance_to(&at) <= self.close_radius;
            let repeats_last = self
                .vertices
                .last()
                .is_some_and(|last| last.distance_to(&at) <= HIT_TOLERANCE);
            if near_first || repeats_last {
                return DraftStep::Closed(self.vertices.clone());
            }
        }
        if self
            .vertices
            .last()
            .is_some_and(|last| last.distance_to(&at) <= HIT_TOLERANCE)
        {
            return DraftStep::Added;
        }
        self.vertices.push(at);
        self.trailing = None;
        DraftStep::Added
    }

    /// Vertices for an explicit close command, or `None` if too few.
    pub fn finish(&self) -> Option<Vec<Point>> {
        self.can_close().then(|| self.vertices.clone())
    }
}
