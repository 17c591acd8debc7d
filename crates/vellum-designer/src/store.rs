//! Ordered, z-ranked stroke storage.

use crate::model::{PenStroke, Point, Stroke, StrokeId, StrokeKind};
use crate::selection::Selection;
use vellum_core::DocumentError;

/// Paint-order change applied to a set of strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOp {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Pen stroke currently accepting samples.
#[derive(Debug, Clone)]
struct PenInput {
    id: StrokeId,
    color: String,
    size: f64,
    /// Pointer is down
    drawing: bool,
}

/// Owns every stroke of a document.
///
/// Strokes keep their insertion order internally; paint order is given by
/// `z` and exposed through [`StrokeStore::iter_z`].
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    pen_input: Option<PenInput>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted strokes, keeping their z values.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes,
            pen_input: None,
        }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.strokes.iter().any(|s| s.id() == id)
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id() == id)
    }

    /// Strokes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Strokes in ascending paint order; ties keep insertion order.
    pub fn iter_z(&self) -> impl Iterator<Item = &Stroke> {
        let mut sorted: Vec<&Stroke> = self.strokes.iter().collect();
        sorted.sort_by_key(|s| s.z());
        sorted.into_iter()
    }

    /// Highest rank in use, 0 when empty.
    pub fn max_z(&self) -> i64 {
        self.strokes.iter().map(Stroke::z).max().unwrap_or(0).max(0)
    }

    pub fn min_z(&self) -> i64 {
        self.strokes.iter().map(Stroke::z).min().unwrap_or(0)
    }

    /// Append above every existing stroke and return its id.
    pub fn append(&mut self, mut stroke: Stroke) -> StrokeId {
        stroke.meta_mut().z = self.max_z() + 1;
        let id = stroke.id();
        tracing::debug!("Appended {} stroke {} at z={}", stroke.kind(), id, stroke.z());
        self.strokes.push(stroke);
        id
    }

    /// Replace the stroke with the same id.
    pub fn replace(&mut self, stroke: Stroke) -> Result<(), DocumentError> {
        let id = stroke.id();
        let slot = self
            .get_mut(id)
            .ok_or(DocumentError::UnknownStroke { id: id.to_string() })?;
        *slot = stroke;
        Ok(())
    }

    /// Apply `patch` to every selected stroke of `kind` (any kind when `None`).
    ///
    /// Returns how many strokes actually changed.
    pub fn patch_selected<F>(
        &mut self,
        kind: Option<StrokeKind>,
        selection: &Selection,
        mut patch: F,
    ) -> usize
    where
        F: FnMut(&mut Stroke),
    {
        let mut changed = 0;
        for stroke in self.strokes.iter_mut() {
            if !selection.contains(stroke.id()) || kind.is_some_and(|k| k != stroke.kind()) {
                continue;
            }
            let before = stroke.clone();
            patch(stroke);
            if *stroke != before {
                changed += 1;
            }
        }
        tracing::debug!("Patched {} stroke(s)", changed);
        changed
    }

    /// Remove every stroke in `ids`, returning the removed ones.
    ///
    /// Erasers targeting a removed stroke stay in place but no longer affect
    /// anything; ids are never reused so they cannot reattach.
    pub fn remove(&mut self, ids: &[StrokeId]) -> Vec<Stroke> {
        let (removed, kept): (Vec<Stroke>, Vec<Stroke>) = std::mem::take(&mut self.strokes)
            .into_iter()
            .partition(|s| ids.contains(&s.id()));
        self.strokes = kept;
        if let Some(input) = &self.pen_input {
            if ids.contains(&input.id) {
                self.pen_input = None;
            }
        }
        tracing::debug!("Removed {} stroke(s)", removed.len());
        removed
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.pen_input = None;
    }

    /// Renumber ranks to 1..=n by ascending z, keeping the order of ties.
    pub fn normalize_z(&mut self) {
        let mut order: Vec<usize> = (0..self.strokes.len()).collect();
        order.sort_by_key(|&i| self.strokes[i].z());
        for (rank, i) in order.into_iter().enumerate() {
            self.strokes[i].meta_mut().z = rank as i64 + 1;
        }
    }

    /// Change the paint order of `ids`, then normalize.
    pub fn reorder(&mut self, op: ReorderOp, ids: &[StrokeId]) {
        if ids.is_empty() {
            return;
        }
        self.normalize_z();
        // Selected strokes in their current relative order.
        let mut selected: Vec<(i64, StrokeId)> = self
            .strokes
            .iter()
            .filter(|s| ids.contains(&s.id()))
            .map(|s| (s.z(), s.id()))
            .collect();
        selected.sort_by_key(|(z, _)| *z);

        match op {
            ReorderOp::ToFront => {
                let top = self.max_z();
                for (i, (_, id)) in selected.iter().enumerate() {
                    self.set_z(*id, top + 1 + i as i64);
                }
            }
            ReorderOp::ToBack => {
                let bottom = self.min_z();
                let n = selected.len() as i64;
                for (i, (_, id)) in selected.iter().enumerate() {
                    self.set_z(*id, bottom - n + i as i64);
                }
            }
            ReorderOp::Forward => {
                // Topmost first so a run of selected strokes moves together.
                for (_, id) in selected.iter().rev() {
                    self.swap_with_neighbor(*id, true);
                }
            }
            ReorderOp::Backward => {
                for (_, id) in selected.iter() {
                    self.swap_with_neighbor(*id, false);
                }
            }
        }
        self.normalize_z();
        tracing::debug!("Reordered {} stroke(s) with {:?}", selected.len(), op);
    }

    fn set_z(&mut self, id: StrokeId, z: i64) {
        if let Some(s) = self.get_mut(id) {
            s.meta_mut().z = z;
        }
    }

    fn swap_with_neighbor(&mut self, id: StrokeId, above: bool) {
        let Some(z) = self.get(id).map(Stroke::z) else {
            return;
        };
        let neighbor = self
            .strokes
            .iter()
            .filter(|s| if above { s.z() > z } else { s.z() < z })
            .min_by_key(|s| (s.z() - z).abs())
            .map(|s| (s.id(), s.z()));
        if let Some((other, other_z)) = neighbor {
            self.set_z(other, z);
            self.set_z(id, other_z);
        }
    }

    /// Start a freehand sample run.
    ///
    /// Continues the previous pen stroke when color and width are unchanged
    /// and coalescing was not broken, inserting a gap before the new run.
    /// Otherwise appends a new pen stroke.
    pub fn begin_pen_input(&mut self, color: &str, size: f64, at: Point) -> StrokeId {
        let reuse = self
            .pen_input
            .as_ref()
            .filter(|p| p.color == color && p.size == size)
            .map(|p| p.id)
            .filter(|id| matches!(self.get(*id), Some(Stroke::Pen(_))));

        let id = match reuse {
            Some(id) => id,
            None => self.append(PenStroke::new(color, size).into()),
        };
        if let Some(Stroke::Pen(pen)) = self.get_mut(id) {
            if pen.points.last().is_some_and(|p| !p.is_gap()) {
                pen.points.push(Point::GAP);
            }
            pen.points.push(at);
        }
        self.pen_input = Some(PenInput {
            id,
            color: color.to_string(),
            size,
            drawing: true,
        });
        id
    }

    /// Add a sample to the active run. Repeated points are dropped.
    pub fn extend_pen_input(&mut self, at: Point) -> bool {
        let Some(input) = self.pen_input.as_ref().filter(|p| p.drawing) else {
            return false;
        };
        let id = input.id;
        match self.get_mut(id) {
            Some(Stroke::Pen(pen)) => {
                if pen.points.last() == Some(&at) {
                    return false;
                }
                pen.points.push(at);
                true
            }
            _ => false,
        }
    }

    /// Pen lifted; the stroke stays available for coalescing.
    pub fn end_pen_input(&mut self) -> Option<StrokeId> {
        let input = self.pen_input.as_mut()?;
        input.drawing = false;
        Some(input.id)
    }

    /// Stop coalescing, e.g. after a tool or pen style change.
    pub fn break_pen_input(&mut self) {
        self.pen_input = None;
    }

    pub fn active_pen(&self) -> Option<StrokeId> {
        self.pen_input.as_ref().map(|p| p.id)
    }

    /// Drop the last sub-path of the active pen stroke, or of the most
    /// recently added pen stroke when none is active.
    ///
    /// A stroke left without points is removed. Returns false when there
    /// is no pen stroke.
    pub fn undo_last_pen_segment(&mut self) -> bool {
        let active = self.active_pen().filter(|id| self.contains(*id));
        let target = active.or_else(|| {
            self.strokes
                .iter()
                .rev()
                .find(|s| s.kind() == StrokeKind::Pen)
                .map(Stroke::id)
        });
        let Some(id) = target else {
            return false;
        };

        let emptied = match self.get_mut(id) {
            Some(Stroke::Pen(pen)) => {
                while pen.points.last().is_some_and(Point::is_gap) {
                    pen.points.pop();
                }
                let cut = pen.points.iter().rposition(Point::is_gap).unwrap_or(0);
                pen.points.truncate(cut);
                while pen.points.last().is_some_and(Point::is_gap) {
                    pen.points.pop();
                }
                pen.points.is_empty()
            }
            _ => return false,
        };
        if emptied {
            self.remove(&[id]);
        }
        true
    }

    /// Clone of every stroke, for history and persistence.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }

    /// Replace the content with `strokes`. Coalescing is reset.
    pub fn restore(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.pen_input = None;
    }
}
