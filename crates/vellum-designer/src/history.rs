//! Snapshot-based undo and redo.

use crate::model::Stroke;
use vellum_core::constants::HISTORY_LIMIT;

/// Bounded stacks of stroke-list snapshots.
///
/// Callers record the state *before* each committed mutation. Undo swaps
/// the current state for the most recent snapshot and keeps the current
/// one for redo.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Vec<Stroke>>,
    redo_stack: Vec<Vec<Stroke>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push the state preceding a mutation. Clears the redo stack.
    pub fn record(&mut self, before: Vec<Stroke>) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// State to restore for undo, given the current one.
    pub fn undo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// State to restore for redo, given the current one.
    pub fn redo(&mut self, current: Vec<Stroke>) -> Option<Vec<Stroke>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear history stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
