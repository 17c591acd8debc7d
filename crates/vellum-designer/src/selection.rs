use crate::model::StrokeId;
use crate::store::StrokeStore;

/// Transient set of selected stroke ids.
///
/// The first id is the primary selection: it is the one whose handles are
/// shown and hit-tested for resizing. Selection lives outside the strokes
/// and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<StrokeId>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = StrokeId>) -> Self {
        let mut sel = Self::new();
        for id in ids {
            sel.add(id);
        }
        sel
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn primary(&self) -> Option<StrokeId> {
        self.ids.first().copied()
    }

    pub fn ids(&self) -> &[StrokeId] {
        &self.ids
    }

    /// Replace the selection with a single id.
    pub fn select_only(&mut self, id: StrokeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn add(&mut self, id: StrokeId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    /// Toggle membership, as for shift-click.
    pub fn toggle(&mut self, id: StrokeId) {
        if self.contains(id) {
            self.ids.retain(|x| *x != id);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Select every stroke of the store except erasers.
    pub fn select_all(&mut self, store: &StrokeStore) {
        self.ids = store
            .iter_z()
            .filter(|s| !s.is_eraser())
            .map(|s| s.id())
            .collect();
    }

    /// Drop ids that no longer exist in `store`.
    pub fn retain_existing(&mut self, store: &StrokeStore) {
        self.ids.retain(|id| store.contains(*id));
    }
}
