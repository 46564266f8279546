//! Ordered selection of element ids.

use cg_core::id::ElementId;
use cg_core::model::Document;

/// Selected element ids in the order they were added.
/// The last one is the primary selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single id.
    pub fn select(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Shift-click behavior: add if absent, remove if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|i| *i == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in `doc` (after undo, delete, ...).
    pub fn retain_existing(&mut self, doc: &Document) {
        self.ids.retain(|id| doc.contains(id));
    }

    pub fn primary(&self) -> Option<&ElementId> {
        self.ids.last()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
