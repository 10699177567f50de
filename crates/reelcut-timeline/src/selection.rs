//! Subtitle selection for inline editing.
//!
//! At most one subtitle is selected at a time. Overlays are never
//! selection-gated; they are edited live through [`crate::drag`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::EntityStore;
use crate::subtitle::Subtitle;

/// Which subtitle, if any, is open for editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleSelection {
    selected: Option<Uuid>,
}

impl SubtitleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, silently replacing any previous selection.
    pub fn select(&mut self, id: Uuid) {
        self.selected = Some(id);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected == Some(id)
    }

    /// A subtitle was deleted; clears the selection if it was the selected one.
    pub fn on_removed(&mut self, id: Uuid) {
        if self.is_selected(id) {
            self.selected = None;
        }
    }

    /// Drop the selection if its subtitle no longer exists in `store`.
    /// Returns `true` if the selection was cleared.
    pub fn retain_if_present(&mut self, store: &EntityStore) -> bool {
        match self.selected {
            Some(id) if !store.contains::<Subtitle>(id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}
