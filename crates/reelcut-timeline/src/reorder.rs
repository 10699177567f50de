//! Drag-and-drop reordering of a collection's display order.
//!
//! A session holds at most the id being dragged. `drop_on` performs one linear
//! move, not a swap: the dragged entity is taken out of the list and put back
//! at the target's original index, so every entity in between shifts by one
//! slot. The session is cleared by every drop, whatever the outcome.

use std::marker::PhantomData;

use tracing::debug;
use uuid::Uuid;

use crate::entity::TimedEntity;
use crate::segment::VideoSegment;
use crate::store::EntityStore;

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dragged entity moved from one display index to another.
    Moved { from: usize, to: usize },
    /// Dropped onto itself.
    SameTarget,
    /// No drag was in progress.
    NoDrag,
    /// The dragged or target id is no longer in the collection.
    Missing,
}

impl DropOutcome {
    pub fn moved(self) -> bool {
        matches!(self, DropOutcome::Moved { .. })
    }
}

/// Transient drag state for reordering entities of type `T`.
#[derive(Debug)]
pub struct ReorderSession<T = VideoSegment> {
    dragged: Option<Uuid>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Default for ReorderSession<T> {
    fn default() -> Self {
        Self {
            dragged: None,
            _kind: PhantomData,
        }
    }
}

impl<T: TimedEntity> ReorderSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id currently being dragged.
    pub fn dragged(&self) -> Option<Uuid> {
        self.dragged
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    /// Begin dragging `id`. A later `drag_start` replaces an earlier one.
    pub fn drag_start(&mut self, id: Uuid) {
        self.dragged = Some(id);
        debug!(kind = ?T::KIND, %id, "Reorder drag started");
    }

    /// Hovering a drop target. Dropping is always allowed; no state changes.
    pub fn drag_over(&self) -> bool {
        true
    }

    /// Drop onto `target`, reordering the store if both ids are present.
    pub fn drop_on(&mut self, target: Uuid, store: &mut EntityStore) -> DropOutcome {
        let Some(dragged) = self.dragged.take() else {
            return DropOutcome::NoDrag;
        };
        if dragged == target {
            return DropOutcome::SameTarget;
        }

        let collection = T::collection(store);
        let (Some(from), Some(to)) = (collection.position(dragged), collection.position(target))
        else {
            debug!(kind = ?T::KIND, %dragged, %target, "Drop ignored: entity missing");
            return DropOutcome::Missing;
        };

        store.reorder::<T>(from, to);
        DropOutcome::Moved { from, to }
    }

    /// Pointer released outside any target, or left the area. Clears the session.
    pub fn cancel(&mut self) {
        if let Some(id) = self.dragged.take() {
            debug!(kind = ?T::KIND, %id, "Reorder drag cancelled");
        }
    }
}
