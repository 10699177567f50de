//! Direct manipulation of overlay positions on the preview frame.
//!
//! pointer-down → pointer-move* → pointer-up or pointer-leave. Moves are
//! applied to the store live; the whole gesture becomes one undo entry when it
//! ends. Leaving the frame ends the gesture exactly like a release.

use reelcut_core::{Point, Size};
use tracing::debug;
use uuid::Uuid;

use crate::edit::EditCommand;
use crate::overlay::ImageOverlay;
use crate::store::EntityStore;

#[derive(Debug, Clone)]
struct ActiveDrag {
    /// Overlay as it was at pointer-down.
    origin: ImageOverlay,
    last_pointer: Point,
}

/// Transient overlay drag state.
#[derive(Debug, Default)]
pub struct OverlayDragSession {
    active: Option<ActiveDrag>,
}

impl OverlayDragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Overlay being dragged.
    pub fn target(&self) -> Option<Uuid> {
        self.active.as_ref().map(|d| d.origin.id)
    }

    /// Pointer down on overlay `id`. Returns `false` if the overlay does not exist.
    pub fn press(&mut self, id: Uuid, pointer: Point, store: &EntityStore) -> bool {
        let Some(origin) = store.get::<ImageOverlay>(id).cloned() else {
            return false;
        };
        self.active = Some(ActiveDrag {
            origin,
            last_pointer: pointer,
        });
        debug!(%id, "Overlay drag started");
        true
    }

    /// Pointer moved to `pointer` over a preview frame of `frame` pixels.
    ///
    /// Returns `true` if the overlay moved. A frame with no area, or an overlay
    /// removed mid-gesture, leaves everything in place.
    pub fn drag(&mut self, pointer: Point, frame: Size, store: &mut EntityStore) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let id = active.origin.id;
        let Some(current) = store.get::<ImageOverlay>(id).map(|o| o.position) else {
            return false;
        };
        let Some(next) = current.offset_by_pixels(pointer - active.last_pointer, frame) else {
            return false;
        };
        active.last_pointer = pointer;
        store.set_overlay_position(id, next)
    }

    /// Record the live moves made since pointer-down (or the last checkpoint)
    /// as one history entry. The drag continues from the overlay's current
    /// state.
    pub fn checkpoint(&mut self, store: &mut EntityStore) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(current) = store.get::<ImageOverlay>(active.origin.id).cloned() else {
            return;
        };
        if current.position != active.origin.position {
            debug!(
                id = %current.id,
                x = current.position.x,
                y = current.position.y,
                "Overlay drag recorded"
            );
            let before = std::mem::replace(&mut active.origin, current.clone());
            store.record(EditCommand::Replace {
                before: before.into(),
                after: current.into(),
            });
        }
    }

    /// Re-read the dragged overlay after an edit made outside the gesture, so
    /// later history entries start from the edited state.
    pub fn rebase(&mut self, store: &EntityStore) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Some(current) = store.get::<ImageOverlay>(active.origin.id) {
            active.origin = current.clone();
        }
    }

    /// Pointer released. Records one history entry if the overlay moved.
    pub fn release(&mut self, store: &mut EntityStore) {
        self.checkpoint(store);
        if let Some(active) = self.active.take() {
            debug!(id = %active.origin.id, "Overlay drag finished");
        }
    }

    /// Pointer left the frame. Identical to [`OverlayDragSession::release`].
    pub fn leave(&mut self, store: &mut EntityStore) {
        self.release(store);
    }
}
