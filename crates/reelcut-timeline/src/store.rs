//! The entity store: sole owner of every timeline collection.
//!
//! All mutations go through command-style operations on [`EntityStore`], are
//! validated at the boundary, and are recorded in the undo history. Lookups by
//! an id that is no longer present are no-ops, never errors.

use reelcut_core::{EditorConfig, Position, RangePolicy, Result};
use tracing::debug;
use uuid::Uuid;

use crate::edit::{EditCommand, UndoStack};
use crate::entity::{EntityKind, TimedEntity};
use crate::overlay::ImageOverlay;
use crate::segment::{AudioSegment, VideoSegment};
use crate::subtitle::Subtitle;
use crate::validate::RangeValidator;

/// An ordered collection of one entity kind. Vector order is display order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: TimedEntity> Collection<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Display index of `id`.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|e| e.id()).collect()
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.id() == id)
    }

    /// Insert at `index`, clamped to the end.
    pub(crate) fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub(crate) fn remove_id(&mut self, id: Uuid) -> Option<(usize, T)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    pub(crate) fn replace(&mut self, item: T) -> Option<T> {
        let index = self.position(item.id())?;
        Some(std::mem::replace(&mut self.items[index], item))
    }

    /// Remove the item at `from` and reinsert it at `to` in the shortened list.
    pub(crate) fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() || from == to {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Owner of the segment, audio, overlay and subtitle collections.
#[derive(Debug)]
pub struct EntityStore {
    pub(crate) segments: Collection<VideoSegment>,
    pub(crate) audio: Collection<AudioSegment>,
    pub(crate) overlays: Collection<ImageOverlay>,
    pub(crate) subtitles: Collection<Subtitle>,
    validator: RangeValidator,
    history: UndoStack,
}

impl EntityStore {
    /// Create an empty store with the given range policy and undo depth.
    pub fn new(policy: RangePolicy, history_depth: usize) -> Self {
        Self {
            segments: Collection::default(),
            audio: Collection::default(),
            overlays: Collection::default(),
            subtitles: Collection::default(),
            validator: RangeValidator::new(policy),
            history: UndoStack::new(history_depth),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.range_policy, config.history_depth)
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn segments(&self) -> &[VideoSegment] {
        self.segments.as_slice()
    }

    pub fn audio(&self) -> &[AudioSegment] {
        self.audio.as_slice()
    }

    pub fn overlays(&self) -> &[ImageOverlay] {
        self.overlays.as_slice()
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        self.subtitles.as_slice()
    }

    /// Collection of `T` in display order.
    pub fn list<T: TimedEntity>(&self) -> &[T] {
        T::collection(self).as_slice()
    }

    pub fn get<T: TimedEntity>(&self, id: Uuid) -> Option<&T> {
        T::collection(self).get(id)
    }

    pub fn contains<T: TimedEntity>(&self, id: Uuid) -> bool {
        self.get::<T>(id).is_some()
    }

    pub fn policy(&self) -> RangePolicy {
        self.validator.policy
    }

    pub fn set_policy(&mut self, policy: RangePolicy) {
        self.validator.policy = policy;
    }

    /// Upper bound used by [`RangePolicy::Clamp`], normally the timeline duration.
    pub fn set_time_bound(&mut self, duration: f64) {
        self.validator.upper_bound = Some(duration);
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Validate `entity` and append it at the end of display order.
    ///
    /// Nothing is inserted if validation fails.
    pub fn add<T: TimedEntity>(&mut self, mut entity: T) -> Result<Uuid> {
        entity.normalize()?;
        let span = self.validator.check(entity.span())?;
        entity.set_span(span);

        let id = entity.id();
        let collection = T::collection_mut(self);
        let index = collection.len();
        collection.insert(index, entity.clone());
        self.history.push(EditCommand::Insert {
            index,
            entity: entity.into(),
        });
        debug!(kind = ?T::KIND, %id, index, "Entity added");
        Ok(id)
    }

    /// Remove by id. Absent ids are a no-op returning `None`.
    pub fn remove<T: TimedEntity>(&mut self, id: Uuid) -> Option<T> {
        let Some((index, removed)) = T::collection_mut(self).remove_id(id) else {
            debug!(kind = ?T::KIND, %id, "Remove ignored: id not present");
            return None;
        };
        self.history.push(EditCommand::Remove {
            index,
            entity: removed.clone().into(),
        });
        debug!(kind = ?T::KIND, %id, index, "Entity removed");
        Some(removed)
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(false)` if `id` is absent. On error the entity is unchanged.
    pub fn update<T: TimedEntity>(&mut self, id: Uuid, patch: &T::Patch) -> Result<bool> {
        let Some(before) = T::collection(self).get(id).cloned() else {
            debug!(kind = ?T::KIND, %id, "Update ignored: id not present");
            return Ok(false);
        };

        let mut after = before.clone();
        let requested = after.apply_patch(patch)?;
        let span = self.validator.check(requested)?;
        after.set_span(span);

        if after == before {
            return Ok(true);
        }
        T::collection_mut(self).replace(after.clone());
        self.history.push(EditCommand::Replace {
            before: before.into(),
            after: after.into(),
        });
        debug!(kind = ?T::KIND, %id, "Entity updated");
        Ok(true)
    }

    /// Move the entity at display index `from` so it lands at index `to`.
    ///
    /// Out-of-range indices and `from == to` leave the order untouched.
    pub fn reorder<T: TimedEntity>(&mut self, from: usize, to: usize) -> bool {
        if !T::collection_mut(self).move_item(from, to) {
            return false;
        }
        self.history.push(EditCommand::Move {
            kind: T::KIND,
            from,
            to,
        });
        debug!(kind = ?T::KIND, from, to, "Entities reordered");
        true
    }

    /// Move an overlay without recording history. Used for live drag updates;
    /// the drag session records a single entry when it ends.
    pub(crate) fn set_overlay_position(&mut self, id: Uuid, position: Position) -> bool {
        match self.overlays.get_mut(id) {
            Some(overlay) => {
                overlay.position = position.clamped();
                true
            }
            None => false,
        }
    }

    pub(crate) fn record(&mut self, command: EditCommand) {
        self.history.push(command);
    }

    // ── History ────────────────────────────────────────────────────

    /// Revert the most recent mutation. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.history.undo() else {
            return false;
        };
        command.apply(self);
        debug!(undo_remaining = self.history.undo_count(), "Undo applied");
        true
    }

    /// Reapply the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        let Some(command) = self.history.redo() else {
            return false;
        };
        command.apply(self);
        debug!(redo_remaining = self.history.redo_count(), "Redo applied");
        true
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub(crate) fn raw_insert(&mut self, index: usize, entity: crate::entity::Entity) {
        use crate::entity::Entity;
        match entity {
            Entity::Segment(e) => self.segments.insert(index, e),
            Entity::Audio(e) => self.audio.insert(index, e),
            Entity::Overlay(e) => self.overlays.insert(index, e),
            Entity::Subtitle(e) => self.subtitles.insert(index, e),
        }
    }

    pub(crate) fn raw_remove(&mut self, kind: EntityKind, id: Uuid) {
        match kind {
            EntityKind::Segment => drop(self.segments.remove_id(id)),
            EntityKind::Audio => drop(self.audio.remove_id(id)),
            EntityKind::Overlay => drop(self.overlays.remove_id(id)),
            EntityKind::Subtitle => drop(self.subtitles.remove_id(id)),
        }
    }

    pub(crate) fn raw_replace(&mut self, entity: crate::entity::Entity) {
        use crate::entity::Entity;
        match entity {
            Entity::Segment(e) => drop(self.segments.replace(e)),
            Entity::Audio(e) => drop(self.audio.replace(e)),
            Entity::Overlay(e) => drop(self.overlays.replace(e)),
            Entity::Subtitle(e) => drop(self.subtitles.replace(e)),
        }
    }

    pub(crate) fn raw_move(&mut self, kind: EntityKind, from: usize, to: usize) {
        match kind {
            EntityKind::Segment => self.segments.move_item(from, to),
            EntityKind::Audio => self.audio.move_item(from, to),
            EntityKind::Overlay => self.overlays.move_item(from, to),
            EntityKind::Subtitle => self.subtitles.move_item(from, to),
        };
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(RangePolicy::Reject, 100)
    }
}
