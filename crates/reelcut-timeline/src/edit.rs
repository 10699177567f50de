//! Edit operations with undo/redo support.
//!
//! Uses the Command pattern: every store mutation is recorded as an
//! `EditCommand` that knows how to apply itself and produce its inverse.
//! Replaying a command bypasses validation; it only ever restores states the
//! store already accepted.

use crate::entity::{Entity, EntityKind};
use crate::store::EntityStore;

/// A reversible mutation of the entity store.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert `entity` at display index `index` of its collection.
    Insert { index: usize, entity: Entity },
    /// Remove `entity`; `index` is where it sat, kept for undo.
    Remove { index: usize, entity: Entity },
    /// Swap one version of an entity for another (same id).
    Replace { before: Entity, after: Entity },
    /// Remove the item at `from` and reinsert it at `to`.
    Move {
        kind: EntityKind,
        from: usize,
        to: usize,
    },
}

impl EditCommand {
    /// Apply this command to the store without validation or history.
    pub fn apply(&self, store: &mut EntityStore) {
        match self {
            Self::Insert { index, entity } => store.raw_insert(*index, entity.clone()),
            Self::Remove { entity, .. } => store.raw_remove(entity.kind(), entity.id()),
            Self::Replace { after, .. } => store.raw_replace(after.clone()),
            Self::Move { kind, from, to } => store.raw_move(*kind, *from, *to),
        }
    }

    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { index, entity } => Self::Remove {
                index: *index,
                entity: entity.clone(),
            },
            Self::Remove { index, entity } => Self::Insert {
                index: *index,
                entity: entity.clone(),
            },
            Self::Replace { before, after } => Self::Replace {
                before: after.clone(),
                after: before.clone(),
            },
            Self::Move { kind, from, to } => Self::Move {
                kind: *kind,
                from: *to,
                to: *from,
            },
        }
    }
}

// ── Undo stack ──────────────────────────────────────────────────

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoStack {
    /// Commands that have been executed (most recent last).
    undo: Vec<EditCommand>,
    /// Commands that have been undone (most recent last).
    redo: Vec<EditCommand>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Push a command onto the undo stack after it has been executed.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, command: EditCommand) {
        self.redo.clear();
        if self.max_depth == 0 {
            return;
        }
        self.undo.push(command);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Pop the most recent command for undo. Returns the inverse command.
    pub fn undo(&mut self) -> Option<EditCommand> {
        let cmd = self.undo.pop()?;
        let inverse = cmd.inverse();
        self.redo.push(cmd);
        Some(inverse)
    }

    /// Pop the most recent undone command for redo. Returns the original command.
    pub fn redo(&mut self) -> Option<EditCommand> {
        let cmd = self.redo.pop()?;
        self.undo.push(cmd.clone());
        Some(cmd)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::VideoSegment;
    use crate::subtitle::Subtitle;
    use reelcut_core::TimeSpan;

    fn subtitle_entity(text: &str) -> Entity {
        Subtitle::new(text, TimeSpan::new(0.0, 5.0)).into()
    }

    #[test]
    fn test_undo_redo_insert_remove() {
        let mut stack = UndoStack::new(100);

        stack.push(EditCommand::Insert {
            index: 0,
            entity: subtitle_entity("one"),
        });
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        let undo_cmd = stack.undo().unwrap();
        assert!(matches!(undo_cmd, EditCommand::Remove { .. }));
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        let redo_cmd = stack.redo().unwrap();
        assert!(matches!(redo_cmd, EditCommand::Insert { .. }));
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut stack = UndoStack::new(100);
        stack.push(EditCommand::Insert {
            index: 0,
            entity: subtitle_entity("one"),
        });
        stack.undo();
        assert!(stack.can_redo());

        stack.push(EditCommand::Insert {
            index: 0,
            entity: subtitle_entity("two"),
        });
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_max_depth() {
        let mut stack = UndoStack::new(3);
        for i in 0..5 {
            stack.push(EditCommand::Move {
                kind: EntityKind::Segment,
                from: i,
                to: i + 1,
            });
        }
        assert_eq!(stack.undo_count(), 3);
    }

    #[test]
    fn test_zero_depth_keeps_nothing() {
        let mut stack = UndoStack::new(0);
        stack.push(EditCommand::Move {
            kind: EntityKind::Audio,
            from: 0,
            to: 1,
        });
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_move_inverse_swaps_indices() {
        let cmd = EditCommand::Move {
            kind: EntityKind::Segment,
            from: 0,
            to: 2,
        };
        assert_eq!(
            cmd.inverse(),
            EditCommand::Move {
                kind: EntityKind::Segment,
                from: 2,
                to: 0,
            }
        );
    }

    #[test]
    fn test_apply_then_inverse_restores() {
        let mut store = EntityStore::default();
        let keep = VideoSegment::new(TimeSpan::new(0.0, 5.0), 0, "k");
        store.add(keep.clone()).unwrap();

        let extra = VideoSegment::new(TimeSpan::new(5.0, 9.0), 0, "e");
        let cmd = EditCommand::Insert {
            index: 0,
            entity: extra.clone().into(),
        };
        cmd.apply(&mut store);
        assert_eq!(store.segments()[0].id, extra.id);

        cmd.inverse().apply(&mut store);
        assert_eq!(store.segments(), &[keep]);
    }
}
