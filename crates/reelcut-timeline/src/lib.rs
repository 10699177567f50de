//! Reelcut Timeline - Timeline composition and playback model
//!
//! Implements the editing model behind the composed preview:
//! - Entity store for segments, audio, overlays and subtitles
//! - Edit operations with undo/redo
//! - Composition resolver (active sets and paint order at a time)
//! - Playback clock reconciling the media element with scrubbing
//! - Reorder, overlay-drag and subtitle-selection sessions
//! - The editor session tying them together

pub mod compose;
pub mod drag;
pub mod edit;
pub mod entity;
pub mod overlay;
pub mod playback;
pub mod reorder;
pub mod segment;
pub mod selection;
pub mod session;
pub mod store;
pub mod subtitle;
pub mod validate;

pub use compose::{active_audio, active_overlays, active_segment, active_subtitles, Composition, Layer};
pub use drag::OverlayDragSession;
pub use edit::{EditCommand, UndoStack};
pub use entity::{parse_numeric, Entity, EntityKind, TimedEntity};
pub use overlay::{ImageOverlay, OverlayPatch, OverlayStyle};
pub use playback::{ClockState, MediaElement, PlaybackClock};
pub use reorder::{DropOutcome, ReorderSession};
pub use segment::{AudioKind, AudioPatch, AudioSegment, SegmentPatch, VideoSegment};
pub use selection::SubtitleSelection;
pub use session::{EditorSession, Gesture};
pub use store::{Collection, EntityStore};
pub use subtitle::{Subtitle, SubtitlePatch, SubtitleStyle};
pub use validate::RangeValidator;
