//! The time-ranged entity abstraction shared by every timeline collection.

use reelcut_core::{ReelcutError, Result, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::overlay::ImageOverlay;
use crate::segment::{AudioSegment, VideoSegment};
use crate::store::{Collection, EntityStore};
use crate::subtitle::Subtitle;

/// Which collection an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Segment,
    Audio,
    Overlay,
    Subtitle,
}

/// An entity with an identity and a time range on the timeline.
///
/// The associated functions `collection`/`collection_mut` bind each entity type
/// to its slot in the [`EntityStore`], which lets the store expose one generic
/// `add`/`update`/`remove`/`reorder` API for all four collections.
pub trait TimedEntity: Clone + PartialEq + Into<Entity> {
    /// Field-level partial update.
    type Patch;

    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    fn span(&self) -> TimeSpan;

    fn set_span(&mut self, span: TimeSpan);

    /// Apply the non-temporal fields of `patch` and return the span it asks for.
    ///
    /// Temporal fields are returned rather than written so the store can run
    /// its range policy before anything is committed.
    fn apply_patch(&mut self, patch: &Self::Patch) -> Result<TimeSpan>;

    /// Coerce non-temporal fields into range. Called on every add.
    fn normalize(&mut self) -> Result<()> {
        Ok(())
    }

    fn collection(store: &EntityStore) -> &Collection<Self>;

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;
}

/// Any timeline entity, used where a command must carry one of several kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Segment(VideoSegment),
    Audio(AudioSegment),
    Overlay(ImageOverlay),
    Subtitle(Subtitle),
}

impl Entity {
    pub fn id(&self) -> Uuid {
        match self {
            Entity::Segment(e) => e.id(),
            Entity::Audio(e) => e.id(),
            Entity::Overlay(e) => e.id(),
            Entity::Subtitle(e) => e.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Segment(_) => EntityKind::Segment,
            Entity::Audio(_) => EntityKind::Audio,
            Entity::Overlay(_) => EntityKind::Overlay,
            Entity::Subtitle(_) => EntityKind::Subtitle,
        }
    }

    pub fn span(&self) -> TimeSpan {
        match self {
            Entity::Segment(e) => e.span(),
            Entity::Audio(e) => e.span(),
            Entity::Overlay(e) => e.span(),
            Entity::Subtitle(e) => e.span(),
        }
    }
}

impl From<VideoSegment> for Entity {
    fn from(e: VideoSegment) -> Self {
        Entity::Segment(e)
    }
}

impl From<AudioSegment> for Entity {
    fn from(e: AudioSegment) -> Self {
        Entity::Audio(e)
    }
}

impl From<ImageOverlay> for Entity {
    fn from(e: ImageOverlay) -> Self {
        Entity::Overlay(e)
    }
}

impl From<Subtitle> for Entity {
    fn from(e: Subtitle) -> Self {
        Entity::Subtitle(e)
    }
}

/// Overlay the optional start/end of a patch onto the current span.
pub(crate) fn merge_span(current: TimeSpan, start: Option<f64>, end: Option<f64>) -> TimeSpan {
    TimeSpan::new(start.unwrap_or(current.start), end.unwrap_or(current.end))
}

/// Clamp a gain-like value (volume, opacity) into `[0, 1]`.
pub(crate) fn clamp_unit(field: &str, value: f64) -> Result<f64> {
    if value.is_nan() {
        return Err(ReelcutError::InvalidParameter(format!(
            "{field} must be a number"
        )));
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Parse the text of a numeric field editor.
///
/// Surrounding whitespace is ignored and an empty field reads as 0, matching
/// how the editor's number inputs behave while being cleared.
pub fn parse_numeric(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ReelcutError::InvalidParameter(format!("'{trimmed}' is not a number")))
}
