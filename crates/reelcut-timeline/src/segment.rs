//! Video and audio segments on the timeline.

use reelcut_core::{Result, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{clamp_unit, merge_span, EntityKind, TimedEntity};
use crate::store::{Collection, EntityStore};

/// A time-ranged reference into one of the uploaded source videos.
///
/// Display order lives in the store, not in `start_time`: segments can be
/// reordered without renumbering their times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    /// Unique segment ID
    pub id: Uuid,
    pub start_time: f64,
    pub end_time: f64,
    /// Index into the uploaded video list
    pub source_index: usize,
    /// Opaque thumbnail asset handle
    pub thumbnail: String,
    pub is_muted: bool,
}

impl VideoSegment {
    /// Create a new segment over `span` of source `source_index`.
    pub fn new(span: TimeSpan, source_index: usize, thumbnail: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: span.start,
            end_time: span.end,
            source_index,
            thumbnail: thumbnail.into(),
            is_muted: false,
        }
    }
}

/// Partial update for a [`VideoSegment`].
#[derive(Debug, Clone, Default)]
pub struct SegmentPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub source_index: Option<usize>,
    pub thumbnail: Option<String>,
    pub is_muted: Option<bool>,
}

impl TimedEntity for VideoSegment {
    type Patch = SegmentPatch;

    const KIND: EntityKind = EntityKind::Segment;

    fn id(&self) -> Uuid {
        self.id
    }

    fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    fn set_span(&mut self, span: TimeSpan) {
        self.start_time = span.start;
        self.end_time = span.end;
    }

    fn apply_patch(&mut self, patch: &SegmentPatch) -> Result<TimeSpan> {
        if let Some(index) = patch.source_index {
            self.source_index = index;
        }
        if let Some(thumbnail) = &patch.thumbnail {
            self.thumbnail = thumbnail.clone();
        }
        if let Some(muted) = patch.is_muted {
            self.is_muted = muted;
        }
        Ok(merge_span(self.span(), patch.start_time, patch.end_time))
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.segments
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.segments
    }
}

/// Role of an audio segment in the mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    /// The clip's own soundtrack.
    #[default]
    Main,
    /// Music or ambience laid under the main track.
    Background,
}

/// A time-ranged audio track entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    pub id: Uuid,
    pub start_time: f64,
    pub end_time: f64,
    pub kind: AudioKind,
    /// Gain in `[0, 1]`
    pub volume: f64,
    pub is_muted: bool,
}

impl AudioSegment {
    /// Create a new audio segment at full volume.
    pub fn new(span: TimeSpan, kind: AudioKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: span.start,
            end_time: span.end,
            kind,
            volume: 1.0,
            is_muted: false,
        }
    }

    /// Gain actually applied: 0 when muted.
    pub fn effective_volume(&self) -> f64 {
        if self.is_muted {
            0.0
        } else {
            self.volume
        }
    }
}

/// Partial update for an [`AudioSegment`].
#[derive(Debug, Clone, Default)]
pub struct AudioPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub kind: Option<AudioKind>,
    pub volume: Option<f64>,
    pub is_muted: Option<bool>,
}

impl TimedEntity for AudioSegment {
    type Patch = AudioPatch;

    const KIND: EntityKind = EntityKind::Audio;

    fn id(&self) -> Uuid {
        self.id
    }

    fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    fn set_span(&mut self, span: TimeSpan) {
        self.start_time = span.start;
        self.end_time = span.end;
    }

    fn apply_patch(&mut self, patch: &AudioPatch) -> Result<TimeSpan> {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(volume) = patch.volume {
            self.volume = clamp_unit("volume", volume)?;
        }
        if let Some(muted) = patch.is_muted {
            self.is_muted = muted;
        }
        Ok(merge_span(self.span(), patch.start_time, patch.end_time))
    }

    fn normalize(&mut self) -> Result<()> {
        self.volume = clamp_unit("volume", self.volume)?;
        Ok(())
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.audio
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.audio
    }
}
