//! Subtitle captions, the topmost composited layer.

use reelcut_core::{EntityDefaults, Position, ReelcutError, Result, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{merge_span, EntityKind, TimedEntity};
use crate::store::{Collection, EntityStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    pub font_family: String,
    /// Pixels, always > 0
    pub font_size: f64,
    /// CSS color, e.g. `#ffffff`
    pub color: String,
}

/// A time-ranged caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: Uuid,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Percent of frame
    pub position: Position,
    pub style: SubtitleStyle,
}

impl Subtitle {
    pub fn new(text: impl Into<String>, span: TimeSpan) -> Self {
        Self::with_defaults(text, span, &EntityDefaults::default())
    }

    pub fn with_defaults(text: impl Into<String>, span: TimeSpan, defaults: &EntityDefaults) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            start_time: span.start,
            end_time: span.end,
            position: defaults.subtitle_position,
            style: SubtitleStyle {
                font_family: defaults.subtitle_font_family.clone(),
                font_size: defaults.subtitle_font_size,
                color: defaults.subtitle_color.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubtitlePatch {
    pub text: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub position: Option<Position>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
}

impl TimedEntity for Subtitle {
    type Patch = SubtitlePatch;

    const KIND: EntityKind = EntityKind::Subtitle;

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

    fn apply_patch(&mut self, patch: &SubtitlePatch) -> Result<TimeSpan> {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(position) = patch.position {
            self.position = position.clamped();
        }
        if let Some(family) = &patch.font_family {
            self.style.font_family = family.clone();
        }
        if let Some(size) = patch.font_size {
            self.style.font_size = size;
        }
        if let Some(color) = &patch.color {
            self.style.color = color.clone();
        }
        check_font_size(self.style.font_size)?;
        Ok(merge_span(self.span(), patch.start_time, patch.end_time))
    }

    fn normalize(&mut self) -> Result<()> {
        self.position = self.position.clamped();
        check_font_size(self.style.font_size)
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.subtitles
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.subtitles
    }
}

fn check_font_size(size: f64) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ReelcutError::InvalidParameter(format!(
            "font size must be positive, got {size}"
        )))
    }
}
