//! Composition resolver: which entities are visible or audible at a time.
//!
//! Pure functions of `(entities, time)`. Ranges are inclusive on both ends.
//! Layering has no explicit z-order: overlays paint in insertion order, so a
//! later-added overlay covers an earlier one, and subtitles sit above all
//! overlays.

use smallvec::SmallVec;

use crate::entity::TimedEntity;
use crate::overlay::ImageOverlay;
use crate::segment::{AudioSegment, VideoSegment};
use crate::store::EntityStore;
use crate::subtitle::Subtitle;

/// Active entities of one collection, in insertion order.
pub type ActiveSet<'a, T> = SmallVec<[&'a T; 4]>;

/// Entities of `items` whose range contains `time`, preserving order.
pub fn active_at<T: TimedEntity>(items: &[T], time: f64) -> ActiveSet<'_, T> {
    items.iter().filter(|e| e.span().contains(time)).collect()
}

pub fn active_overlays(overlays: &[ImageOverlay], time: f64) -> ActiveSet<'_, ImageOverlay> {
    active_at(overlays, time)
}

pub fn active_subtitles(subtitles: &[Subtitle], time: f64) -> ActiveSet<'_, Subtitle> {
    active_at(subtitles, time)
}

/// First segment in display order whose range contains `time`.
pub fn active_segment(segments: &[VideoSegment], time: f64) -> Option<&VideoSegment> {
    segments.iter().find(|s| s.span().contains(time))
}

/// Audio segments playing at `time` with the gain each contributes.
pub fn active_audio(audio: &[AudioSegment], time: f64) -> Vec<(&AudioSegment, f64)> {
    audio
        .iter()
        .filter(|a| a.span().contains(time))
        .map(|a| (a, a.effective_volume()))
        .collect()
}

/// One paint layer, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer<'a> {
    /// The active source video.
    Video,
    Overlay(&'a ImageOverlay),
    Subtitle(&'a Subtitle),
}

/// Everything composited over the base video at one instant.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub time: f64,
    pub overlays: ActiveSet<'a, ImageOverlay>,
    pub subtitles: ActiveSet<'a, Subtitle>,
}

impl<'a> Composition<'a> {
    /// Resolve the active overlay and subtitle sets at `time`.
    pub fn resolve(store: &'a EntityStore, time: f64) -> Self {
        Self {
            time,
            overlays: active_overlays(store.overlays(), time),
            subtitles: active_subtitles(store.subtitles(), time),
        }
    }

    /// Layers in paint order: video, then overlays, then subtitles.
    pub fn layers(&self) -> impl Iterator<Item = Layer<'a>> + '_ {
        std::iter::once(Layer::Video)
            .chain(self.overlays.iter().map(|o| Layer::Overlay(*o)))
            .chain(self.subtitles.iter().map(|s| Layer::Subtitle(*s)))
    }

    /// True if nothing is drawn above the video.
    pub fn is_bare(&self) -> bool {
        self.overlays.is_empty() && self.subtitles.is_empty()
    }
}
