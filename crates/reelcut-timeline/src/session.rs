//! The editor session: one owner for the store, the clock and every transient
//! gesture session, exposing the editor's user actions.
//!
//! Scrubbing, segment dragging and overlay dragging all use the same pointer,
//! so at most one of them is active at a time. Starting a second gesture fails
//! with [`ReelcutError::GestureInProgress`] and leaves the first untouched.

use std::fmt;

use reelcut_core::{EditorConfig, Point, ReelcutError, Result, Size, TimeSpan, VideoSource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::compose::Composition;
use crate::drag::OverlayDragSession;
use crate::entity::TimedEntity;
use crate::overlay::ImageOverlay;
use crate::playback::{MediaElement, PlaybackClock};
use crate::reorder::{DropOutcome, ReorderSession};
use crate::segment::{AudioKind, AudioSegment, VideoSegment};
use crate::selection::SubtitleSelection;
use crate::store::EntityStore;
use crate::subtitle::Subtitle;

/// A pointer gesture owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Scrub,
    SegmentDrag,
    OverlayDrag,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gesture::Scrub => "scrub",
            Gesture::SegmentDrag => "segment drag",
            Gesture::OverlayDrag => "overlay drag",
        })
    }
}

/// Editing state for one composed video.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    store: EntityStore,
    clock: PlaybackClock,
    reorder: ReorderSession<VideoSegment>,
    overlay_drag: OverlayDragSession,
    selection: SubtitleSelection,
    videos: Vec<VideoSource>,
    current_video: usize,
}

impl EditorSession {
    /// Start a session over `videos`, with the first one active.
    pub fn new(config: EditorConfig, videos: Vec<VideoSource>) -> Self {
        let mut session = Self {
            store: EntityStore::from_config(&config),
            config,
            clock: PlaybackClock::new(),
            reorder: ReorderSession::new(),
            overlay_drag: OverlayDragSession::new(),
            selection: SubtitleSelection::new(),
            videos,
            current_video: 0,
        };
        let duration = session.active_video().map_or(0.0, VideoSource::known_duration);
        session.adopt_duration(duration);
        session
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn selection(&self) -> &SubtitleSelection {
        &self.selection
    }

    pub fn videos(&self) -> &[VideoSource] {
        &self.videos
    }

    pub fn current_video(&self) -> usize {
        self.current_video
    }

    pub fn active_video(&self) -> Option<&VideoSource> {
        self.videos.get(self.current_video)
    }

    /// What is drawn above the video at the current playhead.
    pub fn composition(&self) -> Composition<'_> {
        Composition::resolve(&self.store, self.clock.current_time())
    }

    /// The pointer gesture currently in progress, if any.
    pub fn active_gesture(&self) -> Option<Gesture> {
        if self.clock.is_seeking() {
            Some(Gesture::Scrub)
        } else if self.reorder.is_active() {
            Some(Gesture::SegmentDrag)
        } else if self.overlay_drag.is_active() {
            Some(Gesture::OverlayDrag)
        } else {
            None
        }
    }

    // ── Source videos ──────────────────────────────────────────────

    /// Append an uploaded video. Returns its index in the video list.
    pub fn add_video(&mut self, video: VideoSource) -> usize {
        self.videos.push(video);
        let index = self.videos.len() - 1;
        if index == self.current_video {
            let duration = self.videos[index].known_duration();
            self.adopt_duration(duration);
        }
        index
    }

    /// Switch the active source video. A hard reset: playback stops, the
    /// playhead returns to 0 and the duration comes from the new source.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn select_video(&mut self, index: usize, media: &mut dyn MediaElement) -> bool {
        let Some(video) = self.videos.get(index) else {
            return false;
        };
        let duration = video.known_duration();
        info!(index, name = %video.name, duration, "Switched source video");
        self.current_video = index;
        self.clock.reset_for_source(duration, media);
        self.store.set_time_bound(self.clock.duration());
        true
    }

    // ── Add actions ────────────────────────────────────────────────

    /// Add a segment of the active video at the playhead.
    pub fn add_segment(&mut self) -> Result<Uuid> {
        let Some(video) = self.active_video() else {
            return Err(ReelcutError::InvalidParameter(
                "no source video to cut a segment from".to_string(),
            ));
        };
        let span = self.span_at_playhead(self.config.defaults.segment_length);
        let thumbnail = format!("{}#t={:.2}", video.url, span.start);
        let segment = VideoSegment::new(span, self.current_video, thumbnail);
        self.store.add(segment)
    }

    pub fn add_audio(&mut self, kind: AudioKind) -> Result<Uuid> {
        let span = self.span_at_playhead(self.config.defaults.segment_length);
        self.store.add(AudioSegment::new(span, kind))
    }

    pub fn add_overlay(&mut self, asset_url: impl Into<String>) -> Result<Uuid> {
        let span = self.span_at_playhead(self.config.defaults.overlay_length);
        let overlay = ImageOverlay::with_defaults(asset_url, span, &self.config.defaults);
        self.store.add(overlay)
    }

    /// Add a subtitle at the playhead and select it for editing.
    pub fn add_subtitle(&mut self) -> Result<Uuid> {
        let defaults = &self.config.defaults;
        let span = self.span_at_playhead(defaults.subtitle_length);
        let subtitle = Subtitle::with_defaults(defaults.subtitle_text.clone(), span, defaults);
        let id = self.store.add(subtitle)?;
        self.selection.select(id);
        Ok(id)
    }

    /// `length` seconds from the playhead, cut off at the end of the timeline
    /// once the duration is known.
    fn span_at_playhead(&self, length: f64) -> TimeSpan {
        let limit = match self.clock.duration() {
            d if d > 0.0 => d,
            _ => f64::INFINITY,
        };
        TimeSpan::starting_at(self.clock.current_time(), length, limit)
    }

    // ── Edits ──────────────────────────────────────────────────────

    pub fn update<T: TimedEntity>(&mut self, id: Uuid, patch: &T::Patch) -> Result<bool> {
        self.edit_store(|store| store.update::<T>(id, patch))
    }

    /// Remove by id. Removing the selected subtitle clears the selection.
    pub fn remove<T: TimedEntity>(&mut self, id: Uuid) -> Option<T> {
        let removed = self.edit_store(|store| store.remove::<T>(id))?;
        self.selection.on_removed(id);
        Some(removed)
    }

    /// Run a store edit that may land in the middle of an overlay drag. Moves
    /// made so far are recorded first and the drag continues from the edited
    /// overlay.
    fn edit_store<R>(&mut self, edit: impl FnOnce(&mut EntityStore) -> R) -> R {
        self.overlay_drag.checkpoint(&mut self.store);
        let result = edit(&mut self.store);
        self.overlay_drag.rebase(&self.store);
        result
    }

    /// Select a subtitle for editing. Returns `false` if it does not exist.
    pub fn select_subtitle(&mut self, id: Uuid) -> bool {
        if !self.store.contains::<Subtitle>(id) {
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn deselect_subtitle(&mut self) {
        self.selection.deselect();
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.edit_store(EntityStore::undo);
        self.selection.retain_if_present(&self.store);
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.edit_store(EntityStore::redo);
        self.selection.retain_if_present(&self.store);
        redone
    }

    // ── Transport ──────────────────────────────────────────────────

    pub fn play(&mut self, media: &mut dyn MediaElement) {
        self.clock.play(media);
    }

    pub fn pause(&mut self, media: &mut dyn MediaElement) {
        self.clock.pause(media);
    }

    pub fn toggle_play_pause(&mut self, media: &mut dyn MediaElement) {
        self.clock.toggle_play_pause(media);
    }

    /// Jump the playhead, e.g. from a click on the scrub bar.
    pub fn seek(&mut self, time: f64, media: &mut dyn MediaElement) -> f64 {
        self.clock.seek_to(time, media)
    }

    pub fn on_time_update(&mut self, time: f64) -> bool {
        self.clock.on_time_update(time)
    }

    /// The active video's metadata loaded.
    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.adopt_duration(duration);
        let adopted = self.clock.duration();
        if let Some(video) = self.videos.get_mut(self.current_video) {
            video.duration = Some(adopted);
        }
    }

    pub fn on_ended(&mut self) {
        self.clock.on_ended();
    }

    fn adopt_duration(&mut self, duration: f64) {
        self.clock.on_loaded_metadata(duration);
        self.store.set_time_bound(self.clock.duration());
    }

    // ── Pointer gestures ───────────────────────────────────────────

    fn claim(&self, gesture: Gesture) -> Result<()> {
        match self.active_gesture() {
            Some(active) if active != gesture => {
                warn!(%active, requested = %gesture, "Gesture rejected");
                Err(ReelcutError::GestureInProgress(format!(
                    "cannot start {gesture} during {active}"
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn begin_scrub(&mut self, media: &mut dyn MediaElement) -> Result<()> {
        self.claim(Gesture::Scrub)?;
        self.clock.begin_seek(media);
        Ok(())
    }

    /// Move the playhead to the pointer position on the scrub bar.
    pub fn scrub_to(&mut self, offset: f64, width: f64, media: &mut dyn MediaElement) -> Result<f64> {
        self.claim(Gesture::Scrub)?;
        Ok(self.clock.scrub(offset, width, media))
    }

    pub fn end_scrub(&mut self, media: &mut dyn MediaElement) {
        self.clock.end_seek(media);
    }

    /// Begin dragging segment `id` to a new display position.
    pub fn start_segment_drag(&mut self, id: Uuid) -> Result<()> {
        self.claim(Gesture::SegmentDrag)?;
        self.reorder.drag_start(id);
        Ok(())
    }

    pub fn segment_drag_over(&self) -> bool {
        self.reorder.drag_over()
    }

    pub fn drop_segment(&mut self, target: Uuid) -> DropOutcome {
        let outcome = self.reorder.drop_on(target, &mut self.store);
        debug!(?outcome, %target, "Segment dropped");
        outcome
    }

    pub fn cancel_segment_drag(&mut self) {
        self.reorder.cancel();
    }

    /// Pointer down on overlay `id`. `Ok(false)` if the overlay does not exist.
    pub fn press_overlay(&mut self, id: Uuid, pointer: Point) -> Result<bool> {
        self.claim(Gesture::OverlayDrag)?;
        Ok(self.overlay_drag.press(id, pointer, &self.store))
    }

    pub fn drag_overlay(&mut self, pointer: Point, frame: Size) -> bool {
        self.overlay_drag.drag(pointer, frame, &mut self.store)
    }

    pub fn release_overlay(&mut self) {
        self.overlay_drag.release(&mut self.store);
    }

    /// Pointer left the preview frame mid-drag.
    pub fn leave_overlay(&mut self) {
        self.overlay_drag.leave(&mut self.store);
    }
}
