//! Playback clock: play/pause, scrubbing, and reconciliation with the media
//! element's own clock.
//!
//! Two feeds can move the playhead: the media element's periodic time reports
//! and the user's scrub position. The clock is a three-state machine so only
//! one of them is authoritative at a time. While [`ClockState::Seeking`], time
//! reports from the media element are ignored.

use reelcut_core::geometry::fraction_along;
use reelcut_core::time::sanitize_duration;
use reelcut_core::{clamp_time, progress_fraction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The externally owned media element the clock drives.
pub trait MediaElement {
    fn play(&mut self);

    fn pause(&mut self);

    /// Move the element's playhead to `time` seconds.
    fn seek(&mut self, time: f64);
}

/// Clock state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    #[default]
    Paused,
    Playing,
    /// User is scrubbing. `resume` remembers whether playback was running
    /// when the scrub began.
    Seeking { resume: bool },
}

/// Owner of `current_time`, `duration` and the play/seek state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackClock {
    state: ClockState,
    current_time: f64,
    duration: f64,
}

impl PlaybackClock {
    /// Create a paused clock at 0 with an unknown (zero) duration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether playback is running, or will resume when the current scrub ends.
    pub fn is_playing(&self) -> bool {
        matches!(
            self.state,
            ClockState::Playing | ClockState::Seeking { resume: true }
        )
    }

    pub fn is_seeking(&self) -> bool {
        matches!(self.state, ClockState::Seeking { .. })
    }

    /// Playhead position in `[0, 1]`; 0 when the duration is 0.
    pub fn fraction(&self) -> f64 {
        progress_fraction(self.current_time, self.duration)
    }

    // ── Transport ──────────────────────────────────────────────────

    /// Start playback. From the end of the timeline, playback restarts at 0.
    ///
    /// During a scrub this only arms playback to resume when the scrub ends.
    pub fn play(&mut self, media: &mut dyn MediaElement) {
        match self.state {
            ClockState::Playing => {}
            ClockState::Seeking { .. } => {
                self.state = ClockState::Seeking { resume: true };
            }
            ClockState::Paused => {
                if self.duration > 0.0 && self.current_time >= self.duration {
                    self.current_time = 0.0;
                    media.seek(0.0);
                }
                media.play();
                self.state = ClockState::Playing;
                debug!(time = self.current_time, "Playback started");
            }
        }
    }

    /// Pause playback. During a scrub, cancels the pending resume.
    pub fn pause(&mut self, media: &mut dyn MediaElement) {
        match self.state {
            ClockState::Paused => {}
            ClockState::Seeking { .. } => {
                self.state = ClockState::Seeking { resume: false };
            }
            ClockState::Playing => {
                media.pause();
                self.state = ClockState::Paused;
                debug!(time = self.current_time, "Playback paused");
            }
        }
    }

    pub fn toggle_play_pause(&mut self, media: &mut dyn MediaElement) {
        if self.is_playing() {
            self.pause(media);
        } else {
            self.play(media);
        }
    }

    // ── Seeking ────────────────────────────────────────────────────

    /// Scrub begins. A playing element is paused for the duration of the scrub.
    pub fn begin_seek(&mut self, media: &mut dyn MediaElement) {
        let resume = match self.state {
            ClockState::Seeking { .. } => return,
            ClockState::Playing => {
                media.pause();
                true
            }
            ClockState::Paused => false,
        };
        self.state = ClockState::Seeking { resume };
        debug!(time = self.current_time, resume, "Scrub started");
    }

    /// Seek to `time`, clamped into `[0, duration]`. Returns the new time.
    ///
    /// Works in every state, so a plain click on the scrub bar seeks too.
    pub fn seek_to(&mut self, time: f64, media: &mut dyn MediaElement) -> f64 {
        self.current_time = clamp_time(time, self.duration);
        media.seek(self.current_time);
        self.current_time
    }

    /// Seek to the time under a pointer `offset` pixels into a bar `width` pixels wide.
    pub fn scrub(&mut self, offset: f64, width: f64, media: &mut dyn MediaElement) -> f64 {
        let target = fraction_along(offset, width) * self.duration;
        self.seek_to(target, media)
    }

    /// Scrub ends; playback resumes if it was running when the scrub began.
    pub fn end_seek(&mut self, media: &mut dyn MediaElement) {
        let ClockState::Seeking { resume } = self.state else {
            return;
        };
        if resume {
            media.play();
            self.state = ClockState::Playing;
        } else {
            self.state = ClockState::Paused;
        }
        debug!(time = self.current_time, resumed = resume, "Scrub ended");
    }

    // ── Media element callbacks ────────────────────────────────────

    /// Periodic time report from the media element.
    ///
    /// Ignored while seeking. Returns whether the report was applied. Reaching
    /// the duration while playing pauses the clock.
    pub fn on_time_update(&mut self, time: f64) -> bool {
        if self.is_seeking() {
            debug!(reported = time, "Time report ignored during scrub");
            return false;
        }
        self.current_time = clamp_time(time, self.duration);
        if self.state == ClockState::Playing
            && self.duration > 0.0
            && self.current_time >= self.duration
        {
            self.state = ClockState::Paused;
            debug!(time = self.current_time, "Reached end of media");
        }
        true
    }

    /// Metadata loaded: adopt the element's duration. The playhead is pulled
    /// inside the new duration in every state, including mid-scrub.
    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.duration = sanitize_duration(duration);
        self.current_time = clamp_time(self.current_time, self.duration);
        debug!(duration = self.duration, "Media metadata loaded");
    }

    /// Playback reached the end of the media.
    pub fn on_ended(&mut self) {
        if self.state == ClockState::Playing {
            self.state = ClockState::Paused;
            self.current_time = self.duration;
        }
    }

    /// Hard reset after switching the active source video.
    ///
    /// Any scrub is abandoned, playback stops, the playhead returns to 0 and the
    /// duration is re-read from the new source (0 until its metadata loads).
    pub fn reset_for_source(&mut self, duration: f64, media: &mut dyn MediaElement) {
        if self.state == ClockState::Playing {
            media.pause();
        }
        self.state = ClockState::Paused;
        self.current_time = 0.0;
        self.duration = sanitize_duration(duration);
        media.seek(0.0);
        debug!(duration = self.duration, "Clock reset for new source");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play,
        Pause,
        Seek(f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl MediaElement for Recorder {
        fn play(&mut self) {
            self.calls.push(Call::Play);
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn seek(&mut self, time: f64) {
            self.calls.push(Call::Seek(time));
        }
    }

    fn loaded_clock(duration: f64) -> PlaybackClock {
        let mut clock = PlaybackClock::new();
        clock.on_loaded_metadata(duration);
        clock
    }

    #[test]
    fn test_play_pause_cycle() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);

        clock.play(&mut media);
        assert_eq!(clock.state(), ClockState::Playing);
        clock.pause(&mut media);
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(media.calls, vec![Call::Play, Call::Pause]);
    }

    #[test]
    fn test_scrub_while_playing_pauses_and_resumes() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.play(&mut media);

        clock.begin_seek(&mut media);
        assert_eq!(clock.state(), ClockState::Seeking { resume: true });
        assert!(clock.is_playing());

        let t = clock.scrub(50.0, 200.0, &mut media);
        assert_eq!(t, 15.0);

        clock.end_seek(&mut media);
        assert_eq!(clock.state(), ClockState::Playing);
        assert_eq!(
            media.calls,
            vec![Call::Play, Call::Pause, Call::Seek(15.0), Call::Play]
        );
    }

    #[test]
    fn test_scrub_while_paused_stays_paused() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.begin_seek(&mut media);
        clock.scrub(100.0, 200.0, &mut media);
        clock.end_seek(&mut media);
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(clock.current_time(), 30.0);
        assert!(!media.calls.contains(&Call::Play));
    }

    #[test]
    fn test_time_report_ignored_while_seeking() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.begin_seek(&mut media);
        clock.seek_to(40.0, &mut media);

        assert!(!clock.on_time_update(12.0));
        assert_eq!(clock.current_time(), 40.0);

        clock.end_seek(&mut media);
        assert!(clock.on_time_update(41.0));
        assert_eq!(clock.current_time(), 41.0);
    }

    #[test]
    fn test_reaching_duration_pauses() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(10.0);
        clock.play(&mut media);
        clock.on_time_update(10.0);
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(clock.current_time(), 10.0);

        // Playing again from the end restarts at 0.
        clock.play(&mut media);
        assert_eq!(clock.current_time(), 0.0);
        assert!(media.calls.contains(&Call::Seek(0.0)));
    }

    #[test]
    fn test_zero_duration_never_nan() {
        let mut media = Recorder::default();
        let mut clock = PlaybackClock::new();
        assert_eq!(clock.scrub(30.0, 100.0, &mut media), 0.0);
        assert_eq!(clock.scrub(30.0, 0.0, &mut media), 0.0);
        assert_eq!(clock.fraction(), 0.0);
        assert_eq!(clock.seek_to(12.0, &mut media), 0.0);
    }

    #[test]
    fn test_reset_for_source() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.seek_to(20.0, &mut media);
        clock.play(&mut media);

        clock.reset_for_source(f64::NAN, &mut media);
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(clock.current_time(), 0.0);
        assert_eq!(clock.duration(), 0.0);
    }

    #[test]
    fn test_play_during_scrub_arms_resume() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.begin_seek(&mut media);
        clock.play(&mut media);
        assert_eq!(clock.state(), ClockState::Seeking { resume: true });
        assert!(media.calls.is_empty());
        clock.end_seek(&mut media);
        assert_eq!(clock.state(), ClockState::Playing);
    }

    #[test]
    fn test_metadata_reclamps_playhead() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.seek_to(50.0, &mut media);
        clock.on_loaded_metadata(30.0);
        assert_eq!(clock.current_time(), 30.0);
    }

    #[test]
    fn test_metadata_during_scrub_reclamps_playhead() {
        let mut media = Recorder::default();
        let mut clock = loaded_clock(60.0);
        clock.begin_seek(&mut media);
        clock.scrub(100.0, 100.0, &mut media);
        assert_eq!(clock.current_time(), 60.0);

        clock.on_loaded_metadata(30.0);
        assert!(clock.is_seeking());
        assert_eq!(clock.current_time(), 30.0);

        clock.end_seek(&mut media);
        assert_eq!(clock.current_time(), 30.0);
        assert!(clock.current_time() <= clock.duration());
    }

    proptest! {
        #[test]
        fn seek_clamps(t in proptest::num::f64::ANY, d in 0.0f64..1000.0) {
            let mut media = Recorder::default();
            let mut clock = loaded_clock(d);
            let result = clock.seek_to(t, &mut media);
            prop_assert!(!result.is_nan());
            prop_assert!(result >= 0.0 && result <= clock.duration());
        }

        #[test]
        fn reports_during_scrub_never_move_playhead(reports in proptest::collection::vec(0.0f64..100.0, 1..20)) {
            let mut media = Recorder::default();
            let mut clock = loaded_clock(100.0);
            clock.begin_seek(&mut media);
            clock.seek_to(42.0, &mut media);
            for r in reports {
                clock.on_time_update(r);
            }
            prop_assert_eq!(clock.current_time(), 42.0);
        }
    }
}
