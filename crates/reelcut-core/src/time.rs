//! Time representation for the editing timeline
//!
//! All timeline values are seconds as `f64`, relative to a single origin at 0.
//! Spans are closed intervals: an entity ending exactly at `t` is still active
//! at `t`.

use serde::{Deserialize, Serialize};

/// A closed time interval `[start, end]` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    /// Create a new span. No ordering is enforced here; see [`TimeSpan::is_well_formed`].
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Span of `length` seconds starting at `start`, cut off at `limit`.
    ///
    /// Mirrors how new entities are placed at the playhead: they never run
    /// past the end of the timeline.
    pub fn starting_at(start: f64, length: f64, limit: f64) -> Self {
        Self {
            start,
            end: (start + length).min(limit),
        }
    }

    /// Duration of the span in seconds.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Inclusive containment on both ends. `NaN` is never contained.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Finite, non-negative start, strictly before end.
    pub fn is_well_formed(self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.start < self.end
    }

    /// Swap the ends if the span is inverted.
    pub fn ordered(self) -> Self {
        if self.start > self.end {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }
}

/// Clamp a playback time into `[0, duration]`.
///
/// Non-finite inputs never leak out: a `NaN` time maps to 0, and a duration
/// that is negative or not finite is treated as 0.
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    let upper = sanitize_duration(duration);
    if time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, upper)
}

/// Normalize a reported media duration. Missing, negative and non-finite values become 0.
pub fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

/// Position of `time` within `duration` as a fraction in `[0, 1]`.
///
/// A zero duration yields 0 rather than `NaN`.
pub fn progress_fraction(time: f64, duration: f64) -> f64 {
    let duration = sanitize_duration(duration);
    if duration == 0.0 {
        return 0.0;
    }
    (clamp_time(time, duration) / duration).clamp(0.0, 1.0)
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
