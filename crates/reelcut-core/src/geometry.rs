//! Frame-relative geometry for overlays, subtitles and the scrub bar.

use serde::{Deserialize, Serialize};

/// Pointer coordinate in screen pixels.
pub type Point = glam::DVec2;

/// Anchor position in percent of the preview frame (0–100 on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position. Values are not clamped; see [`Position::clamped`].
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Frame center.
    pub const CENTER: Self = Self::new(50.0, 50.0);

    /// Clamp both axes into the visible frame.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }

    /// Offset by a pointer delta (pixels) measured over a frame of `frame` pixels.
    ///
    /// Returns `None` when the frame has no area, so a collapsed preview never
    /// produces infinite positions.
    pub fn offset_by_pixels(self, delta: Point, frame: Size) -> Option<Self> {
        if frame.width.is_nan() || frame.height.is_nan() || frame.width <= 0.0 || frame.height <= 0.0 {
            return None;
        }
        Some(
            Self {
                x: self.x + delta.x / frame.width * 100.0,
                y: self.y + delta.y / frame.height * 100.0,
            }
            .clamped(),
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if both dimensions are finite and non-negative.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Fraction of `width` covered by a pointer at `offset` pixels from the left edge.
///
/// Result is in `[0, 1]`; a bar with no width yields 0.
pub fn fraction_along(offset: f64, width: f64) -> f64 {
    if width.is_nan() || width <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / width).clamp(0.0, 1.0)
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
