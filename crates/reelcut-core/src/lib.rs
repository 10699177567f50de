//! Reelcut Core - Foundation types for the timeline editor
//!
//! This crate provides the fundamental types shared by every Reelcut crate:
//! - Time spans, clamping and clock formatting (seconds as `f64`)
//! - Frame-relative geometry (percent positions, pixel sizes, pointer math)
//! - Uploaded source video descriptors
//! - Editor configuration and the range validation policy

pub mod config;
pub mod error;
pub mod geometry;
pub mod source;
pub mod time;

pub use config::{EditorConfig, EntityDefaults, ExportTiming, RangePolicy, UploadLimits};
pub use error::{ReelcutError, Result};
pub use geometry::{Point, Position, Size};
pub use source::VideoSource;
pub use time::{clamp_time, format_clock, progress_fraction, TimeSpan};

/// Size constants shared by upload validation and its messages.
pub mod units {
    /// Bytes in one mebibyte.
    pub const MIB: u64 = 1024 * 1024;

    /// Default upload ceiling (100 MiB).
    pub const DEFAULT_UPLOAD_LIMIT: u64 = 100 * MIB;
}
