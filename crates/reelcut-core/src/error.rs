//! Error types for Reelcut.

use thiserror::Error;

use crate::units::MIB;

/// Main error type for Reelcut operations.
#[derive(Error, Debug)]
pub enum ReelcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid time range: start {start} must be non-negative and before end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("File type not supported: {mime}. Please upload video files only.")]
    UnsupportedMediaType { mime: String },

    #[error(
        "File too large: {:.2}MB. Maximum size is {}MB.",
        as_mib(.size_bytes),
        whole_mib(.limit_bytes)
    )]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Pointer gesture already in progress: {0}")]
    GestureInProgress(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export error: {0}")]
    Export(String),
}

fn as_mib(bytes: &u64) -> f64 {
    *bytes as f64 / MIB as f64
}

fn whole_mib(bytes: &u64) -> u64 {
    *bytes / MIB
}

/// Result type alias for Reelcut operations.
pub type Result<T> = std::result::Result<T, ReelcutError>;
