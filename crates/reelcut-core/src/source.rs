//! Uploaded source video descriptors.

use serde::{Deserialize, Serialize};

use crate::time::sanitize_duration;

/// A source video handed to the editor by the upload page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Playable URL (object URL or remote).
    pub url: String,
    /// Display name, usually the original file name.
    pub name: String,
    /// Duration in seconds if known when the list was built.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl VideoSource {
    /// Create a new source descriptor.
    pub fn new(url: impl Into<String>, name: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            duration,
        }
    }

    /// Known duration, or 0 until the media element reports metadata.
    pub fn known_duration(&self) -> f64 {
        self.duration.map(sanitize_duration).unwrap_or(0.0)
    }
}
