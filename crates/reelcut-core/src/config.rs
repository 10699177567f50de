//! Editor configuration: validation policy, entity defaults, upload limits and
//! export pacing.
//!
//! Every field has a default, so a partial JSON document (or none at all) is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReelcutError, Result};
use crate::geometry::{Position, Size};
use crate::units::DEFAULT_UPLOAD_LIMIT;

/// How the entity store treats time ranges on `add` and `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Reject non-finite, negative or empty ranges with `InvalidRange`.
    #[default]
    Reject,
    /// Clamp both ends into `[0, timeline duration]`, then reject if empty.
    Clamp,
    /// Swap inverted ends, then apply the `Reject` checks.
    Swap,
    /// Store any finite range unchanged.
    Permit,
}

/// Defaults used when the editor creates a new entity at the playhead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefaults {
    /// Length of a newly added video segment, in seconds.
    pub segment_length: f64,
    /// Length of a newly added image overlay, in seconds.
    pub overlay_length: f64,
    /// Length of a newly added subtitle, in seconds.
    pub subtitle_length: f64,
    pub overlay_position: Position,
    pub overlay_size: Size,
    pub overlay_opacity: f64,
    pub overlay_border: String,
    pub subtitle_text: String,
    pub subtitle_position: Position,
    pub subtitle_font_family: String,
    pub subtitle_font_size: f64,
    pub subtitle_color: String,
}

impl Default for EntityDefaults {
    fn default() -> Self {
        Self {
            segment_length: 10.0,
            overlay_length: 5.0,
            subtitle_length: 5.0,
            overlay_position: Position::CENTER,
            overlay_size: Size::new(200.0, 200.0),
            overlay_opacity: 1.0,
            overlay_border: "2px solid white".to_string(),
            subtitle_text: "New Subtitle".to_string(),
            subtitle_position: Position::new(50.0, 80.0),
            subtitle_font_family: "Arial".to_string(),
            subtitle_font_size: 24.0,
            subtitle_color: "#ffffff".to_string(),
        }
    }
}

/// Accepted upload types and size ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub accepted_mime_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            accepted_mime_types: ["video/mp4", "video/webm", "video/ogg", "video/quicktime"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_bytes: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

impl UploadLimits {
    /// Whether `mime` is one of the accepted types (exact match).
    pub fn accepts(&self, mime: &str) -> bool {
        self.accepted_mime_types.iter().any(|m| m == mime)
    }
}

/// Pacing of the simulated export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportTiming {
    /// Milliseconds between progress ticks.
    pub tick_ms: u64,
    /// Percent added per tick.
    pub step_percent: u8,
}

impl Default for ExportTiming {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            step_percent: 10,
        }
    }
}

impl ExportTiming {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub range_policy: RangePolicy,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    pub defaults: EntityDefaults,
    pub upload: UploadLimits,
    pub export: ExportTiming,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::Reject,
            history_depth: 100,
            defaults: EntityDefaults::default(),
            upload: UploadLimits::default(),
            export: ExportTiming::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| ReelcutError::Serialization(format!("Invalid editor config: {}", e)))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EditorConfig::from_json(b"{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert_eq!(config.upload.max_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_partial_document() {
        let json = br#"{"range_policy": "swap", "defaults": {"segment_length": 4.0}}"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.range_policy, RangePolicy::Swap);
        assert_eq!(config.defaults.segment_length, 4.0);
        assert_eq!(config.defaults.subtitle_length, 5.0);
    }

    #[test]
    fn test_invalid_document_rejected() {
        let result = EditorConfig::from_json(br#"{"range_policy": "sometimes"}"#);
        assert!(matches!(result, Err(ReelcutError::Serialization(_))));
    }

    #[test]
    fn test_accepted_mime_types() {
        let limits = UploadLimits::default();
        assert!(limits.accepts("video/quicktime"));
        assert!(!limits.accepts("video/x-matroska"));
    }
}
