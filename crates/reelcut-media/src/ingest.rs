//! Upload validation.
//!
//! Each candidate is checked against the accepted MIME types first, then the
//! size limit. Accepted files become [`UploadedVideo`]s with a fresh id;
//! rejected files produce the user-visible message of their error.

use reelcut_core::{ReelcutError, Result, UploadLimits, VideoSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// A file picked by the user, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// Object URL the browser-side picker created for the file.
    pub url: String,
}

impl UploadCandidate {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            url: url.into(),
        }
    }
}

/// A validated upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub size_bytes: u64,
}

impl UploadedVideo {
    /// Source descriptor for the editor; the duration is unknown until the
    /// media element loads metadata.
    pub fn to_source(&self) -> VideoSource {
        VideoSource::new(self.url.clone(), self.name.clone(), None)
    }
}

/// Check one candidate against `limits`.
pub fn validate_upload(candidate: &UploadCandidate, limits: &UploadLimits) -> Result<()> {
    if !limits.accepts(&candidate.mime_type) {
        return Err(ReelcutError::UnsupportedMediaType {
            mime: candidate.mime_type.clone(),
        });
    }
    if candidate.size_bytes > limits.max_bytes {
        return Err(ReelcutError::FileTooLarge {
            size_bytes: candidate.size_bytes,
            limit_bytes: limits.max_bytes,
        });
    }
    Ok(())
}

/// Outcome of validating a batch of files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub accepted: Vec<UploadedVideo>,
    /// Number of files rejected.
    pub rejected: usize,
    /// Message for the most recent rejection, shown inline on the upload page.
    pub error: Option<String>,
}

impl IngestReport {
    pub fn sources(&self) -> Vec<VideoSource> {
        self.accepted.iter().map(UploadedVideo::to_source).collect()
    }
}

/// Validate every candidate. Valid files are accepted even when others in the
/// same batch are rejected.
pub fn ingest<'a>(
    candidates: impl IntoIterator<Item = &'a UploadCandidate>,
    limits: &UploadLimits,
) -> IngestReport {
    let mut report = IngestReport::default();
    for candidate in candidates {
        match validate_upload(candidate, limits) {
            Ok(()) => {
                let video = UploadedVideo {
                    id: Uuid::new_v4(),
                    name: candidate.name.clone(),
                    url: candidate.url.clone(),
                    size_bytes: candidate.size_bytes,
                };
                debug!(id = %video.id, name = %video.name, "Upload accepted");
                report.accepted.push(video);
            }
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "Upload rejected");
                report.rejected += 1;
                report.error = Some(e.to_string());
            }
        }
    }
    report
}
