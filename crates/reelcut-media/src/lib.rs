//! Reelcut Media - External interfaces around the timeline
//!
//! This crate handles:
//! - The `videos` query parameter (a JSON list of uploaded sources)
//! - Upload validation against accepted types and the size limit
//! - Export settings and the cancelable, simulated export job

pub mod export;
pub mod ingest;
pub mod video_list;

pub use export::{
    ExportCancel, ExportDestination, ExportFormat, ExportHandle, ExportJob, ExportQuality,
    ExportSettings, ExportStatus,
};
pub use ingest::{ingest, validate_upload, IngestReport, UploadCandidate, UploadedVideo};
pub use video_list::{encode_video_list, parse_video_list, videos_from_query};
