//! Integration tests for the media interfaces feeding the editor.
//!
//! Covers the upload page → video list → editor session hand-off and the
//! export job lifecycle.

use std::path::PathBuf;
use std::time::Duration;

use reelcut_core::units::MIB;
use reelcut_core::{EditorConfig, ExportTiming, UploadLimits};
use reelcut_media::{
    encode_video_list, ingest, validate_upload, videos_from_query, ExportDestination, ExportJob,
    ExportSettings, ExportStatus, UploadCandidate,
};
use reelcut_timeline::EditorSession;

fn export_settings() -> ExportSettings {
    ExportSettings {
        destination: ExportDestination::Custom,
        custom_dir: Some(PathBuf::from("/tmp/exports")),
        ..Default::default()
    }
}

#[test]
fn oversized_upload_is_rejected_with_sizes() {
    let file = UploadCandidate::new("holiday.mp4", "video/mp4", 150 * MIB, "blob:holiday");
    let message = validate_upload(&file, &UploadLimits::default())
        .unwrap_err()
        .to_string();
    assert!(message.contains("150.00MB"), "{message}");
    assert!(message.contains("Maximum size is 100MB"), "{message}");
}

#[test]
fn uploads_flow_into_editor_session() {
    let files = vec![
        UploadCandidate::new("a.mp4", "video/mp4", 10 * MIB, "blob:a"),
        UploadCandidate::new("b.mov", "video/quicktime", 20 * MIB, "blob:b"),
        UploadCandidate::new("c.txt", "text/plain", 1, "blob:c"),
    ];
    let config = EditorConfig::default();
    let report = ingest(&files, &config.upload);
    assert_eq!(report.accepted.len(), 2);
    assert_eq!(
        report.error.as_deref(),
        Some("File type not supported: text/plain. Please upload video files only.")
    );

    let query = format!("videos={}", encode_video_list(&report.sources()).unwrap());
    let videos = videos_from_query(&query);
    assert_eq!(videos.len(), 2);

    let mut session = EditorSession::new(config, videos);
    assert_eq!(session.active_video().unwrap().name, "a.mp4");
    assert_eq!(session.clock().duration(), 0.0);
    session.on_loaded_metadata(33.0);
    assert_eq!(session.clock().duration(), 33.0);
}

#[test]
fn malformed_video_list_gives_empty_session() {
    for query in ["videos=%7B%22url", "videos=%25E0%25A4%25A", "videos=%5B1%2C2%5D"] {
        let videos = videos_from_query(query);
        assert!(videos.is_empty(), "{query}");
        let mut session = EditorSession::new(EditorConfig::default(), videos);
        assert!(session.active_video().is_none());
        assert!(session.add_segment().is_err());
    }
}

#[tokio::test(start_paused = true)]
async fn export_uses_configured_timing() {
    let config = EditorConfig::from_json(br#"{"export": {"tick_ms": 100, "step_percent": 25}}"#)
        .unwrap();
    assert_eq!(config.export, ExportTiming { tick_ms: 100, step_percent: 25 });

    let handle = ExportJob::new(export_settings(), "short", config.export)
        .unwrap()
        .spawn();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(handle.status(), ExportStatus::Running { percent: 50 });

    let status = handle.wait().await.unwrap();
    assert_eq!(
        status,
        ExportStatus::Completed {
            path: PathBuf::from("/tmp/exports/short.mp4")
        }
    );
}

#[tokio::test(start_paused = true)]
async fn closing_export_dialog_stops_progress() {
    let handle = ExportJob::new(export_settings(), "closed", ExportTiming::default())
        .unwrap()
        .spawn();
    let observer = handle.subscribe();

    tokio::time::sleep(Duration::from_millis(1_600)).await;
    drop(handle);
    let at_close = observer.borrow().percent();
    assert_eq!(at_close, 30);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(*observer.borrow(), ExportStatus::Cancelled { percent: at_close });
}
