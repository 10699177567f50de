//! Reelcut - Headless timeline editor
//!
//! Entry point. Loads the configuration and the video list handed over by the
//! upload page, assembles a demo composition, plays it through a simulated
//! media element and runs an export.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use reelcut_core::{format_clock, EditorConfig, ExportTiming, Point, Size, VideoSource};
use reelcut_media::{videos_from_query, ExportDestination, ExportJob, ExportSettings, ExportStatus};
use reelcut_timeline::{
    AudioKind, EditorSession, Layer, MediaElement, SegmentPatch, Subtitle, SubtitlePatch,
    VideoSegment,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Seconds between simulated `timeupdate` reports.
const TICK: f64 = 0.25;

struct Args {
    config: Option<PathBuf>,
    videos: Option<String>,
    export: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        videos: None,
        export: true,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(iter.next().context("--config needs a path")?.into());
            }
            "--videos" => {
                args.videos = Some(iter.next().context("--videos needs a query string")?);
            }
            "--no-export" => args.export = false,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// Stand-in for a browser video element. Its clock only advances while playing.
#[derive(Debug, Default)]
struct SimulatedMedia {
    time: f64,
    playing: bool,
}

impl SimulatedMedia {
    fn advance(&mut self, dt: f64) -> f64 {
        if self.playing {
            self.time += dt;
        }
        self.time
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.time = time;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Reelcut starting...");
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let export_timing = config.export;

    let mut videos = args.videos.as_deref().map(videos_from_query).unwrap_or_default();
    if videos.is_empty() {
        warn!("No videos supplied; using a built-in sample source");
        videos.push(VideoSource::new("demo://sample.mp4", "sample.mp4", None));
    }
    info!(count = videos.len(), "Loaded video list");

    let mut session = EditorSession::new(config, videos);
    let mut media = SimulatedMedia::default();
    if session.clock().duration() == 0.0 {
        // The element reports metadata once it has loaded the source.
        session.on_loaded_metadata(45.0);
    }

    build_demo(&mut session, &mut media)?;
    play_through(&mut session, &mut media);

    if args.export {
        run_export(export_timing).await?;
    }
    Ok(())
}

/// Three segments, background music, a logo overlay and one caption.
fn build_demo(session: &mut EditorSession, media: &mut SimulatedMedia) -> Result<()> {
    let mut segments = Vec::new();
    for start in [0.0, 15.0, 30.0] {
        session.seek(start, media);
        let id = session.add_segment()?;
        session.update::<VideoSegment>(
            id,
            &SegmentPatch {
                end_time: Some(start + 15.0),
                ..Default::default()
            },
        )?;
        segments.push(id);
    }

    session.seek(0.0, media);
    session.add_audio(AudioKind::Background)?;

    session.seek(3.0, media);
    let logo = session.add_overlay("assets/logo.png")?;

    session.seek(5.0, media);
    let caption = session.add_subtitle()?;
    session.update::<Subtitle>(
        caption,
        &SubtitlePatch {
            text: Some("Welcome to the beach".to_string()),
            ..Default::default()
        },
    )?;
    session.deselect_subtitle();

    // Move the logo toward the top-left corner of a 1280x720 preview.
    session.press_overlay(logo, Point::new(640.0, 360.0))?;
    session.drag_overlay(Point::new(400.0, 200.0), Size::new(1280.0, 720.0));
    session.release_overlay();

    // Drag the first segment onto the last.
    if let (Some(&first), Some(&last)) = (segments.first(), segments.last()) {
        session.start_segment_drag(first)?;
        let outcome = session.drop_segment(last);
        info!(?outcome, "Reordered segments");
    }

    session.seek(0.0, media);
    info!(
        segments = session.store().segments().len(),
        audio = session.store().audio().len(),
        overlays = session.store().overlays().len(),
        subtitles = session.store().subtitles().len(),
        "Demo timeline assembled"
    );
    Ok(())
}

fn describe(layer: &Layer<'_>) -> String {
    match layer {
        Layer::Video => "video".to_string(),
        Layer::Overlay(o) => format!("overlay:{}", o.asset_url),
        Layer::Subtitle(s) => format!("subtitle:{:?}", s.text),
    }
}

/// Play from the start, scrubbing once mid-way, logging every change in the
/// composited layers.
fn play_through(session: &mut EditorSession, media: &mut SimulatedMedia) {
    let duration = session.clock().duration();
    let max_ticks = (duration / TICK).ceil() as usize + 8;
    let mut last_layers: Vec<String> = Vec::new();
    let mut scrubbed = false;

    session.play(media);
    for _ in 0..max_ticks {
        let reported = media.advance(TICK);
        session.on_time_update(reported);

        if !scrubbed && session.clock().current_time() >= 8.0 {
            scrubbed = true;
            if session.begin_scrub(media).is_ok() {
                if let Ok(t) = session.scrub_to(300.0, 500.0, media) {
                    info!(time = %format_clock(t), "Scrubbed");
                }
                session.end_scrub(media);
            }
        }

        let layers: Vec<String> = session.composition().layers().map(|l| describe(&l)).collect();
        if layers != last_layers {
            info!(
                time = %format_clock(session.clock().current_time()),
                layers = %layers.join(" < "),
                "Composition changed"
            );
            last_layers = layers;
        }

        if !session.clock().is_playing() {
            media.pause();
            session.on_ended();
            break;
        }
    }
    info!(time = %format_clock(session.clock().current_time()), "Playback finished");
}

async fn run_export(timing: ExportTiming) -> Result<()> {
    let mut settings = ExportSettings::default();
    if settings.output_dir().is_err() {
        settings.destination = ExportDestination::Custom;
        settings.custom_dir = Some(std::env::temp_dir());
    }

    let handle = ExportJob::new(settings, "reelcut-export", timing)?.spawn();
    let mut progress = handle.subscribe();
    while progress.changed().await.is_ok() {
        let status = progress.borrow_and_update().clone();
        info!(percent = status.percent(), "Exporting");
        if status.is_finished() {
            break;
        }
    }

    match handle.wait().await? {
        ExportStatus::Completed { path } => info!(path = %path.display(), "Export finished"),
        other => warn!(?other, "Export did not complete"),
    }
    Ok(())
}
