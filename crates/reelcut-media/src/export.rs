//! Export settings and the simulated export job.
//!
//! No encoder runs: the job advances a progress percentage on a fixed tick and
//! publishes it through a `watch` channel. The job owns its own lifetime; it is
//! stopped by [`ExportHandle::cancel`] or by dropping the handle. Its last
//! published status is then [`ExportStatus::Cancelled`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reelcut_core::{ExportTiming, ReelcutError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

// ── Settings ────────────────────────────────────────────────────

/// Container format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Webm,
    Mov,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mov => "mov",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Mov => "video/quicktime",
        }
    }
}

/// Quality preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

/// Where the exported file is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportDestination {
    #[default]
    Downloads,
    Documents,
    /// A user-chosen directory, see [`ExportSettings::custom_dir`].
    Custom,
}

/// Export configuration chosen in the export dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub quality: ExportQuality,
    pub destination: ExportDestination,
    /// Directory used when `destination` is `custom`.
    pub custom_dir: Option<PathBuf>,
}

impl ExportSettings {
    /// Directory the destination resolves to on this machine.
    pub fn output_dir(&self) -> Result<PathBuf> {
        let dir = match self.destination {
            ExportDestination::Downloads => dirs::download_dir(),
            ExportDestination::Documents => dirs::document_dir(),
            ExportDestination::Custom => self.custom_dir.clone(),
        };
        dir.ok_or_else(|| {
            ReelcutError::Export(format!("no directory for destination {:?}", self.destination))
        })
    }

    /// Full output path for a file named `stem` with this format's extension.
    pub fn output_path(&self, stem: &str) -> Result<PathBuf> {
        let mut path = self.output_dir()?.join(stem);
        path.set_extension(self.format.extension());
        Ok(path)
    }
}

// ── Job ─────────────────────────────────────────────────────────

/// Progress published by a running export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Running { percent: u8 },
    Completed { path: PathBuf },
    Cancelled { percent: u8 },
}

impl ExportStatus {
    pub fn percent(&self) -> u8 {
        match self {
            Self::Running { percent } | Self::Cancelled { percent } => *percent,
            Self::Completed { .. } => 100,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running { .. })
    }
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone, Default)]
pub struct ExportCancel {
    flag: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl ExportCancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Resolves once [`ExportCancel::cancel`] has been called.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.wake.notified().await;
        }
    }
}

/// An export ready to run.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub settings: ExportSettings,
    pub output_path: PathBuf,
    pub timing: ExportTiming,
}

impl ExportJob {
    /// Resolve the output path for `stem` and prepare a job.
    pub fn new(settings: ExportSettings, stem: &str, timing: ExportTiming) -> Result<Self> {
        let output_path = settings.output_path(stem)?;
        Ok(Self {
            settings,
            output_path,
            timing,
        })
    }

    /// Start the job on the current tokio runtime.
    pub fn spawn(self) -> ExportHandle {
        let (tx, rx) = watch::channel(ExportStatus::Running { percent: 0 });
        let cancel = ExportCancel::new();
        let task = tokio::spawn(self.run(tx, cancel.clone()));
        ExportHandle {
            status: rx,
            cancel,
            task: Some(task),
        }
    }

    async fn run(self, tx: watch::Sender<ExportStatus>, cancel: ExportCancel) -> ExportStatus {
        let step = self.timing.step_percent.clamp(1, 100);
        let mut ticker = interval(self.timing.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(path = %self.output_path.display(), format = ?self.settings.format, "Export started");
        let mut percent = 0u8;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(percent, "Export cancelled");
                    let cancelled = ExportStatus::Cancelled { percent };
                    tx.send_replace(cancelled.clone());
                    return cancelled;
                }
                _ = ticker.tick() => {}
            }

            percent = percent.saturating_add(step).min(100);
            if percent == 100 {
                let done = ExportStatus::Completed {
                    path: self.output_path.clone(),
                };
                tx.send_replace(done.clone());
                info!(path = %self.output_path.display(), "Export completed");
                return done;
            }
            debug!(percent, "Export progress");
            tx.send_replace(ExportStatus::Running { percent });
        }
    }
}

/// Owner of a running export. Dropping it cancels the job, which publishes
/// [`ExportStatus::Cancelled`] and stops.
#[derive(Debug)]
pub struct ExportHandle {
    status: watch::Receiver<ExportStatus>,
    cancel: ExportCancel,
    task: Option<JoinHandle<ExportStatus>>,
}

impl ExportHandle {
    /// Latest published status.
    pub fn status(&self) -> ExportStatus {
        self.status.borrow().clone()
    }

    /// A receiver that observes every published status.
    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.status.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the job to finish and return its final status.
    pub async fn wait(mut self) -> Result<ExportStatus> {
        let Some(task) = self.task.take() else {
            return Ok(self.status());
        };
        task.await
            .map_err(|e| ReelcutError::Export(format!("export task failed: {e}")))
    }
}

impl Drop for ExportHandle {
    fn drop(&mut self) {
        if self.task.take().is_some() {
            self.cancel.cancel();
        }
    }
}
