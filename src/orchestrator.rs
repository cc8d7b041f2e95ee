//! Export orchestration: runs the enabled targets in order on a worker
//! thread and reports progress over a channel.
//!
//! ## Event Sequence
//!
//! ```text
//! Status("Starting icon generation...")   Progress(10)
//! Status("Generating Windows icon...")    Progress(40)   if windows
//! Status("Generating macOS icons...")     Progress(60)   if macos
//! Status("Generating PNG set...")         Progress(80)   if png_set
//! Status("Generating favicon...")         Progress(90)   if favicon
//!                                         Progress(100)
//! Finished("Icon generation complete!")
//! ```
//!
//! Checkpoints of disabled stages are skipped, so progress only rises. The
//! first stage error stops the run: one [`ExportEvent::Failed`] is sent and
//! the worker returns [`ExportError::Aborted`]. A panicking stage is caught
//! on the worker and reported the same way, as [`ExportError::WorkerPanicked`].
//! Files already written stay on disk.

use crate::config::ExportTargets;
use crate::export::{self, ExportError, ExportStage, IconsetConverter, MacosStrategy};
use crate::imaging;
use chrono::{Local, NaiveDateTime};
use image::RgbaImage;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub const STATUS_STARTING: &str = "Starting icon generation...";
pub const STATUS_WINDOWS: &str = "Generating Windows icon...";
pub const STATUS_MACOS: &str = "Generating macOS icons...";
pub const STATUS_PNG_SET: &str = "Generating PNG set...";
pub const STATUS_FAVICON: &str = "Generating favicon...";
pub const MESSAGE_COMPLETE: &str = "Icon generation complete!";

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub targets: ExportTargets,
    /// Parent of the timestamped `icons_*` folder.
    pub output_root: PathBuf,
}

/// One-way notifications from the export worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    /// Overall progress, 0-100.
    Progress(u8),
    Status(String),
    /// Completion message; always the last event of a successful run.
    Finished(String),
    /// Error message; always the last event of a failed run.
    Failed(String),
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub message: String,
    pub output_dir: PathBuf,
    /// Every file written, in stage order. The `.icns` counts as one file.
    pub files: Vec<PathBuf>,
    /// `None` when the macOS target was disabled.
    pub macos_strategy: Option<MacosStrategy>,
}

/// Folder name for an export started at `now`: `icons_YYYYMMDD_HHMMSS`.
pub fn output_dir_name(now: NaiveDateTime) -> String {
    now.format("icons_%Y%m%d_%H%M%S").to_string()
}

/// Validate the options and create the timestamped output folder.
///
/// Nothing touches the disk when validation fails.
pub fn prepare_output_dir(options: &ExportOptions) -> Result<PathBuf, ExportError> {
    if !options.targets.any() {
        return Err(ExportError::NoTargets);
    }
    let dir = options
        .output_root
        .join(output_dir_name(Local::now().naive_local()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn emit(events: &Sender<ExportEvent>, event: ExportEvent) {
    // A dropped receiver only means nobody is listening.
    events.send(event).ok();
}

fn abort(events: &Sender<ExportEvent>, stage: ExportStage, err: ExportError) -> ExportError {
    let message = err.to_string();
    log::error!("{stage} export failed: {message}");
    emit(events, ExportEvent::Failed(format!("An error occurred: {message}")));
    ExportError::Aborted { stage, message }
}

fn begin(events: &Sender<ExportEvent>, stage: ExportStage, status: &str) {
    log::info!("starting {stage} export");
    emit(events, ExportEvent::Status(status.to_string()));
}

/// Run every enabled target into an existing `out_dir`, synchronously.
pub fn run_export(
    image: &RgbaImage,
    targets: ExportTargets,
    out_dir: &Path,
    converter: &dyn IconsetConverter,
    events: &Sender<ExportEvent>,
) -> Result<ExportReport, ExportError> {
    emit(events, ExportEvent::Status(STATUS_STARTING.to_string()));
    emit(events, ExportEvent::Progress(10));

    let mut files = Vec::new();
    let mut macos_strategy = None;

    if targets.windows {
        let stage = ExportStage::Windows;
        begin(events, stage, STATUS_WINDOWS);
        let path = export::export_windows(image, out_dir).map_err(|e| abort(events, stage, e))?;
        files.push(path);
        emit(events, ExportEvent::Progress(40));
    }

    if targets.macos {
        let stage = ExportStage::Macos;
        begin(events, stage, STATUS_MACOS);
        let output = export::export_macos(image, out_dir, converter)
            .map_err(|e| abort(events, stage, e))?;
        macos_strategy = Some(output.strategy);
        files.extend(output.files);
        emit(events, ExportEvent::Progress(60));
    }

    if targets.png_set {
        let stage = ExportStage::PngSet;
        begin(events, stage, STATUS_PNG_SET);
        let written = export::export_png_set(image, out_dir).map_err(|e| abort(events, stage, e))?;
        files.extend(written);
        emit(events, ExportEvent::Progress(80));
    }

    if targets.favicon {
        let stage = ExportStage::Favicon;
        begin(events, stage, STATUS_FAVICON);
        let path = export::export_favicon(image, out_dir).map_err(|e| abort(events, stage, e))?;
        files.push(path);
        emit(events, ExportEvent::Progress(90));
    }

    emit(events, ExportEvent::Progress(100));
    emit(events, ExportEvent::Finished(MESSAGE_COMPLETE.to_string()));
    Ok(ExportReport {
        message: MESSAGE_COMPLETE.to_string(),
        output_dir: out_dir.to_path_buf(),
        files,
        macos_strategy,
    })
}

/// A running export. Drain [`events`](Self::events), then [`wait`](Self::wait).
pub struct ExportHandle {
    pub output_dir: PathBuf,
    events: Receiver<ExportEvent>,
    worker: JoinHandle<Result<ExportReport, ExportError>>,
}

impl ExportHandle {
    /// Blocking iterator over events; ends when the worker finishes.
    pub fn events(&self) -> mpsc::Iter<'_, ExportEvent> {
        self.events.iter()
    }

    /// Wait for the worker and return its result.
    pub fn wait(self) -> Result<ExportReport, ExportError> {
        self.worker
            .join()
            .unwrap_or(Err(ExportError::WorkerPanicked))
    }
}

/// Validate, create the output folder, and start the export on a new thread.
///
/// The worker owns its copy of the image, so the caller may keep editing.
pub fn spawn_export(
    image: RgbaImage,
    options: ExportOptions,
    converter: Arc<dyn IconsetConverter>,
) -> Result<ExportHandle, ExportError> {
    imaging::ensure_valid(&image)?;
    let output_dir = prepare_output_dir(&options)?;
    log::info!("exporting icons to {}", output_dir.display());

    let (tx, rx) = mpsc::channel();
    let targets = options.targets;
    let dir = output_dir.clone();
    let worker = thread::spawn(move || {
        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            run_export(&image, targets, &dir, converter.as_ref(), &tx)
        }));
        run.unwrap_or_else(|_| {
            let err = ExportError::WorkerPanicked;
            log::error!("{err}");
            emit(&tx, ExportEvent::Failed(format!("An error occurred: {err}")));
            Err(err)
        })
    });

    Ok(ExportHandle {
        output_dir,
        events: rx,
        worker,
    })
}
