// src/pipeline.rs
//! Pipeline capability traits and the backup state machine.
//!
//! Each trait describes a single capability of the export-and-upload
//! pipeline, enabling testing each stage in isolation. The orchestrator
//! walks an explicit stage sequence: `Export → CheckConnectivity →
//! Upload → Done`, with `Failed` reachable from every stage.

use std::fmt;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::error::AppError;
use crate::export::writer::{export_notes, list_exported_files};
use crate::model::NotesDump;
use crate::notes::parser::parse_notes;
use crate::types::FolderId;

/// Retrieves the raw note dump from the local notes application.
pub trait NoteSource {
    fn fetch_all(&self) -> Result<NotesDump, AppError>;
}

/// Decides whether the network is reachable at all.
#[async_trait::async_trait]
pub trait ConnectivityProbe {
    async fn check(&self) -> Result<(), AppError>;
}

/// Uploads a batch of local files to the remote folder.
///
/// Implementations catch per-file failures and report them; only the
/// aggregate outcome comes back, never an error.
#[async_trait::async_trait]
pub trait RemoteStore {
    async fn upload_all(&self, folder: &FolderId, files: &[PathBuf]) -> UploadReport;
}

/// Produces an authenticated [`RemoteStore`] on demand.
///
/// Kept separate from the store itself so authentication (which may be
/// interactive) only runs once the pipeline has committed to uploading.
#[async_trait::async_trait]
pub trait RemoteStoreProvider {
    async fn connect(&self) -> Result<Box<dyn RemoteStore + Send + Sync>, AppError>;
}

/// Aggregate outcome of the upload stage.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Local filenames successfully created on the remote, in attempt order.
    pub uploaded: Vec<String>,
    /// Per-file failures, in attempt order.
    pub failed: Vec<FailedUpload>,
}

/// A single file the upload stage could not deliver.
#[derive(Debug)]
pub struct FailedUpload {
    pub name: String,
    pub error: String,
}

impl UploadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uploaded(mut self, name: String) -> Self {
        self.uploaded.push(name);
        self
    }

    pub fn with_failed(mut self, failure: FailedUpload) -> Self {
        self.failed.push(failure);
        self
    }

    /// Successes plus failures, which equals the number of files given.
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Export,
    CheckConnectivity,
    Upload,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Export => write!(f, "export"),
            Stage::CheckConnectivity => write!(f, "connectivity check"),
            Stage::Upload => write!(f, "upload"),
            Stage::Done => write!(f, "done"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

/// What a completed run accomplished.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub exported: usize,
    pub uploaded: usize,
    /// Per-file upload failures, for user-facing reporting.
    pub failed_uploads: Vec<FailedUpload>,
}

/// Sequences the backup stages over the injected capabilities.
pub struct BackupPipeline<'a> {
    source: &'a dyn NoteSource,
    probe: &'a dyn ConnectivityProbe,
    remote: &'a dyn RemoteStoreProvider,
    config: &'a RunConfig,
}

impl<'a> BackupPipeline<'a> {
    pub fn new(
        source: &'a dyn NoteSource,
        probe: &'a dyn ConnectivityProbe,
        remote: &'a dyn RemoteStoreProvider,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            source,
            probe,
            remote,
            config,
        }
    }

    /// Drives the state machine to a terminal stage. Returns the summary
    /// on `Done`; the first fatal error on `Failed`.
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let mut stage = Stage::Export;
        let mut summary = RunSummary::default();
        let mut failure: Option<AppError> = None;

        while !matches!(stage, Stage::Done | Stage::Failed) {
            log::debug!("Entering stage: {}", stage);

            stage = match stage {
                Stage::Export => match self.export() {
                    Ok(count) => {
                        summary.exported = count;
                        if self.config.export_only {
                            Stage::Done
                        } else {
                            Stage::CheckConnectivity
                        }
                    }
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        failure = Some(e);
                        Stage::Failed
                    }
                },
                Stage::CheckConnectivity => match self.probe.check().await {
                    Ok(()) => Stage::Upload,
                    Err(e) => {
                        log::error!("Connectivity check failed: {}", e);
                        failure = Some(e);
                        Stage::Failed
                    }
                },
                Stage::Upload => match self.upload().await {
                    Ok(report) => {
                        summary.uploaded = report.uploaded.len();
                        summary.failed_uploads = report.failed;
                        Stage::Done
                    }
                    Err(e) => {
                        log::error!("Upload phase failed: {}", e);
                        failure = Some(e);
                        Stage::Failed
                    }
                },
                Stage::Done | Stage::Failed => unreachable!("terminal stages exit the loop"),
            };
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    fn export(&self) -> Result<usize, AppError> {
        let dump = self.source.fetch_all()?;
        log::debug!("Note dump is {} bytes", dump.len());
        if dump.is_empty() {
            // Zero notes and a silently failed export look identical here.
            log::warn!("Note export produced no output; treating it as zero notes");
        }

        let records = parse_notes(&dump);
        log::info!("Parsed {} note(s) from the export", records.len());

        let report = export_notes(&records, &self.config.output_dir)?;
        log::info!(
            "Exported {} file(s) ({} bytes) to {}",
            report.count(),
            report.bytes_written,
            self.config.output_dir.display()
        );
        Ok(report.count())
    }

    async fn upload(&self) -> Result<UploadReport, AppError> {
        // The folder id gate comes first: a missing destination must fail
        // before any authentication is attempted.
        let folder = self.config.folder_id.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration(
                "no Drive folder id configured; set --folder-id or NOTES2DRIVE_FOLDER_ID"
                    .to_string(),
            )
        })?;

        let files = list_exported_files(&self.config.output_dir)?;
        if files.is_empty() {
            log::warn!(
                "Nothing to upload from {}",
                self.config.output_dir.display()
            );
            return Ok(UploadReport::default());
        }

        let store = self.remote.connect().await?;
        let report = store.upload_all(folder, &files).await;

        log::info!(
            "Upload tally: {} succeeded, {} failed, {} attempted",
            report.uploaded.len(),
            report.failed.len(),
            report.attempted()
        );
        Ok(report)
    }
}
