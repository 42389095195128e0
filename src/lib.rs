// src/lib.rs
//! notes2drive library — exports Apple Notes to text files and backs them
//! up to a Google Drive folder.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `AuthError`, `DriveErrorCode`
//! - **Configuration** — `CommandLineInput`, `RunConfig`
//! - **Domain model** — `NoteRecord`, `NotesDump`, `FolderId`
//! - **Note acquisition** — `AppleNotesSource`, `parse_notes`
//! - **Local export** — `sanitize_title`, `FilenameAllocator`, `export_notes`
//! - **Drive upload** — `DriveClient`, `Authenticator`, `TokenStore`
//! - **Pipeline** — `BackupPipeline` and the stage capability traits

// Internal modules — must match what's in main.rs
mod config;
mod constants;
mod drive;
mod error;
mod export;
mod model;
mod net;
mod notes;
mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, AuthError, DriveErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, RunConfig};

// --- Domain Model ---
pub use crate::model::{NoteRecord, NotesDump};
pub use crate::types::FolderId;

// --- Note Acquisition ---
pub use crate::notes::{parse_notes, AppleNotesSource};

// --- Local Export ---
pub use crate::export::{export_notes, sanitize_title, ExportReport, FilenameAllocator};
pub use crate::export::writer::list_exported_files;

// --- Drive Upload ---
pub use crate::drive::auth::{
    next_step, AccessToken, AuthStep, Authenticator, DriveConnector, InstalledAppSecrets,
};
pub use crate::drive::client::DriveClient;
pub use crate::drive::token_store::{JsonFileTokenStore, StoredToken, TokenStore};

// --- Connectivity ---
pub use crate::net::HttpProbe;

// --- Pipeline ---
pub use crate::pipeline::{
    BackupPipeline, ConnectivityProbe, FailedUpload, NoteSource, RemoteStore, RemoteStoreProvider,
    RunSummary, Stage, UploadReport,
};
