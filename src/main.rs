// src/main.rs

// Modules defined in the crate
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

// Specific imports
use crate::config::{CommandLineInput, RunConfig};
use crate::drive::DriveConnector;
use crate::error::AppError;
use crate::net::HttpProbe;
use crate::notes::AppleNotesSource;
use crate::pipeline::{BackupPipeline, RunSummary};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::path::Path;

/// Sets up logging configuration.
///
/// The file appender receives every record in the log file's
/// `<timestamp>: <message>` line format; the console stays quiet below
/// warnings unless `--verbose` asks for the full picture.
fn setup_logging(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let root_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)}: {m}{n}")))
        .build(log_file)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(console_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(root_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file.display());
    Ok(())
}

/// Executes the three-stage backup pipeline: export → connectivity check → upload.
///
/// The concrete adapters are wired here; everything behind them is driven
/// through the capability traits so the stage logic stays testable.
async fn execute_pipeline(config: &RunConfig) -> Result<RunSummary, AppError> {
    let source = AppleNotesSource::new();
    let probe = HttpProbe::new();
    let remote = DriveConnector::new(&config.client_secrets, &config.token_file);

    BackupPipeline::new(&source, &probe, &remote, config)
        .run()
        .await
}

/// Reports completion to the user with stage tallies.
fn report_completion(config: &RunConfig, summary: &RunSummary) {
    println!(
        "📄 Exported {} note(s) to {}",
        summary.exported,
        config.output_dir.display()
    );

    if config.export_only {
        println!("✓ Export finished; upload skipped (--export-only).");
        return;
    }

    println!("✓ Uploaded {} file(s) to Google Drive", summary.uploaded);

    if !summary.failed_uploads.is_empty() {
        eprintln!(
            "⚠️  {} file(s) failed to upload:",
            summary.failed_uploads.len()
        );
        for failure in &summary.failed_uploads {
            eprintln!("   {}: {}", failure.name, failure.error);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    let config = RunConfig::resolve(cli)?;

    setup_logging(&config.log_file, config.verbose)?;

    let summary = execute_pipeline(&config).await?;
    report_completion(&config, &summary);

    Ok(())
}
