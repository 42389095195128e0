// src/config.rs
use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_OUTPUT_DIR, LOG_FILE_NAME, SECRETS_FILE_NAME, TOKEN_FILE_NAME,
};
use crate::error::AppError;
use crate::types::FolderId;
use clap::Parser;
use std::path::PathBuf;

/// The per-user configuration directory, `~/.notes2drive`. Falls back to
/// the current directory when no home directory is available.
fn config_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Parsed command-line input.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Directory the exported .txt files are written to
    #[arg(short = 'd', long)]
    pub output_dir: Option<String>,

    /// Google Drive folder id that receives the uploads
    #[arg(long)]
    pub folder_id: Option<String>,

    /// Path of the persisted OAuth token file
    #[arg(long)]
    pub token_file: Option<String>,

    /// Path of the Google client_secrets.json for this app
    #[arg(long)]
    pub client_secrets: Option<String>,

    /// Path of the log file
    #[arg(long)]
    pub log_file: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Export notes to disk and stop (no connectivity check, no upload)
    #[arg(long, default_value_t = false)]
    pub export_only: bool,
}

/// Resolved run configuration — consulted once at startup, then passed to
/// every component so nothing else reads the process environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    /// Destination folder on Drive. `None` is allowed at resolve time; the
    /// upload stage fails on it before authenticating.
    pub folder_id: Option<FolderId>,
    pub token_file: PathBuf,
    pub client_secrets: PathBuf,
    pub log_file: PathBuf,
    #[allow(dead_code)] // Used by bin crate
    pub verbose: bool,
    pub export_only: bool,
}

impl RunConfig {
    /// Resolves the configuration from CLI input and environment.
    /// Precedence per setting: CLI flag, then environment variable, then
    /// the built-in default.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        // Surrounding whitespace is stripped; interior whitespace is still
        // a validation error.
        let folder_id = cli
            .folder_id
            .or_else(|| env_value("NOTES2DRIVE_FOLDER_ID"))
            .map(|raw| FolderId::new(raw.trim()))
            .transpose()?;

        Ok(RunConfig {
            output_dir: resolve_path(cli.output_dir, "NOTES2DRIVE_OUTPUT_DIR", || {
                PathBuf::from(DEFAULT_OUTPUT_DIR)
            }),
            folder_id,
            token_file: resolve_path(cli.token_file, "NOTES2DRIVE_TOKEN_FILE", || {
                config_home().join(TOKEN_FILE_NAME)
            }),
            client_secrets: resolve_path(cli.client_secrets, "NOTES2DRIVE_CLIENT_SECRETS", || {
                config_home().join(SECRETS_FILE_NAME)
            }),
            log_file: resolve_path(cli.log_file, "NOTES2DRIVE_LOG_FILE", || {
                config_home().join(LOG_FILE_NAME)
            }),
            verbose: cli.verbose,
            export_only: cli.export_only,
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            folder_id: None,
            token_file: config_home().join(TOKEN_FILE_NAME),
            client_secrets: config_home().join(SECRETS_FILE_NAME),
            log_file: config_home().join(LOG_FILE_NAME),
            verbose: false,
            export_only: false,
        }
    }
}

/// An environment variable's value, with empty and blank values treated
/// as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn resolve_path(
    cli_value: Option<String>,
    env_key: &str,
    default: impl FnOnce() -> PathBuf,
) -> PathBuf {
    cli_value
        .map(PathBuf::from)
        .or_else(|| env_value(env_key).map(PathBuf::from))
        .unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "NOTES2DRIVE_OUTPUT_DIR",
            "NOTES2DRIVE_FOLDER_ID",
            "NOTES2DRIVE_TOKEN_FILE",
            "NOTES2DRIVE_CLIENT_SECRETS",
            "NOTES2DRIVE_LOG_FILE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_is_set() {
        clear_env();

        let config = RunConfig::resolve(CommandLineInput::default()).unwrap();

        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(config.folder_id.is_none());
        assert!(config.token_file.ends_with("credentials.json"));
        assert!(config.log_file.ends_with("notes2drive.log"));
        assert!(!config.export_only);
    }

    #[test]
    #[serial]
    fn environment_variables_override_defaults() {
        clear_env();
        std::env::set_var("NOTES2DRIVE_OUTPUT_DIR", "/tmp/env-notes");
        std::env::set_var("NOTES2DRIVE_FOLDER_ID", "folder-from-env");

        let config = RunConfig::resolve(CommandLineInput::default()).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/env-notes"));
        assert_eq!(
            config.folder_id.as_ref().map(|f| f.as_str()),
            Some("folder-from-env")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn cli_flags_beat_environment_variables() {
        clear_env();
        std::env::set_var("NOTES2DRIVE_OUTPUT_DIR", "/tmp/env-notes");

        let cli = CommandLineInput {
            output_dir: Some("/tmp/cli-notes".to_string()),
            ..Default::default()
        };
        let config = RunConfig::resolve(cli).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/cli-notes"));

        clear_env();
    }

    #[test]
    #[serial]
    fn blank_folder_id_counts_as_unset() {
        clear_env();
        std::env::set_var("NOTES2DRIVE_FOLDER_ID", "   ");

        let config = RunConfig::resolve(CommandLineInput::default()).unwrap();
        assert!(config.folder_id.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn folder_id_surrounding_whitespace_is_trimmed() {
        clear_env();
        std::env::set_var("NOTES2DRIVE_FOLDER_ID", "  abc123  ");

        let config = RunConfig::resolve(CommandLineInput::default()).unwrap();
        assert_eq!(
            config.folder_id.as_ref().map(|f| f.as_str()),
            Some("abc123")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_folder_id_is_rejected_at_resolve_time() {
        clear_env();

        let cli = CommandLineInput {
            folder_id: Some("has embedded spaces".to_string()),
            ..Default::default()
        };
        assert!(RunConfig::resolve(cli).is_err());
    }
}
