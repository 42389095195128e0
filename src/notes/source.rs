// src/notes/source.rs
//! Apple Notes adapter — shells out to the OS automation bridge.
//!
//! Runs `osascript` with an inline AppleScript that walks every note in the
//! Notes application and prints each one wrapped in the delimiter grammar
//! the parser expects. The adapter itself never inspects the blob; it only
//! distinguishes "the command could not be started" (fatal) from "the
//! command ran" (whatever it printed is handed to the parser as-is).

use std::process::Command;

use crate::constants::{NOTES_EXPORT_SCRIPT, OSASCRIPT_BIN};
use crate::error::AppError;
use crate::model::NotesDump;
use crate::pipeline::NoteSource;

/// Fetches notes by invoking the OS scripting binary with an inline script.
pub struct AppleNotesSource {
    binary: String,
    args: Vec<String>,
}

impl AppleNotesSource {
    /// The production configuration: `osascript -e <export script>`.
    pub fn new() -> Self {
        Self {
            binary: OSASCRIPT_BIN.to_string(),
            args: vec!["-e".to_string(), NOTES_EXPORT_SCRIPT.to_string()],
        }
    }

    /// Build a source around an arbitrary command. Used by tests to stand in
    /// a portable binary for `osascript`.
    #[allow(dead_code)] // Public API - used by tests and library consumers
    pub fn from_command(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
        }
    }

    fn run(&self) -> Result<NotesDump, AppError> {
        log::debug!("Running note export command: {}", self.binary);

        let output = Command::new(&self.binary).args(&self.args).output().map_err(|e| {
            AppError::CommandFailed {
                command: self.binary.clone(),
                source: e,
            }
        })?;

        // A command that started but exited non-zero is not distinguished
        // from "zero notes": we log what we saw and hand stdout onward.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(NotesDump::new(stdout))
    }
}

impl Default for AppleNotesSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteSource for AppleNotesSource {
    fn fetch_all(&self) -> Result<NotesDump, AppError> {
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_of_the_command() {
        let source = AppleNotesSource::from_command(
            "printf",
            vec!["---NOTE START---\\nTitle: T\\nBody:\\nb\\n---NOTE END---\\n".to_string()],
        );
        let dump = source.fetch_all().unwrap();
        assert!(dump.as_str().contains("Title: T"));
    }

    #[test]
    fn missing_binary_is_a_command_failure() {
        let source =
            AppleNotesSource::from_command("definitely-not-a-real-binary-4f2a", vec![]);
        let err = source.fetch_all().unwrap_err();
        match err {
            AppError::CommandFailed { command, .. } => {
                assert_eq!(command, "definitely-not-a-real-binary-4f2a");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn nonzero_exit_still_yields_stdout() {
        let source = AppleNotesSource::from_command(
            "sh",
            vec!["-c".to_string(), "echo partial; exit 3".to_string()],
        );
        let dump = source.fetch_all().unwrap();
        assert_eq!(dump.as_str().trim(), "partial");
    }
}
