// src/model.rs
//! Domain model for the export pipeline.
//!
//! Both types here are transient: a dump is parsed into records, the
//! records are written to disk, and nothing is retained in memory after
//! the export stage completes.

use std::fmt;

/// The raw text produced by the note source — zero or more notes wrapped
/// in literal start/end markers.
///
/// An empty dump is valid and means "no notes". The type deliberately does
/// not distinguish "no notes" from "the source produced nothing useful";
/// that gap is inherited from the dump grammar itself.
#[derive(Debug, Clone, Default)]
pub struct NotesDump(String);

impl NotesDump {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the dump carries no text at all (after trimming).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NotesDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One parsed note: a filename-safe title and its raw multi-line body.
///
/// The title has already been through the filename sanitizer by the time a
/// record exists, so it can be used directly as a file stem. The body is
/// written out byte-for-byte (UTF-8) and never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub title: String,
    pub body: String,
}

impl NoteRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_builds_from_borrowed_and_owned_text() {
        assert_eq!(NotesDump::new("raw").as_str(), "raw");
        assert_eq!(NotesDump::new(String::from("raw")).as_str(), "raw");
    }

    #[test]
    fn blank_dump_counts_as_empty() {
        assert!(NotesDump::new("").is_empty());
        assert!(NotesDump::new("  \n\t ").is_empty());
        assert!(!NotesDump::new("x").is_empty());
    }
}
