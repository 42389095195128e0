// src/export/filename.rs
//! Pure functions for filename calculations.
//!
//! This module decides what exported files are called without performing
//! any I/O operations.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{DEFAULT_NOTE_TITLE, EXPORT_FILE_EXTENSION, FILENAME_MAX_CHARS};

lazy_static! {
    static ref FORBIDDEN_CHARS: Regex = Regex::new(r"[^\w\- ]")
        .expect("Failed to compile filename charset regex - this is a bug in the code");
}

/// Sanitizes a note title into a filesystem-safe filename stem.
///
/// Every character outside word characters, hyphen, underscore, and space
/// becomes an underscore; surrounding whitespace is trimmed and the result
/// capped at 100 characters. Idempotent: sanitizing an already-sanitized
/// stem returns it unchanged. Titles that sanitize away entirely fall back
/// to the untitled placeholder so the stem is always usable.
pub fn sanitize_title(title: &str) -> String {
    let replaced = FORBIDDEN_CHARS.replace_all(title, "_");

    let capped: String = replaced.trim().chars().take(FILENAME_MAX_CHARS).collect();
    let stem = capped.trim_end();

    if stem.is_empty() {
        DEFAULT_NOTE_TITLE.to_string()
    } else {
        stem.to_string()
    }
}

/// Hands out collision-free filenames within a single export run.
///
/// Two distinct notes whose titles sanitize to the same stem would
/// otherwise silently overwrite each other; the allocator disambiguates
/// the second and later ones with a numeric suffix (`A.txt`, `A_1.txt`,
/// `A_2.txt`). Files left over from previous runs are still overwritten,
/// which is the intended re-run behavior.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
    taken: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `<stem>.txt`, suffixed with the lowest free `_N` if the
    /// plain name was already handed out this run.
    pub fn allocate(&mut self, stem: &str) -> String {
        let plain = format!("{}.{}", stem, EXPORT_FILE_EXTENSION);
        if self.taken.insert(plain.clone()) {
            return plain;
        }

        for i in 1.. {
            let candidate = format!("{}_{}.{}", stem, i, EXPORT_FILE_EXTENSION);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }

        unreachable!("suffix search is unbounded")
    }
}
