// src/notes/parser.rs
//! Note record parsing — turns the delimited export blob into records.
//!
//! The blob grammar is one segment per note:
//!
//! ```text
//! ---NOTE START---
//! Title: <one line>
//! Body:
//! <zero or more lines>
//! ---NOTE END---
//! ```
//!
//! Parsing is total: malformed segments degrade to placeholder fields
//! rather than failing. A segment whose body literally contains the
//! delimiter tokens will corrupt that record and the ones after it; the
//! grammar has no escaping, so this is inherent to the format.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{DEFAULT_NOTE_TITLE, NOTE_END_MARKER, NOTE_START_MARKER};
use crate::export::filename::sanitize_title;
use crate::model::{NoteRecord, NotesDump};

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"Title: (.*?)\n")
        .expect("Failed to compile title regex - this is a bug in the code");
    static ref BODY_RE: Regex = Regex::new(&format!(
        r"(?s)Body:\n(.*?)\n{}",
        regex::escape(NOTE_END_MARKER)
    ))
    .expect("Failed to compile body regex - this is a bug in the code");
}

/// Split the raw dump into note records, in source order.
///
/// Titles come back already sanitized (they are only ever used as filename
/// stems). A missing `Title:` line yields [`DEFAULT_NOTE_TITLE`]; a missing
/// or unterminated body yields the empty string. Text before the first
/// start marker is preamble, not a note, and is discarded — in particular
/// a blob with no markers at all parses to zero records.
pub fn parse_notes(dump: &NotesDump) -> Vec<NoteRecord> {
    let start = format!("{}\n", NOTE_START_MARKER);

    dump.as_str()
        .split(&start)
        .skip(1)
        .filter(|segment| !segment.trim().is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> NoteRecord {
    let title = TITLE_RE
        .captures(segment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(DEFAULT_NOTE_TITLE);

    let body = BODY_RE
        .captures(segment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("");

    NoteRecord::new(sanitize_title(title), body)
}
