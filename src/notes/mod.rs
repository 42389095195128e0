// src/notes/mod.rs
//! Note acquisition — obtaining raw note text from the local notes
//! application and parsing it into discrete records.
//!
//! The source produces a single delimited text blob (see
//! [`crate::constants::NOTES_EXPORT_SCRIPT`]); the parser turns that blob
//! into a sequence of [`crate::model::NoteRecord`]s.

pub mod parser;
pub mod source;

// Re-export the public interface
#[allow(unused_imports)]
pub use parser::parse_notes;
#[allow(unused_imports)]
pub use source::AppleNotesSource;
