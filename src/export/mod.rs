// src/export/mod.rs
//! Local export — writing parsed notes to the output directory.
//!
//! Split between pure filename calculations ([`filename`]) and the file
//! I/O that uses them ([`writer`]).

pub mod filename;
pub mod writer;

// Re-export the public interface
#[allow(unused_imports)]
pub use filename::{sanitize_title, FilenameAllocator};
#[allow(unused_imports)]
pub use writer::{export_notes, ExportReport};
