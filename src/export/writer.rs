// src/export/writer.rs
//! Executes the local export by performing actual file I/O.
//!
//! This module is the only place the export stage touches the
//! filesystem; filename decisions stay in [`super::filename`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::export::filename::FilenameAllocator;
use crate::model::NoteRecord;

/// Outcome of the export stage.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Paths written, in record order.
    pub written: Vec<PathBuf>,
    /// Total body bytes written across all files.
    pub bytes_written: usize,
}

impl ExportReport {
    pub fn count(&self) -> usize {
        self.written.len()
    }
}

/// Lists the regular files currently in the output directory, sorted by
/// name. This is the upload stage's inventory: whatever is on disk gets
/// uploaded, not just what this run wrote.
pub fn list_exported_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Writes one `.txt` file per record into `output_dir`, creating the
/// directory if needed. Collisions within the run get numeric suffixes;
/// leftovers from previous runs are overwritten. Any filesystem error is
/// fatal and aborts the export.
pub fn export_notes(records: &[NoteRecord], output_dir: &Path) -> Result<ExportReport, AppError> {
    fs::create_dir_all(output_dir)?;

    let mut allocator = FilenameAllocator::new();
    let mut report = ExportReport::default();

    for record in records {
        let filename = allocator.allocate(&record.title);
        let path = output_dir.join(&filename);

        log::debug!("Writing {} bytes to {}", record.body.len(), path.display());
        fs::write(&path, &record.body)?;

        log::info!("Exported: {}", path.display());
        report.bytes_written += record.body.len();
        report.written.push(path);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_one_file_per_record_with_exact_body() {
        let dir = tempdir().unwrap();
        let records = vec![
            NoteRecord::new("A", "hello"),
            NoteRecord::new("B_C", "world"),
        ];

        let report = export_notes(&records, dir.path()).unwrap();

        assert_eq!(report.count(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("A.txt")).unwrap(),
            "hello"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("B_C.txt")).unwrap(),
            "world"
        );
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("exported-notes");

        let records = vec![NoteRecord::new("solo", "body")];
        let report = export_notes(&records, &nested).unwrap();

        assert_eq!(report.count(), 1);
        assert!(nested.join("solo.txt").exists());
    }

    #[test]
    fn colliding_titles_get_numeric_suffixes() {
        let dir = tempdir().unwrap();
        let records = vec![
            NoteRecord::new("Untitled", "first"),
            NoteRecord::new("Untitled", "second"),
        ];

        let report = export_notes(&records, dir.path()).unwrap();

        assert_eq!(report.count(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("Untitled.txt")).unwrap(),
            "first"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("Untitled_1.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn reruns_overwrite_previous_exports() {
        let dir = tempdir().unwrap();

        export_notes(&[NoteRecord::new("note", "old")], dir.path()).unwrap();
        export_notes(&[NoteRecord::new("note", "new")], dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("note.txt")).unwrap(),
            "new"
        );
    }

    #[test]
    fn zero_records_still_create_the_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("empty-run");

        let report = export_notes(&[], &target).unwrap();

        assert_eq!(report.count(), 0);
        assert_eq!(report.bytes_written, 0);
        assert!(target.is_dir());
    }

    #[test]
    fn listing_returns_files_sorted_and_skips_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let files = list_exported_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn multiline_bodies_survive_byte_for_byte() {
        let dir = tempdir().unwrap();
        let body = "line one\nline two\n\nline four";

        export_notes(&[NoteRecord::new("multi", body)], dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("multi.txt")).unwrap(),
            body
        );
    }
}
