//! Writing the finished report to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ReportError;
use crate::layout::Document;
use crate::model::{non_blank, InterviewRecord, PageGeometry};
use crate::pdf::{PdfWriter, ReportMetadata};

/// `"{candidate}_Interview_Summary.pdf"`, with characters that are unsafe
/// in file names replaced by `_`.
pub fn report_file_name(record: &InterviewRecord) -> String {
    let candidate = non_blank(record.candidate_name.as_deref()).unwrap_or("Candidate");
    let safe: String = candidate
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_Interview_Summary.pdf", safe)
}

/// Encode a laid-out record as PDF bytes, with metadata from the record.
pub fn report_bytes(record: &InterviewRecord, document: &Document) -> Result<Vec<u8>, ReportError> {
    PdfWriter::new().write(document, &ReportMetadata::for_record(record))
}

/// Write finished PDF bytes to `path`.
pub fn write_report(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    fs::write(path, bytes).map_err(|e| ReportError::io(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}

/// Render the record and write it into `dir`. Returns the written path.
pub fn export_pdf(
    record: &InterviewRecord,
    geometry: &PageGeometry,
    dir: &Path,
) -> Result<PathBuf, ReportError> {
    let document = crate::render(record, geometry)?;
    let bytes = report_bytes(record, &document)?;
    let path = dir.join(report_file_name(record));
    write_report(&path, &bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: Option<&str>) -> InterviewRecord {
        InterviewRecord {
            candidate_name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn file_name_uses_candidate() {
        assert_eq!(
            report_file_name(&named(Some("Jane Doe"))),
            "Jane Doe_Interview_Summary.pdf"
        );
    }

    #[test]
    fn file_name_falls_back_when_missing_or_blank() {
        assert_eq!(
            report_file_name(&named(None)),
            "Candidate_Interview_Summary.pdf"
        );
        assert_eq!(
            report_file_name(&named(Some("   "))),
            "Candidate_Interview_Summary.pdf"
        );
    }

    #[test]
    fn file_name_strips_path_separators() {
        assert_eq!(
            report_file_name(&named(Some("../a/b\\c"))),
            ".._a_b_c_Interview_Summary.pdf"
        );
    }

    #[test]
    fn export_writes_pdf_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_pdf(&named(Some("Bob")), &PageGeometry::a4(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Bob_Interview_Summary.pdf"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn write_report_reports_the_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let err = write_report(&path, b"%PDF-1.7").unwrap_err();
        match err {
            ReportError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected Io error, got {}", other),
        }
    }

    #[test]
    fn report_bytes_carry_record_metadata() {
        let record = named(Some("Bob"));
        let document = crate::render(&record, &PageGeometry::a4()).unwrap();
        let bytes = report_bytes(&record, &document).unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/Title (Bob Interview Summary)"));
    }

    #[test]
    fn export_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = export_pdf(&named(Some("Bob")), &PageGeometry::a4(), &missing).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
