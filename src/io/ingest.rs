//! Measurement file ingest.
//!
//! A source is a comma-delimited file with one header line followed by
//! `energy, cross_section, uncertainty` rows. Ingest only splits records into
//! [`RawRow`]s; validation belongs to `data::clean`.
//!
//! A source that cannot be opened is not fatal: it contributes no rows and a
//! [`SourceNotice`] so the run can continue with the remaining files.

use std::fs::File;
use std::path::Path;

use crate::data::RawRow;

/// Something the caller should tell the user about a source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNotice {
    /// The file could not be opened; it was treated as empty.
    MissingSource { path: String, message: String },
}

impl SourceNotice {
    pub fn describe(&self) -> String {
        match self {
            SourceNotice::MissingSource { path, message } => {
                format!("input file '{path}' not found or unreadable ({message}); treated as empty")
            }
        }
    }
}

/// Rows read from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSource {
    /// Display name (the path as given).
    pub name: String,
    pub rows: Vec<RawRow>,
    pub notice: Option<SourceNotice>,
}

/// Read a measurement file into raw rows.
pub fn load_source(path: &Path) -> LoadedSource {
    let name = path.display().to_string();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("input file '{name}' could not be opened: {e}");
            return LoadedSource {
                notice: Some(SourceNotice::MissingSource {
                    path: name.clone(),
                    message: e.to_string(),
                }),
                name,
                rows: Vec::new(),
            };
        }
    };

    let rows = read_rows(file);
    log::info!("read {} row(s) from '{name}'", rows.len());
    LoadedSource {
        name,
        rows,
        notice: None,
    }
}

/// Split CSV records from any reader. The first line is a header.
pub fn read_rows<R: std::io::Read>(reader: R) -> Vec<RawRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => rows.push(RawRow::new(line, record.iter().map(str::to_string).collect())),
            Err(e) => {
                log::debug!("line {line}: CSV parse error: {e}");
                // No fields: the cleaner classifies it as malformed.
                rows.push(RawRow::new(line, Vec::new()));
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RejectReason, clean_rows};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rfit_ingest_{}_{name}", std::process::id()))
    }

    #[test]
    fn skips_header_and_numbers_lines() {
        let rows = read_rows("Energy,Cross,Sigma\n88.0, 1.2 ,0.1\n90,3.4,0.2\n".as_bytes());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].fields, vec!["88.0", "1.2", "0.1"]);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn short_and_non_numeric_rows_reach_the_cleaner_as_malformed() {
        let rows = read_rows("e,s,u\n91,3.2\nfail,1,1\n92,3.0,0.3\n".as_bytes());
        let report = clean_rows(&rows, 10.0);
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.rejections.len(), 2);
        assert!(report.rejections.iter().all(|r| r.reason == RejectReason::Malformed));
        assert_eq!(report.rejections[0].line, 2);
    }

    #[test]
    fn reads_file_from_disk() {
        let path = temp_path("ok.csv");
        std::fs::write(&path, "e,s,u\n91,-3.2,0.4\n91,3.2,-0.4\n").unwrap();
        let source = load_source(&path);
        let _ = std::fs::remove_file(&path);

        assert!(source.notice.is_none());
        assert_eq!(source.rows.len(), 2);
        let report = clean_rows(&source.rows, 10.0);
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset[0].sigma, 0.4);
    }

    #[test]
    fn missing_file_is_empty_with_notice() {
        let path = temp_path("does_not_exist.csv");
        let source = load_source(&path);
        assert!(source.rows.is_empty());
        assert!(matches!(source.notice, Some(SourceNotice::MissingSource { .. })));
        assert!(source.notice.unwrap().describe().contains("does_not_exist.csv"));
    }
}
