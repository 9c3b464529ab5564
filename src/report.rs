//! A CSV report with one census row per simulated frame.
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::census::Census;
use crate::error::OutbreakError;

#[derive(Serialize)]
struct CensusRow {
    frame: u64,
    time: f64,
    healthy: usize,
    sick: usize,
    recovered: usize,
}

pub struct CensusReport<W: Write> {
    writer: Writer<W>,
}

// Checks that the path is a CSV file and creates its parent directories.
fn create_csv_file(path: &Path) -> Result<File, OutbreakError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(OutbreakError::InvalidParameter(format!(
            "report output files must be CSVs, got {}",
            path.display()
        ))),
    }
}

impl CensusReport<File> {
    /// Creates (or truncates) the report file at `path`.
    ///
    /// # Errors
    /// Returns an error if `path` does not end in `.csv` or the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, OutbreakError> {
        Ok(CensusReport::from_writer(create_csv_file(path)?))
    }
}

impl<W: Write> CensusReport<W> {
    pub fn from_writer(writer: W) -> Self {
        CensusReport {
            writer: Writer::from_writer(writer),
        }
    }

    /// Writes one row. The header is written before the first row.
    ///
    /// # Errors
    /// Propagates CSV serialization and I/O errors.
    pub fn record(&mut self, frame: u64, time: f64, census: &Census) -> Result<(), OutbreakError> {
        self.writer.serialize(CensusRow {
            frame,
            time,
            healthy: census.healthy,
            sick: census.sick,
            recovered: census.recovered,
        })?;
        Ok(())
    }

    /// # Errors
    /// Propagates I/O errors.
    pub fn flush(&mut self) -> Result<(), OutbreakError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// Propagates I/O errors from the final flush.
    pub fn into_inner(self) -> Result<W, OutbreakError> {
        self.writer
            .into_inner()
            .map_err(|e| OutbreakError::IoError(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_rows() {
        let mut report = CensusReport::from_writer(Vec::new());
        report
            .record(
                0,
                0.0,
                &Census {
                    healthy: 3,
                    sick: 0,
                    recovered: 0,
                },
            )
            .unwrap();
        report
            .record(
                1,
                0.5,
                &Census {
                    healthy: 2,
                    sick: 1,
                    recovered: 0,
                },
            )
            .unwrap();
        let bytes = report.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "frame,time,healthy,sick,recovered\n0,0.0,3,0,0\n1,0.5,2,1,0\n"
        );
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/census.csv");
        let mut report = CensusReport::create(&path).unwrap();
        report.record(0, 0.0, &Census::default()).unwrap();
        report.flush().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("frame,time,healthy,sick,recovered"));
    }

    #[test]
    fn rejects_non_csv_paths() {
        let dir = tempdir().unwrap();
        let result = CensusReport::create(&dir.path().join("census.txt"));
        assert!(matches!(result, Err(OutbreakError::InvalidParameter(_))));
    }
}
