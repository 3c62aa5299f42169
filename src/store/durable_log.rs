//! # Durable Log
//!
//! The on-disk CSV file holding every person record. This type is the only
//! code that touches the file. Every handle is opened per call and dropped
//! before returning, on success and error paths alike.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::codec::{self, Row};
use super::errors::{LogError, LogResult};
use crate::person::Person;

/// Flat-file log of person records
#[derive(Debug, Clone)]
pub struct DurableLog {
    path: PathBuf,
}

impl DurableLog {
    /// Create a handle for the log at `path`; the file itself is not touched
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read every row, header included
    pub fn read_all(&self) -> LogResult<Vec<Row>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LogError::NotFound(self.path.display().to_string())
            } else {
                LogError::Io(e)
            }
        })?;
        codec::decode_rows(&text)
    }

    /// Write a fresh file containing only the header row
    pub fn create(&self) -> LogResult<()> {
        self.write_document(&[codec::header_row()])
    }

    /// Append a single record row
    pub fn append_record(&self, person: &Person) -> LogResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(codec::encode_row(&codec::person_to_row(person)).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Truncate the file and write `rows` in order
    ///
    /// The caller is responsible for keeping the header as the first row.
    pub fn rewrite_all(&self, rows: &[Row]) -> LogResult<()> {
        self.write_document(rows)
    }

    fn write_document(&self, rows: &[Row]) -> LogResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(codec::encode_rows(rows).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
