//! Record sources: CSV files on disk and in-memory record lists

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{IpCountryError, Result};

use super::record::raw_from_fields;
use super::traits::RecordSource;
use super::types::RawRecord;

/// A headerless `start,end,country` CSV file
pub struct CsvFileSource {
    name: String,
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_records(&self) -> Result<Vec<RawRecord>> {
        let file = File::open(&self.path).map_err(|e| {
            IpCountryError::dataset(format!("Failed to open {:?}: {}", self.path, e))
        })?;

        let records = read_csv_records(file)?;
        log::debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

/// Records held in memory
pub struct MemorySource {
    name: String,
    records: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

/// Read raw records from headerless CSV data
///
/// Rows with fewer than three fields and rows the CSV reader rejects are
/// skipped. An I/O failure stops reading and is returned.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        match row {
            Ok(row) => match raw_from_fields(row.iter()) {
                Some(raw) => records.push(raw),
                None => log::debug!("Skipping short CSV row: {:?}", row),
            },
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => log::debug!("Skipping unreadable CSV row: {}", e),
        }
    }

    Ok(records)
}
