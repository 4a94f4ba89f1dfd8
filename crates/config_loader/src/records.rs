use std::fs;
use std::path::Path;

use models::FinancialRecord;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Record files come either as a bare array or wrapped in `{ "records": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    List(Vec<FinancialRecord>),
    Wrapped { records: Vec<FinancialRecord> },
}

/// Parses the JSON record list. Individual bad amounts or dates are kept as-is;
/// only a structurally invalid document is an error.
pub fn parse_records(json: &str) -> Result<Vec<FinancialRecord>> {
    let file: RecordFile = serde_json::from_str(json)?;
    Ok(match file {
        RecordFile::List(records) => records,
        RecordFile::Wrapped { records } => records,
    })
}

/// Loads the JSON record list from a file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<FinancialRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&raw)?;
    tracing::info!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}
