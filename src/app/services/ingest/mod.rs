//! Tabular ingestion pipeline for batch submissions
//!
//! Turns raw file bytes into a canonical `LocationRecord` sequence:
//!
//! - [`columns`] - Header-to-role resolution heuristic
//! - [`delimited`] - Delimited-text (CSV) decoding
//! - [`spreadsheet`] - Spreadsheet-binary (XLSX/XLS) decoding
//! - [`records`] - Record building with per-row coordinate validation
//!
//! Decoding is a pure function of the input bytes: a fresh decode of the
//! same bytes always yields the same ordered sequence.

pub mod columns;
pub mod delimited;
pub mod records;
pub mod spreadsheet;

#[cfg(test)]
pub mod tests;

use std::path::Path;

use tracing::info;

use crate::constants::{DELIMITED_EXTENSIONS, SPREADSHEET_EXTENSIONS};
use crate::{Error, Result};

// Re-export main types for easy access
pub use columns::{ColumnRole, ColumnRoles};
pub use records::{build_records, IngestResult, IngestStats};

/// One raw field-value row surviving the decode step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based raw input row index, counted over all input rows including
    /// ones the decoder skipped
    pub index: usize,
    /// Trimmed field values in column order
    pub fields: Vec<String>,
}

/// Decoder output: ordered rows plus the roles resolved from the header
#[derive(Debug, Clone)]
pub struct DecodedTable {
    pub headers: Vec<String>,
    pub roles: ColumnRoles,
    pub rows: Vec<RawRow>,
}

/// Decode raw file bytes according to the file extension.
///
/// `.csv` is decoded as delimited text, `.xlsx`/`.xls` as a binary
/// workbook; any other extension fails with `UnsupportedFormat`.
pub fn decode_bytes(bytes: &[u8], extension: &str) -> Result<DecodedTable> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();

    if DELIMITED_EXTENSIONS.contains(&ext.as_str()) {
        let text = String::from_utf8_lossy(bytes);
        delimited::decode_delimited(&text)
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        spreadsheet::decode_spreadsheet(bytes)
    } else {
        Err(Error::unsupported_format(ext))
    }
}

/// Read a tabular file and build its location record sequence
pub fn ingest_file(path: &Path) -> Result<IngestResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read file {}", path.display()), e))?;

    let table = decode_bytes(&bytes, extension)?;
    let result = build_records(&table);

    info!(
        "Ingested {}: {} records from {} rows ({} skipped)",
        path.display(),
        result.stats.records_built,
        result.stats.rows_seen,
        result.stats.rows_skipped
    );

    Ok(result)
}
