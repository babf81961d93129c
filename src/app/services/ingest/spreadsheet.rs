//! Spreadsheet-binary decoder
//!
//! Decodes the first sheet of an XLSX/XLS workbook (by sheet order, not by
//! name) into rows structurally identical to the delimited-text variant's
//! output. Column roles are resolved once per decode call and reused across
//! rows.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use super::columns::ColumnRoles;
use super::{DecodedTable, RawRow};
use crate::{Error, Result};

/// Decode a binary workbook blob into rows and resolved column roles.
///
/// The first row of the first sheet is the header row. Data rows that are
/// entirely empty, or that have fewer than two populated cells, are dropped
/// the same way the text variant drops blank and malformed lines. The
/// 1-based data-row index of each surviving row is preserved, counting
/// skipped rows.
pub fn decode_spreadsheet(bytes: &[u8]) -> Result<DecodedTable> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::spreadsheet_decode("workbook contains no sheets"))??;

    let mut sheet_rows = range.rows();

    let headers: Vec<String> = sheet_rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    // Resolved once per decode, never re-derived inside the row loop
    let roles = ColumnRoles::resolve(&headers)?;

    let mut rows = Vec::new();
    for (offset, sheet_row) in sheet_rows.enumerate() {
        let index = offset + 1;
        let fields: Vec<String> = sheet_row.iter().map(cell_to_string).collect();

        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        if fields.iter().filter(|f| !f.is_empty()).count() < 2 {
            continue;
        }

        rows.push(RawRow { index, fields });
    }

    debug!("Decoded {} spreadsheet rows from first sheet", rows.len());

    Ok(DecodedTable {
        headers,
        roles,
        rows,
    })
}

/// Convert one cell into the trimmed string form the record builder expects
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) => String::new(),
    }
}
