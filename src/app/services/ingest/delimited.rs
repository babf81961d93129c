//! Delimited-text decoder
//!
//! Turns raw CSV text into an ordered sequence of trimmed field-value rows
//! plus the column roles resolved from the header line. A fresh decode of
//! the same bytes always yields the same sequence.

use tracing::debug;

use super::columns::ColumnRoles;
use super::{DecodedTable, RawRow};
use crate::Result;

/// Decode delimited text into rows and resolved column roles.
///
/// The first line is the header line. Subsequent lines are skipped when
/// blank after trimming, or when splitting on commas yields fewer than two
/// fields (malformed rows are silently dropped, not reported). The 1-based
/// raw line index of each surviving row is preserved: skipped lines still
/// shift the indices of later rows, which keeps synthesized identifiers
/// positionally stable against the input file.
pub fn decode_delimited(text: &str) -> Result<DecodedTable> {
    let lines: Vec<&str> = text.split('\n').collect();

    let headers: Vec<String> = lines
        .first()
        .map(|line| line.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_default();

    // Resolved once per input source, reused for every row
    let roles = ColumnRoles::resolve(&headers)?;

    let mut rows = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() < 2 {
            continue;
        }

        rows.push(RawRow { index, fields });
    }

    debug!(
        "Decoded {} delimited rows from {} input lines",
        rows.len(),
        lines.len().saturating_sub(1)
    );

    Ok(DecodedTable {
        headers,
        roles,
        rows,
    })
}
