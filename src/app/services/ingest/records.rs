//! Location record building
//!
//! Combines decoder rows with the resolved column roles to produce
//! validated `LocationRecord`s. Non-numeric coordinate fields are
//! classified per row instead of propagating NaN-like values into
//! downstream requests.

use tracing::{debug, warn};

use super::columns::{ColumnRole, ColumnRoles};
use super::{DecodedTable, RawRow};
use crate::app::models::LocationRecord;
use crate::constants::SYNTHESIZED_ID_PREFIX;
use crate::{Error, Result};

/// Statistics collected while building records from decoder rows
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// Rows the builder received from the decoder
    pub rows_seen: usize,
    /// Rows successfully converted into location records
    pub records_built: usize,
    /// Rows rejected for non-numeric coordinate fields
    pub rows_skipped: usize,
    /// Human-readable description of each rejected row
    pub errors: Vec<String>,
}

/// Ordered record sequence plus build statistics
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub records: Vec<LocationRecord>,
    pub stats: IngestStats,
}

/// Build the final record sequence from a decoded table.
///
/// Records come out in row order; insertion order is significant because it
/// determines result ordering downstream. Rows with non-numeric coordinate
/// fields are skipped with their error recorded in the statistics.
pub fn build_records(table: &DecodedTable) -> IngestResult {
    let mut stats = IngestStats::default();
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        stats.rows_seen += 1;

        match build_record(row, &table.roles) {
            Ok(record) => {
                records.push(record);
                stats.records_built += 1;
            }
            Err(e) => {
                stats.rows_skipped += 1;
                stats.errors.push(e.to_string());
                debug!("Skipped row {}: {}", row.index, e);
            }
        }
    }

    IngestResult { records, stats }
}

/// Build one location record from a raw row.
///
/// The identifier is taken from the resolved identifier column when present
/// and non-empty, otherwise synthesized as `loc_<raw row index>` (1-based,
/// counted over raw input rows including skipped ones). Coordinate fields
/// must parse as numbers; numeric but out-of-range values pass through
/// unchanged to the service.
pub fn build_record(row: &RawRow, roles: &ColumnRoles) -> Result<LocationRecord> {
    let id = roles
        .identifier
        .and_then(|idx| row.fields.get(idx))
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}{}", SYNTHESIZED_ID_PREFIX, row.index));

    let lat = parse_coordinate(row, roles.latitude, ColumnRole::Latitude)?;
    let lon = parse_coordinate(row, roles.longitude, ColumnRole::Longitude)?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        warn!(
            "Row {}: coordinates ({}, {}) outside the usual range, passing through",
            row.index, lat, lon
        );
    }

    Ok(LocationRecord::new(id, lat, lon))
}

fn parse_coordinate(row: &RawRow, index: usize, role: ColumnRole) -> Result<f64> {
    let value = row.fields.get(index).map(|s| s.as_str()).unwrap_or("");

    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::numeric_parse(row.index, role, value))
}
