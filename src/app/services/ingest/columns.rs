//! Column role resolution for heterogeneous tabular input
//!
//! Input files name their coordinate columns inconsistently (`Latitude`,
//! `lat_deg`, `LAT`, ...). Roles are assigned by scanning headers in
//! declaration order and taking the first header whose lower-cased form
//! contains the role's marker substring. There is no scoring and no
//! ambiguity resolution beyond order.

use std::fmt;

use crate::constants::column_markers;
use crate::{Error, Result};

/// Semantic role a raw header column can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Identifier,
    Latitude,
    Longitude,
}

impl ColumnRole {
    /// Marker substring matched against lower-cased headers
    pub fn marker(&self) -> &'static str {
        match self {
            ColumnRole::Identifier => column_markers::IDENTIFIER,
            ColumnRole::Latitude => column_markers::LATITUDE,
            ColumnRole::Longitude => column_markers::LONGITUDE,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Identifier => write!(f, "identifier"),
            ColumnRole::Latitude => write!(f, "latitude"),
            ColumnRole::Longitude => write!(f, "longitude"),
        }
    }
}

/// Role-to-index assignments for one input source.
///
/// Resolved once per decode and reused across every row, never re-derived
/// per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    /// Optional: absence triggers synthesized ids downstream
    pub identifier: Option<usize>,
    pub latitude: usize,
    pub longitude: usize,
}

impl ColumnRoles {
    /// Resolve roles against an ordered set of header names.
    ///
    /// Fails with `MissingColumn` when no header matches the latitude or
    /// longitude marker. The identifier role is optional.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let latitude = Self::find(headers, ColumnRole::Latitude)
            .ok_or_else(|| Error::missing_column(ColumnRole::Latitude))?;
        let longitude = Self::find(headers, ColumnRole::Longitude)
            .ok_or_else(|| Error::missing_column(ColumnRole::Longitude))?;
        let identifier = Self::find(headers, ColumnRole::Identifier);

        Ok(ColumnRoles {
            identifier,
            latitude,
            longitude,
        })
    }

    /// First header in declaration order containing the role's marker
    fn find(headers: &[String], role: ColumnRole) -> Option<usize> {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(role.marker()))
    }
}
