//! Core data models for the ingestion and orchestration pipeline.

use serde::{Deserialize, Serialize};

/// Canonical location unit produced by the ingestion pipeline.
///
/// Created once per parsed input row, immutable, and consumed exactly once
/// by an orchestrator call. The wire names match the batch request body the
/// detection service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationRecord {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }
}

/// Paths to the image artifacts the service renders for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub overlay: String,
    pub original: String,
}

/// Full result object returned by the detection service for one location.
///
/// Produced entirely by the external service and never mutated after
/// receipt. Fields the service may omit are optional here; export-time
/// defaulting is the exporter's concern. Batch responses carry the caller's
/// identifier as `user_id`, which is accepted as an alias of `sample_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    #[serde(alias = "user_id")]
    pub sample_id: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(default)]
    pub solar_present: bool,

    #[serde(default)]
    pub solar_area_m2: f64,

    /// Detection confidence in [0, 1], absent on error-fallback rows
    pub confidence: Option<f64>,

    pub qc_status: Option<String>,
    pub artifact_paths: Option<ArtifactPaths>,

    /// ISO-8601 timestamp assigned by the service
    pub timestamp: Option<String>,

    pub model_version: Option<String>,

    #[serde(default)]
    pub is_mock_data: bool,

    pub buffer_size_sqft: Option<i64>,
}

/// One recently submitted coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub lat: f64,
    pub lon: f64,
    /// ISO-8601 submission time
    pub date: String,
}

impl HistoryEntry {
    pub fn new(lat: f64, lon: f64, date: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            date: date.into(),
        }
    }

    /// Entries are deduplicated by exact coordinate equality, not by date
    pub fn same_location(&self, other: &HistoryEntry) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}
