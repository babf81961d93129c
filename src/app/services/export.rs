//! Result set export
//!
//! Serializes an in-memory result set to delimited text or structured text.
//! Both serializations are pure functions of the result set: given the same
//! results and the same export time, the output bytes are identical.
//!
//! Two CSV schemas exist. The single-result export uses the current schema;
//! the batch export keeps the legacy column order consumers already depend
//! on, with optional numerics defaulted to `0` rather than omitted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::app::models::{ArtifactPaths, InferenceResult};
use crate::config::Config;
use crate::constants::{LEGACY_BATCH_CSV_HEADER, SINGLE_CSV_HEADER};
use crate::Result;

/// Fixed values substituted for fields the service may omit
#[derive(Debug, Clone)]
pub struct ExportDefaults {
    pub model_version: String,
    pub buffer_size_sqft: i64,
}

impl ExportDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model_version: config.default_model_version.clone(),
            buffer_size_sqft: config.buffer_sqft,
        }
    }
}

/// Single-result CSV: header plus exactly one data row
pub fn single_result_csv(result: &InferenceResult) -> String {
    format!(
        "{}\n{},{},{},{},{},{}",
        SINGLE_CSV_HEADER,
        result.sample_id,
        result.latitude.unwrap_or(0.0),
        result.longitude.unwrap_or(0.0),
        result.solar_present,
        result.solar_area_m2,
        result.confidence.unwrap_or(0.0),
    )
}

/// Legacy batch CSV: one row per result, optional numerics defaulted to `0`
pub fn legacy_batch_csv(results: &[InferenceResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(LEGACY_BATCH_CSV_HEADER.to_string());

    for result in results {
        lines.push(format!(
            "{},{},{},{},{},{}",
            result.sample_id,
            result.solar_present,
            result.solar_area_m2,
            result.confidence.unwrap_or(0.0),
            result.latitude.unwrap_or(0.0),
            result.longitude.unwrap_or(0.0),
        ));
    }

    lines.join("\n")
}

/// Full-fidelity export object with explicit defaults applied
#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    sample_id: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    solar_present: bool,
    solar_area_m2: f64,
    confidence: Option<f64>,
    qc_status: Option<&'a str>,
    is_mock_data: bool,
    buffer_size_sqft: i64,
    model_version: &'a str,
    timestamp: &'a str,
    artifact_paths: Option<&'a ArtifactPaths>,
}

fn export_record<'a>(
    result: &'a InferenceResult,
    defaults: &'a ExportDefaults,
    export_time: &'a str,
) -> ExportRecord<'a> {
    ExportRecord {
        sample_id: &result.sample_id,
        latitude: result.latitude,
        longitude: result.longitude,
        solar_present: result.solar_present,
        solar_area_m2: result.solar_area_m2,
        confidence: result.confidence,
        qc_status: result.qc_status.as_deref(),
        is_mock_data: result.is_mock_data,
        buffer_size_sqft: result.buffer_size_sqft.unwrap_or(defaults.buffer_size_sqft),
        model_version: result
            .model_version
            .as_deref()
            .unwrap_or(&defaults.model_version),
        timestamp: result.timestamp.as_deref().unwrap_or(export_time),
        artifact_paths: result.artifact_paths.as_ref(),
    }
}

/// Format an export time the way the structured exports expect it
pub fn format_export_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Structured-text export of one result
pub fn single_json(
    result: &InferenceResult,
    defaults: &ExportDefaults,
    export_time: &str,
) -> Result<String> {
    let record = export_record(result, defaults, export_time);
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Structured-text export of a whole result set, in result order
pub fn batch_json(
    results: &[InferenceResult],
    defaults: &ExportDefaults,
    export_time: &str,
) -> Result<String> {
    let records: Vec<ExportRecord> = results
        .iter()
        .map(|r| export_record(r, defaults, export_time))
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}
