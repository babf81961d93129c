//! Integration tests for the ingest-to-export pipeline
//!
//! These tests wire the ingestion pipeline, batch orchestrator, and export
//! serializers together over an in-process inference port, verifying the
//! complete workflow without a live detection service.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use solarscan::app::models::{InferenceResult, LocationRecord};
use solarscan::app::services::export::{batch_json, legacy_batch_csv, ExportDefaults};
use solarscan::app::services::history::{HistoryCache, JsonFileStore};
use solarscan::app::services::inference::InferencePort;
use solarscan::app::services::ingest::ingest_file;
use solarscan::app::services::orchestrator::{
    BatchOrchestrator, BatchOutcome, ConfirmationGate, SingleLocationOrchestrator,
};
use solarscan::{Config, HistoryEntry, Result};
use tempfile::TempDir;

/// In-process port that echoes locations back as detection results
struct EchoPort {
    batch_calls: Arc<AtomicUsize>,
}

impl EchoPort {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let batch_calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                batch_calls: batch_calls.clone(),
            },
            batch_calls,
        )
    }
}

impl InferencePort for EchoPort {
    async fn infer_single(&self, lat: f64, lon: f64, buffer_sqft: i64) -> Result<InferenceResult> {
        Ok(InferenceResult {
            sample_id: "single".to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            solar_present: true,
            solar_area_m2: 54.3,
            confidence: Some(0.92),
            qc_status: Some("PASSED".to_string()),
            artifact_paths: None,
            timestamp: None,
            model_version: None,
            is_mock_data: true,
            buffer_size_sqft: Some(buffer_sqft),
        })
    }

    async fn infer_batch(&self, locations: &[LocationRecord]) -> Result<Vec<InferenceResult>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(locations
            .iter()
            .enumerate()
            .map(|(i, loc)| InferenceResult {
                sample_id: loc.id.clone(),
                latitude: Some(loc.lat),
                longitude: Some(loc.lon),
                solar_present: i % 2 == 0,
                solar_area_m2: i as f64 * 10.0,
                confidence: Some(0.8),
                qc_status: None,
                artifact_paths: None,
                timestamp: None,
                model_version: None,
                is_mock_data: true,
                buffer_size_sqft: None,
            })
            .collect())
    }
}

struct FixedGate {
    answer: bool,
    consulted: Arc<AtomicUsize>,
}

impl ConfirmationGate for FixedGate {
    fn confirm(&self, _record_count: usize) -> bool {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

fn write_locations_csv(dir: &TempDir, name: &str, rows: usize) -> PathBuf {
    let mut content = String::from("id,lat,lon\n");
    for i in 0..rows {
        content.push_str(&format!("site-{},{},{}\n", i, 36.0 + i as f64 * 0.01, -115.0));
    }

    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Test the full path from CSV file to ordered batch results
///
/// Purpose: Validate that ingested record order survives through submission
/// Benefit: Consumers can correlate export rows back to input rows
#[tokio::test]
async fn test_csv_to_batch_results_preserves_order() {
    let dir = TempDir::new().unwrap();
    let path = write_locations_csv(&dir, "sites.csv", 5);

    let ingested = ingest_file(&path).unwrap();
    assert_eq!(ingested.records.len(), 5);

    let (port, batch_calls) = EchoPort::new();
    let orchestrator = BatchOrchestrator::new(
        port,
        FixedGate {
            answer: true,
            consulted: Arc::new(AtomicUsize::new(0)),
        },
        50,
    );

    let outcome = orchestrator.submit(ingested.records).await.unwrap();
    let BatchOutcome::Completed(results) = outcome else {
        panic!("expected completed outcome");
    };

    assert_eq!(batch_calls.load(Ordering::SeqCst), 1);
    let ids: Vec<&str> = results.iter().map(|r| r.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["site-0", "site-1", "site-2", "site-3", "site-4"]);
}

/// Test that a batch at the threshold proceeds without consulting the gate
///
/// Purpose: Validate the confirmation boundary on the full pipeline
/// Benefit: Small batches stay friction-free for interactive use
#[tokio::test]
async fn test_threshold_batch_skips_confirmation() {
    let dir = TempDir::new().unwrap();
    let path = write_locations_csv(&dir, "sites.csv", 50);

    let ingested = ingest_file(&path).unwrap();
    let consulted = Arc::new(AtomicUsize::new(0));
    let (port, _) = EchoPort::new();
    let orchestrator = BatchOrchestrator::new(
        port,
        FixedGate {
            answer: false,
            consulted: consulted.clone(),
        },
        50,
    );

    let outcome = orchestrator.submit(ingested.records).await.unwrap();

    assert!(matches!(outcome, BatchOutcome::Completed(results) if results.len() == 50));
    assert_eq!(consulted.load(Ordering::SeqCst), 0);
}

/// Test that declining a large batch leaves the service untouched
///
/// Purpose: Validate that a decline aborts before any outbound request
/// Benefit: Accidental large submissions cost nothing to cancel
#[tokio::test]
async fn test_declined_large_batch_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_locations_csv(&dir, "sites.csv", 51);

    let ingested = ingest_file(&path).unwrap();
    let consulted = Arc::new(AtomicUsize::new(0));
    let (port, batch_calls) = EchoPort::new();
    let orchestrator = BatchOrchestrator::new(
        port,
        FixedGate {
            answer: false,
            consulted: consulted.clone(),
        },
        50,
    );

    let outcome = orchestrator.submit(ingested.records).await.unwrap();

    assert!(matches!(outcome, BatchOutcome::Declined));
    assert_eq!(consulted.load(Ordering::SeqCst), 1);
    assert_eq!(batch_calls.load(Ordering::SeqCst), 0);
}

/// Test the single-location flow including history recording
///
/// Purpose: Validate the single submission path plus its cache side effect
/// Benefit: Covers the workflow the interactive single command performs
#[tokio::test(start_paused = true)]
async fn test_single_flow_records_history() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("store.json");

    let (port, _) = EchoPort::new();
    let orchestrator = SingleLocationOrchestrator::new(port, 1200, Duration::from_millis(1500));

    let result = orchestrator.submit(36.1699, -115.1398).await.unwrap();
    assert!(result.solar_present);
    assert_eq!(result.buffer_size_sqft, Some(1200));

    let cache = HistoryCache::new(JsonFileStore::new(&store_path), "solar_history", 5);
    cache
        .record(HistoryEntry::new(36.1699, -115.1398, "2026-08-28T12:00:00Z"))
        .unwrap();
    cache
        .record(HistoryEntry::new(34.0522, -118.2437, "2026-08-28T12:01:00Z"))
        .unwrap();

    let entries = cache.load().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].lat, 34.0522);
    assert_eq!(entries[1].lat, 36.1699);
}

/// Test export fidelity over results produced by the pipeline
///
/// Purpose: Validate the CSV and JSON serializations of real pipeline output
/// Benefit: Export consumers see exactly one row/object per submitted record
#[tokio::test]
async fn test_batch_exports_cover_every_record() {
    let dir = TempDir::new().unwrap();
    let path = write_locations_csv(&dir, "sites.csv", 3);

    let ingested = ingest_file(&path).unwrap();
    let (port, _) = EchoPort::new();
    let orchestrator = BatchOrchestrator::new(
        port,
        FixedGate {
            answer: true,
            consulted: Arc::new(AtomicUsize::new(0)),
        },
        50,
    );

    let BatchOutcome::Completed(results) = orchestrator.submit(ingested.records).await.unwrap()
    else {
        panic!("expected completed outcome");
    };

    let csv = legacy_batch_csv(&results);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "user_id,solar_present,solar_area_m2,confidence,latitude,longitude"
    );
    assert!(lines[1].starts_with("site-0,true,"));
    assert!(lines[2].starts_with("site-1,false,"));

    let defaults = ExportDefaults::from_config(&Config::default());
    let json = batch_json(&results, &defaults, "2026-08-28T13:00:00Z").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let array = value.as_array().unwrap();

    assert_eq!(array.len(), 3);
    assert_eq!(array[0]["sample_id"], "site-0");
    assert_eq!(array[0]["model_version"], "maskrcnn-v1.0");
    assert_eq!(array[0]["buffer_size_sqft"], 1200);
    assert_eq!(array[0]["timestamp"], "2026-08-28T13:00:00Z");
}
