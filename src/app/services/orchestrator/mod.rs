//! Submission orchestration
//!
//! Two orchestrators sit between the ingestion pipeline and the inference
//! port. The batch orchestrator walks a small state machine:
//!
//! ```text
//! Idle -> Validating -> (AwaitingConfirmation) -> Submitting -> Completed | Failed
//! ```
//!
//! Large batches are gated behind an external confirmation collaborator;
//! a decline returns to idle with no side effects performed. Submission is
//! all-or-nothing: one outbound request, no chunking, no retry, no partial
//! results. Both orchestrators carry a structural single-slot in-flight
//! guard so a re-entrant call path cannot issue overlapping requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::models::{InferenceResult, LocationRecord};
use crate::app::services::inference::InferencePort;
use crate::{Error, Result};

/// Observable state of a batch submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Validating,
    AwaitingConfirmation,
    Submitting,
    Completed,
    Failed,
}

/// Milestone schedule reported during a batch submission.
///
/// These are fixed UI milestones, not a measurement of actual transfer or
/// processing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchProgress {
    Started,
    Submitted,
    Completed,
}

/// Synchronous gate consulted before large batches are submitted
pub trait ConfirmationGate {
    /// Return true to proceed with a submission of `record_count` records
    fn confirm(&self, record_count: usize) -> bool;
}

/// Gate that approves every submission, for non-interactive callers
#[derive(Debug, Default)]
pub struct AlwaysConfirm;

impl ConfirmationGate for AlwaysConfirm {
    fn confirm(&self, _record_count: usize) -> bool {
        true
    }
}

/// Terminal outcome of a batch submission attempt
#[derive(Debug)]
pub enum BatchOutcome {
    /// The whole batch succeeded as one unit
    Completed(Vec<InferenceResult>),
    /// The confirmation gate was declined; zero outbound requests issued
    Declined,
}

/// Orchestrates validation, confirmation gating, and batch submission
pub struct BatchOrchestrator<P, G> {
    port: P,
    gate: G,
    confirm_threshold: usize,
    in_flight: AtomicBool,
    phase: Mutex<BatchPhase>,
}

impl<P: InferencePort, G: ConfirmationGate> BatchOrchestrator<P, G> {
    pub fn new(port: P, gate: G, confirm_threshold: usize) -> Self {
        Self {
            port,
            gate,
            confirm_threshold,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(BatchPhase::Idle),
        }
    }

    /// Current observable phase
    pub fn phase(&self) -> BatchPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    fn set_phase(&self, phase: BatchPhase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
        debug!("Batch orchestrator phase: {:?}", phase);
    }

    /// Submit a record sequence without progress reporting
    pub async fn submit(&self, records: Vec<LocationRecord>) -> Result<BatchOutcome> {
        self.submit_with_progress(records, |_| {}).await
    }

    /// Submit a record sequence, reporting milestone progress to `on_progress`.
    ///
    /// Fails with `SubmissionInFlight` when another submission is already
    /// running on this orchestrator.
    pub async fn submit_with_progress<F>(
        &self,
        records: Vec<LocationRecord>,
        on_progress: F,
    ) -> Result<BatchOutcome>
    where
        F: Fn(BatchProgress),
    {
        // Single-slot in-flight token: the only writer wins the swap
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!("Rejecting re-entrant batch submission");
            return Err(Error::SubmissionInFlight);
        }

        let outcome = self.run(records, on_progress).await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run<F>(&self, records: Vec<LocationRecord>, on_progress: F) -> Result<BatchOutcome>
    where
        F: Fn(BatchProgress),
    {
        self.set_phase(BatchPhase::Validating);
        on_progress(BatchProgress::Started);

        if records.is_empty() {
            self.set_phase(BatchPhase::Failed);
            return Err(Error::EmptyBatch);
        }

        if records.len() > self.confirm_threshold {
            self.set_phase(BatchPhase::AwaitingConfirmation);
            if !self.gate.confirm(records.len()) {
                info!("Batch of {} records declined at confirmation", records.len());
                self.set_phase(BatchPhase::Idle);
                return Ok(BatchOutcome::Declined);
            }
        }

        self.set_phase(BatchPhase::Submitting);
        info!("Submitting batch of {} records", records.len());
        on_progress(BatchProgress::Submitted);

        match self.port.infer_batch(&records).await {
            Ok(results) => {
                self.set_phase(BatchPhase::Completed);
                on_progress(BatchProgress::Completed);
                info!("Batch completed with {} results", results.len());
                Ok(BatchOutcome::Completed(results))
            }
            Err(e) => {
                self.set_phase(BatchPhase::Failed);
                Err(e)
            }
        }
    }
}

/// Orchestrates one single-location submission
pub struct SingleLocationOrchestrator<P> {
    port: P,
    buffer_sqft: i64,
    pacing: Duration,
    in_flight: AtomicBool,
}

impl<P: InferencePort> SingleLocationOrchestrator<P> {
    pub fn new(port: P, buffer_sqft: i64, pacing: Duration) -> Self {
        Self {
            port,
            buffer_sqft,
            pacing,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Analyze one coordinate pair.
    ///
    /// Imposes the fixed pacing delay before issuing exactly one request
    /// with the configured buffer constant. Failures surface as a generic
    /// unreachable-service error with no retry.
    pub async fn submit(&self, lat: f64, lon: f64) -> Result<InferenceResult> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!("Rejecting re-entrant single submission");
            return Err(Error::SubmissionInFlight);
        }

        let result = self.run(lat, lon).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run(&self, lat: f64, lon: f64) -> Result<InferenceResult> {
        // Deliberate UX pacing, not a timeout
        tokio::time::sleep(self.pacing).await;

        info!("Analyzing location ({}, {})", lat, lon);
        self.port
            .infer_single(lat, lon, self.buffer_sqft)
            .await
            .map_err(|e| {
                debug!("Single inference failed: {}", e);
                Error::transport("failed to analyze location, the service may be unreachable")
            })
    }
}
