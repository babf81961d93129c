//! Configuration management and validation.
//!
//! The service address, batch policy, and history location are explicit
//! injected values rather than ambient globals. Configuration is assembled
//! in layers: built-in defaults, then environment variables, then CLI
//! overrides applied by the command layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::constants::{
    BATCH_CONFIRM_THRESHOLD, DEFAULT_API_BASE_URL, DEFAULT_BUFFER_SQFT, DEFAULT_MODEL_VERSION,
    HISTORY_CAPACITY, HISTORY_STORAGE_KEY, HISTORY_STORE_FILE, SINGLE_REQUEST_PACING_MS,
};
use crate::{Error, Result};

/// Environment variable overriding the service base address
pub const ENV_API_BASE_URL: &str = "SOLARSCAN_API_URL";

/// Environment variable overriding the history store path
pub const ENV_HISTORY_PATH: &str = "SOLARSCAN_HISTORY_PATH";

/// Runtime configuration for the ingestion and orchestration pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the detection service
    pub api_base_url: String,

    /// Area buffer sent with every single-location request, in square feet
    pub buffer_sqft: i64,

    /// Record count above which a batch submission requires confirmation
    pub batch_confirm_threshold: usize,

    /// Minimum latency floor before a single request is issued, in ms
    pub single_request_pacing_ms: u64,

    /// Version string substituted when the service omits `model_version`
    pub default_model_version: String,

    /// Path of the JSON key-value store backing the history cache
    pub history_store_path: PathBuf,

    /// Storage key under which the history list is persisted
    pub history_storage_key: String,

    /// Maximum number of recent queries retained
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            buffer_sqft: DEFAULT_BUFFER_SQFT,
            batch_confirm_threshold: BATCH_CONFIRM_THRESHOLD,
            single_request_pacing_ms: SINGLE_REQUEST_PACING_MS,
            default_model_version: DEFAULT_MODEL_VERSION.to_string(),
            history_store_path: default_history_store_path(),
            history_storage_key: HISTORY_STORAGE_KEY.to_string(),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl Config {
    /// Build a configuration from defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().trim_end_matches('/').to_string();
            }
        }

        if let Ok(path) = std::env::var(ENV_HISTORY_PATH) {
            if !path.trim().is_empty() {
                config.history_store_path = PathBuf::from(path.trim());
            }
        }

        debug!("Configuration from environment: {:?}", config);
        config
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::configuration("API base URL cannot be empty"));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(Error::configuration(format!(
                "API base URL must start with http:// or https://: {}",
                self.api_base_url
            )));
        }

        if self.buffer_sqft <= 0 {
            return Err(Error::configuration(
                "Buffer size must be greater than 0 sqft",
            ));
        }

        if self.history_capacity == 0 {
            return Err(Error::configuration(
                "History capacity must be greater than 0",
            ));
        }

        if self.history_storage_key.trim().is_empty() {
            return Err(Error::configuration("History storage key cannot be empty"));
        }

        Ok(())
    }
}

/// Default on-disk location of the key-value store backing the history cache
fn default_history_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("solarscan")
        .join(HISTORY_STORE_FILE)
}
