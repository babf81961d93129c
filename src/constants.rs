//! Application constants for solarscan
//!
//! This module contains all configuration defaults, fixed schema values,
//! and mappings used throughout the application.

// =============================================================================
// Inference Service Defaults
// =============================================================================

/// Default base address of the detection service
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Fixed area buffer passed with every single-location request, in square feet
pub const DEFAULT_BUFFER_SQFT: i64 = 1200;

/// Version string substituted when the service omits `model_version`
pub const DEFAULT_MODEL_VERSION: &str = "maskrcnn-v1.0";

/// Minimum latency floor before a single-location request is issued, in
/// milliseconds. Deliberate UX pacing, not a timeout.
pub const SINGLE_REQUEST_PACING_MS: u64 = 1500;

// =============================================================================
// Batch Policy
// =============================================================================

/// Record count above which a batch submission requires confirmation
pub const BATCH_CONFIRM_THRESHOLD: usize = 50;

// =============================================================================
// Input Formats
// =============================================================================

/// File extensions accepted as delimited text input
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv"];

/// File extensions accepted as spreadsheet binary input
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Marker substrings used to assign column roles, lower-cased
pub mod column_markers {
    pub const LATITUDE: &str = "lat";
    pub const LONGITUDE: &str = "lon";
    pub const IDENTIFIER: &str = "id";
}

/// Prefix for identifiers synthesized when no identifier column resolves
pub const SYNTHESIZED_ID_PREFIX: &str = "loc_";

// =============================================================================
// History Cache
// =============================================================================

/// Maximum number of recent queries retained
pub const HISTORY_CAPACITY: usize = 5;

/// Storage key under which the history list is persisted
pub const HISTORY_STORAGE_KEY: &str = "solar_history";

/// File name of the on-disk key-value store holding persisted state
pub const HISTORY_STORE_FILE: &str = "solarscan_store.json";

// =============================================================================
// Export Schemas
// =============================================================================

/// Header of the single-result CSV export
pub const SINGLE_CSV_HEADER: &str =
    "sample_id,latitude,longitude,solar_present,solar_area_m2,confidence";

/// Header of the legacy batch CSV export
pub const LEGACY_BATCH_CSV_HEADER: &str =
    "user_id,solar_present,solar_area_m2,confidence,latitude,longitude";
