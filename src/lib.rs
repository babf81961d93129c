//! Solarscan Library
//!
//! A Rust library for submitting geographic coordinates to a remote
//! solar-panel detection service and working with the returned results.
//!
//! This library provides tools for:
//! - Parsing heterogeneous tabular input (delimited text and spreadsheet
//!   binary) into a canonical location record set
//! - Resolving ambiguous column naming with an order-preserving heuristic
//! - Gating large batches behind an explicit confirmation step
//! - Issuing single and batch inference requests over HTTP
//! - Re-serializing result sets into CSV and JSON export formats
//! - Keeping a bounded cache of recently queried coordinates

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod export;
        pub mod history;
        pub mod inference;
        pub mod ingest;
        pub mod orchestrator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{HistoryEntry, InferenceResult, LocationRecord};
pub use app::services::ingest::columns::ColumnRole;
pub use config::Config;

/// Result type alias for solarscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the ingestion and orchestration pipeline
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file extension is not a supported tabular format
    #[error("unsupported input format '.{extension}' (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat { extension: String },

    /// Header resolution failed for a required column role
    #[error("input must contain a '{role}' column")]
    MissingColumn { role: ColumnRole },

    /// The parsed location record sequence was empty
    #[error("no valid locations found in input")]
    EmptyBatch,

    /// A latitude/longitude field did not parse as a number
    #[error("row {row}: non-numeric {role} value '{value}'")]
    NumericParse {
        row: usize,
        role: ColumnRole,
        value: String,
    },

    /// Spreadsheet workbook could not be decoded
    #[error("spreadsheet decoding error: {message}")]
    SpreadsheetDecode { message: String },

    /// Remote inference service unreachable or returned an unusable response
    #[error("inference service request failed: {message}")]
    Transport { message: String },

    /// A submission is already in flight on this orchestrator
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization error
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(role: ColumnRole) -> Self {
        Self::MissingColumn { role }
    }

    /// Create a numeric parse error for a row field
    pub fn numeric_parse(row: usize, role: ColumnRole, value: impl Into<String>) -> Self {
        Self::NumericParse {
            row,
            role,
            value: value.into(),
        }
    }

    /// Create a spreadsheet decoding error
    pub fn spreadsheet_decode(message: impl Into<String>) -> Self {
        Self::SpreadsheetDecode {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::SpreadsheetDecode {
            message: error.to_string(),
        }
    }
}
