//! Command-line argument definitions for solarscan
//!
//! This module defines the complete CLI interface using the clap derive
//! API. Each subcommand validates its own arguments before any work runs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BUFFER_SQFT, DELIMITED_EXTENSIONS, SPREADSHEET_EXTENSIONS,
};
use crate::{Error, Result};

/// CLI arguments for the solarscan coordinate analyzer
///
/// Submits geographic coordinates to a remote solar-panel detection
/// service, singly or as a batch drawn from a tabular file, and exports
/// the returned per-location results.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "solarscan",
    version,
    about = "Submit coordinates to a solar-panel detection service and export the results",
    long_about = "Submits geographic coordinates to a remote solar-panel detection service \
                  and works with the returned per-location results. Batches are read from \
                  delimited text (.csv) or spreadsheet binary (.xlsx/.xls) files with \
                  heuristic column detection, gated behind confirmation above 50 records, \
                  and exportable as legacy CSV or full-fidelity JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Analyze a single coordinate pair
    Single(SingleArgs),
    /// Analyze a batch of locations from a tabular file
    Batch(BatchArgs),
    /// Show recently analyzed coordinates
    History(HistoryArgs),
}

/// Arguments for the single command
#[derive(Debug, Clone, Parser)]
pub struct SingleArgs {
    /// Latitude of the target location
    ///
    /// Example: 36.1699 (Las Vegas)
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the target location
    ///
    /// Example: -115.1398 (Las Vegas); -118.2437 is Los Angeles
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub lon: f64,

    /// Area buffer around the coordinate, in square feet
    #[arg(
        long = "buffer-sqft",
        value_name = "SQFT",
        default_value_t = DEFAULT_BUFFER_SQFT,
        help = "Area buffer in sqft (1200 or 2400)"
    )]
    pub buffer_sqft: i64,

    /// Write the result as CSV to this file
    #[arg(long = "csv", value_name = "FILE")]
    pub csv_out: Option<PathBuf>,

    /// Write the result as JSON to this file
    #[arg(long = "json", value_name = "FILE")]
    pub json_out: Option<PathBuf>,

    /// Override the detection service base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the batch command
#[derive(Debug, Clone, Parser)]
pub struct BatchArgs {
    /// Input file with locations
    ///
    /// Delimited text (.csv) or spreadsheet binary (.xlsx/.xls). The header
    /// row must contain latitude and longitude columns; an identifier
    /// column is optional and detected by name.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Write the results as legacy batch CSV to this file
    #[arg(long = "csv", value_name = "FILE")]
    pub csv_out: Option<PathBuf>,

    /// Write the results as JSON to this file
    #[arg(long = "json", value_name = "FILE")]
    pub json_out: Option<PathBuf>,

    /// Proceed without prompting for large batches
    #[arg(short = 'y', long = "yes", help = "Assume yes at the large-batch confirmation")]
    pub assume_yes: bool,

    /// Override the detection service base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the history command
#[derive(Debug, Clone, Parser)]
pub struct HistoryArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl SingleArgs {
    /// Validate the single command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.buffer_sqft <= 0 {
            return Err(Error::configuration(
                "Buffer size must be greater than 0 sqft",
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl BatchArgs {
    /// Validate the batch command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }

        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "Input path is not a file: {}",
                self.input.display()
            )));
        }

        let extension = self
            .input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if !DELIMITED_EXTENSIONS.contains(&extension.as_str())
            && !SPREADSHEET_EXTENSIONS.contains(&extension.as_str())
        {
            return Err(Error::unsupported_format(extension));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl HistoryArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn batch_args(input: PathBuf) -> BatchArgs {
        BatchArgs {
            input,
            csv_out: None,
            json_out: None,
            assume_yes: false,
            api_url: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_batch_validation_accepts_supported_extensions() {
        let temp_dir = TempDir::new().unwrap();

        for name in ["locations.csv", "locations.xlsx", "locations.xls", "UPPER.CSV"] {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, "lat,lon\n1,2").unwrap();
            assert!(batch_args(path).validate().is_ok(), "{} should validate", name);
        }
    }

    #[test]
    fn test_batch_validation_rejects_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.txt");
        std::fs::write(&path, "lat,lon\n1,2").unwrap();

        let err = batch_args(path).validate().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_batch_validation_rejects_missing_file() {
        let err = batch_args(PathBuf::from("/nonexistent/locations.csv"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_single_validation_rejects_non_positive_buffer() {
        let mut args = SingleArgs {
            lat: 36.1699,
            lon: -115.1398,
            buffer_sqft: 1200,
            csv_out: None,
            json_out: None,
            api_url: None,
            verbose: 0,
            quiet: false,
        };
        assert!(args.validate().is_ok());

        args.buffer_sqft = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.csv");
        std::fs::write(&path, "lat,lon\n1,2").unwrap();

        let mut args = batch_args(path);
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_history_quiet_flag() {
        let args = Args::try_parse_from(["solarscan", "history", "--quiet"]).unwrap();

        match args.command {
            Some(Commands::History(history)) => {
                assert!(history.quiet);
                assert_eq!(history.get_log_level(), "error");
            }
            other => panic!("expected history command, got {:?}", other),
        }

        // Quiet and verbose are mutually exclusive, as on the other commands
        assert!(Args::try_parse_from(["solarscan", "history", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_args_parse_single() {
        let args = Args::try_parse_from([
            "solarscan", "single", "--lat", "36.1699", "--lon", "-115.1398",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Single(single)) => {
                assert_eq!(single.lat, 36.1699);
                assert_eq!(single.lon, -115.1398);
                assert_eq!(single.buffer_sqft, 1200);
            }
            other => panic!("expected single command, got {:?}", other),
        }
    }
}
