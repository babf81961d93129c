//! Command implementations for the solarscan CLI
//!
//! This module contains the command execution logic, confirmation
//! prompting, progress reporting, and final report formatting.

use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::app::services::export::{
    batch_json, format_export_time, legacy_batch_csv, single_json, single_result_csv,
    ExportDefaults,
};
use crate::app::services::history::{HistoryCache, JsonFileStore};
use crate::app::services::inference::HttpInferenceClient;
use crate::app::services::ingest::ingest_file;
use crate::app::services::orchestrator::{
    BatchOrchestrator, BatchOutcome, BatchProgress, ConfirmationGate, SingleLocationOrchestrator,
};
use crate::cli::args::{Args, BatchArgs, Commands, HistoryArgs, SingleArgs};
use crate::config::Config;
use crate::{Error, HistoryEntry, InferenceResult, Result};

/// Dispatch the parsed command line to its implementation
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Single(single)) => run_single(single).await,
        Some(Commands::Batch(batch)) => run_batch(batch).await,
        Some(Commands::History(history)) => run_history(history),
        None => Ok(()),
    }
}

/// Set up structured logging based on CLI verbosity flags
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solarscan={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Build the runtime configuration: defaults, environment, CLI override
fn build_config(api_url: Option<&str>) -> Result<Config> {
    let mut config = Config::from_env();

    if let Some(url) = api_url {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }

    config.validate()?;
    Ok(config)
}

fn history_cache(config: &Config) -> HistoryCache<JsonFileStore> {
    HistoryCache::new(
        JsonFileStore::new(&config.history_store_path),
        config.history_storage_key.clone(),
        config.history_capacity,
    )
}

/// Confirmation gate backed by the interactive console
struct ConsoleGate {
    assume_yes: bool,
}

impl ConfirmationGate for ConsoleGate {
    fn confirm(&self, record_count: usize) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!(
            "You are about to process {} locations. This might take a while. Continue? [y/N] ",
            record_count
        );
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }

        answer.trim().to_lowercase().starts_with('y')
    }
}

async fn run_single(args: SingleArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);
    args.validate()?;

    let mut config = build_config(args.api_url.as_deref())?;
    config.buffer_sqft = args.buffer_sqft;

    info!("Analyzing ({}, {})", args.lat, args.lon);

    let client = HttpInferenceClient::new(&config);
    let orchestrator = SingleLocationOrchestrator::new(
        client,
        config.buffer_sqft,
        Duration::from_millis(config.single_request_pacing_ms),
    );

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Analyzing satellite data...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let result = orchestrator.submit(args.lat, args.lon).await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let result = result?;

    // Every successful submission lands in the recent-queries cache
    let cache = history_cache(&config);
    let recorded = cache.record(HistoryEntry::new(
        args.lat,
        args.lon,
        format_export_time(Utc::now()),
    ));
    if let Err(e) = recorded {
        warn!("Could not record history entry: {}", e);
    }

    print_single_report(&result);

    let defaults = ExportDefaults::from_config(&config);
    if let Some(path) = &args.csv_out {
        write_export(path, &single_result_csv(&result))?;
        println!("CSV written to {}", path.display());
    }
    if let Some(path) = &args.json_out {
        let export_time = format_export_time(Utc::now());
        write_export(path, &single_json(&result, &defaults, &export_time)?)?;
        println!("JSON written to {}", path.display());
    }

    Ok(())
}

async fn run_batch(args: BatchArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);
    args.validate()?;

    let config = build_config(args.api_url.as_deref())?;

    let ingested = ingest_file(&args.input)?;
    if ingested.stats.rows_skipped > 0 {
        println!(
            "{}",
            format!(
                "Skipped {} row(s) with unparseable coordinates:",
                ingested.stats.rows_skipped
            )
            .yellow()
        );
        for error in &ingested.stats.errors {
            println!("  {}", error.yellow());
        }
    }

    let client = HttpInferenceClient::new(&config);
    let gate = ConsoleGate {
        assume_yes: args.assume_yes,
    };
    let orchestrator = BatchOrchestrator::new(client, gate, config.batch_confirm_threshold);

    let progress_bar = if args.show_progress() {
        let pb = ProgressBar::new(3);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Validating locations...");
        Some(pb)
    } else {
        None
    };

    let outcome = orchestrator
        .submit_with_progress(ingested.records, |milestone| {
            if let Some(pb) = &progress_bar {
                // Milestone schedule only; this does not measure transfer progress
                match milestone {
                    BatchProgress::Started => {
                        pb.set_position(1);
                        pb.set_message("Validating locations...");
                    }
                    BatchProgress::Submitted => {
                        pb.set_position(2);
                        pb.set_message("Waiting for the detection service...");
                    }
                    BatchProgress::Completed => {
                        pb.set_position(3);
                    }
                }
            }
        })
        .await;

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let results = match outcome? {
        BatchOutcome::Completed(results) => results,
        BatchOutcome::Declined => {
            println!("{}", "Batch cancelled; no request was sent.".yellow());
            return Ok(());
        }
    };

    print_batch_report(&results);

    let defaults = ExportDefaults::from_config(&config);
    if let Some(path) = &args.csv_out {
        write_export(path, &legacy_batch_csv(&results))?;
        println!("CSV written to {}", path.display());
    }
    if let Some(path) = &args.json_out {
        let export_time = format_export_time(Utc::now());
        write_export(path, &batch_json(&results, &defaults, &export_time)?)?;
        println!("JSON written to {}", path.display());
    }

    Ok(())
}

fn run_history(args: HistoryArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);

    let config = build_config(None)?;
    let entries = history_cache(&config).load()?;

    if entries.is_empty() {
        println!("No recent queries.");
        return Ok(());
    }

    println!("{}", "Recent queries (newest first):".bold());
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {}, {}  ({})", i + 1, entry.lat, entry.lon, entry.date);
    }

    Ok(())
}

fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
        }
    }

    std::fs::write(path, content)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
}

fn print_single_report(result: &InferenceResult) {
    println!();
    if result.solar_present {
        let confidence = result
            .confidence
            .map(|c| format!(" ({:.0}% confidence)", c * 100.0))
            .unwrap_or_default();
        println!("Solar panels: {}{}", "DETECTED".green().bold(), confidence);
    } else {
        println!("Solar panels: {}", "NOT DETECTED".dimmed());
    }

    println!("Estimated PV area: {} m2", result.solar_area_m2);
    if let Some(qc) = &result.qc_status {
        println!("QC status: {}", qc);
    }
    println!("Sample ID: {}", result.sample_id);
    if let Some(timestamp) = &result.timestamp {
        println!("Time: {}", timestamp);
    }
    if let Some(paths) = &result.artifact_paths {
        println!("Overlay: {}", paths.overlay);
        println!("Original: {}", paths.original);
    }
}

fn print_batch_report(results: &[InferenceResult]) {
    println!();
    println!("{}", format!("Results ({})", results.len()).bold());
    println!("{:<20} {:>10} {:>12} {:>12}", "ID", "DETECTED", "AREA (m2)", "CONFIDENCE");

    for result in results {
        let detected = if result.solar_present {
            "YES".green()
        } else {
            "NO".dimmed()
        };
        let confidence = result
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<20} {:>10} {:>12} {:>12}",
            result.sample_id, detected, result.solar_area_m2, confidence
        );
    }

    let detected_count = results.iter().filter(|r| r.solar_present).count();
    println!(
        "\n{} of {} locations have solar panels",
        detected_count.to_string().green().bold(),
        results.len()
    );
}
