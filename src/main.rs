use clap::Parser;
use solarscan::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(args)) {
        Ok(()) => {
            // Success - the command has already reported its results
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Solarscan - Solar Panel Detection Client");
    println!("========================================");
    println!();
    println!("Submit geographic coordinates to a remote solar-panel detection service,");
    println!("singly or as a batch from a CSV/XLSX file, and export the results.");
    println!();
    println!("USAGE:");
    println!("    solarscan <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    single      Analyze one coordinate pair");
    println!("    batch       Analyze a batch of locations from a tabular file");
    println!("    history     Show recently analyzed coordinates");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Analyze a single location (Las Vegas):");
    println!("    solarscan single --lat 36.1699 --lon -115.1398");
    println!();
    println!("    # Analyze a batch and export both formats:");
    println!("    solarscan batch --input locations.csv --csv results.csv --json results.json");
    println!();
    println!("    # Skip the large-batch confirmation prompt:");
    println!("    solarscan batch --input locations.xlsx --yes");
    println!();
    println!("    # Show the five most recent queries:");
    println!("    solarscan history");
    println!();
    println!("For detailed help on any command, use:");
    println!("    solarscan <COMMAND> --help");
}
