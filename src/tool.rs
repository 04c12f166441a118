//! Menu-driven CLI for loading, finding and removing bids

use std::{io, path::PathBuf, process::ExitCode};

use bidtable::{Bid, ChainedHashTable, DEFAULT_BID_KEY, DEFAULT_SIZE, Shell};
use clap::{ArgAction, Parser};
use tracing::{error, info};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

/// Installs the global tracing subscriber and bridges `log` records into it
///
/// The level comes from `-q`/`-v` and can be refined with the `BIDS_LOG`
/// environment variable.
fn init_tracing(quiet: bool, verbose: u8) -> Result<LevelFilter, String> {
    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Library code logs through the log crate
    tracing_log::LogTracer::init().map_err(|err| format!("failed to set log tracer: {err}"))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("BIDS_LOG")
        .from_env_lossy();

    let subscriber = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).compact());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| format!("setting default tracing subscriber failed: {err}"))?;

    Ok(level_filter)
}

/// Load a bid export into a chained hash table and query it from a menu
#[derive(Parser, Debug)]
#[command(name = "bids")]
#[command(about = "Load a bid export into a chained hash table and query it from a menu")]
struct ToolArgs {
    /// Suppress all log output except for errors. This overrides the -v flag.
    #[arg(short, long)]
    quiet: bool,

    /// Turn on verbose logging. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Number of buckets in the table
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// CSV file read by the load command
    #[arg(default_value = "eBid_Monthly_Sales.csv")]
    csv_path: PathBuf,

    /// Bid id used by find and remove when the menu line names none
    #[arg(default_value = DEFAULT_BID_KEY)]
    bid_key: String,
}

fn main() -> ExitCode {
    let args = ToolArgs::parse();

    let level_filter = match init_tracing(args.quiet, args.verbose) {
        Ok(level_filter) => level_filter,
        Err(msg) => {
            eprintln!("INTERNAL ERROR: {msg}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "starting {} {}, log level: {level_filter}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let table = match ChainedHashTable::<Bid>::with_size(args.size) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!("table has {} buckets, csv path {}", table.size(), args.csv_path.display());

    let mut shell = Shell::new(table, args.csv_path, args.bid_key);
    if let Err(err) = shell.run(io::stdin().lock(), &mut io::stdout().lock()) {
        error!("menu loop failed: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
