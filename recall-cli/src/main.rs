//! Recall CLI - command-line tools for record/replay fixture files.

mod commands;
mod observability;

use anyhow::Result;
use clap::{Parser, Subcommand};
use observability::{TracingConfig, init_tracing};
use std::path::PathBuf;

/// Recall - deterministic record/replay of cross-boundary calls.
#[derive(Parser)]
#[command(name = "recall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the fingerprint of call data
    Fingerprint {
        /// Call domain: module, db or http
        domain: String,

        /// Call data as JSON (read from stdin when omitted)
        #[arg(short, long)]
        data: Option<String>,

        /// Also print the canonical record that was hashed
        #[arg(short, long)]
        record: bool,
    },

    /// Load a fixture file and report problems
    Validate {
        /// Path to the JSON-lines fixture file
        file: PathBuf,

        /// Skip bad lines and entries instead of failing
        #[arg(long)]
        ignore_errors: bool,
    },

    /// Show the entries of a fixture file
    Inspect {
        /// Path to the JSON-lines fixture file
        file: PathBuf,

        /// Only show entries of this fixture type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Show version information
    Version,
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    init_tracing(&TracingConfig::from_env(filter))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Fingerprint {
            domain,
            data,
            record,
        } => commands::fingerprint::run(&domain, data.as_deref(), record),
        Commands::Validate {
            file,
            ignore_errors,
        } => commands::validate::run(&file, ignore_errors),
        Commands::Inspect { file, kind } => commands::inspect::run(&file, kind.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
