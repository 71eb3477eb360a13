//! gno-deploy CLI - Deployment ordering for Gno packages.
//!
//! Scans a project directory, builds the package dependency graph, and
//! prints coupling metrics and a safe deployment order.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// gno-deploy: Dependency analysis and deployment ordering for Gno packages.
#[derive(Parser)]
#[command(name = "gno-deploy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to gno-deploy.yaml in the analyzed directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze dependencies and print the full report
    Analyze {
        /// Project directory to scan
        path: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Include per-package files, imports, and coupling numbers
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print only the deployment order
    Order {
        /// Project directory to scan
        path: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List groups of mutually dependent packages
    Cycles {
        /// Project directory to scan
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Analyze {
            path,
            format,
            detailed,
        } => cli::analyze::run(&path, config, &format, detailed),
        Commands::Order { path, format } => cli::order::run(&path, config, &format),
        Commands::Cycles { path } => cli::cycles::run(&path, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
