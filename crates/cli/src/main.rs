//! Docver CLI - dv command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod util;

/// Docver - automatic version bookkeeping for structured documents
#[derive(Parser)]
#[command(name = "dv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a document (stamps version 1.0 and owner)
    Init {
        /// Document path (created empty if missing)
        path: PathBuf,
    },
    /// Process one save of a tracked document
    Save {
        /// Document path
        path: PathBuf,
    },
    /// Reset a document back to version 1.0
    Reset {
        /// Document path
        path: PathBuf,
    },
    /// Set an explicit version (normalized if malformed)
    Set {
        /// Document path
        path: PathBuf,
        /// Requested version, e.g. 2.0
        version: String,
    },
    /// Show a document's current metadata
    Show {
        /// Document path
        path: PathBuf,
        /// Emit JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Show a document's version history
    Log {
        /// Document path
        path: PathBuf,
        /// Number of entries to show (default: 20)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show repository configuration and identity diagnostics
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => cmd::init::run(&path).await,
        Commands::Save { path } => cmd::save::run(&path).await,
        Commands::Reset { path } => cmd::reset::run(&path).await,
        Commands::Set { path, version } => cmd::set::run(&path, &version).await,
        Commands::Show { path, json } => cmd::show::run(&path, json).await,
        Commands::Log { path, limit } => cmd::log::run(&path, limit).await,
        Commands::Config => cmd::config::run().await,
    }
}
