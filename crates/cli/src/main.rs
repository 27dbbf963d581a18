//! Picklist CLI - order loading, rule decisions, and archive maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Validate, group, and display a parsed row export
//! picklist load rows.json --file-name "orders-2024-01-15.csv"
//!
//! # The same, archiving the grouped orders (best-effort)
//! picklist load rows.json --file-name "orders-2024-01-15.csv" --archive
//!
//! # Apply packaging and box rules to grouped orders
//! picklist decide orders.json rules.json
//!
//! # Archive maintenance
//! picklist archive stats
//! picklist archive search "J Smith"
//! picklist archive purge --days 30
//! ```
//!
//! # Environment Variables
//!
//! - `PICKLIST_DATABASE_URL` - `SQLite` archive location
//!   (default: `sqlite:picklist-archive.db?mode=rwc`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "picklist")]
#[command(author, version, about = "Picklist CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and group a parsed row export into orders
    Load {
        /// Path to a JSON file holding the parsed rows
        rows: PathBuf,

        /// Source file name recorded with archived orders
        #[arg(short, long)]
        file_name: String,

        /// Archive the grouped orders (failures are logged, not fatal)
        #[arg(long)]
        archive: bool,
    },
    /// Apply packaging and box rules to grouped orders
    Decide {
        /// Path to a JSON file holding grouped order records
        orders: PathBuf,

        /// Path to a JSON file holding the rule set
        rules: PathBuf,
    },
    /// Archive maintenance
    Archive {
        #[command(subcommand)]
        action: ArchiveAction,
    },
}

#[derive(Subcommand)]
enum ArchiveAction {
    /// Show aggregate archive statistics
    Stats,
    /// Search archived orders
    Search {
        /// Search term (empty matches everything)
        #[arg(default_value = "")]
        term: String,
    },
    /// Delete records older than a retention window
    Purge {
        /// Retention window in days
        #[arg(short, long)]
        days: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Load {
            rows,
            file_name,
            archive,
        } => commands::load::run(&rows, &file_name, archive).await?,
        Commands::Decide { orders, rules } => commands::decide::run(&orders, &rules)?,
        Commands::Archive { action } => match action {
            ArchiveAction::Stats => commands::archive::stats().await?,
            ArchiveAction::Search { term } => commands::archive::search(&term).await?,
            ArchiveAction::Purge { days } => commands::archive::purge(days).await?,
        },
    }
    Ok(())
}
