//! Archive maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! picklist archive stats
//! picklist archive search "AB1 2CD"
//! picklist archive purge --days 30
//! ```

use thiserror::Error;
use tracing::info;

use picklist_archive::{ArchiveIndex, RepositoryError, create_pool};

use crate::config::{ArchiveConfig, ConfigError};

/// Errors that can occur during archive maintenance.
#[derive(Debug, Error)]
pub enum ArchiveCommandError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store could not be opened.
    #[error("Cannot open archive store: {0}")]
    Connect(#[from] sqlx::Error),

    /// A store operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

async fn open_index() -> Result<ArchiveIndex, ArchiveCommandError> {
    let config = ArchiveConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    Ok(ArchiveIndex::new(pool))
}

/// Report aggregate archive statistics.
///
/// # Errors
///
/// Returns [`ArchiveCommandError`] if the store cannot be opened or queried.
pub async fn stats() -> Result<(), ArchiveCommandError> {
    let index = open_index().await?;
    let stats = index.stats().await?;

    info!(
        total_orders = stats.total_orders,
        total_files = stats.total_files,
        oldest_file_date = stats.oldest_file_date.as_deref().unwrap_or("-"),
        newest_file_date = stats.newest_file_date.as_deref().unwrap_or("-"),
        last_updated = %stats
            .last_updated
            .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
        "archive statistics"
    );
    Ok(())
}

/// Search the archive and report matching records.
///
/// An empty term matches every record.
///
/// # Errors
///
/// Returns [`ArchiveCommandError`] if the store cannot be opened or queried.
pub async fn search(term: &str) -> Result<(), ArchiveCommandError> {
    let index = open_index().await?;
    let matches = index.search(term).await?;

    info!(term = %term, matches = matches.len(), "archive search");
    for record in &matches {
        info!(
            order = %record.order.order_number,
            customer = %record.order.customer_name,
            sku = %record.order.sku,
            file = %record.file_name,
            file_date = %record.file_date,
            "match"
        );
    }
    Ok(())
}

/// Delete records older than the given retention window.
///
/// # Errors
///
/// Returns [`ArchiveCommandError`] if the store cannot be opened or the
/// delete fails.
pub async fn purge(days: u32) -> Result<(), ArchiveCommandError> {
    let index = open_index().await?;
    let deleted = index.purge_older_than(days).await?;
    info!(deleted, days, "archive purge complete");
    Ok(())
}
