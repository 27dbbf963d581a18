//! Load command: validate, group, and optionally archive a row export.
//!
//! Archiving is best-effort: a failing store never fails the load. The
//! grouped order list is the primary output either way.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

use picklist_archive::{ArchiveIndex, create_pool};
use picklist_core::{IngestError, OrderRecord, RawRow, group_rows, order_kind, validate_rows};

use crate::config::ArchiveConfig;

/// Errors that can occur while loading a row export.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The rows file could not be read.
    #[error("Cannot read rows file: {0}")]
    Io(#[from] std::io::Error),

    /// The rows file is not valid row JSON.
    #[error("Cannot parse rows file: {0}")]
    Json(#[from] serde_json::Error),

    /// Ingestion produced nothing usable.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Load a JSON row export, validate and group it, and report the orders.
///
/// # Errors
///
/// Returns [`LoadError`] when the file cannot be read or parsed, or when
/// ingestion yields zero valid rows. Archive failures are logged only.
pub async fn run(rows_path: &Path, file_name: &str, archive: bool) -> Result<(), LoadError> {
    let raw = std::fs::read_to_string(rows_path)?;
    let rows: Vec<RawRow> = serde_json::from_str(&raw)?;
    let total = rows.len();

    let valid = validate_rows(rows)?;
    if valid.len() < total {
        warn!(dropped = total - valid.len(), "some rows were dropped");
    }

    let records = group_rows(valid);
    info!(
        file = %file_name,
        rows = total,
        records = records.len(),
        "grouped source rows into orders"
    );
    for record in &records {
        info!(
            order = %record.order_number,
            customer = %record.customer_name,
            sku = %record.sku,
            quantity = record.quantity,
            kind = ?order_kind(&records, &record.order_number),
            "order line"
        );
    }

    if archive {
        archive_best_effort(&records, file_name).await;
    }
    Ok(())
}

/// Archive the load, funnelling failures to the log instead of the caller.
async fn archive_best_effort(records: &[OrderRecord], file_name: &str) {
    let config = match ArchiveConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Archive skipped, bad configuration: {e}");
            return;
        }
    };
    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Archive skipped, store unavailable: {e}");
            return;
        }
    };
    let index = ArchiveIndex::new(pool);

    match index.archive(records, file_name, None).await {
        Ok(inserted) => info!(inserted, "archived load"),
        Err(e) => error!("Archiving failed (load unaffected): {e}"),
    }
    match index.maybe_run_daily_cleanup().await {
        Ok(Some(deleted)) => info!(deleted, "daily archive cleanup ran"),
        Ok(None) => {}
        Err(e) => error!("Daily archive cleanup failed: {e}"),
    }
}
