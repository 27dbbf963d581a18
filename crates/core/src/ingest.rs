//! Ingestion validation for parsed rows.
//!
//! Parsers (CSV/HTML/sheet sync) hand over whatever they managed to extract;
//! this module drops rows that cannot become order records and fails the
//! whole ingestion only when nothing survives.

use thiserror::Error;
use tracing::warn;

use crate::types::order::RawRow;

/// Errors surfaced to the caller when an ingestion cannot proceed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source parsed to zero rows.
    #[error("source contained no rows")]
    EmptySource,

    /// Every row was dropped during validation. The message lists what was
    /// missing so the operator can fix the export or the column mapping.
    #[error("no valid rows in source: {total} rows dropped ({missing_customer} missing customer name, {missing_sku} missing sku)")]
    NoValidRows {
        total: usize,
        missing_customer: usize,
        missing_sku: usize,
    },
}

/// Validate parsed rows, dropping those missing a customer name or sku.
///
/// Dropping is per-row and non-fatal: a warning is logged and ingestion
/// continues. Dropped rows never reach grouping or the archive.
///
/// # Errors
///
/// [`IngestError::EmptySource`] when `rows` is empty, and
/// [`IngestError::NoValidRows`] when validation drops every row.
pub fn validate_rows(rows: Vec<RawRow>) -> Result<Vec<RawRow>, IngestError> {
    if rows.is_empty() {
        return Err(IngestError::EmptySource);
    }

    let total = rows.len();
    let mut missing_customer = 0usize;
    let mut missing_sku = 0usize;

    let valid: Vec<RawRow> = rows
        .into_iter()
        .filter(|row| {
            let no_customer = row.customer_name.trim().is_empty();
            let no_sku = row.sku.trim().is_empty();
            if no_customer {
                missing_customer += 1;
            }
            if no_sku {
                missing_sku += 1;
            }
            if no_customer || no_sku {
                warn!(
                    original_index = row.original_index,
                    order_number = %row.order_number,
                    missing_customer = no_customer,
                    missing_sku = no_sku,
                    "dropping row with missing required field"
                );
                false
            } else {
                true
            }
        })
        .collect();

    if valid.is_empty() {
        return Err(IngestError::NoValidRows {
            total,
            missing_customer,
            missing_sku,
        });
    }
    Ok(valid)
}
