//! Structural keys for grouping and archive deduplication.
//!
//! Both keys were delimiter-joined strings in earlier versions of the system
//! (`customerName + "_" + postcode`), which collides when a customer name
//! contains the delimiter. Structural keys make the identity explicit.

use serde::{Deserialize, Serialize};

use super::order::{OrderRecord, RawRow, normalize_postcode};

/// Composite identity of an archived order line.
///
/// The `(order_number, sku, customer_name)` tuple is the load-bearing
/// deduplication contract for the archive; re-archiving a record with an
/// existing key is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveKey {
    pub order_number: String,
    pub sku: String,
    pub customer_name: String,
}

impl From<&OrderRecord> for ArchiveKey {
    fn from(record: &OrderRecord) -> Self {
        Self {
            order_number: record.order_number.clone(),
            sku: record.sku.clone(),
            customer_name: record.customer_name.clone(),
        }
    }
}

/// Bucketing key for order grouping.
///
/// Merge-grouping by customer + postcode takes precedence whenever the row
/// carries a non-empty postcode; rows without one fall back to classic
/// per-order-number grouping. Blank postcodes never merge unrelated orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Same customer, same normalized non-empty postcode.
    Merged {
        customer_name: String,
        normalized_postcode: String,
    },
    /// Same source order number and customer.
    Classic {
        order_number: String,
        customer_name: String,
    },
}

impl GroupKey {
    /// Compute the grouping key for a raw row.
    #[must_use]
    pub fn for_row(row: &RawRow) -> Self {
        let normalized = normalize_postcode(&row.buyer_postcode);
        if normalized.is_empty() {
            Self::Classic {
                order_number: row.order_number.clone(),
                customer_name: row.customer_name.clone(),
            }
        } else {
            Self::Merged {
                customer_name: row.customer_name.clone(),
                normalized_postcode: normalized,
            }
        }
    }
}
