//! Domain types stored in the archive.

use chrono::{DateTime, Utc};
use picklist_core::OrderRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Back-reference to a locally-sourced product image, kept so the UI can
/// restore images from a re-granted folder handle after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalImageSource {
    pub sku: String,
    pub folder_name: String,
}

/// An immutable archived copy of an order record.
///
/// Identity for deduplication is the `(order_number, sku, customer_name)`
/// tuple of the embedded order, not `id`; `id` only names the stored row.
/// `file_date` is always present (defaulted to the archive time when the
/// source export carried none) and kept as an ISO-8601 string so date-range
/// queries can compare lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedOrder {
    pub id: Uuid,
    pub order: OrderRecord,
    pub file_name: String,
    pub archived_at: DateTime<Utc>,
    pub file_date: String,
    #[serde(default)]
    pub local_image: Option<LocalImageSource>,
}

/// Aggregate figures for the whole archive, computed by full scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveStats {
    pub total_orders: i64,
    /// Distinct source file names.
    pub total_files: i64,
    pub oldest_file_date: Option<String>,
    pub newest_file_date: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}
