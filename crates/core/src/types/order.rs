//! Order row and record types.
//!
//! A [`RawRow`] is one parsed line from a source export (CSV/HTML/sheet) with
//! its position metadata attached during extraction. Grouping turns raw rows
//! into [`OrderRecord`]s carrying the effective (possibly merged) order
//! number. One record per source row; grouping never collapses rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalize a postcode for comparison: strip all whitespace, uppercase.
///
/// Display values stay unnormalized; this form is only used for grouping
/// keys and archive search.
#[must_use]
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// One parsed row from a source file, before grouping.
///
/// `original_index` is the row's position in the source file;
/// `item_index` (when the parser assigns one) is its position among rows of
/// the same source order. Both are assigned during extraction, before
/// grouping, and drive the deterministic output ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    pub order_number: String,
    pub customer_name: String,
    pub sku: String,
    pub quantity: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub buyer_postcode: String,
    pub original_index: usize,
    #[serde(default)]
    pub item_index: Option<usize>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub remaining_stock: Option<i64>,
    #[serde(default)]
    pub order_value: Option<Decimal>,
    /// ISO-8601 date of the source file, when the export carries one.
    #[serde(default)]
    pub file_date: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    /// Item width in centimetres.
    #[serde(default)]
    pub width: Option<f64>,
    /// Item weight in grams.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub ship_from_location: Option<String>,
    #[serde(default)]
    pub package_dimension: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawRow {
    /// Whether the row carries the fields required for it to become an order
    /// record. Rows failing this are dropped at ingestion.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.customer_name.trim().is_empty() && !self.sku.trim().is_empty()
    }
}

/// One line item within a (possibly merged) order.
///
/// `order_number` may be a comma-joined composite when merge-grouping
/// collapsed several source order numbers into one picking unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_number: String,
    pub customer_name: String,
    pub sku: String,
    pub quantity: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub buyer_postcode: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub remaining_stock: Option<i64>,
    #[serde(default)]
    pub order_value: Option<Decimal>,
    #[serde(default)]
    pub file_date: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub ship_from_location: Option<String>,
    #[serde(default)]
    pub package_dimension: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl OrderRecord {
    /// Build a record from a raw row, stamping the effective order number
    /// decided by grouping.
    #[must_use]
    pub fn from_row(row: RawRow, effective_order_number: String) -> Self {
        Self {
            order_number: effective_order_number,
            customer_name: row.customer_name,
            sku: row.sku,
            quantity: row.quantity,
            location: row.location,
            buyer_postcode: row.buyer_postcode,
            image_url: row.image_url,
            item_name: row.item_name,
            remaining_stock: row.remaining_stock,
            order_value: row.order_value,
            file_date: row.file_date,
            channel_type: row.channel_type,
            channel: row.channel,
            width: row.width,
            weight: row.weight,
            ship_from_location: row.ship_from_location,
            package_dimension: row.package_dimension,
            notes: row.notes,
            completed: false,
        }
    }
}
