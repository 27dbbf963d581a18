//! Shared helpers for Picklist integration tests.
//!
//! Tests run against in-memory `SQLite`. The pool is capped at one
//! connection: each `sqlite::memory:` connection is its own database, so a
//! wider pool would scatter state across databases.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use picklist_core::{OrderRecord, RawRow};

/// Open a fresh in-memory archive database.
///
/// # Panics
///
/// Panics if the in-memory database cannot be opened.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

/// A minimal raw row with the given identity fields.
#[must_use]
pub fn raw_row(
    original_index: usize,
    order_number: &str,
    customer: &str,
    postcode: &str,
    sku: &str,
) -> RawRow {
    RawRow {
        order_number: order_number.to_string(),
        customer_name: customer.to_string(),
        sku: sku.to_string(),
        quantity: 1,
        location: String::new(),
        buyer_postcode: postcode.to_string(),
        original_index,
        item_index: None,
        image_url: None,
        item_name: None,
        remaining_stock: None,
        order_value: None,
        file_date: None,
        channel_type: None,
        channel: None,
        width: None,
        weight: None,
        ship_from_location: None,
        package_dimension: None,
        notes: None,
    }
}

/// A minimal order record with the given identity fields.
#[must_use]
pub fn order_record(order_number: &str, customer: &str, sku: &str) -> OrderRecord {
    OrderRecord {
        order_number: order_number.to_string(),
        customer_name: customer.to_string(),
        sku: sku.to_string(),
        quantity: 1,
        location: String::new(),
        buyer_postcode: String::new(),
        image_url: None,
        item_name: None,
        remaining_stock: None,
        order_value: None,
        file_date: None,
        channel_type: None,
        channel: None,
        width: None,
        weight: None,
        ship_from_location: None,
        package_dimension: None,
        notes: None,
        completed: false,
    }
}
