//! Order grouping: turning a flat list of parsed rows into ordered records.
//!
//! Rows sharing a customer and a non-empty postcode merge into one logical
//! picking unit even across source order numbers; rows without a postcode
//! group classically by order number. Grouping never collapses rows into one
//! record; it assigns the shared effective order number and decides output
//! sequence. Output is deterministic for a given input: groups emit in order
//! of their earliest source row, rows within a group in item order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::key::GroupKey;
use crate::types::order::{OrderRecord, RawRow};

/// Separator used when a merged order spans several source order numbers.
const ORDER_NUMBER_SEPARATOR: &str = ", ";

/// Display-time classification of an order, re-derived from the grouped
/// list rather than stored on records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// One order number, one line.
    Single,
    /// One order number, more than one line.
    MultiItem,
    /// Several source order numbers merged by customer + postcode.
    Merged,
}

/// Accumulator for one group while bucketing rows.
struct GroupBucket {
    rows: Vec<RawRow>,
    /// Distinct source order numbers in first-seen order. Never sorted:
    /// the comma-joined effective number preserves discovery order.
    order_numbers: Vec<String>,
    /// Earliest source position among member rows; drives group output order.
    min_original_index: usize,
}

/// Group raw rows into order records.
///
/// Callers are expected to have run ingestion validation first; rows with an
/// empty customer name or sku are skipped here as a backstop and never enter
/// any group.
///
/// The output contains one [`OrderRecord`] per surviving row. Groups are
/// emitted by ascending minimum `original_index`, and rows within a group by
/// `item_index` (falling back to `original_index` for sources that assign no
/// item index, like the CSV path).
#[must_use]
pub fn group_rows(rows: Vec<RawRow>) -> Vec<OrderRecord> {
    let mut buckets: HashMap<GroupKey, GroupBucket> = HashMap::new();

    for row in rows {
        if !row.is_valid() {
            debug!(
                original_index = row.original_index,
                "skipping invalid row during grouping"
            );
            continue;
        }
        let key = GroupKey::for_row(&row);
        let bucket = buckets.entry(key).or_insert_with(|| GroupBucket {
            rows: Vec::new(),
            order_numbers: Vec::new(),
            min_original_index: usize::MAX,
        });
        if !bucket.order_numbers.contains(&row.order_number) {
            bucket.order_numbers.push(row.order_number.clone());
        }
        bucket.min_original_index = bucket.min_original_index.min(row.original_index);
        bucket.rows.push(row);
    }

    let mut groups: Vec<GroupBucket> = buckets.into_values().collect();
    // Restore source-file order at the group level; bucketing via the map
    // visited rows out of sequence.
    groups.sort_by_key(|group| group.min_original_index);

    let mut records = Vec::new();
    for mut group in groups {
        group
            .rows
            .sort_by_key(|row| (row.item_index.unwrap_or(row.original_index), row.original_index));
        let effective_order_number = group.order_numbers.join(ORDER_NUMBER_SEPARATOR);
        if group.order_numbers.len() > 1 {
            debug!(
                effective_order_number = %effective_order_number,
                rows = group.rows.len(),
                "merged order numbers by customer + postcode"
            );
        }
        for row in group.rows {
            records.push(OrderRecord::from_row(row, effective_order_number.clone()));
        }
    }
    records
}

/// Classify an order for display.
///
/// `records` is the full grouped list; `order_number` is the effective
/// number of the order being displayed. Merged orders are recognizable by
/// their composite number (grouping is the only producer of the separator);
/// multi-item orders by more than one record sharing the effective number.
#[must_use]
pub fn order_kind(records: &[OrderRecord], order_number: &str) -> OrderKind {
    if order_number.contains(ORDER_NUMBER_SEPARATOR) {
        return OrderKind::Merged;
    }
    let line_count = records
        .iter()
        .filter(|record| record.order_number == order_number)
        .count();
    if line_count > 1 {
        OrderKind::MultiItem
    } else {
        OrderKind::Single
    }
}
