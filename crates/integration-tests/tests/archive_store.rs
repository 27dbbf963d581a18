//! Integration tests for the archive store: deduplication, search, date
//! ranges, purging, and the daily cleanup marker.

use chrono::{Duration, SecondsFormat, Utc};
use rust_decimal::Decimal;

use picklist_archive::{ArchiveIndex, RETENTION_DAYS};
use picklist_integration_tests::{memory_pool, order_record};

fn iso(offset_days: i64) -> String {
    (Utc::now() + Duration::days(offset_days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Deduplication
// =============================================================================

#[tokio::test]
async fn test_archive_is_idempotent_per_composite_key() {
    let index = ArchiveIndex::new(memory_pool().await);
    let records = vec![
        order_record("100", "J Smith", "X"),
        order_record("100", "J Smith", "Y"),
    ];

    let first = index
        .archive(&records, "file-a.csv", None)
        .await
        .expect("first archive");
    assert_eq!(first, 2);

    let second = index
        .archive(&records, "file-a.csv", None)
        .await
        .expect("second archive");
    assert_eq!(second, 0);

    let all = index.search("").await.expect("search all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_duplicate_from_second_file_is_skipped_first_file_wins() {
    let index = ArchiveIndex::new(memory_pool().await);
    let record = vec![order_record("5", "A B", "Z")];

    index
        .archive(&record, "monday.csv", None)
        .await
        .expect("first archive");
    let inserted = index
        .archive(&record, "tuesday.csv", None)
        .await
        .expect("second archive");
    assert_eq!(inserted, 0);

    let all = index.search("").await.expect("search all");
    assert_eq!(all.len(), 1);
    assert_eq!(
        all.first().map(|r| r.file_name.as_str()),
        Some("monday.csv")
    );
}

#[tokio::test]
async fn test_same_sku_different_order_numbers_both_stored() {
    let index = ArchiveIndex::new(memory_pool().await);
    let records = vec![
        order_record("100", "J Smith", "X"),
        order_record("200", "J Smith", "X"),
    ];

    let inserted = index
        .archive(&records, "file.csv", None)
        .await
        .expect("archive");
    assert_eq!(inserted, 2);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_empty_search_returns_every_record() {
    let index = ArchiveIndex::new(memory_pool().await);
    let records = vec![
        order_record("100", "J Smith", "X"),
        order_record("200", "K Jones", "Y"),
        order_record("300", "L Brown", "Z"),
    ];
    index
        .archive(&records, "file.csv", None)
        .await
        .expect("archive");

    let all = index.search("").await.expect("search all");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_fields() {
    let index = ArchiveIndex::new(memory_pool().await);
    let mut record = order_record("ORD-100", "J Smith", "WIDGET-BLUE");
    record.item_name = Some("Blue Widget".to_string());
    index
        .archive(&[record], "file.csv", None)
        .await
        .expect("archive");

    for term in ["j smith", "ord-100", "widget-blue", "blue widget"] {
        let matches = index.search(term).await.expect("search");
        assert_eq!(matches.len(), 1, "term {term:?} should match");
    }

    let none = index.search("nothing here").await.expect("search");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_search_folds_case_beyond_ascii() {
    let index = ArchiveIndex::new(memory_pool().await);
    let record = order_record("ORD-200", "ÖMER ÜNAL", "WIDGET-RED");
    index
        .archive(&[record], "file.csv", None)
        .await
        .expect("archive");

    // Case folding must cover the full alphabet, not just ASCII.
    for term in ["ÖMER", "ömer", "ünal", "Ünal"] {
        let matches = index.search(term).await.expect("search");
        assert_eq!(matches.len(), 1, "term {term:?} should match");
    }
}

#[tokio::test]
async fn test_search_preserves_whitespace_in_term() {
    let index = ArchiveIndex::new(memory_pool().await);
    index
        .archive(
            &[order_record("100", "J Smith", "X")],
            "file.csv",
            None,
        )
        .await
        .expect("archive");

    // Whitespace is part of the substring, not stripped.
    let matches = index.search(" smith").await.expect("search");
    assert_eq!(matches.len(), 1);
    let matches = index.search("smith ").await.expect("search");
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_search_normalizes_postcodes() {
    let index = ArchiveIndex::new(memory_pool().await);
    let mut record = order_record("100", "J Smith", "X");
    record.buyer_postcode = "ab1 2cd".to_string();
    index
        .archive(&[record], "file.csv", None)
        .await
        .expect("archive");

    // Differing case and spacing still match against the stored postcode.
    let matches = index.search("AB12CD").await.expect("search");
    assert_eq!(matches.len(), 1);
    let matches = index.search("b1 2c").await.expect("search");
    assert_eq!(matches.len(), 1);
}

// =============================================================================
// Date ranges and file dates
// =============================================================================

#[tokio::test]
async fn test_date_range_bounds_are_inclusive() {
    let index = ArchiveIndex::new(memory_pool().await);
    let start = "2024-01-01T00:00:00.000Z";
    let end = "2024-01-31T23:59:59.999Z";

    let mut on_start = order_record("100", "A", "X");
    on_start.file_date = Some(start.to_string());
    let mut on_end = order_record("200", "B", "Y");
    on_end.file_date = Some(end.to_string());
    let mut outside = order_record("300", "C", "Z");
    outside.file_date = Some("2024-02-01T00:00:00.000Z".to_string());

    index
        .archive(&[on_start, on_end, outside], "file.csv", None)
        .await
        .expect("archive");

    let in_range = index
        .query_by_date_range(start, end)
        .await
        .expect("date range");
    let numbers: Vec<&str> = in_range
        .iter()
        .map(|r| r.order.order_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["100", "200"]);
}

#[tokio::test]
async fn test_missing_file_date_defaults_to_archive_time() {
    let index = ArchiveIndex::new(memory_pool().await);
    index
        .archive(&[order_record("100", "A", "X")], "file.csv", None)
        .await
        .expect("archive");

    let all = index.search("").await.expect("search all");
    let record = all.first().expect("one record");
    // Defaulted file_date equals the archive timestamp's canonical form.
    assert_eq!(
        record.file_date,
        record
            .archived_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    );
}

// =============================================================================
// Stats
// =============================================================================

#[tokio::test]
async fn test_stats_counts_orders_and_distinct_files() {
    let index = ArchiveIndex::new(memory_pool().await);

    let empty = index.stats().await.expect("stats on empty store");
    assert_eq!(empty.total_orders, 0);
    assert_eq!(empty.total_files, 0);
    assert!(empty.oldest_file_date.is_none());
    assert!(empty.last_updated.is_none());

    let mut old = order_record("100", "A", "X");
    old.file_date = Some("2024-01-01T00:00:00.000Z".to_string());
    let mut new = order_record("200", "B", "Y");
    new.file_date = Some("2024-03-01T00:00:00.000Z".to_string());

    index.archive(&[old], "jan.csv", None).await.expect("archive");
    index
        .archive(&[new.clone()], "mar.csv", None)
        .await
        .expect("archive");
    // Duplicate file name must not inflate the distinct count.
    new.order_number = "201".to_string();
    index.archive(&[new], "mar.csv", None).await.expect("archive");

    let stats = index.stats().await.expect("stats");
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.total_files, 2);
    assert_eq!(
        stats.oldest_file_date.as_deref(),
        Some("2024-01-01T00:00:00.000Z")
    );
    assert_eq!(
        stats.newest_file_date.as_deref(),
        Some("2024-03-01T00:00:00.000Z")
    );
    assert!(stats.last_updated.is_some());
}

// =============================================================================
// Purging and daily cleanup
// =============================================================================

#[tokio::test]
async fn test_purge_removes_only_old_records() {
    let index = ArchiveIndex::new(memory_pool().await);

    let mut stale = order_record("100", "A", "X");
    stale.file_date = Some(iso(-45));
    let mut fresh = order_record("200", "B", "Y");
    fresh.file_date = Some(iso(-5));
    index
        .archive(&[stale, fresh], "file.csv", None)
        .await
        .expect("archive");

    let deleted = index.purge_older_than(30).await.expect("purge");
    assert_eq!(deleted, 1);

    let remaining = index.search("").await.expect("search all");
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining.first().map(|r| r.order.order_number.as_str()),
        Some("200")
    );
}

#[tokio::test]
async fn test_daily_cleanup_runs_at_most_once_per_day() {
    let index = ArchiveIndex::new(memory_pool().await);

    let mut stale = order_record("100", "A", "X");
    stale.file_date = Some(iso(-(i64::from(RETENTION_DAYS) + 15)));
    index
        .archive(&[stale], "file.csv", None)
        .await
        .expect("archive");

    let first = index.maybe_run_daily_cleanup().await.expect("cleanup");
    assert_eq!(first, Some(1));

    // Second invocation the same day is a no-op, even with new stale data.
    let mut more_stale = order_record("200", "B", "Y");
    more_stale.file_date = Some(iso(-(i64::from(RETENTION_DAYS) + 15)));
    index
        .archive(&[more_stale], "file.csv", None)
        .await
        .expect("archive");

    let second = index.maybe_run_daily_cleanup().await.expect("cleanup");
    assert_eq!(second, None);
    assert_eq!(index.search("").await.expect("search all").len(), 1);
}

// =============================================================================
// Round-tripping
// =============================================================================

#[tokio::test]
async fn test_archived_record_round_trips_fields() {
    let index = ArchiveIndex::new(memory_pool().await);
    let mut record = order_record("100", "J Smith", "X");
    record.quantity = 7;
    record.location = "Aisle 4".to_string();
    record.buyer_postcode = "AB1 2CD".to_string();
    record.order_value = Some(Decimal::new(1999, 2));
    record.width = Some(24.5);
    record.channel = Some("eBay".to_string());
    record.notes = Some("fragile".to_string());

    index
        .archive(&[record.clone()], "file.csv", Some("product-images"))
        .await
        .expect("archive");

    let all = index.search("").await.expect("search all");
    let stored = all.first().expect("one record");
    assert_eq!(stored.order.quantity, 7);
    assert_eq!(stored.order.location, "Aisle 4");
    assert_eq!(stored.order.buyer_postcode, "AB1 2CD");
    assert_eq!(stored.order.order_value, Some(Decimal::new(1999, 2)));
    assert_eq!(stored.order.width, Some(24.5));
    assert_eq!(stored.order.channel.as_deref(), Some("eBay"));
    assert_eq!(stored.order.notes.as_deref(), Some("fragile"));

    let image = stored.local_image.as_ref().expect("local image source");
    assert_eq!(image.sku, "X");
    assert_eq!(image.folder_name, "product-images");
}
