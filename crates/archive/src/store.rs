//! SQLite-backed archive store.
//!
//! The archive is the only persistent, shared resource in the system. Every
//! successful load appends its orders here; duplicates are detected by the
//! composite `(order_number, sku, customer_name)` key and skipped silently,
//! which makes re-archiving the same source file idempotent.
//!
//! Dedup is enforced by a UNIQUE constraint with a conflict-ignoring insert
//! rather than a read-then-write existence check, so concurrent archive
//! calls for the identical record cannot double-insert.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use picklist_core::{ArchiveKey, OrderRecord, normalize_postcode};
use rust_decimal::Decimal;

use crate::error::RepositoryError;
use crate::model::{ArchiveStats, ArchivedOrder, LocalImageSource};

/// Records older than this are removed by the daily cleanup.
pub const RETENTION_DAYS: u32 = 30;

const LAST_CLEANUP_KEY: &str = "last_cleanup_date";

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS archived_orders (
    id TEXT PRIMARY KEY,
    order_number TEXT NOT NULL,
    sku TEXT NOT NULL,
    customer_name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    location TEXT NOT NULL DEFAULT '',
    buyer_postcode TEXT NOT NULL DEFAULT '',
    postcode_normalized TEXT NOT NULL DEFAULT '',
    customer_name_folded TEXT NOT NULL DEFAULT '',
    order_number_folded TEXT NOT NULL DEFAULT '',
    sku_folded TEXT NOT NULL DEFAULT '',
    item_name_folded TEXT NOT NULL DEFAULT '',
    image_url TEXT,
    item_name TEXT,
    remaining_stock INTEGER,
    order_value TEXT,
    channel_type TEXT,
    channel TEXT,
    width REAL,
    weight REAL,
    ship_from_location TEXT,
    package_dimension TEXT,
    notes TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    file_name TEXT NOT NULL,
    archived_at TEXT NOT NULL,
    file_date TEXT NOT NULL,
    local_image_sku TEXT,
    local_image_folder TEXT,
    UNIQUE (order_number, sku, customer_name)
);
CREATE INDEX IF NOT EXISTS idx_archived_orders_file_date ON archived_orders (file_date);
CREATE INDEX IF NOT EXISTS idx_archived_orders_file_name ON archived_orders (file_name);
CREATE TABLE IF NOT EXISTS archive_maintenance (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const SELECT_COLUMNS: &str = "
SELECT id, order_number, sku, customer_name, quantity, location, buyer_postcode,
       image_url, item_name, remaining_stock, order_value, channel_type, channel,
       width, weight, ship_from_location, package_dimension, notes, completed,
       file_name, archived_at, file_date, local_image_sku, local_image_folder
FROM archived_orders
";

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Current time in the archive's canonical ISO-8601 form (millisecond
/// precision, UTC `Z` suffix). All `file_date` values use this shape so
/// lexicographic comparison orders correctly.
fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Internal row type for archived order queries.
#[derive(Debug, sqlx::FromRow)]
struct ArchivedOrderRow {
    id: String,
    order_number: String,
    sku: String,
    customer_name: String,
    quantity: i64,
    location: String,
    buyer_postcode: String,
    image_url: Option<String>,
    item_name: Option<String>,
    remaining_stock: Option<i64>,
    order_value: Option<String>,
    channel_type: Option<String>,
    channel: Option<String>,
    width: Option<f64>,
    weight: Option<f64>,
    ship_from_location: Option<String>,
    package_dimension: Option<String>,
    notes: Option<String>,
    completed: bool,
    file_name: String,
    archived_at: String,
    file_date: String,
    local_image_sku: Option<String>,
    local_image_folder: Option<String>,
}

impl TryFrom<ArchivedOrderRow> for ArchivedOrder {
    type Error = RepositoryError;

    fn try_from(row: ArchivedOrderRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| RepositoryError::DataCorruption(format!("bad row id {}: {e}", row.id)))?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("bad quantity {}", row.quantity))
        })?;
        let order_value = row
            .order_value
            .map(|v| {
                v.parse::<Decimal>().map_err(|e| {
                    RepositoryError::DataCorruption(format!("bad order value {v}: {e}"))
                })
            })
            .transpose()?;
        let archived_at = DateTime::parse_from_rfc3339(&row.archived_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "bad archived_at {}: {e}",
                    row.archived_at
                ))
            })?;
        let local_image = match (row.local_image_sku, row.local_image_folder) {
            (Some(sku), Some(folder_name)) => Some(LocalImageSource { sku, folder_name }),
            _ => None,
        };

        Ok(Self {
            id,
            order: OrderRecord {
                order_number: row.order_number,
                customer_name: row.customer_name,
                sku: row.sku,
                quantity,
                location: row.location,
                buyer_postcode: row.buyer_postcode,
                image_url: row.image_url,
                item_name: row.item_name,
                remaining_stock: row.remaining_stock,
                order_value,
                file_date: Some(row.file_date.clone()),
                channel_type: row.channel_type,
                channel: row.channel,
                width: row.width,
                weight: row.weight,
                ship_from_location: row.ship_from_location,
                package_dimension: row.package_dimension,
                notes: row.notes,
                completed: row.completed,
            },
            file_name: row.file_name,
            archived_at,
            file_date: row.file_date,
            local_image,
        })
    }
}

fn collect(rows: Vec<ArchivedOrderRow>) -> Result<Vec<ArchivedOrder>, RepositoryError> {
    rows.into_iter().map(ArchivedOrder::try_from).collect()
}

/// Deduplicating, searchable store of archived orders.
///
/// Schema setup is lazy: the first operation initializes it once and later
/// operations reuse the handle. Cheap to clone.
#[derive(Clone)]
pub struct ArchiveIndex {
    pool: SqlitePool,
    init: std::sync::Arc<OnceCell<()>>,
}

impl ArchiveIndex {
    /// Create an archive index over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            init: std::sync::Arc::new(OnceCell::new()),
        }
    }

    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        self.init
            .get_or_try_init(|| async {
                sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
                debug!("archive schema ready");
                Ok::<(), RepositoryError>(())
            })
            .await?;
        Ok(())
    }

    /// Archive a batch of order records from one source file.
    ///
    /// Records whose composite key already exists are skipped silently; the
    /// return value counts newly inserted rows only, so re-archiving the same
    /// file returns 0. When `local_image_folder` is given, inserted rows keep
    /// a `(sku, folder)` back-reference for image restoration.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store is unavailable or the
    /// transaction fails. Callers in the picking flow treat this as
    /// best-effort: log and continue.
    #[instrument(skip(self, records), fields(file = %file_name, records = records.len()))]
    pub async fn archive(
        &self,
        records: &[OrderRecord],
        file_name: &str,
        local_image_folder: Option<&str>,
    ) -> Result<usize, RepositoryError> {
        self.ensure_schema().await?;

        let archived_at = iso_now();
        let mut inserted = 0usize;
        let mut tx = self.pool.begin().await?;
        for record in records {
            let key = ArchiveKey::from(record);
            let file_date = record.file_date.clone().unwrap_or_else(|| archived_at.clone());
            let result = sqlx::query(
                "INSERT INTO archived_orders (
                    id, order_number, sku, customer_name, quantity, location,
                    buyer_postcode, postcode_normalized,
                    customer_name_folded, order_number_folded, sku_folded,
                    item_name_folded, image_url, item_name,
                    remaining_stock, order_value, channel_type, channel, width,
                    weight, ship_from_location, package_dimension, notes,
                    completed, file_name, archived_at, file_date,
                    local_image_sku, local_image_folder
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (order_number, sku, customer_name) DO NOTHING",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(key.order_number)
            .bind(key.sku)
            .bind(key.customer_name)
            .bind(i64::from(record.quantity))
            .bind(&record.location)
            .bind(&record.buyer_postcode)
            .bind(normalize_postcode(&record.buyer_postcode))
            .bind(record.customer_name.to_lowercase())
            .bind(record.order_number.to_lowercase())
            .bind(record.sku.to_lowercase())
            .bind(
                record
                    .item_name
                    .as_deref()
                    .map(str::to_lowercase)
                    .unwrap_or_default(),
            )
            .bind(&record.image_url)
            .bind(&record.item_name)
            .bind(record.remaining_stock)
            .bind(record.order_value.as_ref().map(ToString::to_string))
            .bind(&record.channel_type)
            .bind(&record.channel)
            .bind(record.width)
            .bind(record.weight)
            .bind(&record.ship_from_location)
            .bind(&record.package_dimension)
            .bind(&record.notes)
            .bind(record.completed)
            .bind(file_name)
            .bind(&archived_at)
            .bind(&file_date)
            .bind(local_image_folder.map(|_| record.sku.as_str()))
            .bind(local_image_folder)
            .execute(&mut *tx)
            .await?;
            inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
        }
        tx.commit().await?;

        info!(
            inserted,
            skipped = records.len() - inserted,
            "archived order batch"
        );
        Ok(inserted)
    }

    /// Search the archive, case-insensitively, across customer name, order
    /// number, sku, and item name; the term also matches postcodes after
    /// whitespace/case normalization. The term is matched as-is apart from
    /// lowercasing, so interior or edge whitespace participates in the
    /// substring match. An empty term matches everything (export-all relies
    /// on this).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the query fails or a stored row does
    /// not parse.
    pub async fn search(&self, term: &str) -> Result<Vec<ArchivedOrder>, RepositoryError> {
        self.ensure_schema().await?;

        // SQLite's lower() only folds ASCII, so case folding happens in Rust
        // on both sides: the *_folded columns at insert, the needle here.
        let needle = term.to_lowercase();
        let postcode_needle = normalize_postcode(term);
        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE ?1 = ''
                OR instr(customer_name_folded, ?1) > 0
                OR instr(order_number_folded, ?1) > 0
                OR instr(sku_folded, ?1) > 0
                OR instr(item_name_folded, ?1) > 0
                OR (?2 <> '' AND instr(postcode_normalized, ?2) > 0)
             ORDER BY archived_at DESC, order_number"
        );
        let rows: Vec<ArchivedOrderRow> = sqlx::query_as(&sql)
            .bind(&needle)
            .bind(&postcode_needle)
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    /// Fetch records whose `file_date` falls within `[start, end]` inclusive.
    ///
    /// Bounds compare lexicographically, which is correct for ISO-8601
    /// strings of the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the query fails or a stored row does
    /// not parse.
    pub async fn query_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<ArchivedOrder>, RepositoryError> {
        self.ensure_schema().await?;

        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE file_date >= ?1 AND file_date <= ?2
             ORDER BY file_date, order_number"
        );
        let rows: Vec<ArchivedOrderRow> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    /// Aggregate archive figures, computed by full scan.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the query fails.
    pub async fn stats(&self) -> Result<ArchiveStats, RepositoryError> {
        self.ensure_schema().await?;

        let (total_orders, total_files, oldest_file_date, newest_file_date, last_updated): (
            i64,
            i64,
            Option<String>,
            Option<String>,
            Option<String>,
        ) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT file_name),
                    MIN(file_date), MAX(file_date), MAX(archived_at)
             FROM archived_orders",
        )
        .fetch_one(&self.pool)
        .await?;

        let last_updated = last_updated
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| {
                        RepositoryError::DataCorruption(format!("bad archived_at {s}: {e}"))
                    })
            })
            .transpose()?;

        Ok(ArchiveStats {
            total_orders,
            total_files,
            oldest_file_date,
            newest_file_date,
            last_updated,
        })
    }

    /// Delete records whose `file_date` is older than `days` days ago.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn purge_older_than(&self, days: u32) -> Result<u64, RepositoryError> {
        self.ensure_schema().await?;

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days)))
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let result = sqlx::query("DELETE FROM archived_orders WHERE file_date < ?1")
            .bind(&cutoff)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted, %cutoff, "purged old archive records");
        }
        Ok(deleted)
    }

    /// Run the daily retention cleanup if it has not already run today.
    ///
    /// Tracked by a persisted last-cleanup-date marker so at most one purge
    /// happens per calendar day regardless of how many loads occur. Returns
    /// the deleted count when a purge ran, `None` when skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the purge or the marker update fails.
    pub async fn maybe_run_daily_cleanup(&self) -> Result<Option<u64>, RepositoryError> {
        self.ensure_schema().await?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let last: Option<(String,)> =
            sqlx::query_as("SELECT value FROM archive_maintenance WHERE key = ?1")
                .bind(LAST_CLEANUP_KEY)
                .fetch_optional(&self.pool)
                .await?;
        if last.is_some_and(|(date,)| date == today) {
            debug!("daily cleanup already ran today");
            return Ok(None);
        }

        let deleted = self.purge_older_than(RETENTION_DAYS).await?;
        sqlx::query(
            "INSERT INTO archive_maintenance (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )
        .bind(LAST_CLEANUP_KEY)
        .bind(&today)
        .execute(&self.pool)
        .await?;

        Ok(Some(deleted))
    }
}
