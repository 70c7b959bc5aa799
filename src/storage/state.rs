//! Scalar ledger state.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::config::RECONCILE_INTERVAL_DAYS;
use crate::error_handling::StorageError;

const RECONCILE_STAMP_KEY: &str = "reconcile_stamp";

/// Schedules the first reconcile `RECONCILE_INTERVAL_DAYS` from now unless
/// the ledger already has a stamp, and returns the current one.
pub async fn init_reconcile_stamp(pool: &SqlitePool) -> Result<u64, StorageError> {
    let initial = (Utc::now() + Duration::days(RECONCILE_INTERVAL_DAYS)).timestamp();

    // Concurrent opens race here; INSERT OR IGNORE keeps the first writer.
    sqlx::query("INSERT OR IGNORE INTO ledger_state (key, value) VALUES (?, ?)")
        .bind(RECONCILE_STAMP_KEY)
        .bind(initial)
        .execute(pool)
        .await?;

    get_reconcile_stamp(pool).await
}

/// Returns the current reconcile stamp. Read-only; the stamp must have been
/// initialized with [`init_reconcile_stamp`].
pub async fn get_reconcile_stamp(pool: &SqlitePool) -> Result<u64, StorageError> {
    let stamp: i64 = sqlx::query_scalar("SELECT value FROM ledger_state WHERE key = ?")
        .bind(RECONCILE_STAMP_KEY)
        .fetch_one(pool)
        .await?;

    Ok(stamp.max(0) as u64)
}

/// Overwrites the reconcile stamp, starting a new reconcile period.
pub async fn set_reconcile_stamp(pool: &SqlitePool, stamp: u64) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO ledger_state (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(RECONCILE_STAMP_KEY)
    .bind(stamp as i64)
    .execute(pool)
    .await?;
    Ok(())
}
