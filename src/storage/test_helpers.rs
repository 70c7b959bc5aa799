//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage module tests.

#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a bare publisher record.
#[cfg(test)]
pub async fn insert_test_publisher(pool: &SqlitePool, publisher_id: &str, name: &str) {
    sqlx::query(
        "INSERT INTO publisher_info (publisher_id, name, url, provider) VALUES (?, ?, ?, ?)",
    )
    .bind(publisher_id)
    .bind(name)
    .bind(format!("https://www.youtube.com/channel/{publisher_id}/videos"))
    .bind("youtube")
    .execute(pool)
    .await
    .expect("Failed to insert test publisher");
}

/// Inserts an activity row for a publisher and reconcile period.
#[cfg(test)]
pub async fn insert_test_activity(
    pool: &SqlitePool,
    publisher_id: &str,
    reconcile_stamp: i64,
    duration: i64,
    visits: i64,
) {
    sqlx::query(
        "INSERT INTO activity_info (publisher_id, reconcile_stamp, duration, visits) VALUES (?, ?, ?, ?)",
    )
    .bind(publisher_id)
    .bind(reconcile_stamp)
    .bind(duration)
    .bind(visits)
    .execute(pool)
    .await
    .expect("Failed to insert test activity");
}

/// Counts the rows of a table.
#[cfg(test)]
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
