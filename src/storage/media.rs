//! Media key → publisher bindings.

use sqlx::SqlitePool;

use super::panel::select_publisher;
use crate::error_handling::StorageError;
use crate::ledger::PublisherInfo;

/// Looks up the publisher bound to `media_key`.
///
/// Returns `Ok(None)` when there is no binding. A binding whose publisher has
/// no record yet is returned with only `id` set.
pub async fn get_media_publisher_info(
    pool: &SqlitePool,
    media_key: &str,
    reconcile_stamp: u64,
) -> Result<Option<PublisherInfo>, StorageError> {
    let publisher_id: Option<String> =
        sqlx::query_scalar("SELECT publisher_id FROM media_publisher_info WHERE media_key = ?")
            .bind(media_key)
            .fetch_optional(pool)
            .await?;

    let Some(publisher_id) = publisher_id else {
        return Ok(None);
    };

    let info = select_publisher(pool, &publisher_id, reconcile_stamp)
        .await?
        .unwrap_or(PublisherInfo {
            id: publisher_id,
            reconcile_stamp,
            ..Default::default()
        });
    Ok(Some(info))
}

/// Binds `media_key` to `publisher_key`; the last write wins.
pub async fn save_media_publisher_info(
    pool: &SqlitePool,
    media_key: &str,
    publisher_key: &str,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO media_publisher_info (media_key, publisher_id) VALUES (?, ?)
         ON CONFLICT(media_key) DO UPDATE SET publisher_id = excluded.publisher_id",
    )
    .bind(media_key)
    .bind(publisher_key)
    .execute(pool)
    .await?;
    Ok(())
}
