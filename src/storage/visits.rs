//! Visit and duration persistence.

use sqlx::SqlitePool;

use super::panel::select_publisher;
use crate::error_handling::StorageError;
use crate::ledger::PublisherInfo;
use crate::visit::VisitData;

/// Creates or updates the publisher record for `publisher_key` and adds one
/// visit of `duration` seconds to its activity in the given reconcile period.
///
/// Provider is overwritten with the visit's value. Name, URL and favicon are
/// only replaced by non-empty ones, so duration updates keep the page data.
pub async fn save_video_visit(
    pool: &SqlitePool,
    publisher_key: &str,
    visit: &VisitData,
    duration: u64,
    window_id: u64,
    reconcile_stamp: u64,
) -> Result<Option<PublisherInfo>, StorageError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO publisher_info (publisher_id, name, url, provider, favicon_url)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(publisher_id) DO UPDATE SET
             name = CASE
                 WHEN excluded.name != '' THEN excluded.name
                 ELSE publisher_info.name
             END,
             url = CASE
                 WHEN excluded.url != '' THEN excluded.url
                 ELSE publisher_info.url
             END,
             provider = excluded.provider,
             favicon_url = CASE
                 WHEN excluded.favicon_url != '' THEN excluded.favicon_url
                 ELSE publisher_info.favicon_url
             END",
    )
    .bind(publisher_key)
    .bind(&visit.name)
    .bind(&visit.url)
    .bind(&visit.provider)
    .bind(&visit.favicon_url)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO activity_info (publisher_id, reconcile_stamp, duration, visits, last_window_id)
         VALUES (?, ?, ?, 1, ?)
         ON CONFLICT(publisher_id, reconcile_stamp) DO UPDATE SET
             duration = activity_info.duration + excluded.duration,
             visits = activity_info.visits + 1,
             last_window_id = excluded.last_window_id",
    )
    .bind(publisher_key)
    .bind(reconcile_stamp as i64)
    .bind(duration as i64)
    .bind(window_id as i64)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    select_publisher(pool, publisher_key, reconcile_stamp).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{count_rows, create_test_pool};

    fn visit(name: &str, favicon: &str) -> VisitData {
        VisitData {
            name: name.to_string(),
            url: "https://www.youtube.com/channel/UC1/videos".to_string(),
            provider: "youtube".to_string(),
            favicon_url: favicon.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_video_visit_creates_publisher() {
        let pool = create_test_pool().await;
        let info = save_video_visit(&pool, "pub1", &visit("Channel", ""), 0, 3, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.id, "pub1");
        assert_eq!(info.name, "Channel");
        assert_eq!(info.url, "https://www.youtube.com/channel/UC1/videos");
        assert_eq!(info.provider, "youtube");
        assert_eq!(info.visits, 1);
        assert_eq!(info.duration, 0);
    }

    #[tokio::test]
    async fn test_save_video_visit_accumulates_duration() {
        let pool = create_test_pool().await;
        save_video_visit(&pool, "pub1", &visit("Channel", ""), 12, 1, 10)
            .await
            .unwrap();
        let info = save_video_visit(&pool, "pub1", &visit("Channel", ""), 30, 1, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.duration, 42);
        assert_eq!(info.visits, 2);
        assert_eq!(count_rows(&pool, "publisher_info").await, 1);
        assert_eq!(count_rows(&pool, "activity_info").await, 1);
    }

    #[tokio::test]
    async fn test_save_video_visit_new_period_starts_fresh() {
        let pool = create_test_pool().await;
        save_video_visit(&pool, "pub1", &visit("Channel", ""), 12, 1, 10)
            .await
            .unwrap();
        let info = save_video_visit(&pool, "pub1", &visit("Channel", ""), 5, 1, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.duration, 5);
        assert_eq!(count_rows(&pool, "activity_info").await, 2);
    }

    #[tokio::test]
    async fn test_save_video_visit_keeps_favicon_when_empty() {
        let pool = create_test_pool().await;
        save_video_visit(&pool, "pub1", &visit("Channel", "https://yt/icon.png"), 0, 1, 10)
            .await
            .unwrap();
        let info = save_video_visit(&pool, "pub1", &visit("Renamed", ""), 0, 1, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.favicon_url, "https://yt/icon.png");
        assert_eq!(info.name, "Renamed");
    }

    #[tokio::test]
    async fn test_save_video_visit_keeps_page_data_when_empty() {
        let pool = create_test_pool().await;
        save_video_visit(&pool, "pub1", &visit("Channel", ""), 0, 1, 10)
            .await
            .unwrap();
        let update = VisitData {
            provider: "youtube".to_string(),
            ..Default::default()
        };
        let info = save_video_visit(&pool, "pub1", &update, 25, 1, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.url, "https://www.youtube.com/channel/UC1/videos");
        assert_eq!(info.name, "Channel");
        assert_eq!(info.duration, 25);
    }
}
