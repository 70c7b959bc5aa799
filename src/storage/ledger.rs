//! SQLite implementation of the ledger collaborator traits.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use psl::List;
use sqlx::SqlitePool;

use super::{media, panel, pool::init_db_pool_with_path, run_migrations, state, visits};
use crate::domain::extract_domain;
use crate::error_handling::StorageError;
use crate::ledger::{
    ActivityFilter, LedgerState, MediaPublisherStore, PanelInfoStore, PanelLookup,
    PublisherActivity, PublisherInfo, VisitStore,
};
use crate::visit::VisitData;

/// Ledger backed by a SQLite database.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: Arc<SqlitePool>,
}

impl SqliteLedger {
    /// Opens (creating if needed) the ledger at `db_path`, applies migrations
    /// and initializes the reconcile stamp.
    pub async fn open(db_path: &Path) -> Result<Self, StorageError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and initializes the reconcile stamp. Migrations
    /// must already be applied.
    pub async fn from_pool(pool: Arc<SqlitePool>) -> Result<Self, StorageError> {
        state::init_reconcile_stamp(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a new reconcile period.
    pub async fn set_reconcile_stamp(&self, stamp: u64) -> Result<(), StorageError> {
        state::set_reconcile_stamp(&self.pool, stamp).await
    }
}

#[async_trait]
impl MediaPublisherStore for SqliteLedger {
    async fn get_media_publisher_info(
        &self,
        media_key: &str,
    ) -> Result<Option<PublisherInfo>, StorageError> {
        let stamp = state::get_reconcile_stamp(&self.pool).await?;
        media::get_media_publisher_info(&self.pool, media_key, stamp).await
    }

    async fn save_media_publisher_info(
        &self,
        media_key: &str,
        publisher_key: &str,
    ) -> Result<(), StorageError> {
        media::save_media_publisher_info(&self.pool, media_key, publisher_key).await
    }
}

#[async_trait]
impl VisitStore for SqliteLedger {
    async fn save_video_visit(
        &self,
        publisher_key: &str,
        visit: &VisitData,
        duration: u64,
        window_id: u64,
    ) -> Result<Option<PublisherInfo>, StorageError> {
        let stamp = state::get_reconcile_stamp(&self.pool).await?;
        visits::save_video_visit(&self.pool, publisher_key, visit, duration, window_id, stamp)
            .await
    }
}

#[async_trait]
impl PanelInfoStore for SqliteLedger {
    async fn get_panel_publisher_info(
        &self,
        filter: &ActivityFilter,
    ) -> Result<PanelLookup, StorageError> {
        panel::get_panel_publisher_info(&self.pool, filter).await
    }
}

#[async_trait]
impl PublisherActivity for SqliteLedger {
    /// Credits the visit's registrable domain as a publisher of its own. The
    /// domain is derived from the visit URL when the caller left it empty.
    async fn get_publisher_activity_from_url(
        &self,
        window_id: u64,
        visit: &VisitData,
        media_key: &str,
    ) -> Result<(), StorageError> {
        let domain = if visit.domain.is_empty() {
            extract_domain(&List, &visit.url).map_err(|e| {
                StorageError::Backend(format!("visit for {} has no domain: {e}", visit.url))
            })?
        } else {
            visit.domain.clone()
        };
        let stamp = state::get_reconcile_stamp(&self.pool).await?;
        visits::save_video_visit(&self.pool, &domain, visit, 0, window_id, stamp).await?;
        if !media_key.is_empty() {
            media::save_media_publisher_info(&self.pool, media_key, &domain).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerState for SqliteLedger {
    async fn reconcile_stamp(&self) -> Result<u64, StorageError> {
        state::get_reconcile_stamp(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{count_rows, create_test_pool};

    async fn ledger() -> SqliteLedger {
        SqliteLedger::from_pool(Arc::new(create_test_pool().await))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_activity_from_url_credits_domain() {
        let ledger = ledger().await;
        let visit = VisitData {
            domain: "youtube.com".to_string(),
            name: "youtube".to_string(),
            url: "https://youtube.com".to_string(),
            path: "/".to_string(),
            ..Default::default()
        };
        ledger
            .get_publisher_activity_from_url(1, &visit, "")
            .await
            .unwrap();

        let stamp = ledger.reconcile_stamp().await.unwrap();
        let lookup = ledger
            .get_panel_publisher_info(&ActivityFilter::panel("youtube.com", stamp))
            .await
            .unwrap();
        assert!(lookup.is_hit());
        assert_eq!(lookup.info.unwrap().name, "youtube");
    }

    #[tokio::test]
    async fn test_activity_from_url_derives_missing_domain() {
        let ledger = ledger().await;
        let visit = VisitData {
            url: "https://m.youtube.com/feed".to_string(),
            ..Default::default()
        };
        ledger
            .get_publisher_activity_from_url(1, &visit, "youtube_abc")
            .await
            .unwrap();

        let bound = ledger.get_media_publisher_info("youtube_abc").await.unwrap();
        assert_eq!(bound.unwrap().id, "youtube.com");
    }

    #[tokio::test]
    async fn test_activity_from_url_rejects_empty_domain() {
        let ledger = ledger().await;
        let result = ledger
            .get_publisher_activity_from_url(1, &VisitData::default(), "")
            .await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }

    #[tokio::test]
    async fn test_visit_lands_in_current_period() {
        let ledger = ledger().await;
        ledger.set_reconcile_stamp(500).await.unwrap();
        let info = ledger
            .save_video_visit("pub1", &VisitData::default(), 9, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.reconcile_stamp, 500);
        assert_eq!(info.duration, 9);
    }

    #[tokio::test]
    async fn test_media_lookup_is_read_only() {
        let ledger = ledger().await;
        sqlx::query("DELETE FROM ledger_state")
            .execute(ledger.pool())
            .await
            .unwrap();

        // Without a stamp the read fails instead of scheduling a new period
        assert!(ledger.get_media_publisher_info("youtube_abc").await.is_err());
        assert_eq!(count_rows(ledger.pool(), "ledger_state").await, 0);
    }

    #[tokio::test]
    async fn test_open_creates_and_migrates() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let ledger = SqliteLedger::open(&dir.path().join("ledger.db"))
            .await
            .expect("Failed to open ledger");
        assert!(ledger
            .get_media_publisher_info("missing")
            .await
            .unwrap()
            .is_none());
    }
}
