//! Collaborator interfaces consumed by the attribution pipeline.
//!
//! One trait per storage concern, so a backend can be swapped or faked one
//! operation at a time. All of them are injected as `Arc<dyn _>`.

use async_trait::async_trait;

use super::types::{ActivityFilter, LedgerResult, PanelLookup, PublisherInfo};
use crate::error_handling::StorageError;
use crate::visit::VisitData;

/// Persistent media key → publisher mapping.
#[async_trait]
pub trait MediaPublisherStore: Send + Sync {
    /// Returns the publisher bound to `media_key`, or `Ok(None)` if there is
    /// no binding yet.
    async fn get_media_publisher_info(
        &self,
        media_key: &str,
    ) -> Result<Option<PublisherInfo>, StorageError>;

    /// Binds `media_key` to `publisher_key`. Rebinding the same pair is a no-op.
    async fn save_media_publisher_info(
        &self,
        media_key: &str,
        publisher_key: &str,
    ) -> Result<(), StorageError>;
}

/// Visit and duration persistence.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Creates or updates the publisher record and adds `duration` seconds of
    /// activity in the current reconcile period.
    async fn save_video_visit(
        &self,
        publisher_key: &str,
        visit: &VisitData,
        duration: u64,
        window_id: u64,
    ) -> Result<Option<PublisherInfo>, StorageError>;
}

/// Panel (summary) lookups.
#[async_trait]
pub trait PanelInfoStore: Send + Sync {
    async fn get_panel_publisher_info(
        &self,
        filter: &ActivityFilter,
    ) -> Result<PanelLookup, StorageError>;
}

/// Generic URL-based attribution, used to credit the platform itself.
#[async_trait]
pub trait PublisherActivity: Send + Sync {
    async fn get_publisher_activity_from_url(
        &self,
        window_id: u64,
        visit: &VisitData,
        media_key: &str,
    ) -> Result<(), StorageError>;
}

/// Read-only ledger state.
#[async_trait]
pub trait LedgerState: Send + Sync {
    /// Timestamp (seconds) of the next reconcile, identifying the current
    /// reconcile period.
    async fn reconcile_stamp(&self) -> Result<u64, StorageError>;
}

/// Receives the terminal outcome of a panel lookup.
pub trait PanelObserver: Send + Sync {
    fn on_panel_publisher_info(&self, result: LedgerResult, info: PublisherInfo, window_id: u64);
}

/// Observer that only logs.
pub struct LoggingObserver;

impl PanelObserver for LoggingObserver {
    fn on_panel_publisher_info(&self, result: LedgerResult, info: PublisherInfo, window_id: u64) {
        log::info!(
            "Panel publisher info for window {}: {} ({}) result={} duration={}s visits={}",
            window_id,
            info.id,
            info.name,
            result,
            info.duration,
            info.visits
        );
    }
}
