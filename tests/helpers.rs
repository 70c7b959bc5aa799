// Shared test helpers: an in-memory ledger that counts every operation, and a
// recording panel observer.
//
// Included from test files with `#[path = "helpers.rs"] mod helpers;`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use media_publisher::ledger::{
    ActivityFilter, LedgerResult, LedgerState, MediaPublisherStore, PanelInfoStore, PanelLookup,
    PanelObserver, PublisherActivity, PublisherInfo, VisitStore,
};
use media_publisher::{
    Attributor, LedgerHandles, PlatformConfig, PublisherVisitData, StorageError, VisitData,
};

pub const STAMP: u64 = 1_700_000_000;

/// A `save_video_visit` call as seen by the ledger.
#[derive(Debug, Clone)]
pub struct SavedVisit {
    pub publisher_key: String,
    pub visit: VisitData,
    pub duration: u64,
    pub window_id: u64,
}

/// A `get_publisher_activity_from_url` call as seen by the ledger.
#[derive(Debug, Clone)]
pub struct ActivityRequest {
    pub window_id: u64,
    pub visit: VisitData,
    pub media_key: String,
}

/// Ledger fake. Media bindings behave like a real store (a bind is visible to
/// later reads); panel answers are scripted per publisher key.
#[derive(Default)]
pub struct FakeLedger {
    bindings: Mutex<HashMap<String, String>>,
    panel_answers: Mutex<HashMap<String, PanelLookup>>,
    saved_visits: Mutex<Vec<SavedVisit>>,
    activity_requests: Mutex<Vec<ActivityRequest>>,
    panel_filters: Mutex<Vec<ActivityFilter>>,

    pub media_reads: AtomicUsize,
    pub media_binds: AtomicUsize,
    pub panel_reads: AtomicUsize,

    pub fail_media_reads: AtomicBool,
    pub fail_panel_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn bind(&self, media_key: &str, publisher_key: &str) {
        self.bindings
            .lock()
            .unwrap()
            .insert(media_key.to_string(), publisher_key.to_string());
    }

    pub fn binding(&self, media_key: &str) -> Option<String> {
        self.bindings.lock().unwrap().get(media_key).cloned()
    }

    pub fn set_panel_answer(&self, publisher_key: &str, lookup: PanelLookup) {
        self.panel_answers
            .lock()
            .unwrap()
            .insert(publisher_key.to_string(), lookup);
    }

    /// Scripts a panel hit for `publisher_key`.
    pub fn set_panel_hit(&self, publisher_key: &str) {
        self.set_panel_answer(
            publisher_key,
            PanelLookup::found(PublisherInfo {
                id: publisher_key.to_string(),
                name: format!("{publisher_key} name"),
                duration: 42,
                visits: 3,
                reconcile_stamp: STAMP,
                ..Default::default()
            }),
        );
    }

    pub fn saved_visits(&self) -> Vec<SavedVisit> {
        self.saved_visits.lock().unwrap().clone()
    }

    pub fn activity_requests(&self) -> Vec<ActivityRequest> {
        self.activity_requests.lock().unwrap().clone()
    }

    pub fn panel_filters(&self) -> Vec<ActivityFilter> {
        self.panel_filters.lock().unwrap().clone()
    }

    /// Number of calls that would mutate a real ledger.
    pub fn write_count(&self) -> usize {
        self.saved_visits.lock().unwrap().len()
            + self.activity_requests.lock().unwrap().len()
            + self.media_binds.load(Ordering::SeqCst)
    }

    fn backend_error(op: &str) -> StorageError {
        StorageError::Backend(format!("injected {op} failure"))
    }
}

#[async_trait]
impl MediaPublisherStore for FakeLedger {
    async fn get_media_publisher_info(
        &self,
        media_key: &str,
    ) -> Result<Option<PublisherInfo>, StorageError> {
        self.media_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_media_reads.load(Ordering::SeqCst) {
            return Err(Self::backend_error("media read"));
        }
        Ok(self.binding(media_key).map(|publisher_key| PublisherInfo {
            id: publisher_key,
            reconcile_stamp: STAMP,
            ..Default::default()
        }))
    }

    async fn save_media_publisher_info(
        &self,
        media_key: &str,
        publisher_key: &str,
    ) -> Result<(), StorageError> {
        self.media_binds.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::backend_error("media bind"));
        }
        self.bind(media_key, publisher_key);
        Ok(())
    }
}

#[async_trait]
impl VisitStore for FakeLedger {
    async fn save_video_visit(
        &self,
        publisher_key: &str,
        visit: &VisitData,
        duration: u64,
        window_id: u64,
    ) -> Result<Option<PublisherInfo>, StorageError> {
        self.saved_visits.lock().unwrap().push(SavedVisit {
            publisher_key: publisher_key.to_string(),
            visit: visit.clone(),
            duration,
            window_id,
        });
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::backend_error("visit write"));
        }
        Ok(None)
    }
}

#[async_trait]
impl PanelInfoStore for FakeLedger {
    async fn get_panel_publisher_info(
        &self,
        filter: &ActivityFilter,
    ) -> Result<PanelLookup, StorageError> {
        self.panel_reads.fetch_add(1, Ordering::SeqCst);
        self.panel_filters.lock().unwrap().push(filter.clone());
        if self.fail_panel_reads.load(Ordering::SeqCst) {
            return Err(Self::backend_error("panel read"));
        }
        Ok(self
            .panel_answers
            .lock()
            .unwrap()
            .get(&filter.publisher_key)
            .cloned()
            .unwrap_or_else(PanelLookup::not_found))
    }
}

#[async_trait]
impl PublisherActivity for FakeLedger {
    async fn get_publisher_activity_from_url(
        &self,
        window_id: u64,
        visit: &VisitData,
        media_key: &str,
    ) -> Result<(), StorageError> {
        self.activity_requests.lock().unwrap().push(ActivityRequest {
            window_id,
            visit: visit.clone(),
            media_key: media_key.to_string(),
        });
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::backend_error("activity write"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerState for FakeLedger {
    async fn reconcile_stamp(&self) -> Result<u64, StorageError> {
        Ok(STAMP)
    }
}

/// Observer that records every notification.
#[derive(Default)]
pub struct RecordingObserver {
    calls: Mutex<Vec<(LedgerResult, PublisherInfo, u64)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(LedgerResult, PublisherInfo, u64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PanelObserver for RecordingObserver {
    fn on_panel_publisher_info(&self, result: LedgerResult, info: PublisherInfo, window_id: u64) {
        self.calls.lock().unwrap().push((result, info, window_id));
    }
}

/// Attributor wired to fresh fakes with the default (YouTube) platform.
pub fn create_attributor() -> (Attributor, Arc<FakeLedger>, Arc<RecordingObserver>) {
    create_attributor_with(PlatformConfig::default())
}

pub fn create_attributor_with(
    platform: PlatformConfig,
) -> (Attributor, Arc<FakeLedger>, Arc<RecordingObserver>) {
    let ledger = FakeLedger::new();
    let observer = RecordingObserver::new();
    let attributor = Attributor::new(
        LedgerHandles::from_ledger(Arc::clone(&ledger)),
        observer.clone(),
        platform,
        media_publisher::initialization::init_extractor(),
    );
    (attributor, ledger, observer)
}

pub fn visit_data(url: &str, channel_id: &str, publisher_key: &str) -> PublisherVisitData {
    PublisherVisitData {
        url: url.to_string(),
        channel_id: channel_id.to_string(),
        publisher_key: publisher_key.to_string(),
        publisher_name: "Some Channel".to_string(),
        ..Default::default()
    }
}
