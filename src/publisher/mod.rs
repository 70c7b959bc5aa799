//! Media-to-publisher attribution pipeline.
//!
//! [`Attributor`] owns the injected ledger collaborators and exposes the entry
//! points:
//! - `save_publisher_visit_channel` / `_user` / `_video` / `_custom`
//! - `get_publisher_panel_info`
//! - `update_media_duration` and `on_watchtime`
//!
//! Every entry point performs exactly one terminal action (panel notification,
//! visit write, platform fallback) or an explicit, logged drop, and reports it
//! as an [`AttributionOutcome`]. Failures never propagate to the caller.

mod duration;
mod fallback;
mod identity;
mod media_key;
mod panel;
mod recorder;

use std::sync::Arc;

use psl::List;
use serde::{Deserialize, Serialize};

use crate::config::PlatformConfig;
use crate::error_handling::{AttributionStats, OutcomeType, ValidationError};
use crate::ledger::{
    LedgerState, MediaPublisherStore, PanelInfoStore, PanelObserver, PublisherActivity,
    VisitStore,
};

pub use duration::MediaDuration;
pub use media_key::{media_key, MediaKeyResolution};

/// Publisher data scraped upstream from a platform page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherVisitData {
    pub url: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub publisher_key: String,
    #[serde(default)]
    pub publisher_name: String,
    #[serde(default)]
    pub media_key: String,
    #[serde(default)]
    pub favicon_url: String,
}

/// Why an invocation ended without an attribution write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    InvalidUrl(ValidationError),
    MissingKey(&'static str),
    /// A watch-time beacon whose media key has no publisher yet.
    WatchtimeUnresolved,
    /// The media key cache could not be read.
    LookupFailed,
}

/// The single terminal action taken by an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionOutcome {
    /// A panel lookup hit; the observer was notified.
    PanelInfoFound,
    /// A visit write was dispatched (storage errors are logged, not reported).
    VisitRecorded,
    /// The platform itself was credited.
    FallbackDispatched,
    /// Identity could not be established and no platform TLD is configured.
    FallbackLogged,
    /// A duration update was dispatched.
    DurationUpdated,
    Dropped(DropReason),
}

impl AttributionOutcome {
    fn outcome_type(&self) -> OutcomeType {
        match self {
            AttributionOutcome::PanelInfoFound => OutcomeType::PanelInfoFound,
            AttributionOutcome::VisitRecorded => OutcomeType::VisitRecorded,
            AttributionOutcome::FallbackDispatched => OutcomeType::FallbackDispatched,
            AttributionOutcome::FallbackLogged => OutcomeType::FallbackLogged,
            AttributionOutcome::DurationUpdated => OutcomeType::DurationUpdated,
            AttributionOutcome::Dropped(DropReason::InvalidUrl(_)) => OutcomeType::InvalidUrl,
            AttributionOutcome::Dropped(DropReason::MissingKey(_)) => OutcomeType::MissingKey,
            AttributionOutcome::Dropped(DropReason::WatchtimeUnresolved) => {
                OutcomeType::WatchtimeUnresolved
            }
            AttributionOutcome::Dropped(DropReason::LookupFailed) => OutcomeType::LookupFailed,
        }
    }
}

/// Ledger collaborators used by the pipeline.
#[derive(Clone)]
pub struct LedgerHandles {
    pub media: Arc<dyn MediaPublisherStore>,
    pub visits: Arc<dyn VisitStore>,
    pub panel: Arc<dyn PanelInfoStore>,
    pub activity: Arc<dyn PublisherActivity>,
    pub state: Arc<dyn LedgerState>,
}

impl LedgerHandles {
    /// Uses one backend for every collaborator.
    pub fn from_ledger<L>(ledger: Arc<L>) -> Self
    where
        L: MediaPublisherStore
            + VisitStore
            + PanelInfoStore
            + PublisherActivity
            + LedgerState
            + 'static,
    {
        Self {
            media: ledger.clone(),
            visits: ledger.clone(),
            panel: ledger.clone(),
            activity: ledger.clone(),
            state: ledger,
        }
    }
}

/// Resolves platform events into publisher identities and visit records.
#[derive(Clone)]
pub struct Attributor {
    ledger: LedgerHandles,
    observer: Arc<dyn PanelObserver>,
    platform: PlatformConfig,
    extractor: Arc<List>,
    stats: Arc<AttributionStats>,
}

impl Attributor {
    pub fn new(
        ledger: LedgerHandles,
        observer: Arc<dyn PanelObserver>,
        platform: PlatformConfig,
        extractor: Arc<List>,
    ) -> Self {
        Self {
            ledger,
            observer,
            platform,
            extractor,
            stats: Arc::new(AttributionStats::new()),
        }
    }

    /// Shares an existing statistics tracker.
    pub fn with_stats(mut self, stats: Arc<AttributionStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn platform(&self) -> &PlatformConfig {
        &self.platform
    }

    pub fn stats(&self) -> &Arc<AttributionStats> {
        &self.stats
    }

    pub(crate) fn finish(&self, outcome: AttributionOutcome) -> AttributionOutcome {
        self.stats.increment(outcome.outcome_type());
        outcome
    }

    fn drop_invalid_url(&self, url: &str, err: ValidationError) -> AttributionOutcome {
        log::warn!("Failed to initialize visit data for url {url}: {err}");
        self.finish(AttributionOutcome::Dropped(DropReason::InvalidUrl(err)))
    }
}
