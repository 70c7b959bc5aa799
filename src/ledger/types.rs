//! Ledger value types shared between the pipeline and storage backends.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Result code carried alongside ledger lookups and forwarded to the panel
/// observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum LedgerResult {
    #[strum(serialize = "LEDGER_OK")]
    LedgerOk,
    #[strum(serialize = "NOT_FOUND")]
    NotFound,
    #[strum(serialize = "LEDGER_ERROR")]
    LedgerError,
}

/// Category filter applied by an activity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExcludeFilter {
    /// No category filtering.
    FilterAll,
    FilterDefault,
    FilterExcluded,
    FilterIncluded,
    FilterAllExceptExcluded,
}

/// Verification state of a publisher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublisherStatus {
    #[default]
    NotVerified,
    Connected,
    Verified,
}

impl PublisherStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            PublisherStatus::NotVerified => 0,
            PublisherStatus::Connected => 1,
            PublisherStatus::Verified => 2,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => PublisherStatus::Connected,
            2 => PublisherStatus::Verified,
            _ => PublisherStatus::NotVerified,
        }
    }
}

/// Publisher record owned by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherInfo {
    /// Publisher key.
    pub id: String,
    pub name: String,
    pub url: String,
    pub provider: String,
    pub favicon_url: String,
    pub status: PublisherStatus,
    pub excluded: bool,
    /// Seconds attributed in the reconcile period of `reconcile_stamp`.
    pub duration: u64,
    pub visits: u32,
    pub reconcile_stamp: u64,
}

/// Parameters of an activity query. Filter semantics belong to the storage
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFilter {
    pub publisher_key: String,
    pub excluded: ExcludeFilter,
    pub min_duration: bool,
    pub reconcile_stamp: u64,
    pub non_verified: bool,
    pub min_visits: bool,
}

impl ActivityFilter {
    /// Filter used by the panel lookup: no category filtering, current
    /// reconcile period, non-verified publishers included, no minimums.
    pub fn panel(publisher_key: &str, reconcile_stamp: u64) -> Self {
        Self {
            publisher_key: publisher_key.to_string(),
            excluded: ExcludeFilter::FilterAll,
            min_duration: false,
            reconcile_stamp,
            non_verified: true,
            min_visits: false,
        }
    }
}

/// Answer of a panel lookup. `info` may be present even when `result` is
/// `NotFound`; callers must check both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLookup {
    pub result: LedgerResult,
    pub info: Option<PublisherInfo>,
}

impl PanelLookup {
    pub fn found(info: PublisherInfo) -> Self {
        Self {
            result: LedgerResult::LedgerOk,
            info: Some(info),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result: LedgerResult::NotFound,
            info: None,
        }
    }

    /// Whether the lookup is a hit: an info object is present and the result
    /// code is not `NotFound`.
    pub fn is_hit(&self) -> bool {
        self.info.is_some() && self.result != LedgerResult::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_panel_filter_parameters() {
        let filter = ActivityFilter::panel("pub1", 1_700_000_000);
        assert_eq!(filter.publisher_key, "pub1");
        assert_eq!(filter.excluded, ExcludeFilter::FilterAll);
        assert!(!filter.min_duration);
        assert_eq!(filter.reconcile_stamp, 1_700_000_000);
        assert!(filter.non_verified);
        assert!(!filter.min_visits);
    }

    #[test]
    fn test_panel_lookup_hit_requires_both_conditions() {
        assert!(PanelLookup::found(PublisherInfo::default()).is_hit());
        assert!(!PanelLookup::not_found().is_hit());
        let contradictory = PanelLookup {
            result: LedgerResult::NotFound,
            info: Some(PublisherInfo::default()),
        };
        assert!(!contradictory.is_hit());
        let errored = PanelLookup {
            result: LedgerResult::LedgerError,
            info: None,
        };
        assert!(!errored.is_hit());
    }

    #[test]
    fn test_ledger_result_display() {
        assert_eq!(LedgerResult::LedgerOk.to_string(), "LEDGER_OK");
        assert_eq!(LedgerResult::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn test_exclude_filter_round_trips_through_strings() {
        assert_eq!(ExcludeFilter::FilterAll.to_string(), "FILTER_ALL");
        assert_eq!(
            ExcludeFilter::from_str("FILTER_ALL_EXCEPT_EXCLUDED").unwrap(),
            ExcludeFilter::FilterAllExceptExcluded
        );
    }

    #[test]
    fn test_publisher_status_from_i64_defaults_to_not_verified() {
        assert_eq!(PublisherStatus::from_i64(2), PublisherStatus::Verified);
        assert_eq!(PublisherStatus::from_i64(99), PublisherStatus::NotVerified);
        assert_eq!(PublisherStatus::Connected.as_i64(), 1);
    }
}
