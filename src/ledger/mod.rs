//! Ledger boundary.
//!
//! The attribution pipeline never reaches into a shared ledger object. It
//! talks to the narrow interfaces defined here, and `storage::SqliteLedger`
//! implements all of them.

mod traits;
mod types;

pub use traits::{
    LedgerState, LoggingObserver, MediaPublisherStore, PanelInfoStore, PanelObserver,
    PublisherActivity, VisitStore,
};
pub use types::{
    ActivityFilter, ExcludeFilter, LedgerResult, PanelLookup, PublisherInfo, PublisherStatus,
};
