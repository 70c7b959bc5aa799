//! Attribution outcome statistics.
//!
//! Thread-safe counters for every [`OutcomeType`], shared across concurrent
//! attribution requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::OutcomeType;

/// Thread-safe outcome tracker.
///
/// All outcome types are initialized to zero on creation, so lookups never
/// miss. Share it across tasks with `Arc`.
pub struct AttributionStats {
    outcomes: HashMap<OutcomeType, AtomicUsize>,
}

impl AttributionStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in OutcomeType::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        AttributionStats { outcomes }
    }

    /// Increment an outcome counter.
    pub fn increment(&self, outcome: OutcomeType) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map. \
                 This indicates a bug in AttributionStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome type.
    pub fn get_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum of all terminal outcomes, i.e. the number of completed entry-point
    /// invocations.
    pub fn total_terminal(&self) -> usize {
        OutcomeType::iter()
            .filter(OutcomeType::is_terminal)
            .map(|o| self.get_count(o))
            .sum()
    }

    /// Number of invocations that ended without any attribution write.
    pub fn total_dropped(&self) -> usize {
        [
            OutcomeType::InvalidUrl,
            OutcomeType::MissingKey,
            OutcomeType::WatchtimeUnresolved,
            OutcomeType::LookupFailed,
            OutcomeType::FallbackLogged,
        ]
        .into_iter()
        .map(|o| self.get_count(o))
        .sum()
    }
}

impl Default for AttributionStats {
    fn default() -> Self {
        Self::new()
    }
}
