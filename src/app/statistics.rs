//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{AttributionStats, OutcomeType};

/// Prints a one-line summary of the run.
pub fn print_simple_summary(total_events: usize, dropped: usize, elapsed_seconds: f64) {
    info!(
        "Processed {} event{} ({} attributed, {} dropped) in {:.1}s",
        total_events,
        if total_events == 1 { "" } else { "s" },
        total_events.saturating_sub(dropped),
        dropped,
        elapsed_seconds
    );
}

/// Prints outcome counters to the log, terminal outcomes first.
pub fn print_outcome_statistics(stats: &AttributionStats) {
    let total = stats.total_terminal();
    if total > 0 {
        info!("Outcome Counts ({} total):", total);
        for outcome in OutcomeType::iter().filter(OutcomeType::is_terminal) {
            let count = stats.get_count(outcome);
            if count > 0 {
                info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }

    let side_effects: Vec<(OutcomeType, usize)> = OutcomeType::iter()
        .filter(|o| !o.is_terminal())
        .map(|o| (o, stats.get_count(o)))
        .filter(|(_, count)| *count > 0)
        .collect();
    if !side_effects.is_empty() {
        info!("Ledger Writes:");
        for (outcome, count) in side_effects {
            info!("   {}: {}", outcome.as_str(), count);
        }
    }
}
