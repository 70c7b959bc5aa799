//! Main application modules.
//!
//! Statistics printing used at the end of a batch run.

pub mod statistics;

pub use statistics::{print_outcome_statistics, print_simple_summary};
