//! Error handling and outcome statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, storage, validation)
//! - The outcome taxonomy of attribution requests
//! - Thread-safe outcome counters
//!
//! Failures never surface to the caller of an entry point. Validation errors
//! are local, storage errors on writes are logged and swallowed, and "not
//! found" is an ordinary outcome rather than an error.

mod stats;
mod types;

// Re-export public API
pub use stats::AttributionStats;
pub use types::{InitializationError, OutcomeType, StorageError, ValidationError};
