//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Public Suffix List extractor
//! - Concurrency limiter

mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

pub use logger::init_logger_with;

/// Initializes a semaphore bounding the number of events processed at once.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

/// Initializes the Public Suffix List extractor.
///
/// The list is compiled into the binary, so this never touches the network.
/// It is shared across tasks for registrable-domain extraction.
pub fn init_extractor() -> Arc<psl::List> {
    Arc::new(psl::List)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_never_zero() {
        assert_eq!(init_semaphore(0).available_permits(), 1);
        assert_eq!(init_semaphore(8).available_permits(), 8);
    }
}
