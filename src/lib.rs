//! media_publisher library: media-to-publisher attribution
//!
//! This library resolves media playback and navigation events from a video
//! platform (channel pages, legacy user pages, video pages, custom vanity pages
//! and watch-time beacons) into publisher identities, and records the
//! resulting visits in a SQLite ledger.
//!
//! # Example
//!
//! ```no_run
//! use media_publisher::{run_events, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("events.jsonl"),
//!     max_concurrency: 8,
//!     ..Default::default()
//! };
//!
//! let report = run_events(config).await?;
//! println!("Processed {} events: {} dropped", report.total_events, report.dropped);
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline itself is [`Attributor`]; it can be driven directly with any
//! ledger implementing the traits in [`ledger`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod config;
mod domain;
mod error_handling;
mod event;
pub mod initialization;
pub mod ledger;
mod publisher;
pub mod storage;
mod visit;
mod watchtime;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, PlatformConfig};
pub use error_handling::{
    AttributionStats, InitializationError, OutcomeType, StorageError, ValidationError,
};
pub use event::{AttributionEvent, PathType, PublisherVisitEvent, WatchtimeEvent};
pub use publisher::{
    media_key, AttributionOutcome, Attributor, DropReason, LedgerHandles, MediaDuration,
    MediaKeyResolution, PublisherVisitData,
};
pub use run::{run_events, RunReport};
pub use storage::{run_migrations, SqliteLedger};
pub use visit::{normalize, VisitData};
pub use watchtime::WatchtimeBeacon;

// Internal run module (reads events and drives the pipeline)
mod run {
    use anyhow::{Context, Result};
    use std::path::PathBuf;
    use std::sync::Arc;

    use futures::stream::FuturesUnordered;
    use futures::StreamExt;
    use log::{debug, info, warn};
    use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

    use crate::app::{print_outcome_statistics, print_simple_summary};
    use crate::config::Config;
    use crate::error_handling::AttributionStats;
    use crate::event::AttributionEvent;
    use crate::initialization::{init_extractor, init_semaphore};
    use crate::ledger::LoggingObserver;
    use crate::publisher::{Attributor, LedgerHandles};
    use crate::storage::SqliteLedger;

    /// Results of a batch run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Events that were parsed and dispatched
        pub total_events: usize,
        /// Events that ended without any attribution write
        pub dropped: usize,
        /// Input lines that were not valid events
        pub invalid_lines: usize,
        /// Path to the SQLite ledger
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs every event in the input through the attribution pipeline.
    ///
    /// Reads one JSON event per line from `config.file` (`-` for stdin). Blank
    /// lines and lines starting with `#` are skipped; lines that fail to parse
    /// are logged and counted. Events are processed concurrently, bounded by
    /// `config.max_concurrency`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The input file cannot be opened
    /// - The ledger cannot be opened or migrated
    pub async fn run_events(config: Config) -> Result<RunReport> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = if config.file.as_os_str() == "-" {
            info!("Reading events from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        } else {
            let file = tokio::fs::File::open(&config.file)
                .await
                .with_context(|| format!("Failed to open input file {}", config.file.display()))?;
            Box::new(BufReader::new(file))
        };
        let mut lines = reader.lines();

        let ledger = Arc::new(
            SqliteLedger::open(&config.db_path)
                .await
                .context("Failed to initialize ledger")?,
        );
        let stats = Arc::new(AttributionStats::new());
        let attributor = Attributor::new(
            LedgerHandles::from_ledger(Arc::clone(&ledger)),
            Arc::new(LoggingObserver),
            config.platform.clone(),
            init_extractor(),
        )
        .with_stats(Arc::clone(&stats));

        let semaphore = init_semaphore(config.max_concurrency);
        let mut tasks = FuturesUnordered::new();
        let start_time = std::time::Instant::now();
        let mut total_events = 0usize;
        let mut invalid_lines = 0usize;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read line from input: {e}");
                    break;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let event = match AttributionEvent::from_json_line(trimmed) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Skipping invalid event line: {e}");
                    invalid_lines += 1;
                    continue;
                }
            };

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, skipping event for window {}", event.window_id());
                    continue;
                }
            };

            total_events += 1;
            let attributor = attributor.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome = attributor.handle_event(&event).await;
                debug!("Window {}: {:?}", event.window_id(), outcome);
            }));
        }

        while let Some(task_result) = tasks.next().await {
            if let Err(join_error) = task_result {
                warn!("Task panicked: {:?}", join_error);
            }
        }

        let elapsed_seconds = start_time.elapsed().as_secs_f64();

        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(ledger.pool())
            .await
        {
            warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
        }

        let dropped = stats.total_dropped();
        if config.show_stats {
            print_outcome_statistics(&stats);
        }
        print_simple_summary(total_events, dropped, elapsed_seconds);

        Ok(RunReport {
            total_events,
            dropped,
            invalid_lines,
            db_path: config.db_path.clone(),
            elapsed_seconds,
        })
    }
}
