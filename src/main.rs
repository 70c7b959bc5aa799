//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `media_publisher` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use media_publisher::config::{
    DB_PATH, DEFAULT_MAX_CONCURRENCY, YOUTUBE_CHANNEL_BASE_URL, YOUTUBE_MEDIA_TYPE, YOUTUBE_TLD,
};
use media_publisher::initialization::init_logger_with;
use media_publisher::{run_events, Config, LogFormat, LogLevel, PlatformConfig};

/// Attribute media events to publishers and record visits in a SQLite ledger.
#[derive(Debug, Parser)]
#[command(name = "media_publisher", version, about)]
struct Opt {
    /// File with one JSON event per line (`-` for stdin)
    #[arg(value_parser)]
    file: PathBuf,

    /// SQLite ledger path
    #[arg(long, env = "MEDIA_PUBLISHER_DB_PATH", default_value = DB_PATH)]
    db_path: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    /// Maximum number of events in flight
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// Media type tag of the platform
    #[arg(long, default_value = YOUTUBE_MEDIA_TYPE)]
    media_type: String,

    /// Registrable domain credited when a publisher cannot be resolved
    #[arg(long, env = "MEDIA_PUBLISHER_TLD", default_value = YOUTUBE_TLD)]
    tld: String,

    /// Never credit the platform; only log unresolved events
    #[arg(long)]
    no_tld: bool,

    /// Origin that channel pages live under
    #[arg(long, default_value = YOUTUBE_CHANNEL_BASE_URL)]
    channel_base_url: String,

    /// Do not log outcome counters at the end of the run
    #[arg(long)]
    no_stats: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        let tld = if opt.no_tld || opt.tld.is_empty() {
            None
        } else {
            Some(opt.tld)
        };
        Config {
            file: opt.file,
            log_level: opt.log_level,
            log_format: opt.log_format,
            db_path: opt.db_path,
            max_concurrency: opt.max_concurrency,
            platform: PlatformConfig {
                media_type: opt.media_type,
                tld,
                channel_base_url: opt.channel_base_url,
            },
            show_stats: !opt.no_stats,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config: Config = Opt::parse().into();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_events(config).await {
        Ok(report) => {
            println!(
                "Processed {} event{} ({} dropped, {} invalid line{}) in {:.1}s",
                report.total_events,
                if report.total_events == 1 { "" } else { "s" },
                report.dropped,
                report.invalid_lines,
                if report.invalid_lines == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            println!("Ledger saved in {}", report.db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("media_publisher error: {:#}", e);
            process::exit(1);
        }
    }
}
