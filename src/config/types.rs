//! Configuration types.
//!
//! This module defines the library configuration, the per-platform settings
//! injected into the attribution pipeline, and the logging enums shared with
//! the CLI.

use std::path::PathBuf;

use clap::ValueEnum;
use psl::List;

use crate::config::constants::{
    DB_PATH, DEFAULT_MAX_CONCURRENCY, YOUTUBE_CHANNEL_BASE_URL, YOUTUBE_MEDIA_TYPE, YOUTUBE_TLD,
};
use crate::domain::extract_domain;
use crate::error_handling::ValidationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Settings for the video platform whose events are being attributed.
///
/// Passed to the [`Attributor`](crate::Attributor) at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Media type tag stored as the visit provider (e.g. `youtube`).
    pub media_type: String,
    /// Registrable domain credited by the fallback path. `None` disables
    /// platform-level attribution; failures are then only logged.
    pub tld: Option<String>,
    /// Origin that channel pages live under, without a trailing slash.
    pub channel_base_url: String,
}

impl PlatformConfig {
    /// Canonical publisher URL for a channel.
    pub fn channel_url(&self, channel_id: &str) -> String {
        format!(
            "{}/channel/{}",
            self.channel_base_url.trim_end_matches('/'),
            channel_id
        )
    }

    /// Registrable domain of the platform itself: the configured `tld`, or
    /// the registrable domain of `channel_base_url` when there is none.
    pub fn site_domain(&self, list: &List) -> Result<String, ValidationError> {
        match &self.tld {
            Some(tld) => Ok(tld.clone()),
            None => extract_domain(list, &self.channel_base_url),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            media_type: YOUTUBE_MEDIA_TYPE.to_string(),
            tld: Some(YOUTUBE_TLD.to_string()),
            channel_base_url: YOUTUBE_CHANNEL_BASE_URL.to_string(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use media_publisher::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("events.jsonl"),
///     max_concurrency: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read events from (`-` for stdin)
    pub file: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Ledger path (SQLite file)
    pub db_path: PathBuf,

    /// Maximum number of events in flight
    pub max_concurrency: usize,

    /// Platform settings
    pub platform: PlatformConfig,

    /// Log outcome counters at the end of the run
    pub show_stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("events.jsonl"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            platform: PlatformConfig::default(),
            show_stats: true,
        }
    }
}
