//! Configuration constants.
//!
//! This module defines the platform defaults and operational parameters used
//! throughout the crate.

/// Media type tag for YouTube. Stored as the `provider` of every visit and used
/// as the display name of the platform-level fallback publisher.
pub const YOUTUBE_MEDIA_TYPE: &str = "youtube";

/// Registrable domain of the platform, credited when a specific publisher
/// cannot be resolved.
pub const YOUTUBE_TLD: &str = "youtube.com";

/// Origin that channel pages live under.
pub const YOUTUBE_CHANNEL_BASE_URL: &str = "https://www.youtube.com";

/// Default SQLite ledger path.
pub const DB_PATH: &str = "./media_publisher.db";

/// Maximum number of events processed concurrently by the batch runner.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Length of a reconcile period in days. A fresh ledger schedules its first
/// reconcile this far in the future.
pub const RECONCILE_INTERVAL_DAYS: i64 = 30;

/// Suffix appended to a publisher URL when a video visit is recorded.
pub const VIDEOS_PATH_SUFFIX: &str = "/videos";

/// Maximum URL length accepted by the normalizer.
/// Matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Minimum attributed seconds for a publisher to pass a `min_duration` filter.
pub const MIN_VISIT_TIME_SECS: i64 = 8;

/// Minimum visit count for a publisher to pass a `min_visits` filter.
pub const MIN_VISITS: i64 = 1;
