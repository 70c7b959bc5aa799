//! Error type definitions.
//!
//! This module defines the error types and the outcome taxonomy used throughout
//! the attribution pipeline.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types reported by a ledger storage backend.
///
/// "Not found" is never an error: lookups return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Failure reported by a non-SQL backend.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Local validation failures. These are logged where they occur and never
/// propagated to the caller of an entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a well-formed absolute URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL exceeds the accepted length.
    #[error("URL exceeds maximum length ({0} characters)")]
    UrlTooLong(usize),

    /// The URL has no host component.
    #[error("URL '{0}' has no host component")]
    MissingHost(String),

    /// IP hosts have no registrable domain.
    #[error("IP addresses do not have registrable domains: {0}")]
    IpAddress(String),

    /// The host is a public suffix or otherwise not registrable.
    #[error("No registrable domain for host: {0}")]
    UnregistrableHost(String),
}

/// Terminal outcomes and notable events of attribution requests.
///
/// Each variant is counted by [`AttributionStats`](super::AttributionStats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    // Terminal actions
    PanelInfoFound,
    VisitRecorded,
    FallbackDispatched,
    FallbackLogged,
    DurationUpdated,
    // Drops
    InvalidUrl,
    MissingKey,
    WatchtimeUnresolved,
    LookupFailed,
    // Side effects and failures
    MediaKeyBound,
    StorageFailure,
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::PanelInfoFound => "Panel info found",
            OutcomeType::VisitRecorded => "Visit recorded",
            OutcomeType::FallbackDispatched => "Platform fallback dispatched",
            OutcomeType::FallbackLogged => "Platform fallback logged (no TLD)",
            OutcomeType::DurationUpdated => "Media duration updated",
            OutcomeType::InvalidUrl => "Invalid URL dropped",
            OutcomeType::MissingKey => "Missing key dropped",
            OutcomeType::WatchtimeUnresolved => "Watch-time beacon unresolved",
            OutcomeType::LookupFailed => "Media key lookup failed",
            OutcomeType::MediaKeyBound => "Media key bound",
            OutcomeType::StorageFailure => "Storage failure",
        }
    }

    /// Whether this outcome ends an entry-point invocation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OutcomeType::MediaKeyBound | OutcomeType::StorageFailure)
    }
}
