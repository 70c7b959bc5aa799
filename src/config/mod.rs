//! Application configuration and constants.
//!
//! This module provides:
//! - Platform defaults and operational constants
//! - The library `Config` and the injected `PlatformConfig`
//! - Logging option types shared with the CLI

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, PlatformConfig};
