//! Transport configuration and constants.
//!
//! This module provides:
//! - Default timeouts and redirect limits
//! - Header name constants
//! - The `TransportConfig` struct and CLI option types

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{CliMethod, LogFormat, LogLevel, Opt, TransportConfig};
