//! Error handling.
//!
//! This module provides:
//! - The raw numeric error vocabulary engines report (`RawErrorCode`)
//! - The normalized `ErrorKind` tags exposed in results, and `classify`
//! - Mapping of `reqwest::Error` chains onto raw codes
//! - Error types for caller contract violations and initialization failures
//!
//! Transport-level failures (DNS, connect, timeout, TLS) are data, not errors:
//! they travel inside a normally returned result.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{classify, describe_error_chain, raw_code_for_reqwest_error};
pub use types::{ErrorKind, InitializationError, RawErrorCode, TransportError};
