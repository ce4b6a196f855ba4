//! Configuration constants.
//!
//! Defaults applied to every `Transport` unless overridden through the
//! configuration setters.

use std::time::Duration;

/// Overall time budget for one call, in seconds (all hops plus the body).
pub const DEFAULT_TIMEOUT_SECS: f64 = 4.0;

/// Maximum number of redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: u32 = 8;

/// TCP/TLS connection establishment timeout in milliseconds.
/// Independent of the overall timeout.
pub const CONNECT_TIMEOUT_MS: u64 = 2000;

/// Connection establishment timeout as a `Duration`.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(CONNECT_TIMEOUT_MS);

/// User-Agent sent unless the caller supplies one.
pub const DEFAULT_USER_AGENT: &str = concat!("redirect_trace/", env!("CARGO_PKG_VERSION"));

/// Redirect statuses followed when a `Location` header is present.
pub const REDIRECT_STATUS_CODES: &[u16] = &[301, 302, 303, 307, 308];
