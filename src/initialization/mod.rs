//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The logger (binary only)
//! - The per-call HTTP client used by `ReqwestEngine`

mod client;
mod logger;

// Re-export public API
pub use client::build_client;
pub use logger::init_logger_with;
