//! redirect_trace library: HTTP requests with full redirect visibility
//!
//! This library performs GET, POST and HEAD requests and reports not just the
//! final response but every redirect hop traversed to reach it (URL and
//! status per hop), the final hop's headers, and a normalized error kind for
//! transport failures. It is meant for discovery and crawling tools that need
//! to reason about redirect behavior.
//!
//! # Example
//!
//! ```no_run
//! use redirect_trace::Transport;
//! use tokio;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Transport::new();
//! let result = transport.get("http://example.com/", &[]).await?;
//!
//! if result.is_success() {
//!     println!("{} after {} redirects: {}",
//!              result.status_code, result.redirect_chain.len(), result.final_url);
//! } else {
//!     println!("failed: {} ({})", result.error_kind, result.error_detail);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error_handling;
pub mod initialization;
pub mod tracker;
mod transport;

// Re-export public API
pub use config::TransportConfig;
pub use engine::{
    negotiate_http_version, Engine, EngineOutcome, EngineRequest, HeaderObserver,
    ProtocolVersion, ReqwestEngine, RequestMethod,
};
pub use error_handling::{classify, ErrorKind, RawErrorCode, TransportError};
pub use tracker::{Redirect, RedirectTracker};
pub use transport::{RequestResult, Transport};
