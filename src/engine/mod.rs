//! The HTTP engine seam.
//!
//! An `Engine` performs the actual network exchange, following redirects
//! itself, and reports every raw response header line to a `HeaderObserver`
//! as it arrives. After the call it hands back an `EngineOutcome` with the
//! final status, effective URL, raw error code and body.
//!
//! `ReqwestEngine` is the production implementation.

mod reqwest_engine;
mod version;

use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::RawErrorCode;

// Re-export public API
pub use reqwest_engine::ReqwestEngine;
pub use version::{negotiate_http_version, ProtocolVersion, PREFERRED_VERSIONS};

/// Receives raw response header lines, one call per line, in arrival order.
///
/// Invoked synchronously on the engine's read path, so implementations must
/// stay cheap: string bookkeeping only, no I/O and no blocking.
pub trait HeaderObserver {
    /// Observes one raw header line (status line, header field or blank
    /// terminator) together with the engine's current effective URL and the
    /// status of the in-flight response.
    fn observe(&mut self, line: &str, effective_url: &str, status: u16);
}

/// HTTP method understood by engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// GET
    Get,
    /// POST with a body
    Post,
    /// HEAD, no body retrieved
    Head,
}

impl RequestMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an engine needs for one call.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Request method of the first hop
    pub method: RequestMethod,
    /// Absolute request URL
    pub url: String,
    /// Extra request headers, each in `Name: Value` form
    pub headers: Vec<String>,
    /// Request body (POST)
    pub body: Option<Vec<u8>>,
    /// Follow redirects automatically
    pub follow_redirects: bool,
    /// Maximum redirect hops followed
    pub max_redirects: u32,
    /// Overall time budget; `None` means unlimited
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Protocol version hint
    pub http_version: ProtocolVersion,
}

/// Engine state read back after a call completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutcome {
    /// Status of the last response received, `0` if none was
    pub status: u16,
    /// Last URL the engine processed
    pub effective_url: String,
    /// Raw error code, `RawErrorCode::OK` on success
    pub error_code: RawErrorCode,
    /// Human-readable error description, empty on success
    pub error_message: String,
    /// Body text of the last response; `None` for HEAD
    pub body: Option<String>,
}

/// A lower-level HTTP client driven by `Transport`.
///
/// `execute` performs exactly one logical request (including every redirect
/// it follows) and never fails: network failures are reported through
/// `EngineOutcome::error_code`.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Protocol versions this engine can be asked for.
    fn supported_versions(&self) -> &[ProtocolVersion];

    /// Performs the request, calling `observer` once per raw header line.
    async fn execute(
        &self,
        request: &EngineRequest,
        observer: &mut (dyn HeaderObserver + Send),
    ) -> EngineOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_method_names() {
        assert_eq!(RequestMethod::Get.as_str(), "GET");
        assert_eq!(RequestMethod::Post.to_string(), "POST");
        assert_eq!(RequestMethod::Head.as_str(), "HEAD");
    }

    #[test]
    fn test_engine_outcome_default_is_empty_success() {
        let outcome = EngineOutcome::default();
        assert_eq!(outcome.status, 0);
        assert!(outcome.error_code.is_ok());
        assert!(outcome.body.is_none());
    }
}
