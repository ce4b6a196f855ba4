//! HTTP client initialization.
//!
//! This module builds the `reqwest::Client` used by `ReqwestEngine` for one
//! call.

use reqwest::ClientBuilder;

use crate::config::DEFAULT_USER_AGENT;
use crate::engine::{EngineRequest, ProtocolVersion};

/// Builds an HTTP client for a single engine call.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirects disabled, so the engine can observe and follow every hop itself
/// - The request's connection establishment timeout
/// - HTTP/1 only when the request pins HTTP/1.1 or HTTP/1.0; otherwise ALPN
///   negotiation prefers HTTP/2 and falls back to HTTP/1.1
/// - No proxy taken from the environment
///
/// The overall timeout is not set here; the engine enforces it across all hops.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn build_client(request: &EngineRequest) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(request.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .no_proxy();

    if matches!(
        request.http_version,
        ProtocolVersion::Http11 | ProtocolVersion::Http10
    ) {
        builder = builder.http1_only();
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RequestMethod;
    use std::time::Duration;

    fn request(version: ProtocolVersion) -> EngineRequest {
        EngineRequest {
            method: RequestMethod::Get,
            url: "http://example.test/".to_string(),
            headers: Vec::new(),
            body: None,
            follow_redirects: true,
            max_redirects: 8,
            timeout: Some(Duration::from_secs(4)),
            connect_timeout: Duration::from_secs(2),
            http_version: version,
        }
    }

    #[test]
    fn test_build_client_for_every_version() {
        for version in [
            ProtocolVersion::Http2,
            ProtocolVersion::Http11,
            ProtocolVersion::Http10,
            ProtocolVersion::EngineDefault,
        ] {
            assert!(build_client(&request(version)).is_ok(), "{:?}", version);
        }
    }
}
