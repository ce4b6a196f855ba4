//! GET/POST/HEAD requests with full redirect visibility.
//!
//! `Transport` configures an `Engine`, attaches a fresh `RedirectTracker` to
//! it for every call, issues exactly one request and merges the engine's
//! post-call state with the tracker's redirect history into a
//! `RequestResult`.
//!
//! Network failures never surface as `Err`: they are classified into
//! `RequestResult::error_kind`. Only caller contract violations (empty or
//! relative URL, malformed extra header, bad timeout) are returned as
//! `TransportError`.

mod result;

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::config::TransportConfig;
use crate::engine::{
    negotiate_http_version, Engine, EngineRequest, RequestMethod, ReqwestEngine,
};
use crate::error_handling::TransportError;
use crate::tracker::RedirectTracker;

// Re-export public API
pub use result::RequestResult;

/// HTTP transport that records every redirect hop.
///
/// Calls take `&self` and keep all per-call state on their own stack, so one
/// instance can serve concurrent calls. The setters take `&mut self` and
/// therefore cannot race an in-flight call.
///
/// # Example
///
/// ```no_run
/// use redirect_trace::Transport;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut transport = Transport::new();
/// transport.set_max_redirects(3);
///
/// let result = transport.get("http://example.com/", &[]).await?;
/// for hop in &result.redirect_chain {
///     println!("{} {}", hop.status_code, hop.url);
/// }
/// println!("{} {}", result.status_code, result.final_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transport<E = ReqwestEngine> {
    engine: E,
    config: TransportConfig,
}

impl Transport<ReqwestEngine> {
    /// Creates a transport backed by `ReqwestEngine` with default settings.
    pub fn new() -> Self {
        Self::with_engine(ReqwestEngine::new())
    }
}

impl Default for Transport<ReqwestEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Transport<E> {
    /// Creates a transport for `engine` with default settings.
    ///
    /// The protocol version is negotiated once here from the engine's
    /// supported versions.
    pub fn with_engine(engine: E) -> Self {
        let config = TransportConfig {
            http_version: negotiate_http_version(engine.supported_versions()),
            ..TransportConfig::default()
        };
        Self::with_config(engine, config)
    }

    /// Creates a transport with an explicit configuration, protocol version
    /// included.
    pub fn with_config(engine: E, config: TransportConfig) -> Self {
        Self { engine, config }
    }

    /// Current configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Sets the overall timeout in seconds, used from the next call on.
    ///
    /// Fractions are kept at millisecond precision or better. Zero disables
    /// the overall timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidTimeout` for negative, NaN or infinite
    /// values; the previous timeout stays in effect.
    pub fn set_timeout(&mut self, seconds: f64) -> Result<(), TransportError> {
        self.config.timeout =
            Duration::try_from_secs_f64(seconds).map_err(|_| TransportError::InvalidTimeout(seconds))?;
        Ok(())
    }

    /// Sets the redirect limit used from the next call on.
    ///
    /// `0` disables redirect following entirely: a 3xx response is returned as
    /// the final response.
    pub fn set_max_redirects(&mut self, max_redirects: u32) {
        self.config.max_redirects = max_redirects;
    }

    /// Performs a GET request.
    ///
    /// `headers` are extra request headers in `Name: Value` form.
    ///
    /// # Errors
    ///
    /// Only for contract violations; see `TransportError`.
    pub async fn get(&self, url: &str, headers: &[String]) -> Result<RequestResult, TransportError> {
        self.perform(RequestMethod::Get, url, None, headers).await
    }

    /// Performs a POST request with `body`.
    ///
    /// # Errors
    ///
    /// Only for contract violations; see `TransportError`.
    pub async fn post(
        &self,
        url: &str,
        body: impl Into<Vec<u8>>,
        headers: &[String],
    ) -> Result<RequestResult, TransportError> {
        self.perform(RequestMethod::Post, url, Some(body.into()), headers)
            .await
    }

    /// Performs a HEAD request. The result never carries a body.
    ///
    /// # Errors
    ///
    /// Only for contract violations; see `TransportError`.
    pub async fn head(&self, url: &str, headers: &[String]) -> Result<RequestResult, TransportError> {
        self.perform(RequestMethod::Head, url, None, headers).await
    }

    async fn perform(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &[String],
    ) -> Result<RequestResult, TransportError> {
        validate_url(url)?;
        validate_headers(headers)?;

        let request = self.engine_request(method, url, body, headers);
        let mut tracker = RedirectTracker::new();

        let outcome = self.engine.execute(&request, &mut tracker).await;
        let result = RequestResult::assemble(url, tracker.finish(), outcome);

        debug!(
            "{} {} -> {} {} ({} redirects){}",
            method,
            url,
            result.status_code,
            result.final_url,
            result.redirect_chain.len(),
            if result.error_kind.is_error() {
                format!(" error={} {}", result.error_kind, result.error_detail)
            } else {
                String::new()
            }
        );

        Ok(result)
    }

    fn engine_request(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &[String],
    ) -> EngineRequest {
        EngineRequest {
            method,
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
            follow_redirects: self.config.max_redirects > 0,
            max_redirects: self.config.max_redirects,
            timeout: (!self.config.timeout.is_zero()).then_some(self.config.timeout),
            connect_timeout: self.config.connect_timeout,
            http_version: self.config.http_version,
        }
    }
}

fn validate_url(url: &str) -> Result<(), TransportError> {
    if url.trim().is_empty() {
        return Err(TransportError::EmptyUrl);
    }
    // Url::parse only accepts absolute URLs
    Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Every extra header must be a valid HTTP field name and value.
fn validate_headers(headers: &[String]) -> Result<(), TransportError> {
    for header in headers {
        let valid = header.split_once(':').is_some_and(|(name, value)| {
            HeaderName::from_bytes(name.trim().as_bytes()).is_ok()
                && HeaderValue::from_str(value.trim()).is_ok()
        });
        if !valid {
            return Err(TransportError::InvalidHeader(header.clone()));
        }
    }
    Ok(())
}
