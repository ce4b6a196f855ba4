//! `reqwest`-backed engine.
//!
//! reqwest's own redirect handling does not expose intermediate responses, so
//! the client is built with redirects disabled and this engine follows the
//! chain itself, reporting every hop's header block to the observer before
//! deciding whether to move on.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::{Client, Method, Response, Version};
use url::Url;

use super::{
    Engine, EngineOutcome, EngineRequest, HeaderObserver, ProtocolVersion, RequestMethod,
};
use crate::config::{REDIRECT_STATUS_CODES, SENSITIVE_REDIRECT_HEADERS};
use crate::error_handling::{describe_error_chain, raw_code_for_reqwest_error, RawErrorCode};
use crate::initialization::build_client;

const SUPPORTED_VERSIONS: &[ProtocolVersion] = &[
    ProtocolVersion::Http2,
    ProtocolVersion::Http11,
    ProtocolVersion::Http10,
];

/// Engine that performs requests with `reqwest`.
///
/// Stateless: a fresh client is built for every call, so there is no
/// connection reuse between calls.
///
/// Header lines are reported from reqwest's `HeaderMap`: names arrive
/// lowercased and repeated fields are grouped by name, so the order is the
/// wire order only among fields sharing a name. Credentials (`Authorization`,
/// `Cookie`, `Proxy-Authorization`) are dropped once a redirect leaves the
/// original scheme, host and port.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestEngine;

impl ReqwestEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for ReqwestEngine {
    fn supported_versions(&self) -> &[ProtocolVersion] {
        SUPPORTED_VERSIONS
    }

    async fn execute(
        &self,
        request: &EngineRequest,
        observer: &mut (dyn HeaderObserver + Send),
    ) -> EngineOutcome {
        let mut progress = Progress::new(&request.url);

        let result = match build_client(request) {
            Ok(client) => {
                let exchange = exchange(&client, request, observer, &mut progress);
                match request.timeout {
                    Some(limit) => tokio::time::timeout(limit, exchange)
                        .await
                        .unwrap_or_else(|_| Err(Failure::timed_out(limit))),
                    None => exchange.await,
                }
            }
            Err(e) => Err(Failure::new(
                RawErrorCode::FAILED_INIT,
                describe_error_chain(&e),
            )),
        };

        progress.into_outcome(request.method, result)
    }
}

/// A failed exchange: raw code plus description.
#[derive(Debug)]
struct Failure {
    code: RawErrorCode,
    message: String,
}

impl Failure {
    fn new(code: RawErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn timed_out(limit: Duration) -> Self {
        Self::new(
            RawErrorCode::OPERATION_TIMEDOUT,
            format!("Operation timed out after {} milliseconds", limit.as_millis()),
        )
    }
}

impl From<reqwest::Error> for Failure {
    fn from(error: reqwest::Error) -> Self {
        Self::new(
            raw_code_for_reqwest_error(&error),
            describe_error_chain(&error),
        )
    }
}

/// State that must survive a timeout: it lives outside the timed future.
#[derive(Debug)]
struct Progress {
    status: u16,
    effective_url: String,
    body: Vec<u8>,
}

impl Progress {
    fn new(url: &str) -> Self {
        Self {
            status: 0,
            effective_url: url.to_string(),
            body: Vec::new(),
        }
    }

    fn into_outcome(self, method: RequestMethod, result: Result<(), Failure>) -> EngineOutcome {
        let (error_code, error_message) = match result {
            Ok(()) => (RawErrorCode::OK, String::new()),
            Err(failure) => (failure.code, failure.message),
        };
        let body = (method != RequestMethod::Head)
            .then(|| String::from_utf8_lossy(&self.body).into_owned());

        EngineOutcome {
            status: self.status,
            effective_url: self.effective_url,
            error_code,
            error_message,
            body,
        }
    }
}

async fn exchange(
    client: &Client,
    request: &EngineRequest,
    observer: &mut (dyn HeaderObserver + Send),
    progress: &mut Progress,
) -> Result<(), Failure> {
    let mut headers = parse_extra_headers(&request.headers)?;
    let mut current = Url::parse(&request.url).map_err(|e| {
        Failure::new(
            RawErrorCode::URL_MALFORMAT,
            format!("invalid URL {}: {}", request.url, e),
        )
    })?;
    let mut method = request.method;
    let mut body = request.body.clone();
    let mut followed = 0u32;

    loop {
        let mut builder = client
            .request(reqwest_method(method), current.clone())
            .headers(headers.clone());
        if let Some(version) = request_version(request.http_version) {
            builder = builder.version(version);
        }
        if let Some(payload) = &body {
            builder = builder.body(payload.clone());
        }

        let mut response = builder.send().await?;
        progress.status = response.status().as_u16();
        report_header_block(&response, &progress.effective_url, observer);

        let next = if request.follow_redirects {
            redirect_target(&response, &current)
        } else {
            None
        };
        let Some(next) = next else {
            if method != RequestMethod::Head {
                read_body(&mut response, &mut progress.body).await?;
            }
            return Ok(());
        };

        if followed >= request.max_redirects {
            return Err(Failure::new(
                RawErrorCode::TOO_MANY_REDIRECTS,
                format!("Maximum ({}) redirects followed", request.max_redirects),
            ));
        }
        followed += 1;

        (method, body) = method_after_redirect(progress.status, method, body);
        if !same_origin(&current, &next) {
            strip_sensitive_headers(&mut headers);
        }
        debug!(
            "Following {} redirect {} -> {} as {}",
            progress.status, current, next, method
        );
        progress.effective_url = next.to_string();
        current = next;
    }
}

/// Reports the status line, each header field and the blank terminator.
fn report_header_block(
    response: &Response,
    effective_url: &str,
    observer: &mut (dyn HeaderObserver + Send),
) {
    let status = response.status();
    let code = status.as_u16();

    observer.observe(
        &format!("{:?} {}\r\n", response.version(), status),
        effective_url,
        code,
    );
    for (name, value) in response.headers() {
        observer.observe(
            &format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes())),
            effective_url,
            code,
        );
    }
    observer.observe("\r\n", effective_url, code);
}

/// Reads the body chunk by chunk; bytes received before a failure are kept.
async fn read_body(response: &mut Response, sink: &mut Vec<u8>) -> Result<(), Failure> {
    while let Some(chunk) = response.chunk().await? {
        sink.extend_from_slice(&chunk);
    }
    Ok(())
}

fn redirect_target(response: &Response, current: &Url) -> Option<Url> {
    let location = response
        .headers()
        .get(LOCATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    resolve_location(response.status().as_u16(), location.as_deref(), current)
}

/// Resolves the next hop for a redirect response.
///
/// Returns `None` for non-redirect statuses and for redirects whose
/// `Location` is missing or cannot be joined onto the current URL.
fn resolve_location(status: u16, location: Option<&str>, current: &Url) -> Option<Url> {
    if !REDIRECT_STATUS_CODES.contains(&status) {
        return None;
    }
    let Some(location) = location else {
        warn!(
            "Redirect status {} for {} but no Location header",
            status, current
        );
        return None;
    };
    match current.join(location.trim()) {
        Ok(next) => Some(next),
        Err(e) => {
            warn!(
                "Redirect status {} for {} has unusable Location {:?}: {}",
                status, current, location, e
            );
            None
        }
    }
}

/// Method and body for the next hop.
///
/// 303 switches to GET (HEAD stays HEAD), 301/302 switch POST to GET,
/// 307/308 keep both.
fn method_after_redirect(
    status: u16,
    method: RequestMethod,
    body: Option<Vec<u8>>,
) -> (RequestMethod, Option<Vec<u8>>) {
    match (status, method) {
        (_, RequestMethod::Head) => (RequestMethod::Head, None),
        (303, _) | (301 | 302, RequestMethod::Post) => (RequestMethod::Get, None),
        _ => (method, body),
    }
}

fn parse_extra_headers(raw: &[String]) -> Result<HeaderMap, Failure> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for line in raw {
        let invalid = || {
            Failure::new(
                RawErrorCode::BAD_FUNCTION_ARGUMENT,
                format!("invalid request header {:?}", line),
            )
        };
        let (name, value) = line.split_once(':').ok_or_else(invalid)?;
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Scheme, host and effective port all match.
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

fn strip_sensitive_headers(headers: &mut HeaderMap) {
    for name in SENSITIVE_REDIRECT_HEADERS {
        headers.remove(*name);
    }
}

fn reqwest_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Post => Method::POST,
        RequestMethod::Head => Method::HEAD,
    }
}

fn request_version(version: ProtocolVersion) -> Option<Version> {
    match version {
        ProtocolVersion::Http11 => Some(Version::HTTP_11),
        ProtocolVersion::Http10 => Some(Version::HTTP_10),
        ProtocolVersion::Http2 | ProtocolVersion::EngineDefault => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://a.test/start").unwrap()
    }

    #[test]
    fn test_resolve_location_absolute_and_relative() {
        assert_eq!(
            resolve_location(302, Some("https://a.test/"), &base())
                .unwrap()
                .as_str(),
            "https://a.test/"
        );
        assert_eq!(
            resolve_location(301, Some("/final"), &base()).unwrap().as_str(),
            "http://a.test/final"
        );
        assert_eq!(
            resolve_location(307, Some("next?x=1"), &base())
                .unwrap()
                .as_str(),
            "http://a.test/next?x=1"
        );
    }

    #[test]
    fn test_resolve_location_ignores_non_redirects() {
        assert!(resolve_location(200, Some("/elsewhere"), &base()).is_none());
        assert!(resolve_location(304, Some("/elsewhere"), &base()).is_none());
        assert!(resolve_location(300, Some("/elsewhere"), &base()).is_none());
    }

    #[test]
    fn test_resolve_location_without_location_is_final() {
        assert!(resolve_location(302, None, &base()).is_none());
    }

    #[test]
    fn test_resolve_location_with_unusable_location_is_final() {
        assert!(resolve_location(302, Some("http://[::1"), &base()).is_none());
    }

    #[test]
    fn test_method_after_redirect() {
        let body = Some(b"payload".to_vec());
        assert_eq!(
            method_after_redirect(302, RequestMethod::Post, body.clone()),
            (RequestMethod::Get, None)
        );
        assert_eq!(
            method_after_redirect(301, RequestMethod::Post, body.clone()),
            (RequestMethod::Get, None)
        );
        assert_eq!(
            method_after_redirect(303, RequestMethod::Post, body.clone()),
            (RequestMethod::Get, None)
        );
        assert_eq!(
            method_after_redirect(307, RequestMethod::Post, body.clone()),
            (RequestMethod::Post, body.clone())
        );
        assert_eq!(
            method_after_redirect(308, RequestMethod::Post, body.clone()),
            (RequestMethod::Post, body)
        );
        assert_eq!(
            method_after_redirect(303, RequestMethod::Head, None),
            (RequestMethod::Head, None)
        );
        assert_eq!(
            method_after_redirect(302, RequestMethod::Get, None),
            (RequestMethod::Get, None)
        );
    }

    #[test]
    fn test_parse_extra_headers() {
        let headers = parse_extra_headers(&[
            "Accept: text/html".to_string(),
            "X-Multi: one".to_string(),
            "X-Multi: two".to_string(),
            "X-Url:  http://a.test/x ".to_string(),
        ])
        .unwrap();
        assert_eq!(headers.get("accept").unwrap(), "text/html");
        assert_eq!(headers.get_all("x-multi").iter().count(), 2);
        assert_eq!(headers.get("x-url").unwrap(), "http://a.test/x");
    }

    #[test]
    fn test_parse_extra_headers_rejects_bad_lines() {
        for bad in ["NoColon", "Bad Name: value", ": empty name"] {
            let err = parse_extra_headers(&[bad.to_string()]).unwrap_err();
            assert_eq!(err.code, RawErrorCode::BAD_FUNCTION_ARGUMENT, "{}", bad);
        }
    }

    #[test]
    fn test_strip_sensitive_headers() {
        let mut headers = parse_extra_headers(&[
            "Authorization: Bearer secret".to_string(),
            "Cookie: a=b".to_string(),
            "Accept: */*".to_string(),
        ])
        .unwrap();
        strip_sensitive_headers(&mut headers);
        assert!(headers.get("authorization").is_none());
        assert!(headers.get("cookie").is_none());
        assert!(headers.get("accept").is_some());
    }

    #[test]
    fn test_same_origin() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(same_origin(&url("http://a.test/x"), &url("http://a.test:80/y")));
        assert!(same_origin(&url("https://a.test/"), &url("https://a.test:443/z")));
        assert!(!same_origin(&url("http://a.test/"), &url("http://b.test/")));
        assert!(!same_origin(&url("http://a.test/"), &url("http://a.test:8080/")));
        assert!(!same_origin(&url("http://a.test/"), &url("https://a.test/")));
    }

    #[test]
    fn test_request_version_mapping() {
        assert_eq!(request_version(ProtocolVersion::Http11), Some(Version::HTTP_11));
        assert_eq!(request_version(ProtocolVersion::Http10), Some(Version::HTTP_10));
        assert_eq!(request_version(ProtocolVersion::Http2), None);
        assert_eq!(request_version(ProtocolVersion::EngineDefault), None);
    }

    #[test]
    fn test_progress_outcome_keeps_partial_state() {
        let mut progress = Progress::new("http://a.test/");
        progress.status = 200;
        progress.body.extend_from_slice(b"partial");
        let outcome = progress.into_outcome(
            RequestMethod::Get,
            Err(Failure::timed_out(Duration::from_millis(1500))),
        );
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.body.as_deref(), Some("partial"));
        assert_eq!(outcome.error_code, RawErrorCode::OPERATION_TIMEDOUT);
        assert_eq!(
            outcome.error_message,
            "Operation timed out after 1500 milliseconds"
        );
    }

    #[test]
    fn test_progress_outcome_head_has_no_body() {
        let outcome = Progress::new("http://a.test/").into_outcome(RequestMethod::Head, Ok(()));
        assert!(outcome.body.is_none());
        assert!(outcome.error_code.is_ok());
        assert!(outcome.error_message.is_empty());
    }
}
