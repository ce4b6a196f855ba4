//! The unified result of a transport call.

use serde::Serialize;

use crate::engine::EngineOutcome;
use crate::error_handling::{classify, ErrorKind};
use crate::tracker::{Redirect, TrackerSnapshot};

/// Everything learned from one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestResult {
    /// Status of the final response, `0` if no response arrived
    pub status_code: u16,
    /// Headers of the final response only, trimmed, in arrival order
    pub headers: Vec<(String, String)>,
    /// Final response body; `None` for HEAD
    pub body: Option<String>,
    /// Every hop before the final one, in visitation order
    pub redirect_chain: Vec<Redirect>,
    /// Normalized transport error, `ErrorKind::NoError` on success
    pub error_kind: ErrorKind,
    /// Engine's error description, empty on success
    pub error_detail: String,
    /// Last URL visited
    pub final_url: String,
    /// All raw header blocks, a blank line, then the final body
    pub debug_trace: String,
}

impl RequestResult {
    /// Merges tracker state with the engine's post-call state.
    ///
    /// Falls back to the engine's status and the request URL when the tracker
    /// never saw a header line (total connection failure).
    pub(crate) fn assemble(url: &str, tracker: TrackerSnapshot, outcome: EngineOutcome) -> Self {
        let status_code = if tracker.last_seen_url.is_some() {
            tracker.last_seen_status
        } else {
            outcome.status
        };

        let mut debug_trace = tracker.debug_trace;
        debug_trace.push_str("\r\n");
        if let Some(body) = &outcome.body {
            debug_trace.push_str(body);
        }

        Self {
            status_code,
            headers: tracker.headers,
            body: outcome.body,
            redirect_chain: tracker.redirect_chain,
            error_kind: classify(outcome.error_code),
            error_detail: outcome.error_message,
            final_url: tracker.last_seen_url.unwrap_or_else(|| url.to_string()),
            debug_trace,
        }
    }

    /// Returns `true` when no transport-level error occurred.
    ///
    /// Says nothing about the HTTP status; a 404 is a success here.
    pub fn is_success(&self) -> bool {
        !self.error_kind.is_error()
    }

    /// First value of a final-hop header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::RawErrorCode;

    fn snapshot() -> TrackerSnapshot {
        TrackerSnapshot {
            last_seen_url: Some("https://a.test/final".to_string()),
            last_seen_status: 200,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            redirect_chain: vec![Redirect::new(301, "http://a.test/")],
            debug_trace: "HTTP/1.1 301\r\n\r\nHTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\n"
                .to_string(),
        }
    }

    #[test]
    fn test_assemble_success() {
        let outcome = EngineOutcome {
            status: 200,
            effective_url: "https://a.test/final".to_string(),
            error_code: RawErrorCode::OK,
            error_message: String::new(),
            body: Some("hello".to_string()),
        };
        let result = RequestResult::assemble("http://a.test/", snapshot(), outcome);

        assert_eq!(result.status_code, 200);
        assert_eq!(result.final_url, "https://a.test/final");
        assert_eq!(result.redirect_chain, vec![Redirect::new(301, "http://a.test/")]);
        assert_eq!(result.body.as_deref(), Some("hello"));
        assert_eq!(result.error_kind, ErrorKind::NoError);
        assert!(result.is_success());
        assert!(result.debug_trace.ends_with("\r\n\r\nhello"));
        assert_eq!(result.header("content-type"), Some("text/plain"));
        assert_eq!(result.header("missing"), None);
    }

    #[test]
    fn test_assemble_without_any_header_line() {
        let outcome = EngineOutcome {
            status: 0,
            effective_url: "http://nowhere.invalid/".to_string(),
            error_code: RawErrorCode::COULDNT_RESOLVE_HOST,
            error_message: "dns error".to_string(),
            body: Some(String::new()),
        };
        let result =
            RequestResult::assemble("http://nowhere.invalid/", TrackerSnapshot::default(), outcome);

        assert_eq!(result.status_code, 0);
        assert_eq!(result.final_url, "http://nowhere.invalid/");
        assert!(result.redirect_chain.is_empty());
        assert!(result.headers.is_empty());
        assert_eq!(result.error_kind, ErrorKind::DnsError);
        assert_eq!(result.error_detail, "dns error");
        assert!(!result.is_success());
        assert_eq!(result.debug_trace, "\r\n");
    }

    #[test]
    fn test_serializes_with_tags() {
        let result = RequestResult {
            status_code: 301,
            error_kind: ErrorKind::TooManyRedirects,
            redirect_chain: vec![Redirect::new(301, "http://a.test/")],
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error_kind"], "too_many_redirects");
        assert_eq!(json["redirect_chain"][0]["status_code"], 301);
        assert_eq!(json["redirect_chain"][0]["url"], "http://a.test/");
        assert!(json["body"].is_null());
    }
}
