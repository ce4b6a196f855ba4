//! Redirect chain and header reconstruction.
//!
//! The engine follows redirects on its own and only tells us, line by line,
//! which header it just received and which URL it is currently processing.
//! `RedirectTracker` turns that stream into the list of superseded hops plus
//! the headers of the hop that is current when the stream ends.
//!
//! A tracker holds the state of exactly one call. `Transport` creates a new
//! one per request and consumes it when the call returns.

use crate::engine::HeaderObserver;

/// One superseded hop: the status it answered with and its URL.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Redirect {
    /// Status code of the hop
    pub status_code: u16,
    /// Effective URL of the hop
    pub url: String,
}

impl Redirect {
    /// Creates a redirect entry.
    pub fn new(status_code: u16, url: impl Into<String>) -> Self {
        Self {
            status_code,
            url: url.into(),
        }
    }
}

/// Per-call observer that rebuilds redirect history from raw header lines.
///
/// Invariant: `current_headers` always holds the structured headers of the
/// most recently seen effective URL, and `redirect_chain` never contains that
/// URL's hop.
#[derive(Debug, Default)]
pub struct RedirectTracker {
    last_seen_url: Option<String>,
    last_seen_status: u16,
    current_headers: Vec<(String, String)>,
    redirect_chain: Vec<Redirect>,
    debug_accumulator: String,
}

impl RedirectTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent effective URL, `None` until the first line arrives.
    pub fn last_seen_url(&self) -> Option<&str> {
        self.last_seen_url.as_deref()
    }

    /// Status associated with `last_seen_url` (0 before the first line).
    pub fn last_seen_status(&self) -> u16 {
        self.last_seen_status
    }

    /// Structured headers of the current hop, in arrival order.
    pub fn current_headers(&self) -> &[(String, String)] {
        &self.current_headers
    }

    /// Hops superseded so far, in visitation order.
    pub fn redirect_chain(&self) -> &[Redirect] {
        &self.redirect_chain
    }

    /// Every raw line seen so far, concatenated.
    pub fn debug_accumulator(&self) -> &str {
        &self.debug_accumulator
    }

    /// Returns `true` once at least one line has been observed.
    pub fn has_observed(&self) -> bool {
        self.last_seen_url.is_some()
    }

    /// Consumes the tracker, yielding its final state.
    pub fn finish(self) -> TrackerSnapshot {
        TrackerSnapshot {
            last_seen_url: self.last_seen_url,
            last_seen_status: self.last_seen_status,
            headers: self.current_headers,
            redirect_chain: self.redirect_chain,
            debug_trace: self.debug_accumulator,
        }
    }

    /// Starts a new hop: the previous one (if any) becomes a redirect entry.
    fn start_hop(&mut self, effective_url: &str, status: u16) {
        if let Some(previous) = self.last_seen_url.take() {
            self.redirect_chain
                .push(Redirect::new(self.last_seen_status, previous));
        }
        self.current_headers.clear();
        self.last_seen_url = Some(effective_url.to_string());
        self.last_seen_status = status;
    }
}

impl HeaderObserver for RedirectTracker {
    fn observe(&mut self, line: &str, effective_url: &str, status: u16) {
        self.debug_accumulator.push_str(line);

        if self.last_seen_url.as_deref() != Some(effective_url) {
            self.start_hop(effective_url, status);
        }

        // Status lines, blank terminators and continuations carry no colon
        if let Some((name, value)) = line.split_once(':') {
            self.current_headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }
}

/// Final tracker state read by `Transport` after the engine returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSnapshot {
    /// Last effective URL observed, `None` if no line ever arrived
    pub last_seen_url: Option<String>,
    /// Status of the last hop
    pub last_seen_status: u16,
    /// Structured headers of the last hop
    pub headers: Vec<(String, String)>,
    /// Superseded hops
    pub redirect_chain: Vec<Redirect>,
    /// All raw header lines
    pub debug_trace: String,
}
