//! HTTP protocol version negotiation.

/// Protocol version hint handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Prefer HTTP/2, falling back to HTTP/1.1 where the peer does not offer it
    Http2,
    /// HTTP/1.1 only
    Http11,
    /// HTTP/1.0 only
    Http10,
    /// No explicit hint, the engine picks
    EngineDefault,
}

/// Versions tried in order of preference, newest first.
pub const PREFERRED_VERSIONS: [ProtocolVersion; 3] = [
    ProtocolVersion::Http2,
    ProtocolVersion::Http11,
    ProtocolVersion::Http10,
];

/// Picks the best version an engine supports.
///
/// Walks `PREFERRED_VERSIONS` and returns the first one present in
/// `supported`; returns `EngineDefault` when none is. Pure, so callers compute
/// it once and keep the result in their configuration.
pub fn negotiate_http_version(supported: &[ProtocolVersion]) -> ProtocolVersion {
    PREFERRED_VERSIONS
        .iter()
        .copied()
        .find(|version| supported.contains(version))
        .unwrap_or(ProtocolVersion::EngineDefault)
}
