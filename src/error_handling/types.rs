//! Error type definitions.
//!
//! This module defines the raw engine error vocabulary, the normalized error
//! kinds reported in results, and the errors raised for contract violations.

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Caller contract violations, rejected before any network attempt.
///
/// Network-level failures are never reported through this type; they land in
/// `RequestResult::error_kind` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request URL was empty.
    #[error("request URL must not be empty")]
    EmptyUrl,

    /// The request URL was not an absolute URL.
    #[error("invalid request URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Why parsing failed
        reason: String,
    },

    /// An extra request header was not a valid `Name: Value` field.
    #[error("invalid request header {0:?}: expected \"Name: Value\" with a valid field name and value")]
    InvalidHeader(String),

    /// The timeout was negative, NaN or infinite.
    #[error("invalid timeout {0}: must be a finite, non-negative number of seconds")]
    InvalidTimeout(f64),
}

/// Numeric error code reported by an engine after a call.
///
/// The numbering follows libcurl's `CURLcode` values so that any engine,
/// native or not, can report failures in one stable vocabulary. Zero means no
/// error; codes without a named constant are still valid and classify as
/// `ErrorKind::Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawErrorCode(pub u32);

impl RawErrorCode {
    /// No error.
    pub const OK: RawErrorCode = RawErrorCode(0);
    /// URL scheme not supported by the engine.
    pub const UNSUPPORTED_PROTOCOL: RawErrorCode = RawErrorCode(1);
    /// The engine could not be initialized for this call.
    pub const FAILED_INIT: RawErrorCode = RawErrorCode(2);
    /// The URL could not be used to build a request.
    pub const URL_MALFORMAT: RawErrorCode = RawErrorCode(3);
    /// Host name resolution failed.
    pub const COULDNT_RESOLVE_HOST: RawErrorCode = RawErrorCode(6);
    /// Connection refused or host unreachable.
    pub const COULDNT_CONNECT: RawErrorCode = RawErrorCode(7);
    /// The body ended before the announced length.
    pub const PARTIAL_FILE: RawErrorCode = RawErrorCode(18);
    /// The configured timeout expired.
    pub const OPERATION_TIMEDOUT: RawErrorCode = RawErrorCode(28);
    /// Generic TLS handshake failure.
    pub const SSL_CONNECT_ERROR: RawErrorCode = RawErrorCode(35);
    /// An option or header handed to the engine was rejected.
    pub const BAD_FUNCTION_ARGUMENT: RawErrorCode = RawErrorCode(43);
    /// More redirects than the configured limit.
    pub const TOO_MANY_REDIRECTS: RawErrorCode = RawErrorCode(47);
    /// Failure receiving network data.
    pub const RECV_ERROR: RawErrorCode = RawErrorCode(56);
    /// Certificate validation problem.
    pub const SSL_CERTPROBLEM: RawErrorCode = RawErrorCode(58);
    /// No usable cipher could be negotiated.
    pub const SSL_CIPHER: RawErrorCode = RawErrorCode(59);
    /// Peer certificate could not be verified against known authorities.
    pub const SSL_CACERT: RawErrorCode = RawErrorCode(60);

    /// Returns `true` if this code reports no error.
    pub fn is_ok(&self) -> bool {
        *self == RawErrorCode::OK
    }
}

impl std::fmt::Display for RawErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized transport error classification.
///
/// Stable string tags, independent of the engine that produced the raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIterMacro)]
pub enum ErrorKind {
    /// No transport-level error (tag `""`)
    #[default]
    NoError,
    /// Host name resolution failed
    DnsError,
    /// Connection refused or unreachable
    ConnectError,
    /// Configured timeout exceeded
    Timeout,
    /// Generic TLS handshake failure
    SslError,
    /// Certificate or certificate-authority validation failure
    SslCertError,
    /// No common cipher suite
    SslUnsupportedCipher,
    /// Redirect limit exceeded
    TooManyRedirects,
    /// Any other failure
    Unknown,
}

impl ErrorKind {
    /// The stable tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoError => "",
            ErrorKind::DnsError => "dns_error",
            ErrorKind::ConnectError => "connect_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::SslError => "ssl_error",
            ErrorKind::SslCertError => "ssl_cert_error",
            ErrorKind::SslUnsupportedCipher => "ssl_unsupported_cipher",
            ErrorKind::TooManyRedirects => "too_many_redirects",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Returns `true` for every kind except `NoError`.
    pub fn is_error(&self) -> bool {
        *self != ErrorKind::NoError
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_kind_tags_are_unique() {
        let tags: HashSet<&str> = ErrorKind::iter().map(|k| k.as_str()).collect();
        assert_eq!(tags.len(), ErrorKind::iter().count());
    }

    #[test]
    fn test_error_kind_display_matches_tag() {
        for kind in ErrorKind::iter() {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_only_no_error_has_empty_tag() {
        for kind in ErrorKind::iter() {
            assert_eq!(kind.as_str().is_empty(), !kind.is_error(), "{:?}", kind);
        }
        assert_eq!(ErrorKind::default(), ErrorKind::NoError);
    }

    #[test]
    fn test_error_kind_serializes_as_tag() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::SslCertError).unwrap(),
            "\"ssl_cert_error\""
        );
        assert_eq!(serde_json::to_string(&ErrorKind::NoError).unwrap(), "\"\"");
    }

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(
            TransportError::EmptyUrl.to_string(),
            "request URL must not be empty"
        );
        let err = TransportError::InvalidHeader("NoColonHere".to_string());
        assert!(err.to_string().contains("NoColonHere"));
        assert!(TransportError::InvalidTimeout(-1.0)
            .to_string()
            .contains("-1"));
    }

    #[test]
    fn test_raw_error_code_ok() {
        assert!(RawErrorCode::OK.is_ok());
        assert!(RawErrorCode::default().is_ok());
        assert!(!RawErrorCode::COULDNT_CONNECT.is_ok());
        assert_eq!(RawErrorCode::TOO_MANY_REDIRECTS.to_string(), "47");
    }
}
