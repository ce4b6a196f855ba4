//! Error categorization.
//!
//! `classify` maps raw engine codes onto stable `ErrorKind` tags.
//! `raw_code_for_reqwest_error` maps `reqwest::Error`s onto raw codes by
//! walking the error chain.

use std::error::Error as StdError;

use rustls::{CertificateError, PeerIncompatible};

use super::types::{ErrorKind, RawErrorCode};

/// Categorizes a raw engine error code into an `ErrorKind`.
///
/// Total and pure: every code maps to a kind, `0` maps to `NoError` and any
/// unrecognized non-zero code maps to `Unknown`.
pub fn classify(code: RawErrorCode) -> ErrorKind {
    match code {
        RawErrorCode::OK => ErrorKind::NoError,
        RawErrorCode::COULDNT_RESOLVE_HOST => ErrorKind::DnsError,
        RawErrorCode::COULDNT_CONNECT => ErrorKind::ConnectError,
        RawErrorCode::OPERATION_TIMEDOUT => ErrorKind::Timeout,
        RawErrorCode::SSL_CONNECT_ERROR => ErrorKind::SslError,
        RawErrorCode::SSL_CERTPROBLEM => ErrorKind::SslCertError,
        RawErrorCode::SSL_CIPHER => ErrorKind::SslUnsupportedCipher,
        RawErrorCode::SSL_CACERT => ErrorKind::SslCertError,
        RawErrorCode::TOO_MANY_REDIRECTS => ErrorKind::TooManyRedirects,
        _ => ErrorKind::Unknown,
    }
}

/// Categorizes a `reqwest::Error` into a `RawErrorCode`.
///
/// TLS and DNS causes are checked before the generic connect classification
/// because reqwest reports both as connect errors.
pub fn raw_code_for_reqwest_error(error: &reqwest::Error) -> RawErrorCode {
    if error.is_timeout() {
        return RawErrorCode::OPERATION_TIMEDOUT;
    }
    if error.is_builder() {
        return RawErrorCode::URL_MALFORMAT;
    }
    if let Some(code) = tls_code_in_chain(error) {
        return code;
    }
    if is_dns_failure(error) {
        return RawErrorCode::COULDNT_RESOLVE_HOST;
    }
    if error.is_connect() {
        return RawErrorCode::COULDNT_CONNECT;
    }
    if error.is_redirect() {
        return RawErrorCode::TOO_MANY_REDIRECTS;
    }
    if error.is_body() || error.is_decode() {
        return RawErrorCode::PARTIAL_FILE;
    }
    RawErrorCode::RECV_ERROR
}

/// Renders an error and all of its sources as one `: `-separated line.
pub fn describe_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Iterates over an error and all of its sources.
///
/// `std::io::Error::source` skips the wrapped error itself, so the wrapped
/// error is yielded explicitly after each `io::Error`.
fn error_chain<'a>(error: &'a (dyn StdError + 'static)) -> Vec<&'a (dyn StdError + 'static)> {
    let mut chain = Vec::new();
    let mut current = Some(error);
    while let Some(err) = current {
        chain.push(err);
        if let Some(inner) = err
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
        {
            let inner: &(dyn StdError + 'static) = inner;
            chain.push(inner);
        }
        current = err.source();
    }
    chain
}

fn tls_code_in_chain(error: &reqwest::Error) -> Option<RawErrorCode> {
    let chain = error_chain(error);
    if let Some(tls) = chain
        .iter()
        .find_map(|cause| cause.downcast_ref::<rustls::Error>())
    {
        return Some(tls_code(tls));
    }

    // Fallback for TLS failures that reach us only as text. The top-level
    // message embeds the request URL, so only sources are inspected.
    let message_mentions_tls = chain.iter().skip(1).any(|cause| {
        let msg = cause.to_string().to_lowercase();
        msg.contains("certificate") || msg.contains("tls handshake") || msg.contains("ssl")
    });
    message_mentions_tls.then_some(RawErrorCode::SSL_CONNECT_ERROR)
}

/// Maps a rustls error onto the raw TLS codes.
pub(crate) fn tls_code(error: &rustls::Error) -> RawErrorCode {
    match error {
        rustls::Error::InvalidCertificate(CertificateError::UnknownIssuer) => {
            RawErrorCode::SSL_CACERT
        }
        rustls::Error::InvalidCertificate(_) => RawErrorCode::SSL_CERTPROBLEM,
        rustls::Error::PeerIncompatible(PeerIncompatible::NoCipherSuitesInCommon) => {
            RawErrorCode::SSL_CIPHER
        }
        _ => RawErrorCode::SSL_CONNECT_ERROR,
    }
}

fn is_dns_failure(error: &reqwest::Error) -> bool {
    error_chain(error).iter().skip(1).any(|cause| {
        let msg = cause.to_string().to_lowercase();
        msg.contains("dns error")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("no such host")
    })
}
