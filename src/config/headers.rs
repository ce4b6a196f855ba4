//! HTTP header name constants.

/// Authorization header
pub const HEADER_AUTHORIZATION: &str = "authorization";
/// Cookie header
pub const HEADER_COOKIE: &str = "cookie";
/// Proxy-Authorization header
pub const HEADER_PROXY_AUTHORIZATION: &str = "proxy-authorization";

/// Caller-supplied headers that are not replayed once a redirect leaves the
/// original host.
pub const SENSITIVE_REDIRECT_HEADERS: &[&str] = &[
    HEADER_AUTHORIZATION,
    HEADER_COOKIE,
    HEADER_PROXY_AUTHORIZATION,
];
