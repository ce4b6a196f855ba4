//! Configuration types and CLI options.
//!
//! This module defines the transport configuration and the enums and structs
//! used for command-line argument parsing.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS,
};
use crate::engine::ProtocolVersion;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Request method selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliMethod {
    /// GET request (default)
    Get,
    /// POST request with `--data` as body
    Post,
    /// HEAD request, no body retrieved
    Head,
}

/// Transport-level configuration consumed by the next call.
///
/// `http_version` is normally negotiated once from the engine's capabilities
/// when the `Transport` is built; set it explicitly to pin a version.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Overall time budget for a call (all hops plus body). Zero disables it.
    pub timeout: Duration,
    /// Redirect hops to follow. Zero disables redirect following.
    pub max_redirects: u32,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Protocol version hint passed to the engine.
    pub http_version: ProtocolVersion,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            connect_timeout: CONNECT_TIMEOUT,
            http_version: ProtocolVersion::Http2,
        }
    }
}

/// Issue one HTTP request and report every redirect hop it traversed.
#[derive(Parser, Debug, Clone)]
#[command(name = "redirect_trace")]
#[command(author, version, about)]
pub struct Opt {
    /// Absolute URL to request
    pub url: String,

    /// Request method
    #[arg(short = 'X', long, value_enum, default_value = "get")]
    pub method: CliMethod,

    /// Request body (POST only)
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Extra request header in "Name: Value" form (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Overall timeout in seconds (fractions allowed, 0 disables)
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: f64,

    /// Maximum redirects to follow (0 disables redirect following)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: u32,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Print the raw header/body trace instead of the JSON result
    #[arg(long)]
    pub debug_trace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.max_redirects, 8);
        assert_eq!(config.connect_timeout, Duration::from_millis(2000));
        assert_eq!(config.http_version, ProtocolVersion::Http2);
    }

    #[test]
    fn test_opt_defaults() {
        let opt = Opt::try_parse_from(["redirect_trace", "https://example.com/"]).unwrap();
        assert_eq!(opt.url, "https://example.com/");
        assert_eq!(opt.method, CliMethod::Get);
        assert_eq!(opt.timeout, 4.0);
        assert_eq!(opt.max_redirects, 8);
        assert!(opt.headers.is_empty());
        assert!(opt.data.is_none());
        assert!(!opt.debug_trace);
    }

    #[test]
    fn test_opt_repeated_headers_and_method() {
        let opt = Opt::try_parse_from([
            "redirect_trace",
            "-X",
            "post",
            "-d",
            "a=1",
            "-H",
            "Accept: text/html",
            "--header",
            "X-Test: yes",
            "--max-redirects",
            "0",
            "--timeout",
            "0.5",
            "https://example.com/submit",
        ])
        .unwrap();
        assert_eq!(opt.method, CliMethod::Post);
        assert_eq!(opt.data.as_deref(), Some("a=1"));
        assert_eq!(opt.headers, vec!["Accept: text/html", "X-Test: yes"]);
        assert_eq!(opt.max_redirects, 0);
        assert_eq!(opt.timeout, 0.5);
    }

    #[test]
    fn test_opt_requires_url() {
        assert!(Opt::try_parse_from(["redirect_trace"]).is_err());
    }
}
