//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `redirect_trace` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the result
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;

use redirect_trace::config::{CliMethod, Opt};
use redirect_trace::initialization::init_logger_with;
use redirect_trace::Transport;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut transport = Transport::new();
    transport
        .set_timeout(opt.timeout)
        .context("Invalid --timeout")?;
    transport.set_max_redirects(opt.max_redirects);

    let result = match opt.method {
        CliMethod::Get => transport.get(&opt.url, &opt.headers).await,
        CliMethod::Head => transport.head(&opt.url, &opt.headers).await,
        CliMethod::Post => {
            let body = opt.data.clone().unwrap_or_default();
            transport.post(&opt.url, body, &opt.headers).await
        }
    }
    .context("Request rejected")?;

    if opt.debug_trace {
        print!("{}", result.debug_trace);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    }

    // Transport failures are part of the result; exit non-zero so scripts can tell
    if result.is_success() {
        Ok(())
    } else {
        std::process::exit(2);
    }
}
