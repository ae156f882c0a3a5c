//! Logging initialization.

use anyhow::Result;
use profile_search_common::LogLevel;
use tracing::Level;
use tracing_subscriber::fmt;

pub fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// Logs go to stderr so `search`/`filter` output on stdout stays clean JSON.
pub fn init_logging(level: LogLevel) -> Result<()> {
    fmt::Subscriber::builder()
        .with_max_level(to_level(level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
