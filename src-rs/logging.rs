//! Tracing subscriber setup.
//!
//! `LOG_LEVEL` picks the default level and `LOG_FORMAT` one of `json`,
//! `pretty` or `compact`. `RUST_LOG`, when set, replaces the filter entirely.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unknown values fall back to compact output.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

fn build_filter(level: &str) -> EnvFilter {
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    let mut filter = EnvFilter::new(level.trim().to_lowercase());
    for directive in ["hyper=warn", "reqwest=warn", "tower_http=info"] {
        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }
    filter
}

/// Installs the global subscriber. Calling it twice keeps the first one.
pub fn init_logging(level: &str, format: LogFormat) {
    let subscriber = tracing_subscriber::registry().with(build_filter(level));
    let result = match format {
        LogFormat::Json => subscriber.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => subscriber.with(fmt::layer().pretty().with_ansi(true)).try_init(),
        LogFormat::Compact => subscriber.with(fmt::layer().compact()).try_init(),
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {}", err);
    }
}
