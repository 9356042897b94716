//! Logging setup for the generation pipeline
//!
//! Structured logging goes through `tracing`. The library only emits spans and
//! events; binaries decide whether and how to install a subscriber.
//!
//! # Usage
//!
//! ```rust,no_run
//! use classforge::core::logging::init_logging;
//!
//! init_logging(None, None).unwrap();
//! // or
//! init_logging(Some("debug"), Some("pretty")).unwrap();
//! ```
//!
//! # Formats
//!
//! - `compact`: single line per event (default)
//! - `pretty`: multi-line with source locations
//! - `json`: one JSON object per event
//!
//! # Environment Variables
//!
//! - `CLASSFORGE_LOG_LEVEL`: log level or filter directive
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//! - `CLASSFORGE_LOG_FORMAT`: compact|pretty|json
//!
//! Filters can target a single stage:
//!
//! ```bash
//! RUST_LOG="info,classforge::parser::builder=trace" classforge generate ...
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Install a global tracing subscriber
///
/// `level` falls back to `CLASSFORGE_LOG_LEVEL`, then `RUST_LOG`, then `warn`.
/// `format` falls back to `CLASSFORGE_LOG_FORMAT`, then `compact`.
///
/// Fails if the format is unknown or a global subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("CLASSFORGE_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("CLASSFORGE_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let format = LogFormat::from_str(&log_format)
        .map_err(|e| format!("Invalid log format: {}", e))?;

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so generated output piped through stdout stays clean.
    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}
