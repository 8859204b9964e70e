//! Logging setup for the diagram pipeline
//!
//! Structured logging goes through `tracing`. Layout, arrow resolution,
//! rendering, every edit commit, engine calls and gallery I/O emit spans or
//! events; this module installs the subscriber that prints them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use automaton_canvas::core::logging::init_logging;
//!
//! // Defaults: level from the environment, compact output
//! init_logging(None, None).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `AUTOMATON_CANVAS_LOG_LEVEL`: log level or filter directive
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//! - `AUTOMATON_CANVAS_LOG_FORMAT`: `compact`, `pretty` or `json`
//!
//! # Filtering
//!
//! ```bash
//! # Trace the arrow resolver, keep everything else at info
//! RUST_LOG="info,automaton_canvas::core::edge_routing=trace" automaton-canvas export -i nfa.json
//! ```
//!
//! On `wasm32` the subscriber is `tracing-wasm`, which writes to the browser
//! console and ignores the format argument.

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Environment variable consulted for the log level
pub const LOG_LEVEL_ENV: &str = "AUTOMATON_CANVAS_LOG_LEVEL";

/// Environment variable consulted for the log format
pub const LOG_FORMAT_ENV: &str = "AUTOMATON_CANVAS_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
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

/// Resolve the effective level directive: argument, then
/// `AUTOMATON_CANVAS_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Resolve the effective format: argument, then `AUTOMATON_CANVAS_LOG_FORMAT`,
/// then compact.
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    let raw = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok());
    match raw {
        Some(raw) => LogFormat::from_str(&raw).map_err(|e| format!("Invalid log format: {}", e)),
        None => Ok(LogFormat::default()),
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns an error when the format is unknown or a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_level = resolve_level(level);
        let format = resolve_format(format)?;

        let filter = if log_level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        match format {
            LogFormat::Compact => {
                Registry::default()
                    .with(filter)
                    .with(
                        fmt::Layer::default()
                            .with_target(false)
                            .with_level(true)
                            .with_writer(std::io::stderr)
                            .with_span_events(FmtSpan::NONE)
                            .compact(),
                    )
                    .try_init()?;
            }
            LogFormat::Pretty => {
                Registry::default()
                    .with(filter)
                    .with(
                        fmt::Layer::default()
                            .with_target(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_writer(std::io::stderr)
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
                            .with_target(true)
                            .with_writer(std::io::stderr)
                            .with_span_events(FmtSpan::CLOSE)
                            .json(),
                    )
                    .try_init()?;
            }
        }

        Ok(())
    }
}

/// Initialize logging with default settings
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str(" JSON ").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("pretty")).unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_format_argument() {
        let err = resolve_format(Some("xml")).unwrap_err();
        assert!(err.contains("Invalid log format"));
    }

    #[test]
    fn test_log_format_variants() {
        assert_eq!(LogFormat::variants(), &["compact", "pretty", "json"]);
    }
}
