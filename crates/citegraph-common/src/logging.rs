//! Structured logging infrastructure for citegraph

use std::io;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "citegraph_graphs=trace")
    pub level: String,
    /// Use the compact single-line format
    pub compact_format: bool,
    /// Use the multi-line pretty format with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            compact_format: false,
            pretty_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &str) -> io::Result<std::fs::File> {
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the tracing subscriber with the given configuration
///
/// Progress lines go to stderr so that stdout stays free for command output.
pub fn init_logging(config: LoggingConfig) -> InitResult {
    let env_filter = build_filter(&config.level);

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.compact_format {
        let layer = fmt::layer()
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .compact();

        if let Some(file_path) = config.file_path {
            let file = open_log_file(&file_path)?;
            registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?;
        } else {
            registry.with(layer.with_writer(io::stderr)).try_init()?;
        }
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        if let Some(file_path) = config.file_path {
            let file = open_log_file(&file_path)?;
            registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?;
        } else {
            registry.with(layer.with_writer(io::stderr)).try_init()?;
        }
    } else {
        let layer = fmt::layer()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        if let Some(file_path) = config.file_path {
            let file = open_log_file(&file_path)?;
            registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?;
        } else {
            registry.with(layer.with_writer(io::stderr)).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.compact_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_build_filter_keeps_level() {
        let filter = build_filter("debug");
        assert_eq!(filter.to_string(), "debug");
    }
}
