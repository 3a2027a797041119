//! Error types and utilities for citegraph

use thiserror::Error;

/// Result type alias for citegraph operations
pub type Result<T> = std::result::Result<T, CiteGraphError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for citegraph operations
#[derive(Error, Debug)]
pub enum CiteGraphError {
    /// The observation log does not exist or holds no rows
    #[error("Missing input: {message}")]
    MissingInput {
        message: String,
        path: Option<String>,
    },

    /// Reshape was asked to pivot an empty observation set
    #[error("No data: {message}")]
    NoData { message: String },

    /// A series is too short to be interpolated
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A top-K request that cannot be satisfied
    #[error("Invalid rank request: {message}")]
    InvalidRank { message: String, requested: usize },

    /// Rendering or writing a chart artifact failed
    #[error("Render I/O error: {message}")]
    RenderIo {
        message: String,
        target: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl CiteGraphError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput {
            message: msg.into(),
            path: None,
        }
    }

    /// Missing-input error that names the offending path
    pub fn missing_input_at(msg: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingInput {
            message: msg.into(),
            path: Some(path.into()),
        }
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData {
            message: msg.into(),
        }
    }

    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    pub fn invalid_rank(msg: impl Into<String>, requested: usize) -> Self {
        Self::InvalidRank {
            message: msg.into(),
            requested,
        }
    }

    /// Create a render error for a specific output target
    pub fn render_io(msg: impl Into<String>, target: impl Into<String>) -> Self {
        Self::RenderIo {
            message: msg.into(),
            target: Some(target.into()),
            source: None,
        }
    }

    /// Create a render error with an underlying cause
    pub fn render_io_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RenderIo {
            message: msg.into(),
            target: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach an output target to a render error, leaving other variants untouched
    pub fn for_target(self, target: impl Into<String>) -> Self {
        match self {
            Self::RenderIo {
                message,
                target: None,
                source,
            } => Self::RenderIo {
                message,
                target: Some(target.into()),
                source,
            },
            other => other,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether the pipeline may continue past this error
    ///
    /// Smoothing, ranking and per-artifact render failures are handled where
    /// they occur; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::InvalidRank { .. } | Self::RenderIo { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from serde_yaml::Error to CiteGraphError
impl From<serde_yaml::Error> for CiteGraphError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to CiteGraphError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for CiteGraphError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::render_io_with_source("Chart rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = CiteGraphError::new("test message");
        assert!(error.to_string().contains("test message"));

        let missing = CiteGraphError::missing_input_at("log not found", "citations_history.csv");
        assert!(missing.to_string().contains("Missing input"));
        assert!(matches!(missing, CiteGraphError::MissingInput { path: Some(_), .. }));

        let insufficient = CiteGraphError::insufficient_data(2, 1);
        assert_eq!(
            insufficient.to_string(),
            "Insufficient data: need at least 2 points, got 1"
        );

        let rank = CiteGraphError::invalid_rank("k must be at least 1", 0);
        assert!(rank.to_string().contains("Invalid rank request"));

        let validation_error = CiteGraphError::validation_field("Invalid input", "top_k");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = CiteGraphError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());

        let config_source_error = CiteGraphError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );

        assert!(config_source_error.to_string().contains("Configuration error"));
        assert!(config_source_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let converted: CiteGraphError = io_error.into();

        assert!(converted.to_string().contains("I/O error"));
        assert!(converted.source().is_some());
    }

    #[test]
    fn test_render_error_target_attachment() {
        let err = CiteGraphError::render_io_with_source(
            "Chart rendering failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        )
        .for_target("out/cumulative_citations_white.png");

        match err {
            CiteGraphError::RenderIo { target, source, .. } => {
                assert_eq!(target.as_deref(), Some("out/cumulative_citations_white.png"));
                assert!(source.is_some());
            }
            other => panic!("unexpected variant: {other:?}"),
        }

        // Non-render errors pass through unchanged
        let untouched = CiteGraphError::no_data("empty").for_target("ignored");
        assert!(matches!(untouched, CiteGraphError::NoData { .. }));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(CiteGraphError::insufficient_data(2, 1).is_recoverable());
        assert!(CiteGraphError::invalid_rank("zero", 0).is_recoverable());
        assert!(CiteGraphError::render_io("disk full", "a.png").is_recoverable());
        assert!(!CiteGraphError::missing_input("gone").is_recoverable());
        assert!(!CiteGraphError::no_data("empty").is_recoverable());
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let converted: CiteGraphError = yaml_error.into();
        assert!(converted.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = CiteGraphError::config_with_source("Middle layer", root_error);
        let top_error = CiteGraphError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
    }
}
