//! Application-wide error types using thiserror.

use citegraph_common::CiteGraphError;
use citegraph_config::ConfigError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data loading, reshaping or rendering failed.
    #[error(transparent)]
    Pipeline(#[from] CiteGraphError),

    /// Some charts could not be written; the rest were.
    #[error("{failed} of {total} charts failed to render")]
    PartialFailure {
        /// Number of failed charts.
        failed: usize,
        /// Number of charts attempted.
        total: usize,
    },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Pipeline(CiteGraphError::MissingInput { .. } | CiteGraphError::NoData { .. }) => 66,
            Self::PartialFailure { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type for the command-line application.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(CiteGraphError::no_data("empty")).exit_code(), 66);
        assert_eq!(CliError::PartialFailure { failed: 1, total: 4 }.exit_code(), 2);
        assert_eq!(CliError::from(CiteGraphError::new("boom")).exit_code(), 1);
    }

    #[test]
    fn test_partial_failure_message() {
        let err = CliError::PartialFailure { failed: 2, total: 8 };
        assert_eq!(err.to_string(), "2 of 8 charts failed to render");
    }
}
