//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "CITEGRAPH_CONFIG_PATH";

/// Configuration files probed in the working directory, in order
const DEFAULT_CONFIG_FILES: [&str; 2] = ["citegraph.yaml", "citegraph.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for citegraph_common::CiteGraphError {
    fn from(err: ConfigError) -> Self {
        citegraph_common::CiteGraphError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |key| env::var(key).ok())
    }

    /// Load a YAML file, resolving overrides through `lookup` instead of the process environment
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_overrides(&mut config, lookup)?;
        config.validate_all()?;

        debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve the configuration for a run
    ///
    /// Order: explicit path, `CITEGRAPH_CONFIG_PATH`, `citegraph.yaml`/`.yml` in
    /// the working directory, then built-in defaults. Environment overrides
    /// apply in every case.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = Self::locate(explicit) {
            return Self::load_config(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate_all()?;
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply overrides to configuration using the given variable lookup
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Input and output locations
        if let Some(path) = lookup("CITEGRAPH_INPUT") {
            config.input.history_path = path;
        }

        if let Some(path) = lookup("CITEGRAPH_WIDE_OUTPUT") {
            config.input.wide_output_path = path;
        }

        if let Some(dir) = lookup("CITEGRAPH_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(themes) = lookup("CITEGRAPH_THEMES") {
            config.themes.selected = themes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Chart settings
        if let Some(top_k) = lookup("CITEGRAPH_TOP_K") {
            config.chart.top_k = parse_var("CITEGRAPH_TOP_K", &top_k)?;
        }

        if let Some(samples) = lookup("CITEGRAPH_SAMPLES") {
            config.chart.samples = parse_var("CITEGRAPH_SAMPLES", &samples)?;
        }

        if let Some(width) = lookup("CITEGRAPH_WIDTH") {
            config.chart.width = parse_var("CITEGRAPH_WIDTH", &width)?;
        }

        if let Some(height) = lookup("CITEGRAPH_HEIGHT") {
            config.chart.height = parse_var("CITEGRAPH_HEIGHT", &height)?;
        }

        // Logging configuration overrides
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_valid_yaml_config() {
        let yaml_content = "input:\n  history_path: \"data/history.csv\"\n  wide_output_path: \"data/wide.csv\"\noutput:\n  directory: \"charts\"\n  individual_charts: false\nchart:\n  width: 1600\n  top_k: 3\n  fill_policy: skip\nthemes:\n  selected: [\"dark\", \"light\"]\nlogging:\n  level: \"debug\"\n  format: compact";

        let temp_file = create_test_config_file(yaml_content);
        let config =
            ConfigLoader::load_config_with(temp_file.path(), no_env).expect("Failed to load config");

        assert_eq!(config.input.history_path, "data/history.csv");
        assert_eq!(config.output.directory, "charts");
        assert!(!config.output.individual_charts);
        assert_eq!(config.chart.width, 1600);
        assert_eq!(config.chart.top_k, 3);
        assert_eq!(config.chart.fill_policy, crate::FillPolicy::Skip);
        assert_eq!(config.themes.selected, vec!["dark", "light"]);
        assert_eq!(config.logging.format, crate::LogFormat::Compact);

        // Unspecified values keep their defaults
        assert_eq!(config.chart.samples, 500);
        assert_eq!(config.output.cumulative_stem, "cumulative_citations");
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_file = create_test_config_file("chart:\n  width: [unclosed array");
        let result = ConfigLoader::load_config_with(temp_file.path(), no_env);

        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_error() {
        let temp_file = create_test_config_file("chart:\n  width: 10\n");
        let result = ConfigLoader::load_config_with(temp_file.path(), no_env);

        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_environment_variable_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CITEGRAPH_INPUT", "env/history.csv"),
            ("CITEGRAPH_OUTPUT_DIR", "env-out"),
            ("CITEGRAPH_THEMES", "dark, light,"),
            ("CITEGRAPH_TOP_K", "10"),
            ("LOG_LEVEL", "warn"),
        ]
        .into_iter()
        .collect();

        let temp_file = create_test_config_file("output:\n  directory: \"yaml-out\"\n");
        let config = ConfigLoader::load_config_with(temp_file.path(), |key| {
            vars.get(key).map(|v| v.to_string())
        })
        .expect("Failed to load config");

        assert_eq!(config.input.history_path, "env/history.csv");
        assert_eq!(config.output.directory, "env-out");
        assert_eq!(config.themes.selected, vec!["dark", "light"]);
        assert_eq!(config.chart.top_k, 10);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_env_parse_error() {
        let temp_file = create_test_config_file("chart:\n  width: 1200\n");
        let result = ConfigLoader::load_config_with(temp_file.path(), |key| {
            (key == "CITEGRAPH_WIDTH").then(|| "not_a_number".to_string())
        });

        match result.unwrap_err() {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "CITEGRAPH_WIDTH"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/citegraph.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_explicit_path_takes_precedence() {
        let temp_file = create_test_config_file("chart:\n  top_k: 7\n");
        let located = ConfigLoader::locate(Some(temp_file.path()));
        assert_eq!(located.as_deref(), Some(temp_file.path()));
    }

    #[test]
    fn test_config_error_converts_to_common_error() {
        let err: citegraph_common::CiteGraphError =
            ConfigError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).into();
        assert!(err.to_string().contains("Configuration error"));
    }
}
