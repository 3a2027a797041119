//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Names of the themes that ship with citegraph
pub const BUILTIN_THEMES: [&str; 3] = ["white", "dark", "light"];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Observation log and wide-format output locations
    #[validate]
    pub input: InputConfig,

    /// Chart output locations
    #[validate]
    pub output: OutputConfig,

    /// Chart data and rendering settings
    #[validate]
    pub chart: ChartConfig,

    /// Theme selection and custom theme definitions
    pub themes: ThemesConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// Input file locations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    /// Long-format observation log (`Date,Title,Citations`)
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid history path"))]
    pub history_path: String,

    /// Where the wide-format matrix is written on every run
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid wide output path"))]
    pub wide_output_path: String,
}

/// Chart output locations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives all chart images
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid output directory"))]
    pub directory: String,

    /// File stem of the cumulative chart
    #[validate(length(min = 1, message = "Cumulative chart stem cannot be empty"))]
    pub cumulative_stem: String,

    /// File stem of the top-K chart
    #[validate(length(min = 1, message = "Top chart stem cannot be empty"))]
    pub top_stem: String,

    /// Sub-directory for one chart per publication
    #[validate(length(min = 1, message = "Individual chart directory cannot be empty"))]
    pub individual_dir: String,

    /// Whether per-publication charts are produced
    pub individual_charts: bool,
}

/// How absent cells are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Draw absent cells as zero
    #[default]
    Zero,
    /// Leave absent cells out of the drawn series
    Skip,
}

/// Chart data and rendering settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    /// Image width in pixels
    #[validate(range(min = 200, max = 8000, message = "Width must be between 200 and 8000 pixels"))]
    pub width: u32,

    /// Image height in pixels
    #[validate(range(min = 200, max = 8000, message = "Height must be between 200 and 8000 pixels"))]
    pub height: u32,

    /// Evaluation points of each smoothed curve
    #[validate(range(min = 2, max = 100000, message = "Samples must be between 2 and 100000"))]
    pub samples: usize,

    /// Number of publications in the ranked chart
    #[validate(range(min = 1, max = 100, message = "Top K must be between 1 and 100"))]
    pub top_k: usize,

    /// Display treatment of absent cells
    pub fill_policy: FillPolicy,

    /// Preferred font families, best first
    pub font_candidates: Vec<String>,

    /// Family used when no candidate is installed
    #[validate(length(min = 1, message = "Fallback font cannot be empty"))]
    pub fallback_font: String,

    /// Y axis description
    pub y_label: String,

    /// Characters kept from a title in the top-K legend
    #[validate(range(min = 4, max = 200, message = "Legend label width must be between 4 and 200"))]
    pub legend_label_chars: usize,
}

/// A theme definition supplied through configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ThemeSettings {
    #[validate(custom(function = "crate::validation::validate_theme_name", message = "Theme names may only contain letters, digits, '-' and '_'"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Background color must be a #RRGGBB hex color"))]
    pub background_color: String,
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Text color must be a #RRGGBB hex color"))]
    pub text_color: String,
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Edge color must be a #RRGGBB hex color"))]
    pub edge_color: String,
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Line color must be a #RRGGBB hex color"))]
    pub line_color: String,
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Grid color must be a #RRGGBB hex color"))]
    pub grid_color: String,
}

/// Theme selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    /// Themes rendered on every run
    pub selected: Vec<String>,

    /// Additional themes, addressable by name from `selected`
    pub custom: Vec<ThemeSettings>,
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Line format
    pub format: LogFormat,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            history_path: "citations_history.csv".to_string(),
            wide_output_path: "citations_wide_format.csv".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            cumulative_stem: "cumulative_citations".to_string(),
            top_stem: "top_citations".to_string(),
            individual_dir: "individual_plots".to_string(),
            individual_charts: true,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            samples: 500,
            top_k: 5,
            fill_policy: FillPolicy::Zero,
            font_candidates: vec![
                "Humor Sans".to_string(),
                "Comic Neue".to_string(),
                "xkcd".to_string(),
                "Comic Sans MS".to_string(),
            ],
            fallback_font: "sans-serif".to_string(),
            y_label: "CITATIONS".to_string(),
            legend_label_chars: 40,
        }
    }
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            selected: vec!["white".to_string()],
            custom: Vec::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: LogFormat::Full,
        }
    }
}

impl LoggingSettings {
    /// Translate into the subscriber options understood by `citegraph_common::logging`
    pub fn to_logging_config(&self) -> citegraph_common::LoggingConfig {
        citegraph_common::LoggingConfig {
            level: self.level.to_ascii_lowercase(),
            compact_format: self.format == LogFormat::Compact,
            pretty_format: self.format == LogFormat::Pretty,
            file_path: self.file.clone(),
            ..citegraph_common::LoggingConfig::default()
        }
    }
}

impl ThemesConfig {
    /// Custom validation: every custom theme is well formed and every selected
    /// name resolves to a built-in or custom theme
    pub fn validate_themes(&self) -> Result<(), ValidationErrors> {
        for theme in &self.custom {
            theme.validate()?;
        }

        let mut errors = ValidationErrors::new();

        if self.selected.is_empty() {
            let mut err = ValidationError::new("no_themes_selected");
            err.message = Some("At least one theme must be selected".into());
            errors.add("selected", err);
        }

        for name in &self.selected {
            let known = BUILTIN_THEMES.contains(&name.as_str())
                || self.custom.iter().any(|t| &t.name == name);
            if !known {
                let mut err = ValidationError::new("unknown_theme");
                err.message = Some(format!("Unknown theme '{}'", name).into());
                errors.add("selected", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.themes.validate_themes()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.chart.samples, 500);
        assert_eq!(config.chart.top_k, 5);
        assert_eq!(config.themes.selected, vec!["white"]);
        assert_eq!(config.input.history_path, "citations_history.csv");
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let mut config = Config::default();
        config.themes.selected = vec!["neon".to_string()];
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_custom_theme_selectable() {
        let mut config = Config::default();
        config.themes.custom.push(ThemeSettings {
            name: "sepia".to_string(),
            background_color: "#F4ECD8".to_string(),
            text_color: "#5B4636".to_string(),
            edge_color: "#5B4636".to_string(),
            line_color: "#8B4513".to_string(),
            grid_color: "#D8CBB0".to_string(),
        });
        config.themes.selected = vec!["white".to_string(), "sepia".to_string()];
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_custom_theme_with_bad_color_rejected() {
        let mut config = Config::default();
        config.themes.custom.push(ThemeSettings {
            name: "broken".to_string(),
            background_color: "white".to_string(),
            text_color: "#000000".to_string(),
            edge_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            grid_color: "#000000".to_string(),
        });
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_range_validation() {
        let mut config = Config::default();
        config.chart.top_k = 0;
        assert!(config.validate_all().is_err());

        let mut config = Config::default();
        config.chart.samples = 1;
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_logging_settings_translation() {
        let settings = LoggingSettings {
            level: "DEBUG".to_string(),
            file: Some("citegraph.log".to_string()),
            format: LogFormat::Compact,
        };
        let logging = settings.to_logging_config();
        assert_eq!(logging.level, "debug");
        assert!(logging.compact_format);
        assert!(!logging.pretty_format);
        assert_eq!(logging.file_path.as_deref(), Some("citegraph.log"));
    }
}
