//! Configuration management for citegraph

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ChartConfig, Config, FillPolicy, InputConfig, LogFormat, LoggingSettings, OutputConfig,
    ThemeSettings, ThemesConfig, BUILTIN_THEMES,
};
