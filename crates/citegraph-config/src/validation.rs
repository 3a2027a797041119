//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Regex pattern for theme names, which end up in output file names
pub static THEME_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid theme name regex pattern")
});

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a `#RRGGBB` color string
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

/// Validate a theme name
pub fn validate_theme_name(name: &str) -> Result<(), ValidationError> {
    if THEME_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_theme_name"))
    }
}

/// Validate a log level
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}
