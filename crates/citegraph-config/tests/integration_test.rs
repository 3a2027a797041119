//! Integration tests for citegraph-config crate.

use citegraph_config::{Config, ConfigError, ConfigLoader, FillPolicy, LogFormat};
use std::collections::HashMap;

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(config.validate_all().is_ok());

    config.themes.selected.clear();
    assert!(config.validate_all().is_err());

    config.themes.selected.push("dark".to_string());
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_full_yaml_round_trip_through_loader() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("citegraph.yaml");

    let mut config = Config::default();
    config.chart.fill_policy = FillPolicy::Skip;
    config.logging.format = LogFormat::Pretty;
    config.themes.selected = vec!["white".to_string(), "light".to_string()];
    std::fs::write(&path, serde_yaml::to_string(&config).expect("serialize")).expect("write");

    let loaded = ConfigLoader::load_config_with(&path, |_| None).expect("load");
    assert_eq!(loaded.chart.fill_policy, FillPolicy::Skip);
    assert_eq!(loaded.logging.format, LogFormat::Pretty);
    assert_eq!(loaded.themes.selected, config.themes.selected);
    assert_eq!(loaded.chart.font_candidates, config.chart.font_candidates);
}

#[test]
fn test_custom_theme_from_yaml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("citegraph.yaml");
    std::fs::write(
        &path,
        r##"
themes:
  selected: [sepia]
  custom:
    - name: sepia
      background_color: "#F4ECD8"
      text_color: "#5B4636"
      edge_color: "#5B4636"
      line_color: "#8B4513"
      grid_color: "#D8CBB0"
"##,
    )
    .expect("write");

    let config = ConfigLoader::load_config_with(&path, |_| None).expect("load");
    assert_eq!(config.themes.custom.len(), 1);
    assert_eq!(config.themes.custom[0].name, "sepia");
}

#[test]
fn test_env_override_can_invalidate_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("citegraph.yaml");
    std::fs::write(&path, "chart:\n  top_k: 5\n").expect("write");

    let vars: HashMap<&str, &str> = [("CITEGRAPH_THEMES", "neon")].into_iter().collect();
    let result =
        ConfigLoader::load_config_with(&path, |key| vars.get(key).map(|v| v.to_string()));

    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}
