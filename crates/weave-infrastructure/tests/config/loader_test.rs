//! Configuration Loader Tests

use std::fs;

use tempfile::TempDir;
use weave_infrastructure::config::{ConfigLoader, WeaveConfig};
use weave_infrastructure::constants::DEFAULT_LOG_LEVEL;

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .load()
        .unwrap();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.environment.name, "Production");
    assert!(config.composition.excluded_modules.is_empty());
    assert_eq!(config.composition.validate_scopes, None);
}

#[test]
fn test_file_values_override_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("weave.toml");
    fs::write(
        &config_path,
        r#"
        [logging]
        level = "debug"

        [environment]
        name = "Development"
        application_name = "orders"

        [composition]
        excluded_modules = ["orders::legacy"]
        validate_scopes = false
        "#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.environment.application_name, "orders");
    assert_eq!(config.composition.excluded_modules, vec!["orders::legacy"]);
    assert_eq!(config.composition.validate_scopes, Some(false));
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("weave.toml");
    fs::write(&config_path, "[logging]\nlevel = \"loud\"\n").unwrap();

    let result = ConfigLoader::new().with_config_path(&config_path).load();
    assert!(result.is_err());
}

#[test]
fn test_empty_module_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("weave.toml");
    fs::write(&config_path, "[composition]\ncandidate_modules = [\"\"]\n").unwrap();

    let result = ConfigLoader::new().with_config_path(&config_path).load();
    assert!(result.is_err());
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.toml");

    let mut original = WeaveConfig::default();
    original.environment.name = "Staging".to_string();
    original.composition.candidate_modules = vec!["orders".to_string()];

    let loader = ConfigLoader::new();
    loader.save_to_file(&original, &config_path).unwrap();

    let loaded = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap();
    assert_eq!(loaded.environment.name, "Staging");
    assert_eq!(loaded.composition.candidate_modules, vec!["orders"]);
}

#[test]
fn test_configuration_handle_reads_custom_sections() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("weave.toml");
    fs::write(&config_path, "[orders]\nbatch_size = 25\n").unwrap();

    let loader = ConfigLoader::new().with_config_path(&config_path);
    let configuration = loader.load_configuration();

    assert_eq!(configuration.get::<u32>("orders.batch_size").unwrap(), Some(25));
    assert_eq!(
        configuration.get::<String>("logging.level").unwrap().as_deref(),
        Some(DEFAULT_LOG_LEVEL)
    );
    assert_eq!(loader.config_path(), Some(config_path.as_path()));
}
