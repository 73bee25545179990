//! Integration tests for layered configuration loading

use crate::integration::test_utils::with_isolated_env;
use billbrief::config::{ConfigLoader, DEFAULT_MODEL};
use billbrief::error::ConfigError;
use chrono::NaiveDate;
use tempfile::TempDir;

fn write_workspace_config(root: &std::path::Path, name: &str, contents: &str) {
    let config_dir = root.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(name), contents).unwrap();
}

#[test]
fn test_defaults_without_any_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();

    let config = with_isolated_env(&temp_dir, || ConfigLoader::load(&workspace).unwrap());

    assert_eq!(config.generation.model, DEFAULT_MODEL);
    assert_eq!(config.batch.size, 50);
    assert_eq!(
        config.batch.cutoff_date,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    );
    assert!(config.batch.auto_continue);
    assert_eq!(config.pacing.base_interval_secs, 2.5);
    assert_eq!(config.pacing.jitter_secs, 0.7);
    assert!(config.database.url.is_none());
    assert!(config.credentials.keys.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_and_env_specific_overlay() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[generation]
model = "gemini-2.5-pro"

[batch]
size = 10
cutoff_date = "2025-06-01"
"#,
    );
    write_workspace_config(&workspace, "staging.toml", "[batch]\nsize = 3\n");

    let config = with_isolated_env(&temp_dir, || {
        std::env::set_var("BILLBRIEF_ENV", "staging");
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.generation.model, "gemini-2.5-pro");
    assert_eq!(config.batch.size, 3);
    assert_eq!(
        config.batch.cutoff_date,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    );
}

#[test]
fn test_global_file_is_overridden_by_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");
    write_workspace_config(&workspace, "config.toml", "[batch]\nsize = 12\n");

    let config = with_isolated_env(&temp_dir, || {
        let global = ConfigLoader::global_config_path().unwrap();
        std::fs::create_dir_all(global.parent().unwrap()).unwrap();
        std::fs::write(
            &global,
            "[batch]\nsize = 99\nmax_batches = 4\n\n[database]\nurl = \"postgres://global/bills\"\n",
        )
        .unwrap();
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.batch.size, 12);
    assert_eq!(config.batch.max_batches, Some(4));
    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://global/bills")
    );
}

#[test]
fn test_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");
    write_workspace_config(&workspace, "config.toml", "[batch]\nsize = 12\n");

    let config = with_isolated_env(&temp_dir, || {
        std::env::set_var("BILLBRIEF__BATCH__SIZE", "20");
        std::env::set_var("BILLBRIEF__CREDENTIALS__KEYS", "key-a,key-b");
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.batch.size, 20);
    assert_eq!(config.credentials.keys, vec!["key-a", "key-b"]);
}

#[test]
fn test_database_url_falls_back_to_environment() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();

    let from_env = with_isolated_env(&temp_dir, || {
        std::env::set_var("DATABASE_URL", "postgres://env/bills");
        ConfigLoader::load(&workspace).unwrap()
    });
    assert_eq!(from_env.database.url.as_deref(), Some("postgres://env/bills"));

    write_workspace_config(
        &workspace,
        "config.toml",
        "[database]\nurl = \"postgres://file/bills\"\n",
    );
    let from_file = with_isolated_env(&temp_dir, || {
        std::env::set_var("DATABASE_URL", "postgres://env/bills");
        ConfigLoader::load(&workspace).unwrap()
    });
    assert_eq!(
        from_file.database.url.as_deref(),
        Some("postgres://file/bills")
    );
}

#[test]
fn test_explicit_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    let err = with_isolated_env(&temp_dir, || {
        ConfigLoader::load_from_file(&missing).unwrap_err()
    });
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("billbrief.toml");
    std::fs::write(
        &path,
        "[batch]\nsize = 0\n\n[pacing]\nbase_interval_secs = -1.0\n",
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, || ConfigLoader::load_from_file(&path).unwrap());
    let errors = config.validate().unwrap_err();
    assert!(errors.len() >= 2);
    assert!(matches!(config.ensure_valid(), Err(ConfigError::Invalid(_))));
}
