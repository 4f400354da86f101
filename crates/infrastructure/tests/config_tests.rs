use domain::config::*;
use infrastructure::config::{ConfigLoader, ConfigSource, ConfigValidator};
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;

fn isolated_loader(paths: Vec<PathBuf>, prefix: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_paths(paths)
        .with_env_prefix(prefix.to_string())
}

#[tokio::test]
async fn test_defaults_without_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let loader = isolated_loader(vec![temp_dir.path().join("missing.toml")], "PROOFREADER_T0_");

    let (config, source) = loader.load_with_source().await?;

    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config, ProofreaderConfig::default());
    Ok(())
}

#[tokio::test]
async fn test_config_loader_from_toml() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("proofreader.toml");

    let toml_content = r#"
[ai]
model = "gemini-2.5-flash"
structured_output = false

[retry]
max_retries = 2
initial_delay_ms = 500

[throttle]
min_interval_ms = 4000

[logging]
level = "debug"
"#;
    fs::write(&config_path, toml_content).await?;

    let loader = isolated_loader(vec![config_path.clone()], "PROOFREADER_T1_");
    let (config, source) = loader.load_with_source().await?;

    assert_eq!(source, ConfigSource::File(config_path));
    assert_eq!(config.ai.model, "gemini-2.5-flash");
    assert!(!config.ai.structured_output);
    assert_eq!(config.ai.timeout_secs, 60);
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.retry.initial_delay_ms, 500);
    assert_eq!(config.throttle.min_interval_ms, 4000);
    assert_eq!(config.logging.level, "debug");
    Ok(())
}

#[tokio::test]
async fn test_config_loader_from_json() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("proofreader.json");

    let json_content = r#"{
  "storage": { "path": "/tmp/review/storage.json" },
  "logging": { "json": true }
}"#;
    fs::write(&config_path, json_content).await?;

    let config = isolated_loader(vec![config_path], "PROOFREADER_T2_").load().await?;

    assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/review/storage.json")));
    assert!(config.logging.json);
    assert_eq!(config.throttle.min_interval_ms, 1200);
    Ok(())
}

#[tokio::test]
async fn test_first_readable_file_wins() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let broken = temp_dir.path().join("broken.toml");
    let good = temp_dir.path().join("good.toml");
    fs::write(&broken, "[ai\nmodel = ").await?;
    fs::write(&good, "[ai]\nmodel = \"from-good\"\n").await?;

    let config = isolated_loader(vec![broken, good], "PROOFREADER_T3_").load().await?;

    assert_eq!(config.ai.model, "from-good");
    Ok(())
}

#[tokio::test]
async fn test_env_overrides() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("proofreader.toml");
    fs::write(&config_path, "[ai]\nmodel = \"from-file\"\n").await?;

    env::set_var("PROOFREADER_T4_MODEL", "from-env");
    env::set_var("PROOFREADER_T4_MIN_INTERVAL_MS", "2500");
    env::set_var("PROOFREADER_T4_MAX_RETRIES", "1");
    env::set_var("PROOFREADER_T4_INITIAL_DELAY_MS", "100");
    env::set_var("PROOFREADER_T4_BASE_URL", "http://127.0.0.1:9999");
    env::set_var("PROOFREADER_T4_STORAGE_PATH", "/tmp/other.json");
    env::set_var("PROOFREADER_T4_LOG_LEVEL", "trace");
    env::set_var("PROOFREADER_T4_LOG_JSON", "yes");

    let config = isolated_loader(vec![config_path], "PROOFREADER_T4_").load().await?;

    assert_eq!(config.ai.model, "from-env");
    assert_eq!(config.ai.base_url, "http://127.0.0.1:9999");
    assert_eq!(config.throttle.min_interval_ms, 2500);
    assert_eq!(config.retry.max_retries, 1);
    assert_eq!(config.retry.initial_delay_ms, 100);
    assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/other.json")));
    assert_eq!(config.logging.level, "trace");
    assert!(config.logging.json);
    Ok(())
}

#[tokio::test]
async fn test_invalid_env_number_is_rejected() {
    env::set_var("PROOFREADER_T5_MIN_INTERVAL_MS", "soon");

    let result = isolated_loader(Vec::new(), "PROOFREADER_T5_").load().await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_save_and_reload() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("conf").join("config.toml");

    let mut config = ProofreaderConfig::default();
    config.throttle.min_interval_ms = 3000;
    config.ai.structured_output = false;

    let loader = isolated_loader(vec![path.clone()], "PROOFREADER_T6_");
    loader.save_config(&config, &path).await?;
    let reloaded = loader.load().await?;

    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_example_config_parses() {
    let example = ConfigLoader::generate_example_config();
    let parsed: ProofreaderConfig = toml::from_str(&example).expect("example is valid TOML");
    assert_eq!(parsed, ProofreaderConfig::default());
}

#[test]
fn test_validator() {
    let validator = ConfigValidator::new();
    assert!(validator.validate(&ProofreaderConfig::default()).is_ok());

    let mut config = ProofreaderConfig::default();
    config.ai.model = " ".to_string();
    assert!(validator.validate(&config).is_err());

    let mut config = ProofreaderConfig::default();
    config.retry.backoff_multiplier = 0.0;
    assert!(validator.validate(&config).is_err());

    let mut config = ProofreaderConfig::default();
    config.retry.max_delay_ms = 10;
    assert!(validator.validate(&config).is_err());

    let mut config = ProofreaderConfig::default();
    config.ai.base_url = "generativelanguage.googleapis.com".to_string();
    assert!(validator.validate(&config).is_err());

    let mut config = ProofreaderConfig::default();
    config.logging.level = "loud".to_string();
    assert!(validator.validate(&config).is_err());

    let mut config = ProofreaderConfig::default();
    config.throttle.min_interval_ms = 0;
    assert!(validator.validate(&config).is_ok());
}
