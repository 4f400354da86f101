use anyhow::{Context, Result};
use domain::config::*;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Default => f.write_str("built-in defaults"),
        }
    }
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            env_prefix: "PROOFREADER_".to_string(),
        }
    }

    /// Search `path` before the default locations
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_paths.insert(0, path);
        self
    }

    /// Search only the given locations
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: String) -> Self {
        self.env_prefix = prefix;
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("proofreader.toml"),
            PathBuf::from("proofreader.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("proofreader").join("config.toml"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let system_path = config_dir.join("proofreader").join("config.toml");
            if !paths.contains(&system_path) {
                paths.push(system_path);
            }
        }

        paths
    }

    pub async fn load(&self) -> Result<ProofreaderConfig> {
        Ok(self.load_with_source().await?.0)
    }

    /// First readable config file, then `PROOFREADER_*` overrides
    pub async fn load_with_source(&self) -> Result<(ProofreaderConfig, ConfigSource)> {
        let mut config = ProofreaderConfig::default();
        let mut source = ConfigSource::Default;

        for path in &self.config_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(file_config) => {
                    info!("Loaded configuration from: {}", path.display());
                    config = file_config;
                    source = ConfigSource::File(path.clone());
                    break; // Use first found config file
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }

        if source == ConfigSource::Default {
            debug!("No config file found, using defaults");
        }

        let config = self.apply_env_overrides(config)?;
        Ok((config, source))
    }

    async fn load_file(&self, path: &Path) -> Result<ProofreaderConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" | "" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => {
                // Try TOML first, then JSON
                toml::from_str(&content)
                    .or_else(|_| serde_json::from_str(&content))
                    .context("Failed to parse config file")
            }
        }
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}{}", self.env_prefix, name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn env_number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.env_var(name) {
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| anyhow::anyhow!("{}{} must be a number, got '{}'", self.env_prefix, name, value)),
            None => Ok(None),
        }
    }

    fn apply_env_overrides(&self, mut config: ProofreaderConfig) -> Result<ProofreaderConfig> {
        // AI service
        if let Some(model) = self.env_var("MODEL") {
            config.ai.model = model;
        }
        if let Some(base_url) = self.env_var("BASE_URL") {
            config.ai.base_url = base_url;
        }

        // Throttle and retry
        if let Some(interval) = self.env_number("MIN_INTERVAL_MS")? {
            config.throttle.min_interval_ms = interval;
        }
        if let Some(retries) = self.env_number("MAX_RETRIES")? {
            config.retry.max_retries = retries;
        }
        if let Some(delay) = self.env_number("INITIAL_DELAY_MS")? {
            config.retry.initial_delay_ms = delay;
        }

        // Storage
        if let Some(path) = self.env_var("STORAGE_PATH") {
            config.storage.path = Some(PathBuf::from(path));
        }

        // Logging settings
        if let Some(level) = self.env_var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = self.env_var("LOG_JSON") {
            config.logging.json =
                matches!(json.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        Ok(config)
    }

    pub async fn save_config(&self, config: &ProofreaderConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        toml::to_string_pretty(&ProofreaderConfig::default())
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
