use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &ProofreaderConfig) -> Result<()> {
        self.validate_ai_config(&config.ai)?;
        self.validate_retry_config(&config.retry)?;
        self.validate_throttle_config(&config.throttle)?;
        self.validate_storage_config(&config.storage)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_ai_config(&self, config: &AiConfig) -> Result<()> {
        if config.model.trim().is_empty() {
            bail!("AI model name cannot be empty");
        }

        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            bail!(
                "AI base_url must start with http:// or https://, got '{}'",
                config.base_url
            );
        }

        if config.timeout_secs == 0 {
            bail!("AI timeout must be greater than 0");
        }

        Ok(())
    }

    fn validate_retry_config(&self, config: &RetryConfig) -> Result<()> {
        if config.initial_delay_ms == 0 {
            bail!("Initial retry delay must be greater than 0");
        }

        if config.max_delay_ms < config.initial_delay_ms {
            bail!("Max retry delay must be >= initial delay");
        }

        if config.backoff_multiplier < 1.0 {
            bail!(
                "Backoff multiplier must be at least 1.0, got {}",
                config.backoff_multiplier
            );
        }

        if config.max_retries > 10 {
            warn!(
                "{} retries with backoff can keep a single request waiting for many minutes",
                config.max_retries
            );
        }

        Ok(())
    }

    fn validate_throttle_config(&self, config: &ThrottleConfig) -> Result<()> {
        if config.min_interval_ms == 0 {
            warn!("Throttle interval is 0, AI calls will start back to back");
        }
        Ok(())
    }

    fn validate_storage_config(&self, config: &StorageConfig) -> Result<()> {
        if let Some(path) = &config.path {
            if path.is_dir() {
                bail!("Storage path is a directory: {}", path.display());
            }
        }
        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                config.level,
                valid_levels
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
