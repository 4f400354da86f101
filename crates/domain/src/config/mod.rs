use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main proofreader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProofreaderConfig {
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub throttle: ThrottleConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout for one model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Request schema-constrained JSON for audit and word breakdown
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,
}

/// Backoff applied to rate-limited and overloaded model calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default)]
    pub jitter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum spacing between the starts of two AI calls
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Key-value file; `None` means `<data_dir>/proofreader/storage.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            structured_output: default_structured_output(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_structured_output() -> bool {
    true
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_delay() -> u64 {
    3000
}

fn default_max_delay() -> u64 {
    60_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_min_interval() -> u64 {
    1200
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_free_tier_limits() {
        let config = ProofreaderConfig::default();
        assert_eq!(config.ai.model, "gemini-3-flash-preview");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 3000);
        assert_eq!(config.throttle.min_interval_ms, 1200);
        assert!(config.storage.path.is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: ProofreaderConfig =
            serde_json::from_str(r#"{"ai":{"model":"gemini-pro"},"retry":{"jitter":true}}"#).unwrap();
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.ai.timeout_secs, 60);
        assert!(config.retry.jitter);
        assert_eq!(config.retry.backoff_multiplier, 2.0);
    }
}
