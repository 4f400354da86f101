//! Building a [`ReviewService`] from configuration

use crate::ReviewService;
use anyhow::{Context, Result};
use domain::config::{ProofreaderConfig, RetryConfig as RetrySettings};
use domain::KeyValueStorage;
use infrastructure::{default_storage_path, JsonFileStorage, ProjectState};
use llm::{GoogleProvider, RetryConfig, ReviewAssistant};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn retry_config(settings: &RetrySettings) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(settings.max_retries)
        .with_initial_delay(Duration::from_millis(settings.initial_delay_ms))
        .with_max_delay(Duration::from_millis(settings.max_delay_ms))
        .with_backoff_multiplier(settings.backoff_multiplier)
        .with_jitter(settings.jitter)
}

pub fn storage_path(config: &ProofreaderConfig) -> PathBuf {
    config.storage.path.clone().unwrap_or_else(default_storage_path)
}

pub fn open_storage(config: &ProofreaderConfig) -> Result<Arc<dyn KeyValueStorage>> {
    let path = storage_path(config);
    let storage = JsonFileStorage::open(&path)
        .with_context(|| format!("Failed to open storage at {}", path.display()))?;
    Ok(Arc::new(storage))
}

pub fn build_assistant(config: &ProofreaderConfig) -> Result<ReviewAssistant> {
    let provider = GoogleProvider::with_base_url(
        &config.ai.model,
        &config.ai.base_url,
        Duration::from_secs(config.ai.timeout_secs),
    )?;

    Ok(ReviewAssistant::new(Arc::new(provider), retry_config(&config.retry))
        .with_structured_output(config.ai.structured_output))
}

/// Storage, assistant and call queue wired from `config`; needs a tokio runtime
pub fn build_service(config: &ProofreaderConfig) -> Result<ReviewService> {
    let state = ProjectState::new(open_storage(config)?);
    let assistant = build_assistant(config)?;
    info!(
        "Using model {} with {} ms between calls",
        assistant.model_name(),
        config.throttle.min_interval_ms
    );

    Ok(ReviewService::new(
        state,
        assistant,
        Duration::from_millis(config.throttle.min_interval_ms),
    ))
}
