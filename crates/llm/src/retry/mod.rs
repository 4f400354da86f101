//! Retry with exponential backoff for generative-AI calls
//!
//! Transient failures (rate limits, server overload) are retried after a
//! delay that grows by `backoff_multiplier` each attempt; anything else
//! fails on the spot. The last error is handed back to the caller so it can
//! tell a rate limit apart from a generic failure.
//!
//! ## Usage
//! ```rust,ignore
//! let config = RetryConfig::default();
//! let text = execute_with_retry(&config, || model.generate(&key, &request)).await?;
//! ```

use rand::Rng;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior with exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (excluding initial attempt)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Cap applied after multiplication
    pub max_delay: Duration,
    /// Multiplier for exponential backoff calculation
    pub backoff_multiplier: f64,
    /// Spread delays by +/-10%
    pub jitter: bool,
}

impl Default for RetryConfig {
    /// Six attempts, 3s doubling: what the free Gemini tier tolerates
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, used where a caller wants failures immediately
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Trait for errors that can be classified as retryable or non-retryable
pub trait RetryableError {
    /// Returns true if the error is retryable (transient)
    fn is_retryable(&self) -> bool;

    /// Short classification for logging
    fn error_type(&self) -> String;

    fn error_message(&self) -> String;
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out
///
/// On failure the error of the last attempt is returned unchanged.
pub async fn execute_with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError,
{
    let start_time = Instant::now();
    let mut total_delay = Duration::ZERO;
    let mut attempt = 0;

    loop {
        debug!(
            "Attempt {}/{} (total elapsed: {:?})",
            attempt + 1,
            config.max_attempts(),
            start_time.elapsed()
        );

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    info!(
                        "Operation succeeded after {} retries (total time: {:?}, delays: {:?})",
                        attempt,
                        start_time.elapsed(),
                        total_delay
                    );
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= config.max_retries || !error.is_retryable() {
                    error!(
                        "Operation failed permanently: {} (type: {}, attempt {}/{})",
                        error.error_message(),
                        error.error_type(),
                        attempt + 1,
                        config.max_attempts()
                    );
                    return Err(error);
                }

                let delay = calculate_backoff_delay(config, attempt);
                total_delay += delay;

                warn!(
                    "Attempt {} failed ({}), retrying in {:?}: {}",
                    attempt + 1,
                    error.error_type(),
                    delay,
                    error.error_message()
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Delay before retry number `attempt + 1`
pub fn calculate_backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base_delay = config.initial_delay.as_millis() as f64;
    let exponential_delay = base_delay * config.backoff_multiplier.powi(attempt as i32);

    let mut delay =
        Duration::from_millis(exponential_delay.min(config.max_delay.as_millis() as f64) as u64);

    if config.jitter {
        let jitter_range = delay.as_millis() as f64 * 0.1;
        if jitter_range > 0.0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..jitter_range);
            let jittered_delay = (delay.as_millis() as f64 + jitter).max(0.0) as u64;
            delay = Duration::from_millis(jittered_delay);
        }
    }

    delay
}
