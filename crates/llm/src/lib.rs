//! Generative-AI access for the proofreader
//!
//! - [`providers`]: the [`GenerativeModel`] seam and the Gemini client
//! - [`retry`]: exponential backoff around a single model call
//! - [`assistant`]: translate, audit and word breakdown built on top

pub mod assistant;
pub mod providers;
pub mod retry;

pub use assistant::{AssistantError, ReviewAssistant};
pub use providers::google_provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use providers::{GenerationRequest, GenerativeModel, GoogleProvider, ModelError, ModelErrorKind};
pub use retry::{calculate_backoff_delay, execute_with_retry, RetryConfig, RetryableError};
