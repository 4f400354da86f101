use crate::retry::RetryableError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub mod google_provider;

pub use google_provider::GoogleProvider;

/// One prompt sent to a generative model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON schema the answer must follow; `None` asks for free text
    pub response_schema: Option<Value>,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            response_schema: None,
            temperature: None,
        }
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn is_structured(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// Failure classes of a single model call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// 401/403 or an `API_KEY_INVALID` body
    InvalidCredential,
    /// 429 or a quota message
    RateLimited,
    /// 500/502/503/504
    ServerError,
    /// Prompt rejected by safety filters
    Blocked,
    /// Connection or timeout before any status arrived
    Network,
    /// Response body did not have the expected shape
    Parse,
    Other,
}

impl ModelErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelErrorKind::InvalidCredential => "invalid_credential",
            ModelErrorKind::RateLimited => "rate_limit",
            ModelErrorKind::ServerError => "server_error",
            ModelErrorKind::Blocked => "blocked",
            ModelErrorKind::Network => "network",
            ModelErrorKind::Parse => "parse_error",
            ModelErrorKind::Other => "unknown",
        }
    }
}

/// Error returned by a [`GenerativeModel`], classified for the retry loop
#[derive(Debug, Clone, PartialEq)]
pub struct ModelError {
    pub kind: ModelErrorKind,
    pub status_code: Option<u16>,
    pub message: String,
}

impl ModelError {
    pub fn new(kind: ModelErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code: None,
            message: message.into(),
        }
    }

    /// Classify an HTTP failure from its status and body text
    pub fn from_status_code(status_code: u16, message: String) -> Self {
        let lowered = message.to_lowercase();
        let kind = if message.contains("API_KEY_INVALID") {
            ModelErrorKind::InvalidCredential
        } else if lowered.contains("quota") || lowered.contains("resource_exhausted") {
            ModelErrorKind::RateLimited
        } else {
            match status_code {
                401 | 403 => ModelErrorKind::InvalidCredential,
                429 => ModelErrorKind::RateLimited,
                500 | 502 | 503 | 504 => ModelErrorKind::ServerError,
                _ => ModelErrorKind::Other,
            }
        };

        Self {
            kind,
            status_code: Some(status_code),
            message,
        }
    }

    pub fn from_reqwest_error(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() || error.is_connect() {
            ModelErrorKind::Network
        } else {
            ModelErrorKind::Other
        };
        Self {
            kind,
            status_code: error.status().map(|s| s.as_u16()),
            // The request URL never reaches messages shown or persisted
            message: error.without_url().to_string(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ModelError {}

impl RetryableError for ModelError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ModelErrorKind::RateLimited | ModelErrorKind::ServerError
        )
    }

    fn error_type(&self) -> String {
        self.kind.as_str().to_string()
    }

    fn error_message(&self) -> String {
        self.to_string()
    }
}

/// A generative model reachable over RPC
///
/// The credential travels with every call because it is user-supplied and
/// may change between calls.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier used in logs
    fn model_name(&self) -> &str;

    /// Run one request and return the raw text of the answer
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let error = ModelError::from_status_code(429, "Too many requests".to_string());
        assert_eq!(error.kind, ModelErrorKind::RateLimited);
        assert!(error.is_retryable());

        let error = ModelError::from_status_code(503, "Service Unavailable".to_string());
        assert_eq!(error.kind, ModelErrorKind::ServerError);
        assert!(error.is_retryable());

        let error = ModelError::from_status_code(403, "Forbidden".to_string());
        assert_eq!(error.kind, ModelErrorKind::InvalidCredential);
        assert!(!error.is_retryable());

        let error = ModelError::from_status_code(404, "Not found".to_string());
        assert_eq!(error.kind, ModelErrorKind::Other);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_body_overrides_status() {
        let error = ModelError::from_status_code(
            400,
            r#"{"error":{"status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#
                .to_string(),
        );
        assert_eq!(error.kind, ModelErrorKind::InvalidCredential);

        let error = ModelError::from_status_code(400, "Quota exceeded for metric".to_string());
        assert_eq!(error.kind, ModelErrorKind::RateLimited);
    }

    #[test]
    fn test_display_includes_status() {
        let error = ModelError::from_status_code(500, "boom".to_string());
        assert_eq!(error.to_string(), "[500] boom");
        assert_eq!(ModelError::new(ModelErrorKind::Parse, "bad json").to_string(), "bad json");
    }
}
