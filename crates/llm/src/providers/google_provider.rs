use super::{GenerationRequest, GenerativeModel, ModelError, ModelErrorKind};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    model: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl GoogleProvider {
    pub fn new(model: &str) -> Result<Self> {
        Self::with_base_url(model, DEFAULT_BASE_URL, Duration::from_secs(60))
    }

    pub fn with_base_url(model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(anyhow!("Gemini model name cannot be empty"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get_api_endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(request: &GenerationRequest) -> GoogleRequest {
        let generation_config = if request.response_schema.is_some() || request.temperature.is_some() {
            Some(GoogleGenerationConfig {
                temperature: request.temperature,
                response_mime_type: request
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema: request.response_schema.clone(),
            })
        } else {
            None
        };

        GoogleRequest {
            contents: vec![GoogleContent {
                parts: vec![GooglePart {
                    text: request.prompt.clone(),
                }],
                role: "user".to_string(),
            }],
            generation_config,
        }
    }

    /// Concatenated text of the first candidate
    fn extract_text(response: GoogleResponse) -> Result<String, ModelError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(ModelError::new(
                ModelErrorKind::Blocked,
                format!("Request produced no answer: {reason}"),
            ));
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        debug!(
            "Gemini finish reason: {}",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
        Ok(text)
    }
}

#[async_trait]
impl GenerativeModel for GoogleProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> Result<String, ModelError> {
        let start_time = Instant::now();
        let body = Self::build_request(request);

        info!(
            "Sending request to Gemini: {} (model: {}, structured: {})",
            request.prompt.trim().chars().take(50).collect::<String>(),
            self.model,
            request.is_structured()
        );

        let response = self
            .client
            .post(self.get_api_endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ModelError::from_reqwest_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ModelError::from_status_code(status, error_text));
        }

        let google_response: GoogleResponse = response.json().await.map_err(|e| {
            ModelError::new(ModelErrorKind::Parse, format!("Failed to parse response: {e}"))
        })?;

        let text = Self::extract_text(google_response)?;
        info!(
            "Received response from Gemini ({:?}): {} chars",
            start_time.elapsed(),
            text.len()
        );
        Ok(text)
    }
}

// Gemini API specific request/response types
#[derive(Debug, Clone, Serialize)]
struct GoogleRequest {
    contents: Vec<GoogleContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleContent {
    parts: Vec<GooglePart>,
    role: String,
}

#[derive(Debug, Clone, Serialize)]
struct GooglePart {
    text: String,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GooglePromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponseContent {
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GooglePromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}
