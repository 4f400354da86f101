//! Review assistant: the three AI-backed operations of the proofreader
//!
//! Each operation validates its inputs, checks the credential, builds one
//! prompt, runs it through the retry loop and normalizes the answer. Every
//! failure comes back as an [`AssistantError`] whose `Display` is the message
//! shown to the reviewer.

pub mod parsing;
pub mod prompts;

use crate::providers::{GenerationRequest, GenerativeModel, ModelError, ModelErrorKind};
use crate::retry::{execute_with_retry, RetryConfig};
use domain::{AiFeedback, TargetLanguage, WordBreakdownEntry};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    #[error("API Key is missing. Run `proofreader set-key` to add your Google Gemini API Key.")]
    MissingCredential,

    #[error("Invalid API Key. Run `proofreader set-key` to verify your settings.")]
    InvalidCredential,

    #[error("Error: Source text is empty.")]
    EmptySource,

    #[error("Please provide both source and target text for analysis.")]
    MissingTexts,

    #[error(
        "⚠️ API Quota exceeded. The free tier has strict limits (often 15 requests per minute).\n\n\
         Please wait 60 seconds before trying again, or consider using a paid API key from a \
         billing-enabled project (https://ai.google.dev/gemini-api/docs/billing)."
    )]
    QuotaExceeded,

    #[error("The AI service is currently overloaded or unavailable. Please try again in a few minutes.")]
    ServiceUnavailable,

    #[error("No response generated.")]
    EmptyResponse,

    #[error("Analysis failed: {0}. Check the log output for details.")]
    Failed(String),
}

impl From<ModelError> for AssistantError {
    fn from(error: ModelError) -> Self {
        match error.kind {
            ModelErrorKind::InvalidCredential => AssistantError::InvalidCredential,
            ModelErrorKind::RateLimited => AssistantError::QuotaExceeded,
            ModelErrorKind::ServerError => AssistantError::ServiceUnavailable,
            _ => AssistantError::Failed(error.to_string()),
        }
    }
}

pub struct ReviewAssistant {
    model: Arc<dyn GenerativeModel>,
    retry_config: RetryConfig,
    structured_output: bool,
}

impl ReviewAssistant {
    pub fn new(model: Arc<dyn GenerativeModel>, retry_config: RetryConfig) -> Self {
        Self {
            model,
            retry_config,
            structured_output: true,
        }
    }

    /// Ask for schema-constrained JSON on audit and breakdown calls
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// English → `language`, returning only the translated text
    pub async fn translate(
        &self,
        source: &str,
        language: &TargetLanguage,
        api_key: Option<&str>,
    ) -> Result<String, AssistantError> {
        if source.trim().is_empty() {
            return Err(AssistantError::EmptySource);
        }
        let key = require_key(api_key)?;

        let request = GenerationRequest::new(&prompts::translation_prompt(source, language));
        let text = self.call(key, &request).await?;
        Ok(parsing::strip_wrapping_quotes(&text))
    }

    /// Compare a pair for omissions, wrong terminology and contradictions
    pub async fn audit(
        &self,
        source: &str,
        target: &str,
        language: &TargetLanguage,
        api_key: Option<&str>,
    ) -> Result<AiFeedback, AssistantError> {
        require_pair(source, target)?;
        let key = require_key(api_key)?;

        let prompt = prompts::audit_prompt(source, target, language, self.structured_output);
        let mut request = GenerationRequest::new(&prompt);
        if self.structured_output {
            request = request.with_response_schema(prompts::audit_schema());
        }

        let text = self.call(key, &request).await?;
        if self.structured_output {
            if let Some(feedback) = parsing::parse_structured_audit(&text) {
                return Ok(feedback);
            }
            warn!("Structured audit answer was not valid JSON, keeping it as text");
        }
        Ok(AiFeedback::text(text))
    }

    /// Align each word or phrase of the translation with its source
    pub async fn word_breakdown(
        &self,
        source: &str,
        target: &str,
        language: &TargetLanguage,
        api_key: Option<&str>,
    ) -> Result<Vec<WordBreakdownEntry>, AssistantError> {
        require_pair(source, target)?;
        let key = require_key(api_key)?;

        let prompt = prompts::breakdown_prompt(source, target, language, self.structured_output);
        let mut request = GenerationRequest::new(&prompt);
        if self.structured_output {
            request = request.with_response_schema(prompts::breakdown_schema());
        }

        let text = self.call(key, &request).await?;
        let entries = if self.structured_output {
            parsing::parse_breakdown(&text)
        } else {
            WordBreakdownEntry::parse_markdown_table(&text)
        };

        entries.ok_or_else(|| {
            warn!("Unreadable word breakdown answer: {}", text);
            AssistantError::Failed("the word breakdown could not be read".to_string())
        })
    }

    async fn call(&self, api_key: &str, request: &GenerationRequest) -> Result<String, AssistantError> {
        let model = self.model.as_ref();
        let text = execute_with_retry(&self.retry_config, move || model.generate(api_key, request)).await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }

        info!("{} answered with {} chars", model.model_name(), text.len());
        Ok(text.to_string())
    }
}

fn require_key(api_key: Option<&str>) -> Result<&str, AssistantError> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(AssistantError::MissingCredential)
}

fn require_pair(source: &str, target: &str) -> Result<(), AssistantError> {
    if source.trim().is_empty() || target.trim().is_empty() {
        return Err(AssistantError::MissingTexts);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Model that replays a fixed list of answers and records call times
    struct ScriptedModel {
        answers: Mutex<VecDeque<Result<String, ModelError>>>,
        calls: Mutex<Vec<(Instant, GenerationRequest)>>,
    }

    impl ScriptedModel {
        fn new(answers: Vec<Result<String, ModelError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        fn last_request(&self) -> GenerationRequest {
            self.calls.lock().last().map(|(_, r)| r.clone()).expect("at least one call")
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _api_key: &str, request: &GenerationRequest) -> Result<String, ModelError> {
            self.calls.lock().push((Instant::now(), request.clone()));
            self.answers
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::new(ModelErrorKind::Other, "script exhausted")))
        }
    }

    fn status(code: u16) -> Result<String, ModelError> {
        Err(ModelError::from_status_code(code, format!("HTTP {code}")))
    }

    fn assistant(model: &Arc<ScriptedModel>) -> ReviewAssistant {
        ReviewAssistant::new(
            model.clone(),
            RetryConfig::new().with_initial_delay(Duration::from_secs(1)),
        )
        .with_structured_output(false)
    }

    const SOURCE: &str = "The quick brown fox jumps over the lazy dog.";
    const TARGET: &str = "Le renard brun rapide saute par-dessus le chien.";

    #[tokio::test(start_paused = true)]
    async fn rate_limits_back_off_with_growing_delays() {
        let model = ScriptedModel::new(vec![status(429), status(429), Ok("No significant errors found.".into())]);

        let feedback = assistant(&model)
            .audit(SOURCE, TARGET, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap();

        assert_eq!(feedback, AiFeedback::text("No significant errors found."));
        let calls = model.calls.lock();
        assert_eq!(calls.len(), 3);
        let first_gap = calls[1].0 - calls[0].0;
        let second_gap = calls[2].0 - calls[1].0;
        assert_eq!(first_gap, Duration::from_secs(1));
        assert_eq!(second_gap, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn forbidden_fails_after_one_attempt() {
        let model = ScriptedModel::new(vec![status(403), Ok("unused".into())]);

        let error = assistant(&model)
            .audit(SOURCE, TARGET, &TargetLanguage::default(), Some("bad"))
            .await
            .unwrap_err();

        assert_eq!(error, AssistantError::InvalidCredential);
        assert!(error.to_string().starts_with("Invalid API Key"));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_map_to_distinct_messages() {
        let model = ScriptedModel::new((0..6).map(|_| status(429)).collect());
        let error = assistant(&model)
            .audit(SOURCE, TARGET, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap_err();
        assert_eq!(error, AssistantError::QuotaExceeded);
        assert!(error.to_string().contains("API Quota exceeded"));
        assert_eq!(model.call_count(), 6);

        let model = ScriptedModel::new((0..6).map(|_| status(503)).collect());
        let error = assistant(&model)
            .translate(SOURCE, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap_err();
        assert_eq!(error, AssistantError::ServiceUnavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn validation_happens_before_any_call() {
        let model = ScriptedModel::new(vec![Ok("unused".into())]);
        let assistant = assistant(&model);
        let french = TargetLanguage::default();

        assert_eq!(
            assistant.audit(SOURCE, "   ", &french, Some("key")).await.unwrap_err(),
            AssistantError::MissingTexts
        );
        assert_eq!(
            assistant.translate("", &french, None).await.unwrap_err(),
            AssistantError::EmptySource
        );
        assert_eq!(
            assistant.word_breakdown(SOURCE, TARGET, &french, Some(" ")).await.unwrap_err(),
            AssistantError::MissingCredential
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_answer_is_reported() {
        let model = ScriptedModel::new(vec![Ok("  \n".into())]);
        let error = assistant(&model)
            .translate(SOURCE, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "No response generated.");
    }

    #[tokio::test(start_paused = true)]
    async fn other_failures_keep_underlying_text() {
        let model = ScriptedModel::new(vec![status(404)]);
        let error = assistant(&model)
            .translate(SOURCE, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap_err();
        assert_eq!(model.call_count(), 1);
        assert!(error.to_string().starts_with("Analysis failed: [404] HTTP 404"));
    }

    #[tokio::test(start_paused = true)]
    async fn translation_is_unquoted() {
        let model = ScriptedModel::new(vec![Ok("\"Bonjour le monde\"".into())]);
        let text = assistant(&model)
            .translate("Hello world", &TargetLanguage::default(), Some("key"))
            .await
            .unwrap();
        assert_eq!(text, "Bonjour le monde");
        assert!(model.last_request().prompt.contains("\"Hello world\""));
    }

    #[tokio::test(start_paused = true)]
    async fn structured_audit_carries_breakdown() {
        let model = ScriptedModel::new(vec![Ok(r#"{"feedback":"- Missing: 'quick'","wordBreakdown":[
            {"targetWord":"renard","sourceEquivalent":"fox","context":"noun, masculine"}]}"#
            .into())]);

        let feedback = assistant(&model)
            .with_structured_output(true)
            .audit(SOURCE, TARGET, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap();

        assert!(model.last_request().is_structured());
        assert_eq!(feedback.summary(), "- Missing: 'quick'");
        assert_eq!(feedback.word_breakdown().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn structured_audit_degrades_to_text() {
        let model = ScriptedModel::new(vec![Ok("- 'Church' translated as 'Mosque'".into())]);
        let feedback = assistant(&model)
            .with_structured_output(true)
            .audit(SOURCE, TARGET, &TargetLanguage::default(), Some("key"))
            .await
            .unwrap();
        assert_eq!(feedback, AiFeedback::text("- 'Church' translated as 'Mosque'"));
    }

    #[tokio::test(start_paused = true)]
    async fn breakdown_reads_markdown_table() {
        let table = "| English | French | Role/Note |\n|---|---|---|\n| The fox | Le renard | subject |";
        let model = ScriptedModel::new(vec![Ok(table.into()), Ok("no table".into())]);
        let assistant = assistant(&model);
        let french = TargetLanguage::default();

        let entries = assistant.word_breakdown(SOURCE, TARGET, &french, Some("key")).await.unwrap();
        assert_eq!(entries, vec![WordBreakdownEntry::new("Le renard", "The fox", "subject")]);

        let error = assistant.word_breakdown(SOURCE, TARGET, &french, Some("key")).await.unwrap_err();
        assert!(matches!(error, AssistantError::Failed(_)));
    }
}
