//! Review workflow: segment editing plus the three AI operations
//!
//! AI requests go through one [`CallSerializer`] keyed by segment and
//! activity. A request marks the segment busy when it is accepted; the
//! queued task reads the segment again when it reaches the head of the
//! queue, calls the assistant and writes the outcome back. A drop guard
//! clears the busy flag however the task ends.

use crate::{ApplicationError, ApplicationResult};
use common::{CallSerializer, OperationTimer, TaskHandle};
use domain::{
    AiFeedback, DomainError, Segment, SegmentActivity, SegmentCategory, SegmentPatch, SegmentStatus,
    SegmentStore, TargetLanguage,
};
use infrastructure::ProjectState;
use llm::ReviewAssistant;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// In-flight identity of one AI request
pub type CallKey = (String, SegmentActivity);

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<Mutex<SegmentStore>>,
    state: ProjectState,
    assistant: Arc<ReviewAssistant>,
    serializer: CallSerializer<CallKey>,
    failures: Arc<Mutex<HashMap<CallKey, String>>>,
}

impl ReviewService {
    /// Load the project and start the call queue; needs a tokio runtime
    pub fn new(state: ProjectState, assistant: ReviewAssistant, min_interval: Duration) -> Self {
        let store = state.open_store();
        Self {
            store: Arc::new(Mutex::new(store)),
            state,
            assistant: Arc::new(assistant),
            serializer: CallSerializer::new(min_interval),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.store.lock().snapshot()
    }

    pub fn segment(&self, id: &str) -> ApplicationResult<Segment> {
        self.store
            .lock()
            .get(id)
            .ok_or_else(|| DomainError::SegmentNotFound(id.to_string()).into())
    }

    /// Full id for an exact id or a unique id prefix
    pub fn resolve_id(&self, prefix: &str) -> ApplicationResult<String> {
        let ids = self.store.lock().ids();
        if ids.iter().any(|id| id == prefix) {
            return Ok(prefix.to_string());
        }

        let matches: Vec<String> = ids.into_iter().filter(|id| id.starts_with(prefix)).collect();
        match matches.len() {
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            0 => Err(DomainError::SegmentNotFound(prefix.to_string()).into()),
            n => Err(ApplicationError::validation(format!(
                "'{prefix}' matches {n} segments, use a longer id"
            ))),
        }
    }

    pub fn add_segment(&self, source_text: &str, target_text: &str) -> Segment {
        let segment = Segment::new().with_texts(source_text, target_text);
        self.store.lock().append(segment.clone());
        info!("Added segment {}", segment.id);
        segment
    }

    pub fn edit_segment(
        &self,
        id: &str,
        source_text: Option<String>,
        target_text: Option<String>,
    ) -> ApplicationResult<Segment> {
        let mut patch = SegmentPatch::new();
        if let Some(text) = source_text {
            patch = patch.source_text(text);
        }
        if let Some(text) = target_text {
            patch = patch.target_text(text);
        }
        if patch.is_empty() {
            return Err(ApplicationError::validation("nothing to change"));
        }
        self.patch(id, patch)
    }

    pub fn set_status(&self, id: &str, status: SegmentStatus) -> ApplicationResult<Segment> {
        self.patch(id, SegmentPatch::new().status(status))
    }

    pub fn set_category(&self, id: &str, category: SegmentCategory) -> ApplicationResult<Segment> {
        self.patch(id, SegmentPatch::new().category(category))
    }

    pub fn delete_segment(&self, id: &str) -> ApplicationResult<()> {
        if !self.store.lock().remove(id) {
            return Err(DomainError::SegmentNotFound(id.to_string()).into());
        }
        self.failures.lock().retain(|(segment_id, _), _| segment_id != id);
        info!("Deleted segment {}", id);
        Ok(())
    }

    /// Remove every segment; returns how many were dropped
    pub fn clear(&self) -> usize {
        let mut store = self.store.lock();
        let removed = store.len();
        store.replace_all(Vec::new());
        self.failures.lock().clear();
        info!("Cleared {} segments", removed);
        removed
    }

    pub fn language(&self) -> TargetLanguage {
        self.state.language()
    }

    pub fn set_language(&self, language: &TargetLanguage) -> ApplicationResult<()> {
        self.state.set_language(language)?;
        info!("Target language set to {}", language);
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.state.api_key().is_some()
    }

    pub fn set_api_key(&self, key: &str) -> ApplicationResult<()> {
        self.state.set_api_key(key)?;
        Ok(())
    }

    /// Calls accepted but not finished yet
    pub fn pending_calls(&self) -> usize {
        self.serializer.pending()
    }

    /// Error message of the last finished `activity` on `id`, if it failed
    ///
    /// Cleared when the same request is accepted again.
    pub fn last_failure(&self, id: &str, activity: SegmentActivity) -> Option<String> {
        self.failures
            .lock()
            .get(&(id.to_string(), activity))
            .cloned()
    }

    /// Queue a translation of the source text into the target field
    pub fn request_translation(&self, id: &str) -> ApplicationResult<Option<TaskHandle>> {
        self.request(id, SegmentActivity::Translating)
    }

    /// Queue an audit; clears the previous feedback right away
    pub fn request_audit(&self, id: &str) -> ApplicationResult<Option<TaskHandle>> {
        self.request(id, SegmentActivity::Analyzing)
    }

    pub fn request_word_breakdown(&self, id: &str) -> ApplicationResult<Option<TaskHandle>> {
        self.request(id, SegmentActivity::AnalyzingWords)
    }

    /// Queue audits for every segment, or only the pending ones
    pub fn request_audit_all(&self, only_pending: bool) -> Vec<(String, TaskHandle)> {
        let ids: Vec<String> = self
            .segments()
            .into_iter()
            .filter(|s| !only_pending || s.status == SegmentStatus::Pending)
            .map(|s| s.id)
            .collect();

        ids.into_iter()
            .filter_map(|id| match self.request_audit(&id) {
                Ok(Some(handle)) => Some((id, handle)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Skipping audit of {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Returns `Ok(None)` when the same request is already queued or running
    fn request(&self, id: &str, activity: SegmentActivity) -> ApplicationResult<Option<TaskHandle>> {
        let key: CallKey = (id.to_string(), activity);
        if self.serializer.in_flight(&key) {
            debug!("{:?} for {} already in flight", activity, id);
            return Ok(None);
        }

        // The task reads the store first, so holding the lock across enqueue
        // keeps it from starting before the segment is marked busy
        let mut store = self.store.lock();
        if !store.contains(id) {
            return Err(DomainError::SegmentNotFound(id.to_string()).into());
        }

        let service = self.clone();
        let task_id = id.to_string();
        let handle = self
            .serializer
            .enqueue(key.clone(), move || async move { service.run(task_id, activity).await });

        if handle.is_some() {
            let mut patch = SegmentPatch::new().activity(activity, true);
            if activity == SegmentActivity::Analyzing {
                patch = patch.ai_feedback(None);
            }
            store.update(id, patch);
            self.failures.lock().remove(&key);
        } else {
            debug!("{:?} for {} rejected by the call queue", activity, id);
        }
        Ok(handle)
    }

    async fn run(&self, id: String, activity: SegmentActivity) {
        let _busy = ActivityGuard {
            store: self.store.clone(),
            id: id.clone(),
            activity,
        };

        let current = self.store.lock().get(&id);
        let Some(segment) = current else {
            debug!("Segment {} was deleted while queued", id);
            return;
        };

        let language = self.state.language();
        let api_key = self.state.api_key();
        let api_key = api_key.as_deref();
        let source = segment.source_text.as_str();
        let target = segment.target_text.as_str();

        let mut timer = OperationTimer::new(activity_name(activity));
        timer.add_field("segment_id", &id);
        timer.add_field("language", language.as_str());

        let result = match activity {
            SegmentActivity::Translating => self
                .assistant
                .translate(source, &language, api_key)
                .await
                .map(|translation| SegmentPatch::new().target_text(translation)),
            SegmentActivity::Analyzing => self
                .assistant
                .audit(source, target, &language, api_key)
                .await
                .map(|feedback| {
                    let breakdown = feedback
                        .word_breakdown()
                        .filter(|entries| !entries.is_empty())
                        .map(|entries| entries.to_vec());
                    let mut patch = SegmentPatch::new()
                        .status(SegmentStatus::Reviewed)
                        .ai_feedback(Some(feedback));
                    if breakdown.is_some() {
                        patch = patch.word_breakdown(breakdown);
                    }
                    patch
                }),
            SegmentActivity::AnalyzingWords => self
                .assistant
                .word_breakdown(source, target, &language, api_key)
                .await
                .map(|entries| SegmentPatch::new().word_breakdown(Some(entries))),
        };
        timer.finish_with_result(&result);

        let patch = match result {
            Ok(patch) => patch,
            Err(e) => self.failure_patch(&id, activity, e),
        };

        if self.store.lock().update(&id, patch) {
            info!("{:?} finished for segment {}", activity, id);
        }
    }

    fn failure_patch(&self, id: &str, activity: SegmentActivity, error: llm::AssistantError) -> SegmentPatch {
        warn!("{:?} failed for segment {}: {}", activity, id, error);
        let message = error.to_string();
        self.failures
            .lock()
            .insert((id.to_string(), activity), message.clone());
        SegmentPatch::new().ai_feedback(Some(AiFeedback::text(message)))
    }

    fn patch(&self, id: &str, patch: SegmentPatch) -> ApplicationResult<Segment> {
        let mut store = self.store.lock();
        if !store.update(id, patch) {
            return Err(DomainError::SegmentNotFound(id.to_string()).into());
        }
        store
            .get(id)
            .ok_or_else(|| DomainError::SegmentNotFound(id.to_string()).into())
    }
}

fn activity_name(activity: SegmentActivity) -> &'static str {
    match activity {
        SegmentActivity::Translating => "translate",
        SegmentActivity::Analyzing => "audit",
        SegmentActivity::AnalyzingWords => "word_breakdown",
    }
}

/// Clears a segment's busy flag when the owning task ends
struct ActivityGuard {
    store: Arc<Mutex<SegmentStore>>,
    id: String,
    activity: SegmentActivity,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.store
            .lock()
            .update(&self.id, SegmentPatch::new().activity(self.activity, false));
    }
}
