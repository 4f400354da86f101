//! Segment - one source/target sentence pair under review

use super::ai_feedback::{AiFeedback, WordBreakdownEntry};
use crate::value_objects::{SegmentCategory, SegmentStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-flight AI operation a segment can be waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentActivity {
    Translating,
    Analyzing,
    AnalyzingWords,
}

/// The unit of review
///
/// The three activity flags mirror in-flight requests for the current
/// session only; they are never persisted and read back as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub target_text: String,
    #[serde(default)]
    pub status: SegmentStatus,
    #[serde(default)]
    pub category: SegmentCategory,
    #[serde(default)]
    pub ai_feedback: Option<AiFeedback>,
    #[serde(default)]
    pub word_breakdown: Option<Vec<WordBreakdownEntry>>,
    #[serde(skip)]
    pub is_analyzing: bool,
    #[serde(skip)]
    pub is_translating: bool,
    #[serde(skip)]
    pub is_analyzing_words: bool,
}

impl Segment {
    /// Create an empty segment with a freshly generated id
    pub fn new() -> Self {
        Self::with_id(&Uuid::new_v4().simple().to_string())
    }

    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            source_text: String::new(),
            target_text: String::new(),
            status: SegmentStatus::Pending,
            category: SegmentCategory::None,
            ai_feedback: None,
            word_breakdown: None,
            is_analyzing: false,
            is_translating: false,
            is_analyzing_words: false,
        }
    }

    pub fn with_texts(mut self, source_text: &str, target_text: &str) -> Self {
        self.source_text = source_text.to_string();
        self.target_text = target_text.to_string();
        self
    }

    pub fn is_busy(&self, activity: SegmentActivity) -> bool {
        match activity {
            SegmentActivity::Translating => self.is_translating,
            SegmentActivity::Analyzing => self.is_analyzing,
            SegmentActivity::AnalyzingWords => self.is_analyzing_words,
        }
    }

    /// True while any AI request for this segment is queued or running
    pub fn is_any_busy(&self) -> bool {
        self.is_translating || self.is_analyzing || self.is_analyzing_words
    }

    /// Merge every field the patch carries into this segment
    pub fn apply(&mut self, patch: SegmentPatch) {
        if let Some(source_text) = patch.source_text {
            self.source_text = source_text;
        }
        if let Some(target_text) = patch.target_text {
            self.target_text = target_text;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(ai_feedback) = patch.ai_feedback {
            self.ai_feedback = ai_feedback;
        }
        if let Some(word_breakdown) = patch.word_breakdown {
            self.word_breakdown = word_breakdown;
        }
        if let Some(flag) = patch.is_translating {
            self.is_translating = flag;
        }
        if let Some(flag) = patch.is_analyzing {
            self.is_analyzing = flag;
        }
        if let Some(flag) = patch.is_analyzing_words {
            self.is_analyzing_words = flag;
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update of a [`Segment`]; `None` leaves a field untouched
///
/// Nullable fields use a nested option so a patch can clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentPatch {
    pub source_text: Option<String>,
    pub target_text: Option<String>,
    pub status: Option<SegmentStatus>,
    pub category: Option<SegmentCategory>,
    pub ai_feedback: Option<Option<AiFeedback>>,
    pub word_breakdown: Option<Option<Vec<WordBreakdownEntry>>>,
    pub is_translating: Option<bool>,
    pub is_analyzing: Option<bool>,
    pub is_analyzing_words: Option<bool>,
}

impl SegmentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn target_text(mut self, text: impl Into<String>) -> Self {
        self.target_text = Some(text.into());
        self
    }

    pub fn status(mut self, status: SegmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: SegmentCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn ai_feedback(mut self, feedback: Option<AiFeedback>) -> Self {
        self.ai_feedback = Some(feedback);
        self
    }

    pub fn word_breakdown(mut self, breakdown: Option<Vec<WordBreakdownEntry>>) -> Self {
        self.word_breakdown = Some(breakdown);
        self
    }

    pub fn activity(mut self, activity: SegmentActivity, busy: bool) -> Self {
        match activity {
            SegmentActivity::Translating => self.is_translating = Some(busy),
            SegmentActivity::Analyzing => self.is_analyzing = Some(busy),
            SegmentActivity::AnalyzingWords => self.is_analyzing_words = Some(busy),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Seed collection shown on first launch
pub fn default_segments() -> Vec<Segment> {
    vec![
        Segment::with_id("1").with_texts(
            "The quick brown fox jumps over the lazy dog.",
            "Le renard brun rapide saute par-dessus le chien paresseux.",
        ),
        Segment::with_id("2").with_texts(
            "Please ensure that all safety protocols are followed strictly within the laboratory environment.",
            "",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_segment_defaults() {
        let segment = Segment::new();
        assert!(!segment.id.is_empty());
        assert_eq!(segment.status, SegmentStatus::Pending);
        assert_eq!(segment.category, SegmentCategory::None);
        assert!(segment.ai_feedback.is_none());
        assert!(!segment.is_any_busy());
        assert_ne!(Segment::new().id, segment.id);
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut segment = Segment::with_id("a").with_texts("Hello", "Bonjour");
        segment.apply(
            SegmentPatch::new()
                .status(SegmentStatus::Approved)
                .activity(SegmentActivity::Analyzing, true),
        );

        assert_eq!(segment.source_text, "Hello");
        assert_eq!(segment.target_text, "Bonjour");
        assert_eq!(segment.status, SegmentStatus::Approved);
        assert!(segment.is_busy(SegmentActivity::Analyzing));
        assert!(!segment.is_busy(SegmentActivity::Translating));
    }

    #[test]
    fn test_patch_can_clear_feedback() {
        let mut segment = Segment::with_id("a");
        segment.ai_feedback = Some(AiFeedback::text("old"));
        segment.apply(SegmentPatch::new().ai_feedback(None));
        assert!(segment.ai_feedback.is_none());
    }

    #[test]
    fn test_activity_flags_are_not_serialized() {
        let mut segment = Segment::with_id("a").with_texts("Hello", "Bonjour");
        segment.is_analyzing = true;
        segment.is_translating = true;

        let json = serde_json::to_string(&segment).unwrap();
        assert!(!json.contains("isAnalyzing"));
        assert!(json.contains("\"sourceText\":\"Hello\""));

        let back: Segment = serde_json::from_str(&json).unwrap();
        assert!(!back.is_any_busy());
        assert_eq!(back.source_text, "Hello");
    }

    #[test]
    fn test_seed_collection() {
        let seeds = default_segments();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].id, "1");
        assert!(seeds[1].target_text.is_empty());
    }
}
