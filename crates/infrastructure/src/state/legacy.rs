//! Reader for the first persisted format
//!
//! Segments stored `aiFeedback` as a plain string and the word-level result
//! as a Markdown table in `wordByWord`.

use domain::{AiFeedback, Segment, SegmentCategory, SegmentStatus, WordBreakdownEntry};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySegment {
    id: String,
    #[serde(default)]
    source_text: String,
    #[serde(default)]
    target_text: String,
    #[serde(default)]
    status: SegmentStatus,
    #[serde(default)]
    category: SegmentCategory,
    #[serde(default)]
    ai_feedback: Option<String>,
    #[serde(default)]
    word_by_word: Option<String>,
}

impl From<LegacySegment> for Segment {
    fn from(legacy: LegacySegment) -> Self {
        let word_breakdown = legacy.word_by_word.and_then(|table| {
            let entries = WordBreakdownEntry::parse_markdown_table(&table);
            if entries.is_none() {
                warn!("Dropping unreadable word breakdown of segment {}", legacy.id);
            }
            entries
        });

        let mut segment = Segment::with_id(&legacy.id).with_texts(&legacy.source_text, &legacy.target_text);
        segment.status = legacy.status;
        segment.category = legacy.category;
        segment.ai_feedback = legacy
            .ai_feedback
            .filter(|text| !text.trim().is_empty())
            .map(AiFeedback::text);
        segment.word_breakdown = word_breakdown;
        segment
    }
}

pub(super) fn parse(saved: &str) -> Result<Vec<Segment>, serde_json::Error> {
    let legacy: Vec<LegacySegment> = serde_json::from_str(saved)?;
    Ok(legacy.into_iter().map(Segment::from).collect())
}
