//! AI results attached to a segment

use serde::{Deserialize, Serialize};

/// One aligned token of a word-by-word breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBreakdownEntry {
    /// Word or phrase as it appears in the translation
    pub target_word: String,
    /// Matching word or phrase of the source text
    pub source_equivalent: String,
    /// Grammatical role or usage note
    #[serde(default)]
    pub context: String,
}

impl WordBreakdownEntry {
    pub fn new(target_word: &str, source_equivalent: &str, context: &str) -> Self {
        Self {
            target_word: target_word.to_string(),
            source_equivalent: source_equivalent.to_string(),
            context: context.to_string(),
        }
    }

    /// Read a Markdown table with columns `| source | target | note |`
    ///
    /// The first row is taken as the header; separator rows (`|---|`) and
    /// rows with fewer than two cells are skipped. Returns `None` when no
    /// data row is found.
    pub fn parse_markdown_table(text: &str) -> Option<Vec<WordBreakdownEntry>> {
        let rows: Vec<Vec<&str>> = text
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('|'))
            .map(|line| {
                line.trim_matches('|')
                    .split('|')
                    .map(str::trim)
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !is_separator_row(cells))
            .collect();

        let entries: Vec<WordBreakdownEntry> = rows
            .iter()
            .skip(1)
            .filter(|cells| cells.len() >= 2)
            .map(|cells| WordBreakdownEntry {
                source_equivalent: cells[0].to_string(),
                target_word: cells[1].to_string(),
                context: cells.get(2).map(|c| c.to_string()).unwrap_or_default(),
            })
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(entries)
        }
    }
}

fn is_separator_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}

/// Result of an audit, in either of the two shapes the AI service produces
///
/// Plain-text output comes from simple prompts and from every failure path;
/// schema-constrained output carries the feedback together with a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AiFeedback {
    Text {
        value: String,
    },
    Structured {
        feedback: String,
        #[serde(rename = "wordBreakdown", default)]
        word_breakdown: Vec<WordBreakdownEntry>,
    },
}

impl AiFeedback {
    pub fn text(value: impl Into<String>) -> Self {
        AiFeedback::Text {
            value: value.into(),
        }
    }

    /// The prose part of the feedback regardless of shape
    pub fn summary(&self) -> &str {
        match self {
            AiFeedback::Text { value } => value,
            AiFeedback::Structured { feedback, .. } => feedback,
        }
    }

    pub fn word_breakdown(&self) -> Option<&[WordBreakdownEntry]> {
        match self {
            AiFeedback::Text { .. } => None,
            AiFeedback::Structured { word_breakdown, .. } => Some(word_breakdown),
        }
    }
}
