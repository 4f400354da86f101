//! Normalization of raw model output

use domain::{AiFeedback, WordBreakdownEntry};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AuditPayload {
    feedback: String,
    #[serde(rename = "wordBreakdown", default)]
    word_breakdown: Vec<WordBreakdownEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BreakdownPayload {
    Entries(Vec<WordBreakdownEntry>),
    Wrapped {
        #[serde(rename = "wordBreakdown")]
        word_breakdown: Vec<WordBreakdownEntry>,
    },
}

/// Drop a surrounding ```json fence if the model added one
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Remove one pair of quotes wrapped around a whole translation
///
/// Text such as `"oui" et "non"` starts and ends with quotes of different
/// pairs and is left alone.
pub fn strip_wrapping_quotes(text: &str) -> String {
    let trimmed = text.trim();
    for (open, close) in [('"', '"'), ('“', '”'), ('«', '»')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
            .filter(|inner| !has_unescaped(inner, open) && !has_unescaped(inner, close))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

fn has_unescaped(text: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}

/// Read a schema-constrained audit answer; `None` if it is not that shape
pub fn parse_structured_audit(text: &str) -> Option<AiFeedback> {
    match serde_json::from_str::<AuditPayload>(strip_code_fence(text)) {
        Ok(payload) => Some(AiFeedback::Structured {
            feedback: payload.feedback.trim().to_string(),
            word_breakdown: payload.word_breakdown,
        }),
        Err(e) => {
            debug!("Audit answer is not structured JSON: {}", e);
            None
        }
    }
}

/// Read a word breakdown from JSON, falling back to a Markdown table
pub fn parse_breakdown(text: &str) -> Option<Vec<WordBreakdownEntry>> {
    match serde_json::from_str::<BreakdownPayload>(strip_code_fence(text)) {
        Ok(BreakdownPayload::Entries(entries)) | Ok(BreakdownPayload::Wrapped { word_breakdown: entries }) => {
            Some(entries)
        }
        Err(e) => {
            debug!("Breakdown answer is not JSON ({}), trying Markdown table", e);
            WordBreakdownEntry::parse_markdown_table(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_is_removed() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }

    #[test]
    fn quotes_are_removed_once() {
        assert_eq!(strip_wrapping_quotes("\"Bonjour\""), "Bonjour");
        assert_eq!(strip_wrapping_quotes("« Bonjour »"), "Bonjour");
        assert_eq!(strip_wrapping_quotes("Il a dit \"oui\""), "Il a dit \"oui\"");
    }

    #[test]
    fn quotes_of_separate_pairs_are_kept() {
        assert_eq!(strip_wrapping_quotes(r#""oui" et "non""#), r#""oui" et "non""#);
        assert_eq!(strip_wrapping_quotes("« oui » ou « non »"), "« oui » ou « non »");
        assert_eq!(strip_wrapping_quotes(r#""Il a dit \"oui\"""#), r#"Il a dit \"oui\""#);
    }

    #[test]
    fn structured_audit_is_read() {
        let text = r#"```json
{"feedback": "- Missing: 'lazy'", "wordBreakdown": [
  {"targetWord": "chien", "sourceEquivalent": "dog", "context": "noun"}
]}
```"#;
        let feedback = parse_structured_audit(text).unwrap();
        assert_eq!(feedback.summary(), "- Missing: 'lazy'");
        assert_eq!(feedback.word_breakdown().unwrap()[0].target_word, "chien");
    }

    #[test]
    fn prose_is_not_a_structured_audit() {
        assert!(parse_structured_audit("- Missing: 'lazy'").is_none());
    }

    #[test]
    fn breakdown_accepts_array_object_and_table() {
        let array = r#"[{"targetWord":"chien","sourceEquivalent":"dog"}]"#;
        assert_eq!(parse_breakdown(array).unwrap()[0].context, "");

        let wrapped = r#"{"wordBreakdown":[{"targetWord":"chat","sourceEquivalent":"cat","context":"noun"}]}"#;
        assert_eq!(parse_breakdown(wrapped).unwrap()[0].source_equivalent, "cat");

        let table = "| English | French | Role/Note |\n|---|---|---|\n| dog | chien | noun |";
        assert_eq!(parse_breakdown(table).unwrap()[0].target_word, "chien");

        assert!(parse_breakdown("Sorry, I cannot help").is_none());
    }
}
