//! Prompt templates and response schemas for the review operations

use domain::TargetLanguage;
use serde_json::{json, Value};

pub fn translation_prompt(source: &str, language: &TargetLanguage) -> String {
    format!(
        "Translate the following English text into {language}. \
         Provide ONLY the translation without any explanation or quotes: \"{source}\""
    )
}

pub fn audit_prompt(source: &str, target: &str, language: &TargetLanguage, structured: bool) -> String {
    let mut prompt = format!(
        r#"Target Language: {language}
English Source: "{source}"
Target Translation: "{target}"

Task: Compare the English text to the Target text.
Identify:
1) Missing words/sentences
2) Wrong terminology (e.g., if 'Church' was translated as 'Mosque')
3) Meaning contradictions.

Provide the output in a clear bullet-point format. If there are no issues, state "No significant errors found.""#
    );

    if structured {
        prompt.push_str(
            "\n\nReturn the bullet points in `feedback`. In `wordBreakdown`, map each word or \
             phrase of the Target Translation to its English equivalent with a short grammatical \
             role or usage note in `context`.",
        );
    }
    prompt
}

pub fn breakdown_prompt(source: &str, target: &str, language: &TargetLanguage, structured: bool) -> String {
    let intro = format!(
        r#"Provide a word-by-word or phrase-by-phrase breakdown of this translation from English to {language}.

English: "{source}"
{language}: "{target}""#
    );

    if structured {
        format!(
            "{intro}\n\nReturn one entry per {language} word or phrase, in order: `targetWord` is the \
             {language} text, `sourceEquivalent` the matching English, `context` its grammatical role \
             or a usage note."
        )
    } else {
        format!(
            "{intro}\n\nIMPORTANT: Output ONLY a Markdown table with the following columns:\n\
             | English | {language} | Role/Note |\n\n\
             Do not include any introductory text, only the table."
        )
    }
}

fn breakdown_entry_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "targetWord": { "type": "STRING" },
            "sourceEquivalent": { "type": "STRING" },
            "context": { "type": "STRING" }
        },
        "required": ["targetWord", "sourceEquivalent"]
    })
}

pub fn breakdown_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": breakdown_entry_schema()
    })
}

pub fn audit_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "feedback": { "type": "STRING" },
            "wordBreakdown": breakdown_schema()
        },
        "required": ["feedback"]
    })
}
