//! TargetLanguage - language the source text is translated into

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered in the language selector
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "Arabic",
    "Armenian",
    "Bassa",
    "Bengali",
    "Chichewa",
    "Chinese (Simplified)",
    "Chinese (Traditional Mandarin)",
    "English",
    "French",
    "Georgian",
    "Haitian Creole",
    "Hindi",
    "Hungarian",
    "Kazakh",
    "Kinyarwanda",
    "Kiswahili",
    "Kannada",
    "Luganda",
    "Manipuri",
    "Mongolian",
    "Nepali",
    "Oriya (Odia)",
    "Polish",
    "Portuguese",
    "Punjabi",
    "Romanian",
    "Rongmei",
    "Russian",
    "Sesotho",
    "Spanish",
    "Tagalog",
    "Tamil",
    "Telugu",
    "Thai",
    "Turkish",
    "Ukrainian",
    "Urdu",
    "Uzbek",
];

const DEFAULT_LANGUAGE: &str = "French";

/// A validated member of [`SUPPORTED_LANGUAGES`], kept in its canonical spelling
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetLanguage(&'static str);

impl TargetLanguage {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for TargetLanguage {
    fn default() -> Self {
        TargetLanguage(DEFAULT_LANGUAGE)
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for TargetLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|name| name.eq_ignore_ascii_case(wanted))
            .map(|name| TargetLanguage(*name))
            .ok_or_else(|| DomainError::UnsupportedLanguage(s.to_string()))
    }
}

impl TryFrom<String> for TargetLanguage {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetLanguage> for String {
    fn from(language: TargetLanguage) -> Self {
        language.0.to_string()
    }
}
