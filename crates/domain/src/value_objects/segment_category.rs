use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of problem a reviewer attributes to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SegmentCategory {
    Accuracy,
    Omission,
    Formatting,
    Terminology,
    Style,
    #[default]
    None,
}

impl SegmentCategory {
    pub const ALL: [SegmentCategory; 6] = [
        SegmentCategory::Accuracy,
        SegmentCategory::Omission,
        SegmentCategory::Formatting,
        SegmentCategory::Terminology,
        SegmentCategory::Style,
        SegmentCategory::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentCategory::Accuracy => "Accuracy",
            SegmentCategory::Omission => "Omission",
            SegmentCategory::Formatting => "Formatting",
            SegmentCategory::Terminology => "Terminology",
            SegmentCategory::Style => "Style",
            SegmentCategory::None => "None",
        }
    }
}

impl fmt::Display for SegmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}
