//! SegmentStatus - review state of a single segment

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of a segment
///
/// Every segment starts `Pending`. A successful AI audit moves it to
/// `Reviewed`; any other transition is made by the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SegmentStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    #[serde(rename = "Needs Work")]
    NeedsWork,
}

impl SegmentStatus {
    pub const ALL: [SegmentStatus; 4] = [
        SegmentStatus::Pending,
        SegmentStatus::Reviewed,
        SegmentStatus::Approved,
        SegmentStatus::NeedsWork,
    ];

    /// Human-readable label, identical to the persisted form
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentStatus::Pending => "Pending",
            SegmentStatus::Reviewed => "Reviewed",
            SegmentStatus::Approved => "Approved",
            SegmentStatus::NeedsWork => "Needs Work",
        }
    }
}

impl fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "pending" => Ok(SegmentStatus::Pending),
            "reviewed" => Ok(SegmentStatus::Reviewed),
            "approved" => Ok(SegmentStatus::Approved),
            "needswork" => Ok(SegmentStatus::NeedsWork),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}
