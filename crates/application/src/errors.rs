//! Application Layer Errors
//!
//! Failures of reviewer commands. AI failures are not errors at this level:
//! they are written into the segment's feedback instead.

use domain::{DomainError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain layer errors
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Persistence failures surfaced to the caller
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },
}

impl ApplicationError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Short error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Storage(_) => "storage",
            Self::Validation { .. } => "validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let error: ApplicationError = DomainError::SegmentNotFound("4f2a".to_string()).into();
        assert_eq!(error.category(), "domain");
        assert!(error.to_string().contains("4f2a"));

        assert_eq!(ApplicationError::validation("ambiguous id").category(), "validation");
    }
}
