//! Domain Errors - Business rule violations and persistence failures

use thiserror::Error;

/// Domain-specific errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Parsing: status name is not one of the review states
    #[error("Unknown segment status: {0}")]
    UnknownStatus(String),

    /// Parsing: category name is not one of the review categories
    #[error("Unknown segment category: {0}")]
    UnknownCategory(String),

    /// Business validation: target language is not in the supported list
    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),

    /// Lookup: no segment carries this id
    #[error("Segment not found with ID: {0}")]
    SegmentNotFound(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures of the key-value persistence backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage is corrupted: {0}")]
    Corrupted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = DomainError::UnsupportedLanguage("Klingon".to_string());
        assert_eq!(error.to_string(), "Unsupported target language: Klingon");

        let error = DomainError::SegmentNotFound("abc".to_string());
        assert!(error.to_string().contains("abc"));
    }

    #[test]
    fn test_storage_error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: StorageError = parse.into();
        assert!(matches!(error, StorageError::Serialization(_)));
    }
}
