//! KeyValueStorage - string-keyed persistence used for all client state

use crate::errors::StorageError;

/// Repository abstraction for client-side key-value persistence
///
/// Values are opaque strings (JSON for the segment collection, plain text
/// for the language and credential). Every write replaces the previous
/// value; there is no transactional grouping across keys.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
