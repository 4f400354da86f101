//! [`KeyValueStorage`](domain::KeyValueStorage) backends

mod in_memory;
mod json_file;

pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;

use std::path::PathBuf;

/// `<data_dir>/proofreader/storage.json`, or the working directory when the
/// platform has no data directory
pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proofreader")
        .join("storage.json")
}
