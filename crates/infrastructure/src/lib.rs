//! Infrastructure Layer - configuration and persistence adapters
//!
//! - config: file + environment configuration loading and validation
//! - storage: [`domain::KeyValueStorage`] backends (JSON file, in-memory)
//! - state: the persisted key layout of a proofreading project

pub mod config;
pub mod state;
pub mod storage;

pub use config::{ConfigLoader, ConfigSource, ConfigValidator};
pub use state::ProjectState;
pub use storage::{default_storage_path, InMemoryStorage, JsonFileStorage};
