//! Repository Abstractions - persistence interfaces
//!
//! Domain defines the contract, infrastructure provides the implementation.

mod key_value_storage;

pub use key_value_storage::KeyValueStorage;
