//! Domain Layer - Bilingual Proofreader business logic
//!
//! Contains ONLY pure review logic without dependencies on:
//! - Infrastructure (files, config loading, networks)
//! - Frameworks (CLI, rendering)
//! - External systems (generative AI services)
//!
//! Layout:
//! - Entities: segments under review and their AI results
//! - Value Objects: status, category, target language
//! - Repository Abstractions: key-value persistence interface
//! - Services: the segment store reducer
//! - Config: settings shape and defaults, loaded by infrastructure

pub mod config;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod value_objects;

// Re-export core domain types
pub use config::ProofreaderConfig;
pub use entities::{
    default_segments, AiFeedback, Segment, SegmentActivity, SegmentPatch, WordBreakdownEntry,
};
pub use errors::{DomainError, DomainResult, StorageError};
pub use repositories::KeyValueStorage;
pub use services::SegmentStore;
pub use value_objects::{SegmentCategory, SegmentStatus, TargetLanguage, SUPPORTED_LANGUAGES};
