//! # Application Layer
//!
//! Coordinates the domain store, the persisted project state and the AI
//! assistant into the reviewer's commands.
//!
//! ## Dependency Direction
//!
//! ```text
//! cli → application → { domain, infrastructure, llm, common }
//! ```

pub mod bootstrap;
pub mod errors;
pub mod services;

pub use bootstrap::build_service;
pub use errors::ApplicationError;
pub use services::{CallKey, ReviewService};

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;
