//! Domain Entities - Core review objects
//!
//! Entities carry identity and business rules and stay independent of
//! infrastructure concerns.

pub mod ai_feedback;
pub mod segment;

pub use ai_feedback::{AiFeedback, WordBreakdownEntry};
pub use segment::{default_segments, Segment, SegmentActivity, SegmentPatch};
