//! Value Objects - immutable review vocabulary
//!
//! Closed sets the reviewer picks from: review status, error category and
//! the target language of a project.

mod segment_category;
mod segment_status;
mod target_language;

pub use segment_category::SegmentCategory;
pub use segment_status::SegmentStatus;
pub use target_language::{TargetLanguage, SUPPORTED_LANGUAGES};
