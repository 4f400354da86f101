//! Domain Services - review rules spanning several entities

mod segment_store;

pub use segment_store::SegmentStore;
