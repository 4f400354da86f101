//! SegmentStore - ordered, persisted collection of review segments
//!
//! An in-memory reducer over the segment list. Every mutation that changes
//! the collection is mirrored to the key-value storage as JSON. A failed
//! write is logged and never undoes the in-memory change; the next
//! successful write supersedes it.

use crate::entities::{Segment, SegmentPatch};
use crate::repositories::KeyValueStorage;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SegmentStore {
    segments: Vec<Segment>,
    storage: Arc<dyn KeyValueStorage>,
    storage_key: String,
}

impl SegmentStore {
    /// Wrap an already loaded collection; nothing is written until the first mutation
    pub fn new(storage: Arc<dyn KeyValueStorage>, storage_key: &str, segments: Vec<Segment>) -> Self {
        Self {
            segments: dedupe_by_id(segments),
            storage,
            storage_key: storage_key.to_string(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn get(&self, id: &str) -> Option<Segment> {
        self.segments.iter().find(|s| s.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.segments.iter().any(|s| s.id == id)
    }

    /// Copy of the whole collection in display order
    pub fn snapshot(&self) -> Vec<Segment> {
        self.segments.clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Merge `patch` into the segment with `id`; no-op when the id is absent
    pub fn update(&mut self, id: &str, patch: SegmentPatch) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) else {
            debug!("Ignoring update for unknown segment {}", id);
            return false;
        };

        segment.apply(patch);
        self.persist();
        true
    }

    /// Add a segment at the end; a segment whose id is already present is ignored
    pub fn append(&mut self, segment: Segment) -> bool {
        if self.contains(&segment.id) {
            warn!("Segment {} already exists, append ignored", segment.id);
            return false;
        }

        self.segments.push(segment);
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.segments.len();
        self.segments.retain(|s| s.id != id);
        if self.segments.len() == before {
            return false;
        }

        self.persist();
        true
    }

    /// Replace the whole collection (load, bulk clear)
    pub fn replace_all(&mut self, segments: Vec<Segment>) {
        self.segments = dedupe_by_id(segments);
        self.persist();
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.segments) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize segments: {}", e);
                return;
            }
        };

        match self.storage.set(&self.storage_key, &json) {
            Ok(()) => debug!(
                "Persisted {} segments under '{}'",
                self.segments.len(),
                self.storage_key
            ),
            Err(e) => warn!("Failed to persist segments under '{}': {}", self.storage_key, e),
        }
    }
}

/// Keep the first occurrence of every id
fn dedupe_by_id(segments: Vec<Segment>) -> Vec<Segment> {
    let mut seen = HashSet::new();
    let total = segments.len();
    let unique: Vec<Segment> = segments
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect();

    if unique.len() != total {
        warn!("Dropped {} segments with duplicate ids", total - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AiFeedback;
    use crate::errors::StorageError;
    use crate::value_objects::SegmentStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStorage {
        values: Mutex<HashMap<String, String>>,
        writes: Mutex<usize>,
    }

    impl KeyValueStorage for MapStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            *self.writes.lock().unwrap() += 1;
            self.values.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Corrupted("disk full".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn store_with(segments: Vec<Segment>) -> (SegmentStore, Arc<MapStorage>) {
        let storage = Arc::new(MapStorage::default());
        let store = SegmentStore::new(storage.clone(), "segments", segments);
        (store, storage)
    }

    #[test]
    fn test_update_merges_and_persists() {
        let (mut store, storage) = store_with(vec![Segment::with_id("a").with_texts("Hi", "Salut")]);

        assert!(store.update(
            "a",
            SegmentPatch::new()
                .status(SegmentStatus::Reviewed)
                .ai_feedback(Some(AiFeedback::text("No significant errors found.")))
        ));

        let segment = store.get("a").unwrap();
        assert_eq!(segment.status, SegmentStatus::Reviewed);
        assert_eq!(segment.source_text, "Hi");

        let persisted = storage.get("segments").unwrap().unwrap();
        let reloaded: Vec<Segment> = serde_json::from_str(&persisted).unwrap();
        assert_eq!(reloaded, vec![segment]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (mut store, storage) = store_with(vec![Segment::with_id("a")]);
        assert!(!store.update("missing", SegmentPatch::new().target_text("x")));
        assert_eq!(*storage.writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_append_keeps_order_and_rejects_duplicates() {
        let (mut store, _) = store_with(Vec::new());
        assert!(store.append(Segment::with_id("a")));
        assert!(store.append(Segment::with_id("b")));
        assert!(!store.append(Segment::with_id("a")));
        assert_eq!(store.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_and_replace_all() {
        let (mut store, storage) = store_with(vec![Segment::with_id("a"), Segment::with_id("b")]);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.ids(), vec!["b"]);

        store.replace_all(Vec::new());
        assert!(store.is_empty());
        assert_eq!(storage.get("segments").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_loaded_duplicates_keep_first() {
        let (store, _) = store_with(vec![
            Segment::with_id("a").with_texts("first", ""),
            Segment::with_id("a").with_texts("second", ""),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().source_text, "first");
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let mut store = SegmentStore::new(Arc::new(BrokenStorage), "segments", Vec::new());
        assert!(store.append(Segment::with_id("a")));
        assert!(store.contains("a"));
    }
}
