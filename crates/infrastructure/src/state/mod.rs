//! Persisted layout of a proofreading project
//!
//! | key | value |
//! |---|---|
//! | `bilingual_proofreader_data_v2` | JSON array of segments |
//! | `bilingual_proofreader_data_v1` | legacy array, read once for migration |
//! | `bilingual_proofreader_lang_v1` | target language name |
//! | `bilingual_proofreader_api_key` | Gemini API key |

mod legacy;

use domain::{
    default_segments, KeyValueStorage, Segment, SegmentStore, StorageError, TargetLanguage,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DATA_KEY: &str = "bilingual_proofreader_data_v2";
pub const LEGACY_DATA_KEY: &str = "bilingual_proofreader_data_v1";
pub const LANGUAGE_KEY: &str = "bilingual_proofreader_lang_v1";
pub const API_KEY_KEY: &str = "bilingual_proofreader_api_key";

#[derive(Clone)]
pub struct ProjectState {
    storage: Arc<dyn KeyValueStorage>,
}

impl ProjectState {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        self.storage.clone()
    }

    /// Segment store over the persisted collection
    pub fn open_store(&self) -> SegmentStore {
        SegmentStore::new(self.storage.clone(), DATA_KEY, self.load_segments())
    }

    /// Current collection, migrating the legacy key or seeding if needed
    ///
    /// Unreadable data never fails the load: the error is logged and the
    /// seed collection is returned instead.
    pub fn load_segments(&self) -> Vec<Segment> {
        match self.storage.get(DATA_KEY) {
            Ok(Some(saved)) => match serde_json::from_str::<Vec<Segment>>(&saved) {
                Ok(segments) => return segments,
                Err(e) => {
                    error!("Failed to parse saved segments, starting from the seed: {}", e);
                    return default_segments();
                }
            },
            Ok(None) => {}
            Err(e) => {
                error!("Failed to read saved segments, starting from the seed: {}", e);
                return default_segments();
            }
        }

        match self.migrate_legacy() {
            Some(segments) => segments,
            None => default_segments(),
        }
    }

    fn migrate_legacy(&self) -> Option<Vec<Segment>> {
        let saved = match self.storage.get(LEGACY_DATA_KEY) {
            Ok(saved) => saved?,
            Err(e) => {
                error!("Failed to read legacy segments: {}", e);
                return None;
            }
        };

        let segments = match legacy::parse(&saved) {
            Ok(segments) => segments,
            Err(e) => {
                error!("Failed to parse legacy segments, starting from the seed: {}", e);
                return None;
            }
        };

        match serde_json::to_string(&segments) {
            Ok(json) => {
                if let Err(e) = self.storage.set(DATA_KEY, &json) {
                    warn!("Failed to persist migrated segments: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize migrated segments: {}", e),
        }

        info!("Migrated {} segments from {}", segments.len(), LEGACY_DATA_KEY);
        Some(segments)
    }

    /// Stored target language, French when unset or unknown
    pub fn language(&self) -> TargetLanguage {
        match self.storage.get(LANGUAGE_KEY) {
            Ok(Some(name)) => name.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored language: {}", e);
                TargetLanguage::default()
            }),
            Ok(None) => TargetLanguage::default(),
            Err(e) => {
                warn!("Failed to read target language: {}", e);
                TargetLanguage::default()
            }
        }
    }

    pub fn set_language(&self, language: &TargetLanguage) -> Result<(), StorageError> {
        self.storage.set(LANGUAGE_KEY, language.as_str())
    }

    pub fn api_key(&self) -> Option<String> {
        match self.storage.get(API_KEY_KEY) {
            Ok(key) => key.filter(|k| !k.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read API key: {}", e);
                None
            }
        }
    }

    /// Store the credential; a blank key removes it
    pub fn set_api_key(&self, key: &str) -> Result<(), StorageError> {
        let key = key.trim();
        if key.is_empty() {
            self.storage.remove(API_KEY_KEY)
        } else {
            self.storage.set(API_KEY_KEY, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use domain::{AiFeedback, SegmentPatch, SegmentStatus};

    fn state_with(entries: Vec<(&str, &str)>) -> (ProjectState, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::with_entries(entries));
        (ProjectState::new(storage.clone()), storage)
    }

    #[test]
    fn empty_storage_loads_seed_without_writing() {
        let (state, storage) = state_with(vec![]);
        let segments = state.load_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, "1");
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupt_collection_falls_back_to_seed() {
        let (state, _) = state_with(vec![(DATA_KEY, "{not json")]);
        let ids: Vec<_> = state.load_segments().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn reload_resets_transient_flags() {
        let (state, _) = state_with(vec![]);
        let mut store = state.open_store();
        store.update(
            "1",
            SegmentPatch::new()
                .status(SegmentStatus::Reviewed)
                .ai_feedback(Some(AiFeedback::text("No significant errors found.")))
                .activity(domain::SegmentActivity::Analyzing, true),
        );
        let before = store.get("1").unwrap();
        assert!(before.is_analyzing);

        let reloaded = state.open_store().get("1").unwrap();
        assert!(!reloaded.is_analyzing);
        assert_eq!(reloaded.status, SegmentStatus::Reviewed);
        assert_eq!(reloaded.ai_feedback, before.ai_feedback);
        assert_eq!(reloaded.source_text, before.source_text);
    }

    #[test]
    fn language_defaults_and_round_trips() {
        let (state, _) = state_with(vec![(LANGUAGE_KEY, "Klingon")]);
        assert_eq!(state.language(), TargetLanguage::default());

        let german: TargetLanguage = "German".parse().unwrap();
        state.set_language(&german).unwrap();
        assert_eq!(state.language(), german);
    }

    #[test]
    fn blank_api_key_is_removed() {
        let (state, storage) = state_with(vec![]);
        state.set_api_key("  abc123 ").unwrap();
        assert_eq!(state.api_key().as_deref(), Some("abc123"));

        state.set_api_key("").unwrap();
        assert!(state.api_key().is_none());
        assert!(storage.get(API_KEY_KEY).unwrap().is_none());
    }
}
