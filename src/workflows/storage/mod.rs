//! Key/value persistence for the current quote input and the feedback history.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::workflows::feedback::domain::{FeedbackRecord, SavedResult};
use crate::workflows::quote::domain::QuoteInput;

pub const CURRENT_INPUT_KEY: &str = "ad-quote-check";
pub const FEEDBACK_HISTORY_KEY: &str = "mvp_micro_feedback";
pub const SAVED_RESULT_KEY: &str = "mvp_saved_result";

/// Maximum number of feedback records retained, newest first.
pub const FEEDBACK_HISTORY_CAPACITY: usize = 200;

/// Raw string store. Writes replace the whole value for a key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Typed access to the persisted records.
///
/// Reads never fail: missing, unreadable, or malformed data is logged and
/// replaced with a default.
pub struct PersistenceStore<S> {
    backend: Arc<S>,
}

impl<S> Clone for PersistenceStore<S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<S: KeyValueStore> PersistenceStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<S> {
        &self.backend
    }

    pub fn load_current_input(&self) -> QuoteInput {
        self.read(CURRENT_INPUT_KEY).unwrap_or_default()
    }

    pub fn save_current_input(&self, input: &QuoteInput) -> Result<(), StoreError> {
        self.write(CURRENT_INPUT_KEY, input)
    }

    /// History newest first. Malformed entries are skipped individually.
    pub fn load_history(&self) -> Vec<FeedbackRecord> {
        let Some(value) = self.read::<Value>(FEEDBACK_HISTORY_KEY) else {
            return Vec::new();
        };

        let Value::Array(entries) = value else {
            warn!(key = FEEDBACK_HISTORY_KEY, "stored feedback history is not a list; ignoring");
            return Vec::new();
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(index, error = %err, "dropping malformed feedback record");
                    None
                }
            })
            .collect()
    }

    /// Prepends `record`, evicts the oldest beyond capacity, and writes the
    /// whole list back. Returns the history as persisted.
    pub fn append_feedback(
        &self,
        record: FeedbackRecord,
    ) -> Result<Vec<FeedbackRecord>, StoreError> {
        let mut history = self.load_history();
        history.insert(0, record);
        history.truncate(FEEDBACK_HISTORY_CAPACITY);
        self.write(FEEDBACK_HISTORY_KEY, &history)?;
        Ok(history)
    }

    pub fn load_saved_result(&self) -> Option<SavedResult> {
        self.read(SAVED_RESULT_KEY)
    }

    pub fn save_saved_result(&self, saved: &SavedResult) -> Result<(), StoreError> {
        self.write(SAVED_RESULT_KEY, saved)
    }

    pub fn clear_history(&self) -> Result<(), StoreError> {
        self.backend.remove(FEEDBACK_HISTORY_KEY)
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored data");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "failed to parse stored data");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
        self.backend.set(key, raw)
    }
}
