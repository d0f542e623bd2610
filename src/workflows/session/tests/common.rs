use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::FeatureFlags;
use crate::workflows::feedback::{Analytics, EventParams, EventSink, EventValue};
use crate::workflows::quote::{Difficulty, QuoteEvaluator, QuoteInput};
use crate::workflows::session::{quote_router, QuoteSession, SharedSession};
use crate::workflows::storage::{KeyValueStore, MemoryStore, PersistenceStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecordedEvent {
    pub(super) name: String,
    pub(super) params: EventParams,
}

impl RecordedEvent {
    pub(super) fn param(&self, key: &str) -> Option<&EventValue> {
        self.params.get(key)
    }
}

#[derive(Default)]
pub(super) struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub(super) fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }

    pub(super) fn named(&self, name: &str) -> Vec<RecordedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.name == name)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, name: &str, params: &EventParams) {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(RecordedEvent {
                name: name.to_string(),
                params: params.clone(),
            });
    }
}

/// Store whose writes always fail; reads see nothing.
pub(super) struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

pub(super) fn flags() -> FeatureFlags {
    FeatureFlags {
        survey_url: Some("https://forms.example.com/quote".to_string()),
        ..FeatureFlags::default()
    }
}

pub(super) fn build_session_with(
    flags: FeatureFlags,
) -> (
    QuoteSession<MemoryStore>,
    Arc<MemoryStore>,
    Arc<RecordingSink>,
) {
    let backend = Arc::new(MemoryStore::default());
    let sink = Arc::new(RecordingSink::default());
    let session = QuoteSession::new(
        QuoteEvaluator::default(),
        PersistenceStore::new(backend.clone()),
        Analytics::new(sink.clone()),
        flags,
    );
    (session, backend, sink)
}

pub(super) fn build_session() -> (
    QuoteSession<MemoryStore>,
    Arc<MemoryStore>,
    Arc<RecordingSink>,
) {
    build_session_with(flags())
}

/// Medium tier with creative production, landing page, and copywriting
/// selected: expected 15, band 13..=17 in the standard catalog.
pub(super) fn quote(fee: f64) -> QuoteInput {
    QuoteInput::new(Difficulty::Medium)
        .with_budget(1_000_000.0)
        .with_fee(fee)
        .with_items(["creative_production", "landing_page", "ad_copy"])
}

pub(super) fn shared(session: QuoteSession<MemoryStore>) -> SharedSession<MemoryStore> {
    Arc::new(Mutex::new(session))
}

pub(super) fn router_for(session: QuoteSession<MemoryStore>) -> axum::Router {
    quote_router(shared(session))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
