use metrics_exporter_prometheus::PrometheusHandle;
use quote_check::config::AppConfig;
use quote_check::workflows::feedback::{
    Analytics, EventSink, JsonLinesEventSink, TracingEventSink,
};
use quote_check::workflows::quote::QuoteEvaluator;
use quote_check::workflows::session::QuoteSession;
use quote_check::workflows::storage::{JsonFileStore, PersistenceStore};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn analytics_sink(events_log: Option<PathBuf>) -> Arc<dyn EventSink> {
    match events_log {
        Some(path) => Arc::new(JsonLinesEventSink::new(path)),
        None => Arc::new(TracingEventSink),
    }
}

/// Session backed by the configured store file.
pub(crate) fn file_session(
    config: &AppConfig,
    events_log: Option<PathBuf>,
) -> QuoteSession<JsonFileStore> {
    let backend = Arc::new(JsonFileStore::new(config.storage.path.clone()));
    QuoteSession::new(
        QuoteEvaluator::default(),
        PersistenceStore::new(backend),
        Analytics::new(analytics_sink(events_log)),
        config.features.clone(),
    )
}
