//! Session controller owning the latest evaluation result.
//!
//! One [`QuoteSession`] corresponds to one browser-style session: it holds the
//! prompt gate tokens, the in-progress feedback selection, and the most recent
//! [`ResultSnapshot`]. Feedback and rendering read the snapshot from here
//! rather than from shared global state.

pub mod router;

#[cfg(test)]
mod tests;

pub use router::{quote_router, SharedSession};

use serde::Serialize;
use tracing::warn;

use crate::config::FeatureFlags;
use crate::workflows::feedback::{
    Analytics, AnalyticsEvent, CaptureStatus, ClientContext, FeedbackCapture, FeedbackError,
    FeedbackRecord, HelpfulAnswer, PromptGate, SavedResult, Sentiment, FORM_START_GATE,
    SURVEY_PROMPT_GATE,
};
use crate::workflows::quote::{QuoteEvaluator, QuoteInput, ResultSnapshot};
use crate::workflows::storage::{KeyValueStore, PersistenceStore};

/// Outcome of a successful feedback save.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub record: FeedbackRecord,
    pub history_len: usize,
    /// `true` the first time per session when the survey prompt is enabled.
    pub show_survey_prompt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_url: Option<String>,
}

pub struct QuoteSession<S> {
    evaluator: QuoteEvaluator,
    store: PersistenceStore<S>,
    analytics: Analytics,
    flags: FeatureFlags,
    client: ClientContext,
    gate: PromptGate,
    capture: FeedbackCapture,
    latest: Option<ResultSnapshot>,
    inline_form_open: bool,
}

impl<S: KeyValueStore> QuoteSession<S> {
    pub fn new(
        evaluator: QuoteEvaluator,
        store: PersistenceStore<S>,
        analytics: Analytics,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            evaluator,
            store,
            capture: FeedbackCapture::new(analytics.clone()),
            analytics,
            flags,
            client: ClientContext::default(),
            gate: PromptGate::new(),
            latest: None,
            inline_form_open: false,
        }
    }

    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    pub fn evaluator(&self) -> &QuoteEvaluator {
        &self.evaluator
    }

    pub fn client(&self) -> &ClientContext {
        &self.client
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn store(&self) -> &PersistenceStore<S> {
        &self.store
    }

    pub fn latest(&self) -> Option<&ResultSnapshot> {
        self.latest.as_ref()
    }

    pub fn capture_status(&self) -> &CaptureStatus {
        self.capture.status()
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.capture.sentiment()
    }

    pub fn action(&self) -> Option<&str> {
        self.capture.action()
    }

    pub fn inline_form_open(&self) -> bool {
        self.inline_form_open
    }

    /// Stored form input, or defaults when nothing usable is stored.
    pub fn restore(&self) -> QuoteInput {
        self.store.load_current_input()
    }

    /// Re-evaluates the stored input, as on page load.
    pub fn resume(&mut self) -> &ResultSnapshot {
        let input = self.restore();
        self.evaluate(input)
    }

    /// Evaluates `input`, replaces the latest snapshot, and persists the input.
    /// A failed write is logged; the evaluation result is still returned.
    pub fn evaluate(&mut self, input: QuoteInput) -> &ResultSnapshot {
        let snapshot = self.evaluator.evaluate(&input);
        if let Err(err) = self.store.save_current_input(&input) {
            warn!(error = %err, "failed to persist current quote input");
        }
        self.latest.insert(snapshot)
    }

    /// Records a form interaction. Emits `form_start` once per session when
    /// the start gate is enabled; returns whether it fired.
    pub fn start_form(&mut self, source: &str) -> bool {
        if !self.flags.session_start_gate || !self.gate.trigger(FORM_START_GATE) {
            return false;
        }
        self.analytics.emit(&AnalyticsEvent::FormStart {
            source: source.to_string(),
        });
        true
    }

    pub fn select_sentiment(&mut self, sentiment: Sentiment) {
        self.capture.select_sentiment(sentiment);
    }

    pub fn click_helpful(&mut self, answer: HelpfulAnswer) {
        self.capture.click_helpful(answer);
    }

    pub fn select_action(&mut self, action: &str) {
        self.capture.select_action(action);
    }

    /// Saves with the session's own client context.
    pub fn save_feedback(&mut self) -> Result<SaveOutcome, FeedbackError> {
        let client = self.client.clone();
        self.save_feedback_from(&client)
    }

    /// Saves with the caller's source URL and agent, as reported per request.
    pub fn save_feedback_from(
        &mut self,
        client: &ClientContext,
    ) -> Result<SaveOutcome, FeedbackError> {
        let saved = self
            .capture
            .save(self.latest.as_ref(), client, &self.store)?;

        if self.flags.persist_saved_result {
            let saved_result = SavedResult {
                sentiment: saved.record.sentiment,
                result_snapshot: saved.record.result_snapshot.clone(),
                saved_at: saved.record.timestamp,
            };
            if let Err(err) = self.store.save_saved_result(&saved_result) {
                warn!(error = %err, "failed to persist saved result");
            }
        }

        let show_survey_prompt =
            self.flags.prompt_after_save && self.gate.trigger(SURVEY_PROMPT_GATE);
        let survey_url = if show_survey_prompt {
            self.flags.survey_url.clone()
        } else {
            None
        };

        Ok(SaveOutcome {
            record: saved.record,
            history_len: saved.history_len,
            show_survey_prompt,
            survey_url,
        })
    }

    pub fn history(&self) -> Vec<FeedbackRecord> {
        self.store.load_history()
    }

    pub fn saved_result(&self) -> Option<SavedResult> {
        self.store.load_saved_result()
    }

    pub fn open_external_form(&self, source: &str) {
        self.analytics.emit(&AnalyticsEvent::OpenExternalForm {
            source: source.to_string(),
        });
    }

    pub fn dismiss_external_form(&self, source: &str) {
        self.analytics.emit(&AnalyticsEvent::DismissExternalForm {
            source: source.to_string(),
        });
    }

    /// Flips the inline survey form. `None` when inline toggling is disabled.
    pub fn toggle_inline_form(&mut self) -> Option<bool> {
        if !self.flags.inline_form_toggle {
            return None;
        }
        self.inline_form_open = !self.inline_form_open;
        self.analytics.emit(&AnalyticsEvent::ToggleInlineForm {
            is_open: self.inline_form_open,
        });
        Some(self.inline_form_open)
    }

    /// Ends the session: gate tokens and selections are cleared. The latest
    /// snapshot and persisted records are kept.
    pub fn end_session(&mut self) {
        self.gate.reset();
        self.capture.reset();
        self.inline_form_open = false;
    }
}
