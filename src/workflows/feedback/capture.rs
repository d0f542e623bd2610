use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{ClientContext, FeedbackRecord, HelpfulAnswer, Sentiment};
use super::events::{Analytics, AnalyticsEvent, FeeBucket};
use crate::workflows::quote::domain::ResultSnapshot;
use crate::workflows::storage::{KeyValueStore, PersistenceStore, StoreError};

/// Inline status shown next to the feedback controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureStatus {
    #[default]
    Idle,
    NeedsSentiment,
    Saved { history_len: usize },
}

impl CaptureStatus {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CaptureStatus::Idle => None,
            CaptureStatus::NeedsSentiment => Some(MISSING_SENTIMENT_MESSAGE),
            CaptureStatus::Saved { .. } => Some("Saved!"),
        }
    }
}

pub const MISSING_SENTIMENT_MESSAGE: &str = "Please select helpful or not sure.";

/// Error raised when saving feedback.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("{}", MISSING_SENTIMENT_MESSAGE)]
    MissingSentiment,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFeedback {
    pub record: FeedbackRecord,
    pub history_len: usize,
}

/// Collects a sentiment and an optional action intent, then appends records
/// to the persisted history.
///
/// Selections survive a save so the same choice can be saved again; every
/// save appends a distinct record.
#[derive(Debug, Clone, Default)]
pub struct FeedbackCapture {
    sentiment: Option<Sentiment>,
    action: Option<String>,
    status: CaptureStatus,
    analytics: Analytics,
}

impl FeedbackCapture {
    pub fn new(analytics: Analytics) -> Self {
        Self {
            analytics,
            ..Self::default()
        }
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    /// Reselecting overwrites the previous choice.
    pub fn select_sentiment(&mut self, sentiment: Sentiment) {
        self.sentiment = Some(sentiment);
        self.status = CaptureStatus::Idle;
        self.analytics
            .emit(&AnalyticsEvent::SentimentSelect { option: sentiment });
    }

    pub fn click_helpful(&mut self, answer: HelpfulAnswer) {
        self.sentiment = Some(answer.sentiment());
        self.status = CaptureStatus::Idle;
        self.analytics
            .emit(&AnalyticsEvent::HelpfulClick { value: answer });
    }

    /// Blank intents clear the selection without emitting.
    pub fn select_action(&mut self, action: &str) {
        let action = action.trim();
        if action.is_empty() {
            self.action = None;
            return;
        }
        self.action = Some(action.to_string());
        self.analytics.emit(&AnalyticsEvent::ActionSelect {
            action: action.to_string(),
        });
    }

    pub fn reset(&mut self) {
        self.sentiment = None;
        self.action = None;
        self.status = CaptureStatus::Idle;
    }

    pub fn save<S: KeyValueStore>(
        &mut self,
        snapshot: Option<&ResultSnapshot>,
        client: &ClientContext,
        store: &PersistenceStore<S>,
    ) -> Result<SavedFeedback, FeedbackError> {
        self.save_at(snapshot, client, store, Utc::now())
    }

    /// Without a sentiment nothing is written and no event is emitted.
    pub fn save_at<S: KeyValueStore>(
        &mut self,
        snapshot: Option<&ResultSnapshot>,
        client: &ClientContext,
        store: &PersistenceStore<S>,
        now: DateTime<Utc>,
    ) -> Result<SavedFeedback, FeedbackError> {
        let Some(sentiment) = self.sentiment else {
            self.status = CaptureStatus::NeedsSentiment;
            return Err(FeedbackError::MissingSentiment);
        };

        let record = FeedbackRecord {
            sentiment,
            action_intent: self.action.clone(),
            result_snapshot: snapshot.cloned(),
            timestamp: now,
            source_url: client.source_url.clone(),
            client_agent: client.client_agent.clone(),
        };

        let history = store.append_feedback(record.clone())?;
        let history_len = history.len();
        self.status = CaptureStatus::Saved { history_len };

        info!(
            sentiment = sentiment.key(),
            has_snapshot = snapshot.is_some(),
            history_len,
            "feedback saved"
        );
        self.analytics.emit(&AnalyticsEvent::Save {
            sentiment,
            verdict: snapshot.map(|snapshot| snapshot.verdict),
            fee_bucket: FeeBucket::for_snapshot(snapshot),
        });

        Ok(SavedFeedback {
            record,
            history_len,
        })
    }
}
