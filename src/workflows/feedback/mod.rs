//! Micro-feedback capture: sentiment and action intent, bounded history,
//! session prompt gating, and analytics events.

pub mod capture;
pub mod domain;
pub mod events;
pub mod export;
pub mod gate;

pub use capture::{
    CaptureStatus, FeedbackCapture, FeedbackError, SavedFeedback, MISSING_SENTIMENT_MESSAGE,
};
pub use domain::{ClientContext, FeedbackRecord, HelpfulAnswer, SavedResult, Sentiment};
pub use events::{
    Analytics, AnalyticsEvent, EventParams, EventSink, EventValue, FeeBucket, JsonLinesEventSink,
    TracingEventSink,
};
pub use export::write_history_csv;
pub use gate::{PromptGate, FORM_START_GATE, SURVEY_PROMPT_GATE};
