use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::quote::domain::ResultSnapshot;

/// Coarse reaction to the usefulness of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Helpful,
    NotSure,
}

impl Sentiment {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(&['-', ' '][..], "_").as_str() {
            "helpful" | "yes" => Some(Self::Helpful),
            "not_sure" | "notsure" | "no" => Some(Self::NotSure),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Sentiment::Helpful => "helpful",
            Sentiment::NotSure => "not_sure",
        }
    }
}

/// Answer to the yes/no "was this helpful" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpfulAnswer {
    Yes,
    No,
}

impl HelpfulAnswer {
    pub fn sentiment(&self) -> Sentiment {
        match self {
            HelpfulAnswer::Yes => Sentiment::Helpful,
            HelpfulAnswer::No => Sentiment::NotSure,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            HelpfulAnswer::Yes => "yes",
            HelpfulAnswer::No => "no",
        }
    }
}

/// Where the feedback was captured from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub source_url: String,
    pub client_agent: String,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            source_url: "local://quote-check".to_string(),
            client_agent: concat!("quote-check/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// One saved piece of feedback. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub sentiment: Sentiment,
    pub action_intent: Option<String>,
    pub result_snapshot: Option<ResultSnapshot>,
    #[serde(rename = "timestampISO")]
    pub timestamp: DateTime<Utc>,
    pub source_url: String,
    pub client_agent: String,
}

/// Last result the user chose to keep, overwritten on each save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResult {
    pub sentiment: Sentiment,
    pub result_snapshot: Option<ResultSnapshot>,
    #[serde(rename = "savedAtISO")]
    pub saved_at: DateTime<Utc>,
}
