use std::collections::BTreeMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::domain::{HelpfulAnswer, Sentiment};
use crate::workflows::quote::domain::{ResultSnapshot, Verdict};

/// Coarse fee grouping used only in analytics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeeBucket {
    #[serde(rename = "0-5")]
    UpTo5,
    #[serde(rename = "5-10")]
    UpTo10,
    #[serde(rename = "10-15")]
    UpTo15,
    #[serde(rename = "15-20")]
    UpTo20,
    #[serde(rename = "20+")]
    Over20,
    #[serde(rename = "unknown")]
    Unknown,
}

impl FeeBucket {
    pub fn from_percent(fee_percent: f64) -> Self {
        if !fee_percent.is_finite() {
            return Self::Unknown;
        }
        if fee_percent < 5.0 {
            Self::UpTo5
        } else if fee_percent < 10.0 {
            Self::UpTo10
        } else if fee_percent < 15.0 {
            Self::UpTo15
        } else if fee_percent < 20.0 {
            Self::UpTo20
        } else {
            Self::Over20
        }
    }

    /// Bucket for a snapshot; a missing snapshot or blank fee is `Unknown`.
    pub fn for_snapshot(snapshot: Option<&ResultSnapshot>) -> Self {
        snapshot
            .and_then(|snapshot| snapshot.fee_percent)
            .map(Self::from_percent)
            .unwrap_or(Self::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeeBucket::UpTo5 => "0-5",
            FeeBucket::UpTo10 => "5-10",
            FeeBucket::UpTo15 => "10-15",
            FeeBucket::UpTo20 => "15-20",
            FeeBucket::Over20 => "20+",
            FeeBucket::Unknown => "unknown",
        }
    }
}

/// Primitive analytics parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for EventValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for EventValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

pub type EventParams = BTreeMap<&'static str, EventValue>;

/// Analytics events. Parameters are always derived summaries, never raw
/// snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    SentimentSelect {
        option: Sentiment,
    },
    ActionSelect {
        action: String,
    },
    HelpfulClick {
        value: HelpfulAnswer,
    },
    Save {
        sentiment: Sentiment,
        verdict: Option<Verdict>,
        fee_bucket: FeeBucket,
    },
    FormStart {
        source: String,
    },
    OpenExternalForm {
        source: String,
    },
    ToggleInlineForm {
        is_open: bool,
    },
    DismissExternalForm {
        source: String,
    },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::SentimentSelect { .. } => "sentiment_select",
            AnalyticsEvent::ActionSelect { .. } => "action_select",
            AnalyticsEvent::HelpfulClick { .. } => "helpful_click",
            AnalyticsEvent::Save { .. } => "save",
            AnalyticsEvent::FormStart { .. } => "form_start",
            AnalyticsEvent::OpenExternalForm { .. } => "open_external_form",
            AnalyticsEvent::ToggleInlineForm { .. } => "toggle_inline_form",
            AnalyticsEvent::DismissExternalForm { .. } => "dismiss_external_form",
        }
    }

    pub fn params(&self) -> EventParams {
        let mut params = EventParams::new();
        match self {
            AnalyticsEvent::SentimentSelect { option } => {
                params.insert("option", option.key().into());
            }
            AnalyticsEvent::ActionSelect { action } => {
                params.insert("action", action.as_str().into());
            }
            AnalyticsEvent::HelpfulClick { value } => {
                params.insert("value", value.key().into());
            }
            AnalyticsEvent::Save {
                sentiment,
                verdict,
                fee_bucket,
            } => {
                params.insert("sentiment", sentiment.key().into());
                params.insert(
                    "verdict",
                    verdict.map(|verdict| verdict.key()).unwrap_or("unknown").into(),
                );
                params.insert("feeBucket", fee_bucket.label().into());
            }
            AnalyticsEvent::FormStart { source }
            | AnalyticsEvent::OpenExternalForm { source }
            | AnalyticsEvent::DismissExternalForm { source } => {
                params.insert("source", source.as_str().into());
            }
            AnalyticsEvent::ToggleInlineForm { is_open } => {
                params.insert("isOpen", (*is_open).into());
            }
        }
        params
    }
}

/// Receiver of named analytics events. Implementations must not fail.
pub trait EventSink: Send + Sync {
    fn emit(&self, name: &str, params: &EventParams);
}

/// Optional sink handle; emitting without a sink is a no-op.
#[derive(Clone, Default)]
pub struct Analytics {
    sink: Option<Arc<dyn EventSink>>,
}

impl Analytics {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    pub fn emit(&self, event: &AnalyticsEvent) {
        if let Some(sink) = &self.sink {
            sink.emit(event.name(), &event.params());
        }
    }
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Forwards events to the log under the `analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, name: &str, params: &EventParams) {
        let params = serde_json::to_string(params).unwrap_or_default();
        info!(target: "analytics", event = name, %params, "analytics event");
    }
}

/// Appends one JSON object per event to a file. I/O failures are logged and
/// swallowed.
#[derive(Debug)]
pub struct JsonLinesEventSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesEventSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl EventSink for JsonLinesEventSink {
    fn emit(&self, name: &str, params: &EventParams) {
        let line = json!({
            "ts": Utc::now().to_rfc3339(),
            "event": name,
            "params": params,
        })
        .to_string();

        let Ok(_guard) = self.lock.lock() else {
            warn!(event = name, "event log mutex poisoned; dropping event");
            return;
        };
        if let Err(err) = self.append(&line) {
            warn!(event = name, path = %self.path.display(), error = %err, "failed to append event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_bucket_boundaries() {
        assert_eq!(FeeBucket::from_percent(4.0).label(), "0-5");
        assert_eq!(FeeBucket::from_percent(5.0).label(), "5-10");
        assert_eq!(FeeBucket::from_percent(9.9).label(), "5-10");
        assert_eq!(FeeBucket::from_percent(14.99).label(), "10-15");
        assert_eq!(FeeBucket::from_percent(15.0).label(), "15-20");
        assert_eq!(FeeBucket::from_percent(20.0).label(), "20+");
        assert_eq!(FeeBucket::from_percent(f64::NAN).label(), "unknown");
        assert_eq!(FeeBucket::from_percent(f64::INFINITY).label(), "unknown");
        assert_eq!(FeeBucket::for_snapshot(None), FeeBucket::Unknown);
    }

    #[test]
    fn save_params_carry_only_derived_values() {
        let event = AnalyticsEvent::Save {
            sentiment: Sentiment::NotSure,
            verdict: Some(Verdict::High),
            fee_bucket: FeeBucket::UpTo20,
        };
        let params = event.params();
        assert_eq!(event.name(), "save");
        assert_eq!(params.len(), 3);
        assert_eq!(params["sentiment"], EventValue::from("not_sure"));
        assert_eq!(params["verdict"], EventValue::from("high"));
        assert_eq!(params["feeBucket"], EventValue::from("15-20"));
    }

    #[test]
    fn toggle_params_serialize_as_json_bool() {
        let params = AnalyticsEvent::ToggleInlineForm { is_open: true }.params();
        let encoded = serde_json::to_value(&params).expect("serializes");
        assert_eq!(encoded, json!({ "isOpen": true }));
    }

    #[test]
    fn disabled_analytics_is_a_no_op() {
        let analytics = Analytics::disabled();
        assert!(!analytics.is_attached());
        analytics.emit(&AnalyticsEvent::FormStart {
            source: "quote_form".to_string(),
        });
    }

    #[test]
    fn json_lines_sink_appends_one_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.jsonl");
        let analytics = Analytics::new(Arc::new(JsonLinesEventSink::new(&path)));

        analytics.emit(&AnalyticsEvent::SentimentSelect {
            option: Sentiment::Helpful,
        });
        analytics.emit(&AnalyticsEvent::DismissExternalForm {
            source: "survey_prompt".to_string(),
        });

        let contents = std::fs::read_to_string(&path).expect("log written");
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "sentiment_select");
        assert_eq!(lines[0]["params"]["option"], "helpful");
        assert_eq!(lines[1]["params"]["source"], "survey_prompt");
    }
}
