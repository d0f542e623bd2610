use std::io::Write;

use serde::Serialize;

use super::domain::FeedbackRecord;
use super::events::FeeBucket;

#[derive(Debug, Serialize)]
struct FeedbackRow<'a> {
    timestamp: String,
    sentiment: &'static str,
    action_intent: &'a str,
    verdict: &'static str,
    fee_percent: Option<f64>,
    fee_bucket: &'static str,
    expected_percent: Option<f64>,
    source_url: &'a str,
    client_agent: &'a str,
}

impl<'a> From<&'a FeedbackRecord> for FeedbackRow<'a> {
    fn from(record: &'a FeedbackRecord) -> Self {
        let snapshot = record.result_snapshot.as_ref();
        Self {
            timestamp: record.timestamp.to_rfc3339(),
            sentiment: record.sentiment.key(),
            action_intent: record.action_intent.as_deref().unwrap_or(""),
            verdict: snapshot.map(|snapshot| snapshot.verdict.key()).unwrap_or(""),
            fee_percent: snapshot.and_then(|snapshot| snapshot.fee_percent),
            fee_bucket: FeeBucket::for_snapshot(snapshot).label(),
            expected_percent: snapshot.map(|snapshot| snapshot.expected_percent),
            source_url: &record.source_url,
            client_agent: &record.client_agent,
        }
    }
}

/// Writes the history as CSV with a header row, returning the record count.
pub fn write_history_csv<W: Write>(
    records: &[FeedbackRecord],
    writer: W,
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(FeedbackRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}
