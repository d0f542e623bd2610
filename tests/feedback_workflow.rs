use std::sync::Arc;

use quote_check::config::FeatureFlags;
use quote_check::workflows::feedback::{
    write_history_csv, Analytics, FeedbackError, Sentiment,
};
use quote_check::workflows::quote::{Difficulty, QuoteEvaluator, QuoteInput};
use quote_check::workflows::session::QuoteSession;
use quote_check::workflows::storage::{
    JsonFileStore, KeyValueStore, MemoryStore, PersistenceStore, FEEDBACK_HISTORY_CAPACITY,
};

fn session_over<S: KeyValueStore>(backend: Arc<S>) -> QuoteSession<S> {
    QuoteSession::new(
        QuoteEvaluator::default(),
        PersistenceStore::new(backend),
        Analytics::disabled(),
        FeatureFlags::default(),
    )
}

fn quote() -> QuoteInput {
    QuoteInput::new(Difficulty::Medium)
        .with_fee(15.0)
        .with_budget(1_000_000.0)
        .with_items(["creative_production", "landing_page", "ad_copy"])
}

#[test]
fn saving_without_sentiment_leaves_history_untouched() {
    let mut session = session_over(Arc::new(MemoryStore::default()));
    session.evaluate(quote());

    let error = session.save_feedback().expect_err("sentiment required");
    assert!(matches!(error, FeedbackError::MissingSentiment));
    assert_eq!(error.to_string(), "Please select helpful or not sure.");
    assert!(session.history().is_empty());
}

#[test]
fn history_lists_saves_newest_first() {
    let mut session = session_over(Arc::new(MemoryStore::default()));
    session.evaluate(quote());

    for sentiment in [Sentiment::Helpful, Sentiment::NotSure, Sentiment::Helpful] {
        session.select_sentiment(sentiment);
        session.save_feedback().expect("save succeeds");
    }

    let sentiments: Vec<Sentiment> = session
        .history()
        .iter()
        .map(|record| record.sentiment)
        .collect();
    assert_eq!(
        sentiments,
        vec![Sentiment::Helpful, Sentiment::NotSure, Sentiment::Helpful]
    );
    assert_eq!(session.history().len(), 3);
}

#[test]
fn history_evicts_oldest_beyond_capacity() {
    let mut session = session_over(Arc::new(MemoryStore::default()));
    session.evaluate(quote());

    session.select_sentiment(Sentiment::NotSure);
    session.save_feedback().expect("first save");
    session.select_sentiment(Sentiment::Helpful);
    for _ in 1..=FEEDBACK_HISTORY_CAPACITY {
        session.save_feedback().expect("save succeeds");
    }

    let history = session.history();
    assert_eq!(history.len(), FEEDBACK_HISTORY_CAPACITY);
    assert!(history
        .iter()
        .all(|record| record.sentiment == Sentiment::Helpful));
}

#[test]
fn file_store_survives_a_new_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("store.json");

    {
        let mut session = session_over(Arc::new(JsonFileStore::new(&path)));
        session.evaluate(quote());
        session.select_sentiment(Sentiment::Helpful);
        session.select_action("negotiate");
        session.save_feedback().expect("save succeeds");
    }

    let mut reopened = session_over(Arc::new(JsonFileStore::new(&path)));
    assert_eq!(reopened.restore(), quote());
    let snapshot = reopened.resume().clone();
    assert_eq!(snapshot.expected_percent, 15.0);

    let history = reopened.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action_intent.as_deref(), Some("negotiate"));
    assert_eq!(history[0].result_snapshot.as_ref(), Some(&snapshot));
}

#[test]
fn exported_history_has_one_row_per_record() {
    let mut session = session_over(Arc::new(MemoryStore::default()));
    session.evaluate(quote());
    session.select_sentiment(Sentiment::NotSure);
    session.save_feedback().expect("save succeeds");
    session.select_sentiment(Sentiment::Helpful);
    session.save_feedback().expect("save succeeds");

    let mut buffer = Vec::new();
    let written = write_history_csv(&session.history(), &mut buffer).expect("csv written");
    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(written, 2);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("timestamp,sentiment,action_intent,verdict"));
    assert!(lines[1].contains(",helpful,"));
    assert!(lines[2].contains(",not_sure,"));
    assert!(lines[1].contains("15-20"));
}
