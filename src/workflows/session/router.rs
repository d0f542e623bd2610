use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::QuoteSession;
use crate::workflows::feedback::{ClientContext, FeedbackError, HelpfulAnswer, Sentiment};
use crate::workflows::quote::{ChecklistItem, FeeConfig, QuoteInput, ResultSnapshot};
use crate::workflows::storage::KeyValueStore;

/// Session shared across handlers. The mutex serializes every evaluation and
/// save so the history keeps a single writer.
pub type SharedSession<S> = Arc<Mutex<QuoteSession<S>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SentimentRequest {
    pub(crate) sentiment: Sentiment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HelpfulRequest {
    pub(crate) value: HelpfulAnswer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRequest {
    pub(crate) action: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourceRequest {
    #[serde(default = "default_source")]
    pub(crate) source: String,
}

fn default_source() -> String {
    "quote_form".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogView {
    pub(crate) items: Vec<ChecklistItem>,
    pub(crate) fee_config: FeeConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CurrentQuoteView {
    pub(crate) input: QuoteInput,
    pub(crate) snapshot: Option<ResultSnapshot>,
}

/// Router builder exposing the quote and feedback endpoints.
pub fn quote_router<S>(session: SharedSession<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/checklist", get(checklist_handler::<S>))
        .route("/api/v1/quotes/evaluate", post(evaluate_handler::<S>))
        .route("/api/v1/quotes/current", get(current_handler::<S>))
        .route(
            "/api/v1/feedback",
            post(save_feedback_handler::<S>).get(history_handler::<S>),
        )
        .route("/api/v1/feedback/sentiment", post(sentiment_handler::<S>))
        .route("/api/v1/feedback/helpful", post(helpful_handler::<S>))
        .route("/api/v1/feedback/action", post(action_handler::<S>))
        .route("/api/v1/session/start", post(session_start_handler::<S>))
        .route("/api/v1/session/end", post(session_end_handler::<S>))
        .route("/api/v1/survey/open", post(survey_open_handler::<S>))
        .route("/api/v1/survey/dismiss", post(survey_dismiss_handler::<S>))
        .route("/api/v1/survey/toggle", post(survey_toggle_handler::<S>))
        .with_state(session)
}

fn lock<S>(session: &SharedSession<S>) -> Result<MutexGuard<'_, QuoteSession<S>>, Response> {
    session.lock().map_err(|_| {
        let payload = json!({ "error": "session state unavailable" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    })
}

pub(crate) async fn checklist_handler<S>(State(session): State<SharedSession<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let evaluator = session.evaluator();
    let view = CatalogView {
        items: evaluator.checklist().items().to_vec(),
        fee_config: evaluator.config().clone(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn evaluate_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(input): Json<QuoteInput>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let snapshot = session.evaluate(input).clone();
    (StatusCode::OK, Json(snapshot)).into_response()
}

pub(crate) async fn current_handler<S>(State(session): State<SharedSession<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let view = CurrentQuoteView {
        input: session.restore(),
        snapshot: session.latest().cloned(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn sentiment_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<SentimentRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.select_sentiment(request.sentiment);
    (StatusCode::OK, Json(json!({ "sentiment": request.sentiment }))).into_response()
}

pub(crate) async fn helpful_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<HelpfulRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.click_helpful(request.value);
    let payload = json!({ "sentiment": request.value.sentiment() });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn action_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<ActionRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.select_action(&request.action);
    (StatusCode::OK, Json(json!({ "action": session.action() }))).into_response()
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Caller context from `Referer` (or `Origin`) and `User-Agent`; missing
/// headers fall back to the session's own values.
pub(crate) fn client_context(headers: &HeaderMap, fallback: &ClientContext) -> ClientContext {
    ClientContext {
        source_url: header_text(headers, header::REFERER)
            .or_else(|| header_text(headers, header::ORIGIN))
            .unwrap_or_else(|| fallback.source_url.clone()),
        client_agent: header_text(headers, header::USER_AGENT)
            .unwrap_or_else(|| fallback.client_agent.clone()),
    }
}

pub(crate) async fn save_feedback_handler<S>(
    State(session): State<SharedSession<S>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let client = client_context(&headers, session.client());
    match session.save_feedback_from(&client) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(FeedbackError::MissingSentiment) => {
            let payload = json!({
                "error": FeedbackError::MissingSentiment.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<S>(State(session): State<SharedSession<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    (StatusCode::OK, Json(session.history())).into_response()
}

pub(crate) async fn session_start_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<SourceRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let fired = session.start_form(&request.source);
    (StatusCode::OK, Json(json!({ "fired": fired }))).into_response()
}

pub(crate) async fn session_end_handler<S>(State(session): State<SharedSession<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.end_session();
    StatusCode::NO_CONTENT.into_response()
}

pub(crate) async fn survey_open_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<SourceRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.open_external_form(&request.source);
    let payload = json!({ "surveyUrl": session.flags().survey_url });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn survey_dismiss_handler<S>(
    State(session): State<SharedSession<S>>,
    Json(request): Json<SourceRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    let session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    session.dismiss_external_form(&request.source);
    StatusCode::NO_CONTENT.into_response()
}

pub(crate) async fn survey_toggle_handler<S>(State(session): State<SharedSession<S>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let mut session = match lock(&session) {
        Ok(session) => session,
        Err(response) => return response,
    };
    match session.toggle_inline_form() {
        Some(is_open) => (StatusCode::OK, Json(json!({ "isOpen": is_open }))).into_response(),
        None => {
            let payload = json!({ "error": "inline survey form is disabled" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
    }
}
