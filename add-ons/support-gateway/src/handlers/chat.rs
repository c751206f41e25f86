//! Chat handlers: the HTML form round-trip and the JSON ask/history API.
//!
//! Both paths go through `Responder::ask` with the caller's session history, so validation,
//! fallback and history bounds behave identically.

use super::page::{self, Notice};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use support_core::ValidationError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct IndexQuery {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskForm {
    #[serde(default)]
    question: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskRequest {
    question: String,
    #[serde(default)]
    session_id: Option<String>,
}

/// GET / – chat page for an existing or new session.
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Html<String> {
    let session_id = state.sessions.resolve(query.session_id.as_deref());
    let history = state.sessions.snapshot(&session_id).unwrap_or_default();
    Html(page::render(
        &state.config.app_name,
        session_id,
        &Notice::None,
        &history,
    ))
}

/// POST /ask – form submit. Empty input re-renders silently; short input shows the validation message.
pub(crate) async fn ask_form(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let session_id = state.sessions.resolve(form.session_id.as_deref());
    let result = state.responder.validate(&form.question).and_then(|_| {
        state
            .sessions
            .with_session(session_id, |history| state.responder.ask(history, &form.question))
    });
    let notice = match result {
        Ok(reply) => Notice::Answer(reply.answer),
        Err(ValidationError::Empty) => Notice::None,
        Err(e) => Notice::Error(e.to_string()),
    };
    let history = state.sessions.snapshot(&session_id).unwrap_or_default();
    Html(page::render(
        &state.config.app_name,
        session_id,
        &notice,
        &history,
    ))
}

/// POST /api/v1/ask – JSON question/answer.
pub(crate) async fn ask_json(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    let session_id = state.sessions.resolve(req.session_id.as_deref());
    tracing::info!(%session_id, chars = req.question.chars().count(), "Ask request received");

    // Rejected questions never open a session.
    let result = state.responder.validate(&req.question).and_then(|_| {
        state
            .sessions
            .with_session(session_id, |history| state.responder.ask(history, &req.question))
    });
    match result {
        Ok(reply) => {
            let matched = reply.matched.as_ref();
            Json(serde_json::json!({
                "status": "ok",
                "answer": reply.answer,
                "matched": matched.is_some(),
                "score": matched.map(|d| d.score),
                "matched_question": matched.map(|d| d.question.clone()),
                "session_id": session_id,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::debug!(%session_id, error = %e, "Question rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "status": "error",
                    "error": e.to_string(),
                    "session_id": session_id,
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/v1/history/:session_id – most-recent-first exchanges of one session.
pub(crate) async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = Uuid::parse_str(&session_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let history = state.sessions.snapshot(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(serde_json::json!({
        "session_id": id,
        "history": history,
    })))
}
