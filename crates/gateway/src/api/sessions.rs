//! Session context endpoints over the in-process registry.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use iv_contextpack::ContextStats;
use iv_domain::interview::{Evaluation, Exchange, ExchangeKind, Speaker};
use iv_sessions::SharedContext;

use crate::error::ApiError;
use crate::state::AppState;

fn existing(state: &AppState, id: &str) -> Result<SharedContext, ApiError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.sessions.stats())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/sessions/:id/exchanges
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct AppendExchangeBody {
    pub speaker: Speaker,
    pub text: String,
    /// Defaults to `answer` for the candidate and `message` otherwise.
    #[serde(default, alias = "type")]
    pub kind: Option<ExchangeKind>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
}

/// Append one exchange, creating the session on first use.
pub async fn append_exchange(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AppendExchangeBody>,
) -> Result<Json<ContextStats>, ApiError> {
    let ctx = state.sessions.get_or_create(&id)?;

    let kind = body.kind.unwrap_or(match body.speaker {
        Speaker::Candidate => ExchangeKind::Answer,
        Speaker::Interviewer => ExchangeKind::Message,
    });
    let mut exchange = Exchange::new(body.speaker, body.text, kind);
    exchange.evaluation = body.evaluation;

    let mut ctx = ctx.lock();
    ctx.add_exchange(exchange);
    Ok(Json(ctx.stats()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions/:id/context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ctx = existing(&state, &id)?;
    let ctx = ctx.lock();
    Ok(Json(serde_json::json!({
        "sessionId": id,
        "digest": ctx.render(),
        "stats": ctx.stats(),
    })))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions/:id/transcript
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ctx = existing(&state, &id)?;
    let ctx = ctx.lock();
    Ok(Json(serde_json::json!({
        "sessionId": id,
        "currentQuestion": ctx.current_question(),
        "transcript": ctx.transcript(),
    })))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/sessions/:id/advance
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn advance_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContextStats>, ApiError> {
    let ctx = existing(&state, &id)?;
    let mut ctx = ctx.lock();
    ctx.advance_question();
    Ok(Json(ctx.stats()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DELETE /v1/sessions/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Idempotent: deleting an unknown session reports `removed: false`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let removed = state.sessions.remove(&id);
    state.session_locks.forget(&id);
    Json(serde_json::json!({
        "sessionId": id,
        "removed": removed,
    }))
}
