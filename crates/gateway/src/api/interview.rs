//! Interview operations: question generation, turn evaluation, reports.

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use iv_domain::interview::{
    Exchange, ExchangeKind, NextAction, Question, Report, SessionRecord, Speaker, TurnDecision,
};

use crate::error::ApiError;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/question/generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionBody {
    pub topic: String,
    #[serde(default = "d_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub position: u32,
}

fn d_difficulty() -> String {
    "medium".into()
}

pub async fn generate_question(
    State(state): State<AppState>,
    Json(body): Json<GenerateQuestionBody>,
) -> Result<Json<Question>, ApiError> {
    if body.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".into()));
    }
    let generator = state.question_generator()?;
    let question = generator
        .generate(&body.topic, &body.difficulty, body.position)
        .await?;
    Ok(Json(question))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/evaluate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateBody {
    pub question: Question,
    pub answer: String,
    /// Prior turns for this question, oldest first.
    #[serde(default)]
    pub history: Vec<Exchange>,
    /// When set, the session's digest feeds the directive and the turn is
    /// recorded into that session.
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateBody>,
) -> Result<Json<TurnDecision>, ApiError> {
    if body.answer.trim().is_empty() {
        return Err(ApiError::BadRequest("answer must not be empty".into()));
    }
    let engine = state.decision_engine()?;

    let Some(session_id) = body.session_id.as_deref() else {
        let decision = engine
            .decide(&body.question, &body.answer, &body.history)
            .await?;
        return Ok(Json(decision));
    };

    let ctx = state.sessions.get_or_create(session_id)?;
    let _turn = state.session_locks.acquire(session_id).await?;

    let digest = ctx.lock().render();
    let decision = engine
        .decide_with_digest(&body.question, &body.answer, &body.history, Some(&digest))
        .await?;

    let mut answer = Exchange::candidate(body.answer);
    answer.evaluation = decision.evaluation.clone();
    let reply_kind = match decision.next_action {
        NextAction::FollowUp => ExchangeKind::FollowUp,
        _ => ExchangeKind::Message,
    };
    let reply = Exchange::new(Speaker::Interviewer, decision.ai_response.clone(), reply_kind);

    {
        let mut ctx = ctx.lock();
        ctx.add_exchange(answer);
        ctx.add_exchange(reply);
        if decision.next_action == NextAction::NextQuestion {
            ctx.advance_question();
        }
        tracing::debug!(
            session_id = %session_id,
            next_action = decision.next_action.as_str(),
            current_question = ctx.current_question(),
            "turn recorded"
        );
    }

    Ok(Json(decision))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/report/generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct GenerateReportBody {
    pub session: SessionRecord,
}

pub async fn generate_report(
    State(state): State<AppState>,
    Json(body): Json<GenerateReportBody>,
) -> Result<Json<Report>, ApiError> {
    let synthesizer = state.report_synthesizer()?;
    let report = synthesizer.synthesize(&body.session).await?;
    Ok(Json(report))
}
