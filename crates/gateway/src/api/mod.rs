pub mod health;
pub mod interview;
pub mod sessions;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health::health))
        // Interview operations (one generation call each)
        .route("/v1/question/generate", post(interview::generate_question))
        .route("/v1/evaluate", post(interview::evaluate))
        .route("/v1/report/generate", post(interview::generate_report))
        // Session context
        .route("/v1/sessions", get(sessions::list_sessions))
        .route("/v1/sessions/:id", delete(sessions::delete_session))
        .route("/v1/sessions/:id/exchanges", post(sessions::append_exchange))
        .route("/v1/sessions/:id/context", get(sessions::get_context))
        .route("/v1/sessions/:id/transcript", get(sessions::get_transcript))
        .route("/v1/sessions/:id/advance", post(sessions::advance_question))
}
