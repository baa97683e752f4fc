//! HTTP-facing error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use iv_domain::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("no LLM provider available for role '{0}'")]
    NoProvider(String),

    /// The generation call itself failed. Never used for unparseable
    /// output, which is recovered by the runtime.
    #[error("generation failed: {0}")]
    Upstream(Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NoProvider(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidInput(msg) => Self::BadRequest(msg),
            Error::Other(msg) => Self::Internal(msg),
            other => Self::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }
        api_error(status, self.to_string())
    }
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let bad: ApiError = Error::InvalidInput("session id must not be empty".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let upstream: ApiError = Error::Provider {
            provider: "anthropic".into(),
            message: "overloaded".into(),
        }
        .into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert!(upstream.to_string().contains("overloaded"));

        let timeout: ApiError = Error::Timeout("60s".into()).into();
        assert_eq!(timeout.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_provider_is_unavailable() {
        assert_eq!(
            ApiError::NoProvider("evaluator".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
