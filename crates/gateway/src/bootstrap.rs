//! AppState construction and HTTP stack assembly extracted from `main.rs`.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use iv_domain::config::{Config, ConfigSeverity, CorsConfig};
use iv_providers::ProviderRegistry;

use crate::api;
use crate::state::AppState;

/// Validate config, initialize providers and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }

    // ── LLM providers ────────────────────────────────────────────────
    let llm = Arc::new(ProviderRegistry::from_config(&config.llm));
    tracing::info!(
        providers = llm.len(),
        failed = llm.init_errors().len(),
        "provider registry ready"
    );

    // ── Session registry ─────────────────────────────────────────────
    tracing::info!(
        max_recent_exchanges = config.context.max_recent_exchanges,
        max_summaries = config.context.max_summaries,
        max_key_points = config.context.max_key_points,
        "session registry ready"
    );

    Ok(AppState::new(config, llm))
}

/// The API router with CORS, request tracing and the concurrency limit
/// applied, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors);
    let max_concurrent = state.config.server.max_concurrent_requests.max(1);
    tracing::info!(max_concurrent, "concurrency limit set");

    api::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent))
        .with_state(state)
}

/// Build a [`CorsLayer`] from the configured allowed origins.
///
/// Origins may end in `:*` to match any port on that host. A lone `"*"`
/// allows every origin.
pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if cors.allowed_origins.len() == 1 && cors.allowed_origins[0] == "*" {
        tracing::warn!("CORS configured with wildcard \"*\", all origins allowed");
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE]);
    }

    let mut exact: Vec<HeaderValue> = Vec::new();
    let mut wildcard_prefixes: Vec<String> = Vec::new();

    for origin in &cors.allowed_origins {
        if origin.ends_with(":*") {
            wildcard_prefixes.push(origin.trim_end_matches('*').to_owned());
        } else if let Ok(hv) = origin.parse::<HeaderValue>() {
            exact.push(hv);
        } else {
            tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
        }
    }

    let allow_origin = if wildcard_prefixes.is_empty() {
        AllowOrigin::list(exact)
    } else {
        AllowOrigin::predicate(move |origin, _| {
            if exact.iter().any(|e| e.as_bytes() == origin.as_bytes()) {
                return true;
            }
            let origin = origin.to_str().unwrap_or("");
            wildcard_prefixes
                .iter()
                .any(|prefix| origin_matches_port_wildcard(origin, prefix))
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
}

/// `prefix` is an origin with the port removed, e.g. `http://localhost:`.
fn origin_matches_port_wildcard(origin: &str, prefix: &str) -> bool {
    origin
        .strip_prefix(prefix)
        .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
}
