//! HTTP round trips through the full router with a scripted provider.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use iv_domain::config::Config;
use iv_domain::tool::Role;
use iv_gateway::bootstrap;
use iv_gateway::state::AppState;
use iv_providers::scripted::ScriptedProvider;
use iv_providers::{LlmProvider, ProviderRegistry};

fn app_with(provider: Option<Arc<ScriptedProvider>>) -> Router {
    let providers: Vec<Arc<dyn LlmProvider>> = provider
        .into_iter()
        .map(|p| p as Arc<dyn LlmProvider>)
        .collect();
    let state = AppState::new(
        Arc::new(Config::default()),
        Arc::new(ProviderRegistry::from_providers(providers)),
    );
    bootstrap::build_router(state)
}

fn scripted<const N: usize>(replies: [&str; N]) -> Arc<ScriptedProvider> {
    Arc::new(ScriptedProvider::with_replies("scripted", replies))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn question() -> Value {
    json!({
        "id": "q1",
        "stem": "Find two numbers in an array that add up to a target.",
        "difficulty": "easy",
        "evaluationHints": ["hash map"]
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app_with(Some(scripted([])));
    let (status, body) = call(&app, Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["providers"], json!(["scripted"]));
}

#[tokio::test]
async fn stateless_evaluate_returns_decision() {
    let provider = scripted([
        r#"{"evaluation":{"correctness":4,"communication":5,"approach":4,"edgeCases":3},"nextAction":"next_question","aiResponse":"Nice. Let's move on."}"#,
    ]);
    let app = app_with(Some(provider.clone()));
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/evaluate",
        Some(json!({"question": question(), "answer": "I'd keep a hash map of seen values.", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nextAction"], "next_question");
    assert_eq!(body["aiResponse"], "Nice. Let's move on.");
    assert_eq!(body["evaluation"]["edgeCases"], 3);

    let (_, sessions) = call(&app, Method::GET, "/v1/sessions", None).await;
    assert_eq!(sessions["active_sessions"], 0);
}

#[tokio::test]
async fn session_evaluate_records_turn_on_fallback() {
    let app = app_with(Some(scripted(["I cannot produce JSON today"])));
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/evaluate",
        Some(json!({"question": question(), "answer": "Maybe sort it first", "sessionId": "s-1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nextAction"], "follow_up");
    for dim in ["correctness", "communication", "approach", "edgeCases"] {
        assert_eq!(body["evaluation"][dim], 3);
    }

    let (status, transcript) = call(&app, Method::GET, "/v1/sessions/s-1/transcript", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript["currentQuestion"], 0);
    let entries = transcript["transcript"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["speaker"], "candidate");
    assert_eq!(entries[0]["type"], "answer");
    assert_eq!(entries[0]["evaluation"]["correctness"], 3);
    assert_eq!(entries[1]["speaker"], "interviewer");
    assert_eq!(entries[1]["type"], "follow_up");
}

#[tokio::test]
async fn session_digest_feeds_the_next_turn() {
    let provider = scripted([
        r#"{"nextAction":"next_question","aiResponse":"Good. Next question."}"#,
        r#"{"nextAction":"follow_up","aiResponse":"Why a heap?"}"#,
    ]);
    let app = app_with(Some(provider.clone()));

    for answer in ["A hash map gives O(n) time.", "I would use a heap here."] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/v1/evaluate",
            Some(json!({"question": question(), "answer": answer, "sessionId": "s-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let seen = provider.requests();
    assert_eq!(seen.len(), 2);
    let first = seen[0].text_of(Role::System).unwrap();
    assert!(!first.contains("## Conversation Context"));
    let second = seen[1].text_of(Role::System).unwrap();
    assert!(second.contains("## Conversation Context"));
    assert!(second.contains("=== Recent Conversation ==="));
    assert!(second.contains("Candidate: A hash map gives O(n) time."));

    let (_, ctx) = call(&app, Method::GET, "/v1/sessions/s-2/context", None).await;
    assert_eq!(ctx["stats"]["current_question"], 1);
    assert_eq!(ctx["stats"]["recent_exchanges"], 4);
    assert!(ctx["digest"].as_str().unwrap().contains("=== Key Technical Points Mentioned ==="));
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    provider.push_error("upstream overloaded");
    let app = app_with(Some(provider));
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/evaluate",
        Some(json!({"question": question(), "answer": "hash map", "sessionId": "s-3"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("upstream overloaded"));

    // Nothing recorded for the failed turn.
    let (_, ctx) = call(&app, Method::GET, "/v1/sessions/s-3/context", None).await;
    assert_eq!(ctx["stats"]["recent_exchanges"], 0);
}

#[tokio::test]
async fn missing_provider_is_service_unavailable() {
    let app = app_with(None);
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/report/generate",
        Some(json!({"session": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("reporter"));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = app_with(Some(scripted([])));

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/evaluate",
        Some(json!({"question": question(), "answer": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/evaluate",
        Some(json!({"question": question(), "answer": "a map", "sessionId": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/question/generate",
        Some(json!({"topic": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn appended_exchanges_compress_past_the_window() {
    let app = app_with(Some(scripted([])));
    let mut last = Value::Null;
    for i in 1..=8 {
        let speaker = if i % 2 == 1 { "ai" } else { "candidate" };
        let (status, stats) = call(
            &app,
            Method::POST,
            "/v1/sessions/s-4/exchanges",
            Some(json!({"speaker": speaker, "text": format!("turn {i}")})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = stats;
    }
    assert_eq!(last["recent_exchanges"], 6);
    assert_eq!(last["compressed_summaries"], 1);

    let (_, transcript) = call(&app, Method::GET, "/v1/sessions/s-4/transcript", None).await;
    let entries = transcript["transcript"].as_array().unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0]["type"], "summary");
    assert_eq!(entries[0]["summary"], "turn 1 | turn 2");
    assert_eq!(entries[1]["text"], "turn 3");
    assert_eq!(entries[6]["text"], "turn 8");

    let (_, ctx) = call(&app, Method::GET, "/v1/sessions/s-4/context", None).await;
    let digest = ctx["digest"].as_str().unwrap();
    assert!(digest.starts_with("=== Previous Discussion Summary ===\nQ1: turn 1 | turn 2"));
}

#[tokio::test]
async fn session_lifecycle_endpoints() {
    let app = app_with(Some(scripted([])));

    let (status, _) = call(&app, Method::GET, "/v1/sessions/ghost/context", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::POST, "/v1/sessions/ghost/advance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    call(
        &app,
        Method::POST,
        "/v1/sessions/s-5/exchanges",
        Some(json!({"speaker": "interviewer", "text": "Welcome!", "kind": "greeting"})),
    )
    .await;
    let (status, stats) = call(&app, Method::POST, "/v1/sessions/s-5/advance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["current_question"], 1);

    let (_, list) = call(&app, Method::GET, "/v1/sessions", None).await;
    assert_eq!(list["active_sessions"], 1);
    assert_eq!(list["sessions"]["s-5"]["recent_exchanges"], 1);

    let (status, body) = call(&app, Method::DELETE, "/v1/sessions/s-5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);
    let (_, body) = call(&app, Method::DELETE, "/v1/sessions/s-5", None).await;
    assert_eq!(body["removed"], false);

    let (_, list) = call(&app, Method::GET, "/v1/sessions", None).await;
    assert_eq!(list["active_sessions"], 0);
}

#[tokio::test]
async fn report_falls_back_on_refusal() {
    let app = app_with(Some(scripted(["I cannot help with that"])));
    let session = json!({
        "id": "s-6",
        "candidateName": "Grace",
        "topic": "DSA",
        "difficulty": "medium",
        "duration": 30,
        "transcript": [],
        "integrityEvents": [
            {"type": "MULTIPLE_FACES", "severity": "high"},
            {"type": "TAB_SWITCH", "severity": "medium"},
            {"type": "COPY_PASTE"}
        ]
    });
    let (status, report) = call(
        &app,
        Method::POST,
        "/v1/report/generate",
        Some(json!({"session": session})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["sessionId"], "s-6");
    assert_eq!(report["overallScore"], 0.0);
    assert_eq!(report["integrityScore"], 65.0);
    assert_eq!(report["integrityIssues"], 3);
    assert_eq!(report["recommendation"], "maybe");
    assert_eq!(report["strengths"], json!(["Completed the interview"]));
    assert_eq!(report["weaknesses"], json!(["Needs more practice"]));
}

#[tokio::test]
async fn question_generation_round_trip() {
    let app = app_with(Some(scripted([
        r#"{"stem":"Implement an LRU cache","followUps":["Complexity?"],"evaluationHints":["hash map + list"],"redFlags":[]}"#,
    ])));
    let (status, q) = call(
        &app,
        Method::POST,
        "/v1/question/generate",
        Some(json!({"topic": "DSA", "difficulty": "senior", "position": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(q["stem"], "Implement an LRU cache");
    assert_eq!(q["difficulty"], "medium");
    assert_eq!(q["followUps"], json!(["Complexity?"]));
    assert!(!q["id"].as_str().unwrap().is_empty());
}
