//! HTTP-level tests for the question endpoint.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! corpus comes from fixtures, so no network is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use qa_core::testing::{corpus_of, sample_corpus};
use qa_core::{QaService, Synthesizer};
use qa_server::build_router;
use qa_server::routes::{AskResponse, ErrorResponse, HealthResponse};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

// ── Helpers ────────────────────────────────────────────────────

async fn get(service: Arc<QaService>, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = build_router(service)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|e| panic!("bad JSON body {:?}: {e}", String::from_utf8_lossy(bytes)))
}

fn ready(corpus: qa_core::Corpus) -> Arc<QaService> {
    Arc::new(QaService::with_corpus(Synthesizer::default(), corpus))
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_ask_travel() {
    let service = ready(corpus_of(&[("Jane Doe", "I am going to Paris tomorrow")]));
    let (status, body) = get(service, "/ask?question=Where%20is%20Jane%20traveling%3F").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json::<AskResponse>(&body).answer,
        "Destination: Paris, When: tomorrow"
    );
}

#[tokio::test]
async fn test_ask_cars() {
    let (status, body) = get(
        ready(sample_corpus()),
        "/ask?question=How+many+cars+does+Vikram+have%3F",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<AskResponse>(&body).answer, "3");
}

#[tokio::test]
async fn test_ask_unknown_person() {
    let (status, body) = get(ready(sample_corpus()), "/ask?question=What+does+Zoe+want%3F").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<AskResponse>(&body).answer, "No information available.");
}

#[tokio::test]
async fn test_ask_empty_question() {
    let (status, body) = get(ready(sample_corpus()), "/ask?question=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<AskResponse>(&body).answer, "No information available.");
}

#[tokio::test]
async fn test_ask_missing_parameter() {
    let resp = build_router(ready(sample_corpus()))
        .oneshot(Request::builder().uri("/ask").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_before_corpus_loaded() {
    let service = Arc::new(QaService::new(Synthesizer::default()));
    let (status, body) = get(service, "/ask?question=How+many+cars+does+Jane+have").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json::<ErrorResponse>(&body).error, "corpus not loaded");
}

#[tokio::test]
async fn test_health_loading_then_ok() {
    let service = Arc::new(QaService::new(Synthesizer::default()));

    let (status, body) = get(Arc::clone(&service), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = json(&body);
    assert_eq!(health.status, "loading");
    assert_eq!(health.backend, "rules");

    service.publish(sample_corpus());
    let (_, body) = get(service, "/health").await;
    let health: HealthResponse = json(&body);
    assert_eq!(health.status, "ok");
    assert_eq!(health.messages, 10);
    assert_eq!(health.people, 7);
}
