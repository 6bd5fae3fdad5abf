//! HTTP routes.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/ask?question=...` | GET | Answer a question about a member |
//! | `/health` | GET | Readiness and corpus size |

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use qa_core::{QaService, ServiceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QaService>,
}

#[derive(Debug, Deserialize)]
pub struct AskQuery {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub messages: usize,
    pub people: usize,
}

/// Build the router over a shared service.
pub fn build_router(service: Arc<QaService>) -> Router {
    Router::new()
        .route("/ask", get(ask))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn ask(State(state): State<AppState>, Query(query): Query<AskQuery>) -> Response {
    match state.service.answer(&query.question).await {
        Ok(answer) => {
            tracing::info!(question = %query.question, answer = %answer, "answered");
            Json(AskResponse {
                answer: answer.to_string(),
            })
            .into_response()
        }
        Err(e @ ServiceError::NotReady) => {
            tracing::warn!("question received before corpus was loaded");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.service.synthesizer().backend().to_string();
    let response = match state.service.snapshot() {
        Some(corpus) => HealthResponse {
            status: "ok".to_string(),
            backend,
            messages: corpus.len(),
            people: corpus.roster().len(),
        },
        None => HealthResponse {
            status: "loading".to_string(),
            backend,
            messages: 0,
            people: 0,
        },
    };
    Json(response)
}
