use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{session::ChatSession, types::TurnOutcome};

static CHAT_HTML: &str = include_str!("chat.html");

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChatSession>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    fn reply(text: String) -> Self {
        Self {
            success: true,
            response: Some(text),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub success: bool,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub keyword_count: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/keywords", get(keywords))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        CHAT_HTML,
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        CHAT_HTML,
    )
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        model: state.session.model_name().to_owned(),
        keyword_count: state.session.filter().keyword_count(),
    })
}

async fn keywords(State(state): State<AppState>) -> Json<KeywordsResponse> {
    Json(KeywordsResponse {
        success: true,
        keywords: state.session.filter().keywords(),
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "malformed chat request");
            let error = format!("Invalid request: {}", rejection.body_text());
            return (rejection.status(), Json(ChatResponse::error(error))).into_response();
        }
    };

    let message = request.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse::error("Please enter a message.")),
        )
            .into_response();
    }

    match state.session.handle_turn(message).await {
        TurnOutcome::Replied(text) => Json(ChatResponse::reply(text)).into_response(),
        TurnOutcome::Rejected(reason) => {
            (StatusCode::BAD_REQUEST, Json(ChatResponse::error(reason))).into_response()
        }
        TurnOutcome::Failed(reason) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatResponse::error(reason)),
        )
            .into_response(),
    }
}
