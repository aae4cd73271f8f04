//! Unauthenticated read-only endpoints

use axum::{extract::State, response::Html, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
}

/// Viewer page that connects to `/ws`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub video_id: String,
    /// Chat session the chat poller is currently following, if any
    pub live_chat_id: Option<String>,
    /// Connected push-channel clients
    pub subscribers: usize,
}

pub async fn status(State(app): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        video_id: app.state.video_id().to_string(),
        live_chat_id: app.state.live_chat_id(),
        subscribers: app.hub.subscriber_count(),
    })
}
