// HTTP server
//
// Routes:
//   GET /            viewer page
//   GET /ws          push channel
//   GET /health      liveness probe
//   GET /api/status  current video and chat session

pub mod error;
pub mod health;
pub mod public;
pub mod websocket;

use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use livewatch_core::{EventHub, LiveState};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::AppError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<LiveState>,
    pub hub: EventHub,
    /// Fired on server shutdown; open push channels close when it does
    pub shutdown: CancellationToken,
}

impl AppState {
    #[must_use]
    pub fn new(state: Arc<LiveState>, hub: EventHub, shutdown: CancellationToken) -> Self {
        Self {
            state,
            hub,
            shutdown,
        }
    }
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::create_health_router())
        .merge(public::create_public_router())
        .route("/ws", get(websocket::websocket_handler))
        .fallback(error::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    pub fn app_state() -> AppState {
        AppState::new(
            Arc::new(LiveState::new("vid")),
            EventHub::new(16),
            CancellationToken::new(),
        )
    }

    pub async fn get(state: AppState, uri: &str) -> Response {
        create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn body_string(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use super::test_support::get;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let resp = get(app_state(), "/nope").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "No route for /nope");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let resp = create_router(app_state())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/status")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let methods = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("GET"));
        assert!(methods.contains("POST"));
    }
}
