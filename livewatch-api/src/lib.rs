// livewatch API library
//
// HTTP surface: viewer page, WebSocket push channel, health and status

pub mod http;

pub use http::{create_router, AppState};
