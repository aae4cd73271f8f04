//! WebSocket push channel
//!
//! Every connected client receives each `LiveEvent` published after it
//! connected, as one JSON text frame. Frames from the client are read only
//! to notice a close.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use livewatch_core::EventSubscription;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::http::AppState;

/// Clients have nothing to say; keep their frames small
const MAX_CLIENT_MESSAGE_SIZE: usize = 4 * 1024;

const CLOSE_GOING_AWAY: u16 = 1001;

pub async fn websocket_handler(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Subscribe before the upgrade so nothing published during the handshake is missed
    let events = app.hub.subscribe();
    let shutdown = app.shutdown.clone();

    ws.max_message_size(MAX_CLIENT_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, events, shutdown))
}

async fn handle_socket(socket: WebSocket, mut events: EventSubscription, shutdown: CancellationToken) {
    let (mut sink, mut stream) = socket.split();
    info!("Push channel client connected");

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let close = Message::Close(Some(CloseFrame {
                    code: CLOSE_GOING_AWAY,
                    reason: "server shutting down".into(),
                }));
                let _ = sink.send(close).await;
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                let text = match event.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        error!(event_type = event.event_type(), "Failed to encode event: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    debug!("Push channel send failed: {}", e);
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("Push channel receive failed: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            }
        }
    }

    info!("Push channel client disconnected");
}
