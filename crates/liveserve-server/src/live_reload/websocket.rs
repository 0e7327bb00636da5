//! WebSocket endpoint for live reload.
//!
//! Each connected browser gets its own broadcast subscription; reload
//! events are serialized as JSON text frames and pushed until either side
//! goes away.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| forward_reload_events(socket, state))
}

/// Push reload events to one connected client.
async fn forward_reload_events(mut socket: WebSocket, state: Arc<AppState>) {
    // The route only exists when live reload is on; without a manager
    // there is nothing to forward
    let Some(mut events) = state.subscribe_reload() else {
        return;
    };

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    // A lagged client only misses intermediate reloads;
                    // the next event still reloads the page
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                };
                let Ok(text) = serde_json::to_string(&event) else {
                    continue;
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Pings are answered by axum automatically; any other
                    // client frame is just keepalive noise
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
