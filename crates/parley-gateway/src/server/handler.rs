//! WebSocket handler
//!
//! Handles WebSocket connections and command processing.

use crate::protocol::{ClientCommand, ServerEvent};
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use parley_core::ConnectionId;
use tokio::sync::mpsc;

/// WebSocket gateway handler
pub async fn ws_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
///
/// One bounded channel per connection; the coordinator pushes events into
/// it and the send task drains it onto the socket. Either side ending
/// tears the whole connection down.
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket) {
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.config().limits.send_buffer);
    let connection_id = state.coordinator().connect(tx);

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Receive commands from the client
    let state_recv = state.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&state_recv, connection_id, &text);
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "Binary frames not supported, ignoring"
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong replies are handled by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_id, "Client closed connection");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Push coordinator events to the client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::debug!(
                            connection_id = %connection_id,
                            "Failed to write to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        connection_id = %connection_id,
                        error = %e,
                        "Failed to serialize event"
                    );
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
    }

    state.coordinator().disconnect(connection_id);
}

/// Parse and dispatch one text frame
///
/// An unparsable frame is dropped with a log line; a malformed client must
/// not disturb anyone else's session.
fn handle_text_frame(state: &GatewayState, connection_id: ConnectionId, text: &str) {
    match ClientCommand::from_json(text) {
        Ok(command) => {
            state.coordinator().handle_command(connection_id, command);
        }
        Err(e) => {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Failed to parse command, dropping frame"
            );
        }
    }
}
