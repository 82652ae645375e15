//! WebSocket handler
//!
//! Runs one relay connection: handshake, inbound frame loop, outbound writer
//! task, and cleanup.

use crate::connection::ConnectionHandle;
use crate::protocol::{CloseCode, HandshakeQuery};
use crate::server::RelayState;
use crate::transport::{ConnectionState, Outbound, Transport};
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use relay_core::ConnectionId;
use std::borrow::Cow;
use tokio::sync::mpsc;

/// WebSocket relay handler
///
/// GET /ws?sessionId=<id>&role=<publisher|viewer>
pub async fn relay_handler(
    State(state): State<RelayState>,
    Query(handshake): Query<HandshakeQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket, handshake))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: RelayState, socket: WebSocket, handshake: HandshakeQuery) {
    let connection_id = ConnectionId::generate();

    // Create message channel for outgoing frames
    let (tx, mut rx) = mpsc::channel::<Outbound>(state.config().transport.connection_buffer);
    state.transport().register(connection_id.clone(), tx);

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Spawn task to write queued frames to the WebSocket
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Frame(frame) => {
                    if ws_sink.send(Message::Text(frame.to_string())).await.is_err() {
                        tracing::debug!(
                            connection_id = %connection_id_send,
                            "Failed to write frame to WebSocket"
                        );
                        break;
                    }
                }
                Outbound::Close(code) => {
                    let close = CloseFrame {
                        code: code.as_u16(),
                        reason: Cow::Borrowed(code.description()),
                    };
                    let _ = ws_sink.send(Message::Close(Some(close))).await;
                    return;
                }
            }
        }

        // Close the WebSocket when the queue is closed
        let _ = ws_sink.close().await;
    });

    let handle = match state.connection_manager().on_connect(
        connection_id.clone(),
        handshake.session_id(),
        handshake.role(),
    ) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, error = %e, "Handshake rejected");
            state
                .transport()
                .force_disconnect(&connection_id, CloseCode::for_error(&e));
            let _ = send_task.await;
            return;
        }
    };
    state
        .transport()
        .set_state(&connection_id, ConnectionState::Active);

    loop {
        tokio::select! {
            msg = ws_stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    state.event_relay().on_text(&handle, &text);
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::trace!(connection_id = %connection_id, "Dropped binary frame");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // Pong is handled automatically by axum
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(connection_id = %connection_id, "Client closed connection");
                    break;
                }
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = &mut send_task => {
                tracing::debug!(connection_id = %connection_id, "Send task ended");
                break;
            }
        }
    }

    cleanup_connection(&state, handle);
}

/// Release the session membership and drop the outbound queue
fn cleanup_connection(state: &RelayState, handle: ConnectionHandle) {
    let connection_id = handle.connection_id().clone();
    let evicted = state.connection_manager().on_disconnect(handle);

    if let Some(connection) = state.transport().unregister(&connection_id) {
        tracing::debug!(
            connection_id = %connection_id,
            age_ms = connection.age().as_millis() as u64,
            session_evicted = evicted,
            "Connection cleaned up"
        );
    }
}
