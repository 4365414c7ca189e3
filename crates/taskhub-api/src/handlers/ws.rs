//! WebSocket upgrade handler.
//!
//! The upgrade itself is unauthenticated; a connection receives targeted
//! events only after it announces an identity with `authenticate`.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// GET /ws
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Drives one established WebSocket until the client leaves or the server
/// shuts down.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let connections = state.realtime.connections.clone();
    let mut shutdown = state.realtime.shutdown_receiver();

    let (handle, mut outbound_rx) = connections.open();
    let conn_id = handle.id;
    info!(conn_id = %conn_id, "WebSocket connection established");

    // Outbound frames queued by the bus or by replies
    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                debug!(conn_id = %conn_id, "Closing WebSocket for shutdown");
                break;
            }
            next = ws_rx.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    connections.handle_inbound(&conn_id, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Ping/pong are answered by axum; binary frames are ignored
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    connections.close(&conn_id);
    drop(handle);
    outbound_task.abort();
}
