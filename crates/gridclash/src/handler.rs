//! Per-connection handler: seat assignment, outbound fan-out, and intent
//! routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Ask the room for a seat → refuse and close if the room is full
//!   2. Spawn a writer that drains the seat's outbound queue
//!   3. Loop: receive frames → decode → forward intents to the room

use std::sync::Arc;

use gridclash_protocol::{ClientMessage, Codec, ServerMessage, Side};
use gridclash_room::{RoomError, RoomHandle};
use gridclash_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GridclashError;
use crate::server::ServerState;

/// Sent back for frames that are not valid JSON or not a known intent.
const INVALID_MESSAGE: &str = "Invalid message.";

/// Drop guard that frees the seat when the handler exits.
///
/// Runs even if the handler bails out early with an error. `Drop` is
/// synchronous, so the disconnect goes out on a spawned task.
struct SeatGuard {
    side: Side,
    room: RoomHandle,
}

impl Drop for SeatGuard {
    fn drop(&mut self) {
        let side = self.side;
        let room = self.room.clone();
        tokio::spawn(async move {
            let _ = room.disconnect(side).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GridclashError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Seat ---
    let (tx, rx) = mpsc::unbounded_channel();
    let side = match state.room.connect(tx).await {
        Ok(side) => side,
        Err(RoomError::RoomFull) => {
            tracing::info!(%conn_id, "room full, refusing connection");
            let text = state
                .codec
                .encode_text(&ServerMessage::error(RoomError::RoomFull.to_string()))?;
            conn.send_text(&text).await?;
            conn.close().await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let _guard = SeatGuard {
        side,
        room: state.room.clone(),
    };
    tracing::info!(%conn_id, %side, "player connected");

    // --- Step 2: Outbound ---
    let writer = tokio::spawn(write_outbound(
        Arc::clone(&conn),
        state.codec.clone(),
        rx,
    ));

    // --- Step 3: Inbound ---
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, %side, "connection closed cleanly");
                break;
            }
            Err(e) if e.is_disconnect() => {
                tracing::info!(%conn_id, %side, "connection dropped");
                break;
            }
            Err(e) => {
                tracing::warn!(%conn_id, %side, error = %e, "recv error");
                break;
            }
        };

        // Decode failures are queued through the room too, so they reach
        // the client after replies to anything it sent earlier.
        let routed = match state.codec.decode::<ClientMessage>(&data) {
            Ok(msg) => state.room.send_intent(side, msg).await,
            Err(e) => {
                tracing::debug!(%conn_id, %side, error = %e, "failed to decode intent");
                state.room.reject(side, INVALID_MESSAGE).await
            }
        };

        if let Err(e) = routed {
            tracing::warn!(%conn_id, %side, error = %e, "room unavailable");
            break;
        }
    }

    writer.abort();
    // _guard drops here → seat is freed.
    Ok(())
}

/// Drains one seat's outbound queue onto the socket as JSON text frames.
///
/// Ends when the queue closes or a send fails.
async fn write_outbound<C: Codec>(
    conn: Arc<WebSocketConnection>,
    codec: C,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    let conn_id = conn.id();
    while let Some(msg) = rx.recv().await {
        let text = match codec.encode_text(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = conn.send_text(&text).await {
            tracing::warn!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
