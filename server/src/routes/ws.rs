//! WebSocket endpoint — the store protocol lives entirely on this route.
//!
//! DESIGN
//! ======
//! On upgrade, each connection gets a client id and a bounded outbound
//! channel, then enters a `select!` loop:
//! - Incoming text frames → decode + dispatch by request op
//! - Snapshot broadcasts from the store → forward to the client
//!
//! Dispatch is split out of the socket loop: [`process_inbound_text`] takes
//! a frame and returns an [`Outcome`], so tests drive the full protocol
//! without opening sockets. Store mutations broadcast their snapshot inside
//! the service layer; the route only ever sends sender-directed replies.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → loop
//! 2. `subscribe` registers the outbound channel and replies with the
//!    current snapshot; later mutations arrive through the channel
//! 3. `put` / `clear` mutate the store; the echo comes back as a broadcast
//! 4. Close → unsubscribe + cleanup

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;
use wire::{Event, Request};

use crate::services::store;
use crate::state::AppState;

/// Outbound channel depth per client. A slow reader loses intermediate
/// snapshots, never the final state, since every snapshot is complete.
const OUTBOUND_CAPACITY: usize = 64;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of dispatching one inbound frame. The socket loop uses this to
/// decide what the sender receives directly.
#[derive(Debug, PartialEq)]
enum Outcome {
    /// Send one event to the sender only.
    Reply(Event),
    /// Nothing to send directly; any resulting snapshot was already
    /// broadcast by the store service (the sender included).
    Silent,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<Event>(OUTBOUND_CAPACITY);
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        match process_inbound_text(&state, client_id, &client_tx, &text).await {
                            Outcome::Reply(event) => {
                                if send_event(&mut socket, client_id, &event).await.is_err() {
                                    break;
                                }
                            }
                            Outcome::Silent => {}
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, client_id, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    store::unsubscribe(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Decode and process one inbound text frame.
///
/// A malformed frame is answered with an `error` event; the connection stays
/// open. Mutations do not require a prior subscribe.
async fn process_inbound_text(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Event>,
    text: &str,
) -> Outcome {
    let request = match wire::decode_request(text) {
        Ok(request) => request,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            return Outcome::Reply(Event::Error { message: format!("invalid request: {e}") });
        }
    };

    match request {
        Request::Subscribe => {
            let elements = store::subscribe(state, client_id, client_tx.clone()).await;
            Outcome::Reply(Event::Snapshot { elements })
        }
        Request::Put { element } => {
            store::put_element(state, element).await;
            Outcome::Silent
        }
        Request::Clear => {
            store::clear_elements(state).await;
            Outcome::Silent
        }
    }
}

async fn send_event(socket: &mut WebSocket, client_id: Uuid, event: &Event) -> Result<(), ()> {
    let text = wire::encode_event(event);
    if let Err(e) = socket.send(Message::Text(text.into())).await {
        warn!(%client_id, error = %e, "ws: send failed");
        return Err(());
    }
    Ok(())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
