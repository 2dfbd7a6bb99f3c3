//! Store service — subscribe/unsubscribe, element writes, and snapshot fan-out.
//!
//! DESIGN
//! ======
//! The store is last-writer-wins at element granularity: a put replaces the
//! whole element under its id and moves it to the back of the z-order. Every
//! mutation broadcasts a full snapshot to all subscribers, including the
//! writer; clients reconcile against the snapshot rather than applying
//! deltas.
//!
//! ORDERING
//! ========
//! Mutation and broadcast happen inside one write-lock critical section, so
//! every subscriber channel receives snapshots in version order. `try_send`
//! never awaits, which keeps the critical section bounded.

use board::element::DrawingElement;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};
use uuid::Uuid;
use wire::Event;

use crate::state::{AppState, StoreState};

// =============================================================================
// SUBSCRIBE / UNSUBSCRIBE
// =============================================================================

/// Register a subscriber and return the current snapshot.
///
/// Registration and snapshot are captured under one write lock, so the
/// returned snapshot plus subsequent channel events form a gapless sequence.
pub async fn subscribe(
    state: &AppState,
    client_id: Uuid,
    tx: mpsc::Sender<Event>,
) -> Vec<DrawingElement> {
    let mut store = state.store.write().await;
    store.subscribers.insert(client_id, tx);
    let snapshot = store.elements.to_vec();
    info!(%client_id, subscribers = store.subscribers.len(), "client subscribed");
    snapshot
}

/// Remove a subscriber. Safe to call for an unknown id.
pub async fn unsubscribe(state: &AppState, client_id: Uuid) {
    let mut store = state.store.write().await;
    if store.subscribers.remove(&client_id).is_some() {
        info!(%client_id, remaining = store.subscribers.len(), "client unsubscribed");
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Write an element into the store, replacing any previous value under the
/// same id, and broadcast the resulting snapshot.
pub async fn put_element(state: &AppState, element: DrawingElement) {
    let element_id = element.id;
    let mut store = state.store.write().await;

    // PHASE: APPLY LAST-WRITER-WINS UPSERT
    // WHY: the incoming value is authoritative for its id; the rewritten
    // element moves to the back so it paints on top everywhere.
    store.elements.upsert(element);
    store.dirty = true;
    store.version += 1;

    // PHASE: FAN OUT UNDER THE SAME LOCK
    // WHY: releasing the lock first would let a racing put deliver its
    // snapshot ahead of this one on some channels.
    broadcast_locked(&store);

    info!(%element_id, elements = store.elements.len(), version = store.version, "element stored");
}

/// Remove every element from the store and broadcast the empty snapshot.
pub async fn clear_elements(state: &AppState) {
    let mut store = state.store.write().await;
    store.elements.clear();
    store.dirty = true;
    store.version += 1;
    broadcast_locked(&store);
    info!(version = store.version, "board cleared");
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Send the current snapshot to every subscriber. Caller holds the store
/// lock; delivery is best-effort and never awaits.
fn broadcast_locked(store: &StoreState) {
    let event = Event::Snapshot { elements: store.elements.to_vec() };
    for (client_id, tx) in &store.subscribers {
        match tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                // The next broadcast carries the full state again, so a
                // dropped snapshot heals on the following mutation.
                warn!(%client_id, "subscriber channel full, dropping snapshot");
            }
            Err(TrySendError::Closed(_)) => {
                // Disconnect cleanup removes the entry.
            }
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
