//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the single shared board behind one `RwLock`: the element
//! collection, the live subscriber channels, and the dirty/version
//! counters consumed by the persistence task.

use std::collections::HashMap;
use std::sync::Arc;

use board::element::ElementMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;
use wire::Event;

// =============================================================================
// STORE STATE
// =============================================================================

/// Live state of the shared board. Kept in memory for real-time performance.
/// Flushed to disk by the persistence task.
pub struct StoreState {
    /// Current elements in arrival order.
    pub elements: ElementMap,
    /// Connected subscribers: `client_id` -> sender for outgoing events.
    pub subscribers: HashMap<Uuid, mpsc::Sender<Event>>,
    /// True when `elements` has changed since the last flush.
    pub dirty: bool,
    /// Bumped on every mutation. Lets the persistence task detect writes
    /// that landed while it was flushing.
    pub version: u64,
}

impl StoreState {
    #[must_use]
    pub fn new(elements: ElementMap) -> Self {
        Self { elements, subscribers: HashMap::new(), dirty: false, version: 0 }
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(ElementMap::new())
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the inner store is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<StoreState>>,
}

impl AppState {
    #[must_use]
    pub fn new(elements: ElementMap) -> Self {
        Self { store: Arc::new(RwLock::new(StoreState::new(elements))) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_state_new_is_empty() {
        let store = StoreState::new(ElementMap::new());
        assert!(store.elements.is_empty());
        assert!(store.subscribers.is_empty());
        assert!(!store.dirty);
        assert_eq!(store.version, 0);
    }

    #[test]
    fn store_state_default_equals_new() {
        let a = StoreState::new(ElementMap::new());
        let b = StoreState::default();
        assert_eq!(a.elements.len(), b.elements.len());
        assert_eq!(a.subscribers.len(), b.subscribers.len());
        assert_eq!(a.dirty, b.dirty);
        assert_eq!(a.version, b.version);
    }

    #[tokio::test]
    async fn app_state_seeds_initial_elements() {
        let state =
            test_helpers::test_app_state_with_elements(vec![test_helpers::dummy_element()]);
        let store = state.store.read().await;
        assert_eq!(store.elements.len(), 1);
        assert!(!store.dirty);
    }
}
