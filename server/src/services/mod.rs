//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the store mutations and the disk persistence so the
//! route handler can stay focused on protocol translation.

pub mod persistence;
pub mod store;
