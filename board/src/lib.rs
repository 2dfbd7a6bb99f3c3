//! Drawing-board core for the shared whiteboard.
//!
//! This crate owns the full client-side lifecycle of the board: translating
//! pointer events into drawing elements, maintaining the local element
//! collection, reconciling snapshots from the shared store, and rendering the
//! collection onto an owned pixel surface. It is deliberately free of
//! transport and UI concerns: hosts (the CLI, the tests) drive the engine
//! with discrete events and perform network or file I/O on the
//! [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`element`] | Drawing element types and the ordered element collection |
//! | [`input`] | Brush settings and the pointer gesture state machine |
//! | [`engine`] | Top-level engine: input capture and snapshot reconciliation |
//! | [`render`] | Full-repaint rendering of the collection onto a surface |
//! | [`surface`] | Owned RGBA pixel surface, themes, PNG encode/decode |
//! | [`font`] | Built-in 5×7 bitmap font used for text elements |
//! | [`consts`] | Shared numeric constants (font sizing, surface defaults) |

pub mod consts;
pub mod element;
pub mod engine;
pub mod font;
pub mod input;
pub mod render;
pub mod surface;
