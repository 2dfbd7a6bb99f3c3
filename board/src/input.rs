//! Input model: the active brush and the pointer gesture state machine.
//!
//! `Brush` captures the user's stroke settings at the time of a pointer
//! event; an element copies them at creation and never looks back.
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up. There are only two states: the board is either idle or in the
//! middle of exactly one stroke.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::{ElementId, Tool};

/// Stroke settings applied to newly created elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// Active drawing tool.
    pub tool: Tool,
    /// Stroke color as a CSS-style hex string.
    pub color: String,
    /// Stroke width; also scales the text font size.
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: "#000000".to_owned(),
            width: 2.0,
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputState {
    /// No stroke in progress; waiting for the next pointer-down.
    Idle,
    /// A stroke is in progress and receiving pointer-move appends.
    Drawing {
        /// Id of the in-progress element.
        id: ElementId,
    },
}

impl Default for InputState {
    fn default() -> Self {
        Self::Idle
    }
}

impl InputState {
    /// Whether a stroke is currently in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
