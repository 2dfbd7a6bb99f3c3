//! Top-level drawing engine: input capture, the local collection, and
//! snapshot reconciliation.
//!
//! DESIGN
//! ======
//! The engine is strictly single-threaded and event-driven. Every public
//! method is a discrete, run-to-completion reaction to one event (a pointer
//! event, a text commit, a store snapshot) and returns a single [`Action`]
//! telling the host what to do next: repaint, publish an element, or collect
//! text input. The engine itself performs no I/O.
//!
//! Visibility rules during a stroke:
//! - The in-progress element lives in the local collection from its first
//!   point, so rapid pointer-moves render immediately. Nothing is written to
//!   the store until the stroke ends (invisible-until-commit for peers).
//! - Snapshots replace the collection wholesale, then the engine re-overlays
//!   what the store cannot know about yet: elements published but not yet
//!   observed in a snapshot (the pending overlay), then the in-progress
//!   element. A pending element seen in a snapshot is acknowledged and
//!   dropped from the overlay, so one's own stroke never flickers out
//!   between publish and echo. An empty snapshot is an authoritative clear
//!   and drops the pending overlay with everything else.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use uuid::Uuid;

use crate::element::{DrawingElement, ElementMap, Point, Tool};
use crate::input::{Brush, InputState};

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Nothing changed; nothing to do.
    None,
    /// The local view changed; repaint before the next visible frame.
    Invalidated,
    /// An element was finalized locally. The host must publish it to the
    /// shared store and repaint.
    Committed(DrawingElement),
    /// The text tool was applied at a position. The host must collect a
    /// string and call [`BoardEngine::commit_text`]; the engine stays idle.
    TextInputRequested {
        /// Baseline-left anchor for the pending text element.
        at: Point,
    },
}

/// Engine state for one drawing surface.
pub struct BoardEngine {
    /// The local element collection, in z-order (arrival order).
    pub doc: ElementMap,
    /// Elements published to the store but not yet observed in a snapshot.
    pub pending: ElementMap,
    /// The in-progress element while a stroke is active.
    pub current: Option<DrawingElement>,
    /// Stroke settings copied into newly created elements.
    pub brush: Brush,
    /// The pointer gesture state machine.
    pub input: InputState,
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self {
            doc: ElementMap::new(),
            pending: ElementMap::new(),
            current: None,
            brush: Brush::default(),
            input: InputState::Idle,
        }
    }
}

impl BoardEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Brush settings ---

    /// Set the active tool. Does not affect an in-progress stroke.
    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    /// Set the active stroke color. Does not affect an in-progress stroke.
    pub fn set_color(&mut self, color: String) {
        self.brush.color = color;
    }

    /// Set the active stroke width. Does not affect an in-progress stroke.
    pub fn set_width(&mut self, width: f64) {
        self.brush.width = width;
    }

    // --- Pointer events ---

    /// Begin a stroke at `at`.
    ///
    /// For the text tool this is synchronous-terminal: the engine requests
    /// text input from the host and never enters the drawing state. For all
    /// other tools a one-point element is created, entered into the local
    /// collection, and held as the in-progress element.
    pub fn pointer_down(&mut self, at: Point) -> Action {
        if self.input.is_drawing() {
            return Action::None;
        }
        if self.brush.tool == Tool::Text {
            return Action::TextInputRequested { at };
        }
        let element = DrawingElement {
            id: Uuid::new_v4(),
            points: vec![at],
            color: self.brush.color.clone(),
            tool: self.brush.tool,
            width: self.brush.width,
            text: None,
        };
        self.input = InputState::Drawing { id: element.id };
        self.doc.upsert(element.clone());
        self.current = Some(element);
        Action::Invalidated
    }

    /// Append the cursor position to the in-progress element.
    ///
    /// The element is re-entered into the collection by id, which keeps the
    /// live stroke on top of everything already drawn. No store write
    /// happens here; the full path is flushed once at stroke end.
    pub fn pointer_move(&mut self, at: Point) -> Action {
        if !self.input.is_drawing() {
            return Action::None;
        }
        let Some(current) = self.current.as_mut() else {
            return Action::None;
        };
        current.points.push(at);
        self.doc.upsert(current.clone());
        Action::Invalidated
    }

    /// End the stroke: freeze the in-progress element and hand it to the
    /// host for publishing. Idempotent; a pointer-up with no stroke in
    /// progress is a no-op.
    pub fn pointer_up(&mut self) -> Action {
        self.input = InputState::Idle;
        let Some(element) = self.current.take() else {
            return Action::None;
        };
        self.doc.upsert(element.clone());
        self.pending.upsert(element.clone());
        Action::Committed(element)
    }

    /// The pointer left the surface. Identical to pointer-up: the stroke is
    /// finalized and flushed, never discarded.
    pub fn pointer_leave(&mut self) -> Action {
        self.pointer_up()
    }

    // --- Text ---

    /// Commit a text element at `at` with the host-collected string.
    ///
    /// An empty string commits nothing (a dismissed or empty prompt). The
    /// element is complete at creation: one anchor point, `text` set, and it
    /// goes straight to the pending overlay for publishing.
    pub fn commit_text(&mut self, at: Point, text: &str) -> Action {
        if text.is_empty() {
            return Action::None;
        }
        let element = DrawingElement {
            id: Uuid::new_v4(),
            points: vec![at],
            color: self.brush.color.clone(),
            tool: Tool::Text,
            width: self.brush.width,
            text: Some(text.to_owned()),
        };
        self.doc.upsert(element.clone());
        self.pending.upsert(element.clone());
        Action::Committed(element)
    }

    // --- Store snapshots ---

    /// Apply a full snapshot from the shared store.
    ///
    /// The collection is replaced wholesale with the snapshot (an empty
    /// snapshot empties it), then unacknowledged published elements and the
    /// in-progress element are re-overlaid on top. Applying the same
    /// snapshot twice is idempotent.
    pub fn apply_snapshot(&mut self, elements: Vec<DrawingElement>) -> Action {
        if elements.is_empty() {
            // Authoritative clear: unacknowledged publishes lose to it.
            self.pending.clear();
        } else {
            let acked: Vec<Uuid> = self
                .pending
                .iter()
                .filter(|pending| elements.iter().any(|e| e.id == pending.id))
                .map(|pending| pending.id)
                .collect();
            for id in acked {
                self.pending.remove(&id);
            }
        }

        self.doc.replace_all(elements);
        for element in self.pending.to_vec() {
            self.doc.upsert(element);
        }
        if let Some(current) = self.current.clone() {
            self.doc.upsert(current);
        }
        Action::Invalidated
    }

    // --- Queries ---

    /// The local element collection, in render order.
    #[must_use]
    pub fn elements(&self) -> &ElementMap {
        &self.doc
    }
}
