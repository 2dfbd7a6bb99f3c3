//! Element model: drawing elements, their tools, and the ordered collection.
//!
//! This module defines the unit of shared drawing state (`DrawingElement`),
//! the closed set of tools that fix how an element's points are interpreted
//! (`Tool`), and the runtime collection that holds all live elements
//! (`ElementMap`).
//!
//! Data flows into this layer from the network (JSON deserialization of
//! store snapshots) and from the input engine (point appends during a
//! stroke). The renderer reads the collection in iteration order, which is
//! arrival order: an upsert of an existing id moves that element to the
//! back. That single rule fixes the z-order everywhere — the most recently
//! written element paints on top, locally and across clients.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a drawing element.
pub type ElementId = Uuid;

/// A position on the drawing surface, in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate; grows rightward.
    pub x: f64,
    /// Vertical coordinate; grows downward.
    pub y: f64,
}

impl Point {
    /// Construct a point from coordinates.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The drawing tool an element was created with.
///
/// Fixed at creation; determines how `points` (and `text`) are interpreted
/// for rendering. Serialized by its lowercase name, which is also the wire
/// and persistence format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand polyline through every recorded point (default).
    #[default]
    Pencil,
    /// Straight segment from the first recorded point to the last.
    Line,
    /// Axis-aligned rectangle spanning the first and last recorded points.
    Square,
    /// Circle centered on the first point, radius reaching the last.
    Circle,
    /// Text anchored at the first point; no stroke path.
    Text,
    /// Freehand polyline painted in the background color.
    Eraser,
}

impl Tool {
    /// Whether this tool paints a freehand polyline (pencil or eraser).
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pencil | Self::Eraser)
    }
}

/// A drawing element as stored locally, on the wire, and in the shared store.
///
/// `id`, `color`, `tool`, `width`, and the presence of `text` are fixed at
/// creation. Only `points` mutates, and only while the element is in
/// progress (between pointer-down and stroke end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingElement {
    /// Unique identifier; the shared-store key and local de-duplication key.
    pub id: ElementId,
    /// Recorded cursor positions in path traversal order. Append-only while
    /// the element is in progress, frozen once the stroke ends.
    pub points: Vec<Point>,
    /// Stroke or fill color as a CSS-style hex string (e.g. `"#ff0000"`).
    pub color: String,
    /// How `points` are interpreted for rendering.
    pub tool: Tool,
    /// Stroke width; also the font-size scale factor for text.
    pub width: f64,
    /// Literal text content; present only for [`Tool::Text`] elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DrawingElement {
    /// The first recorded point, if any.
    #[must_use]
    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// The most recently recorded point, if any.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// The ordered collection of live elements.
///
/// Used both as the client's local collection and as the server's
/// authoritative store. Iteration order is arrival order and defines the
/// z-order: inserting an element whose id is already present removes the old
/// entry and appends the new value at the back, so a rewritten element
/// paints on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    items: Vec<DrawingElement>,
}

impl ElementMap {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert or replace an element by id, moving it to the back.
    pub fn upsert(&mut self, element: DrawingElement) {
        self.items.retain(|existing| existing.id != element.id);
        self.items.push(element);
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<DrawingElement> {
        let index = self.items.iter().position(|element| element.id == *id)?;
        Some(self.items.remove(index))
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&DrawingElement> {
        self.items.iter().find(|element| element.id == *id)
    }

    /// Whether an element with this id is present.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole collection with a snapshot, adopting its order.
    pub fn replace_all(&mut self, elements: Vec<DrawingElement>) {
        self.items = elements;
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate elements in arrival order (the z-order, bottom first).
    pub fn iter(&self) -> std::slice::Iter<'_, DrawingElement> {
        self.items.iter()
    }

    /// Clone the collection into a vector, preserving order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<DrawingElement> {
        self.items.clone()
    }

    /// Number of elements currently in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a ElementMap {
    type Item = &'a DrawingElement;
    type IntoIter = std::slice::Iter<'a, DrawingElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
