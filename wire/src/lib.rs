//! Shared message model and JSON codec for the realtime WS transport.
//!
//! This crate owns the wire representation used by both `server` and `cli`.
//! Messages travel as JSON text frames, tagged by an `"op"` field: requests
//! flow client-to-server, events flow back. Element payloads reuse the
//! serde model from `board`, so the wire format and the persistence format
//! are the same shape.

use board::element::DrawingElement;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`decode_request`] and [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text frame is not valid JSON or does not match a known message
    /// shape.
    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A client-to-server message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Register for snapshot events; the server replies immediately with the
    /// current board state.
    Subscribe,
    /// Write one element, replacing any previous value stored at its id.
    Put {
        /// The full element value; never a partial update.
        element: DrawingElement,
    },
    /// Remove every element from the board.
    Clear,
}

/// A server-to-client message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    /// The complete board state, in arrival order. Sent on subscribe and
    /// rebroadcast to every subscriber after each successful write.
    Snapshot {
        /// All live elements; empty means the board is clear.
        elements: Vec<DrawingElement>,
    },
    /// A request could not be honored; the connection stays open.
    Error {
        /// Human-readable description of what was rejected.
        message: String,
    },
}

/// Encode a request into a JSON text frame.
#[must_use]
pub fn encode_request(request: &Request) -> String {
    // Serializing these enums is infallible: no non-string map keys, no
    // fallible Serialize impls anywhere in the payload.
    serde_json::to_string(request).unwrap_or_default()
}

/// Decode a JSON text frame into a request. Strict: any malformed or
/// unrecognized frame is rejected.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the text is not valid JSON or the
/// `op` is not a known request.
pub fn decode_request(text: &str) -> Result<Request, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode an event into a JSON text frame.
#[must_use]
pub fn encode_event(event: &Event) -> String {
    // Infallible for the same reason as `encode_request`.
    serde_json::to_string(event).unwrap_or_default()
}

/// Decode a JSON text frame into an event.
///
/// Snapshot decoding is lenient: element records that fail to deserialize
/// are silently dropped, and a missing or non-array `elements` field decodes
/// as an empty snapshot. A bad record therefore costs one element, never the
/// whole board. Every other event shape is strict.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the text is not valid JSON or the
/// `op` is not a known event.
pub fn decode_event(text: &str) -> Result<Event, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("op").and_then(Value::as_str) == Some("snapshot") {
        return Ok(Event::Snapshot {
            elements: decode_snapshot_elements(&value),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn decode_snapshot_elements(value: &Value) -> Vec<DrawingElement> {
    let Some(records) = value.get("elements").and_then(Value::as_array) else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| serde_json::from_value(record.clone()).ok())
        .collect()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
