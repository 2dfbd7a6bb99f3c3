//! Small parsers for command-line drawing arguments.
//!
//! A pointer script is a whitespace-separated list of `x,y` pairs, e.g.
//! `"10,10 60,40 100,80"`. The first pair becomes the pointer-down
//! position, every following pair a pointer-move; pointer-up is implicit at
//! the end of the script.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use board::element::{Point, Tool};
use board::surface::Theme;

/// A value that could not be parsed, with the offending input attached.
#[derive(Debug, thiserror::Error)]
#[error("invalid {what}: `{input}`")]
pub struct ParseError {
    what: &'static str,
    input: String,
}

impl ParseError {
    fn new(what: &'static str, input: &str) -> Self {
        Self { what, input: input.to_owned() }
    }
}

/// Parse a pointer script into an ordered point sequence.
///
/// # Errors
///
/// Returns an error if the script is empty or any pair is not `x,y` with
/// finite numeric coordinates.
pub fn parse_points(script: &str) -> Result<Vec<Point>, ParseError> {
    let points: Vec<Point> = script
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<_, _>>()?;
    if points.is_empty() {
        return Err(ParseError::new("pointer script", script));
    }
    Ok(points)
}

fn parse_point(pair: &str) -> Result<Point, ParseError> {
    let Some((x, y)) = pair.split_once(',') else {
        return Err(ParseError::new("point", pair));
    };
    let x: f64 = x.trim().parse().map_err(|_| ParseError::new("point", pair))?;
    let y: f64 = y.trim().parse().map_err(|_| ParseError::new("point", pair))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(ParseError::new("point", pair));
    }
    Ok(Point::new(x, y))
}

/// Parse a tool name as it appears on the wire (`pencil`, `line`, `square`,
/// `circle`, `eraser`). The text tool has its own command and is rejected
/// here.
///
/// # Errors
///
/// Returns an error for unknown names and for `text`.
pub fn parse_tool(name: &str) -> Result<Tool, ParseError> {
    match name {
        "pencil" => Ok(Tool::Pencil),
        "line" => Ok(Tool::Line),
        "square" => Ok(Tool::Square),
        "circle" => Ok(Tool::Circle),
        "eraser" => Ok(Tool::Eraser),
        _ => Err(ParseError::new("tool", name)),
    }
}

/// Parse a background theme name: `light` or `dark`.
///
/// # Errors
///
/// Returns an error for any other name.
pub fn parse_theme(name: &str) -> Result<Theme, ParseError> {
    match name {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        _ => Err(ParseError::new("theme", name)),
    }
}

/// Parse a surface size of the form `WIDTHxHEIGHT`, e.g. `800x600`.
///
/// # Errors
///
/// Returns an error unless both dimensions are positive integers.
pub fn parse_size(value: &str) -> Result<(u32, u32), ParseError> {
    let Some((w, h)) = value.split_once('x') else {
        return Err(ParseError::new("size", value));
    };
    let w: u32 = w.parse().map_err(|_| ParseError::new("size", value))?;
    let h: u32 = h.parse().map_err(|_| ParseError::new("size", value))?;
    if w == 0 || h == 0 {
        return Err(ParseError::new("size", value));
    }
    Ok((w, h))
}
