//! Render engine: full repaint of the element collection onto a surface.
//!
//! DESIGN
//! ======
//! There is one entry point, [`draw`], and it always repaints everything:
//! background fill first, then every element in collection order. That order
//! is the z-order, so an eraser stroke (painted in the background color)
//! occludes exactly the strokes that arrived before it. No incremental or
//! dirty-rect path exists; correctness comes from redrawing the world on
//! every change.
//!
//! Strokes are rasterized by stamping filled discs of radius `width / 2`
//! along the path at sub-pixel steps, which gives round caps and joins for
//! free. Shape tools reduce to stroked segments: a rectangle is its four
//! edges, a circle is a sampled circumference.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use image::Rgba;

use crate::consts::FONT_PX_PER_WIDTH;
use crate::element::{DrawingElement, ElementMap, Point, Tool};
use crate::font;
use crate::surface::{Surface, Theme};

/// Repaint the whole surface from the element collection.
pub fn draw(surface: &mut Surface, elements: &ElementMap, theme: Theme) {
    surface.fill(theme.background());
    for element in elements {
        draw_element(surface, element, theme);
    }
}

fn draw_element(surface: &mut Surface, element: &DrawingElement, theme: Theme) {
    // Eraser strokes paint in the background color; everything else uses the
    // element's own color, falling back to black when it doesn't parse.
    let color = if element.tool == Tool::Eraser {
        theme.background()
    } else {
        parse_color(&element.color)
    };

    if element.tool == Tool::Text {
        draw_text_element(surface, element, color);
        return;
    }
    if element.points.len() < 2 {
        // Not yet a path; skipped, never an error.
        return;
    }
    let first = element.points[0];
    let last = element.points[element.points.len() - 1];
    let radius = (element.width / 2.0).max(0.5);

    match element.tool {
        Tool::Line => stroke_segment(surface, first, last, radius, color),
        Tool::Square => stroke_rect(surface, first, last, radius, color),
        Tool::Circle => stroke_circle(surface, first, first.distance(last), radius, color),
        // Pencil and eraser: polyline through every point.
        _ => stroke_polyline(surface, &element.points, radius, color),
    }
}

/// Connected polyline through every point in sequence order.
fn stroke_polyline(surface: &mut Surface, points: &[Point], radius: f64, color: Rgba<u8>) {
    for pair in points.windows(2) {
        stroke_segment(surface, pair[0], pair[1], radius, color);
    }
}

/// Stamp discs from `from` to `to` at steps no wider than one pixel.
fn stroke_segment(surface: &mut Surface, from: Point, to: Point, radius: f64, color: Rgba<u8>) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = from.distance(to).ceil().max(1.0);
    let count = steps as u32;
    for i in 0..=count {
        let t = f64::from(i) / steps;
        surface.stamp_disc(from.x + dx * t, from.y + dy * t, radius, color);
    }
}

/// Axis-aligned rectangle spanning `a` and `b` as opposite corners. Negative
/// spans need no special case; the edges just run the other way.
fn stroke_rect(surface: &mut Surface, a: Point, b: Point, radius: f64, color: Rgba<u8>) {
    let top_right = Point::new(b.x, a.y);
    let bottom_left = Point::new(a.x, b.y);
    stroke_segment(surface, a, top_right, radius, color);
    stroke_segment(surface, top_right, b, radius, color);
    stroke_segment(surface, b, bottom_left, radius, color);
    stroke_segment(surface, bottom_left, a, radius, color);
}

/// Circle centered on `center` with the given radius, stroked by sampling
/// the circumference at roughly one-pixel arc steps.
fn stroke_circle(surface: &mut Surface, center: Point, r: f64, stroke_radius: f64, color: Rgba<u8>) {
    if r < 0.5 {
        surface.stamp_disc(center.x, center.y, stroke_radius, color);
        return;
    }
    let steps = (std::f64::consts::TAU * r).ceil().max(8.0);
    let count = steps as u32;
    for i in 0..=count {
        let theta = std::f64::consts::TAU * f64::from(i) / steps;
        surface.stamp_disc(center.x + r * theta.cos(), center.y + r * theta.sin(), stroke_radius, color);
    }
}

/// Text anchored baseline-left at the first point, sized by `width`.
fn draw_text_element(surface: &mut Surface, element: &DrawingElement, color: Rgba<u8>) {
    let Some(text) = element.text.as_deref() else {
        return;
    };
    let Some(anchor) = element.first_point() else {
        return;
    };
    let font_px = element.width * FONT_PX_PER_WIDTH;
    let scale = (font_px / font::CELL_HEIGHT_PX).round().max(1.0) as u32;
    font::draw_text(surface, anchor, text, scale, color);
}

/// Parse a `#rgb` or `#rrggbb` color; anything malformed paints black.
fn parse_color(value: &str) -> Rgba<u8> {
    parse_hex(value).unwrap_or(Rgba([0x00, 0x00, 0x00, 0xff]))
}

fn parse_hex(value: &str) -> Option<Rgba<u8>> {
    let hex = value.strip_prefix('#')?.as_bytes();
    match hex {
        [r, g, b] => {
            let r = hex_nibble(*r)?;
            let g = hex_nibble(*g)?;
            let b = hex_nibble(*b)?;
            Some(Rgba([r * 17, g * 17, b * 17, 0xff]))
        }
        [r1, r0, g1, g0, b1, b0] => {
            let r = hex_nibble(*r1)? * 16 + hex_nibble(*r0)?;
            let g = hex_nibble(*g1)? * 16 + hex_nibble(*g0)?;
            let b = hex_nibble(*b1)? * 16 + hex_nibble(*b0)?;
            Some(Rgba([r, g, b, 0xff]))
        }
        _ => None,
    }
}

fn hex_nibble(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}
