use super::*;
use crate::surface::Theme;

const BLACK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);

fn lit_pixels(surface: &Surface, color: Rgba<u8>) -> Vec<(u32, u32)> {
    let mut lit = Vec::new();
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.pixel(x, y) == Some(color) {
                lit.push((x, y));
            }
        }
    }
    lit
}

#[test]
fn glyph_rows_are_seven_by_five() {
    let rows = glyph('A').expect("covered");
    assert_eq!(rows.len(), 7);
    for bits in rows {
        assert!(bits <= 0b11111, "row wider than five bits: {bits:#b}");
    }
}

#[test]
fn lowercase_folds_to_uppercase() {
    assert_eq!(glyph('h'), glyph('H'));
    assert_eq!(glyph('z'), glyph('Z'));
}

#[test]
fn digits_and_common_punctuation_are_covered() {
    for ch in "0123456789 .,!?-:;'\"()+/=_".chars() {
        assert!(glyph(ch).is_some(), "no glyph for {ch:?}");
    }
}

#[test]
fn uncovered_characters_return_none() {
    assert_eq!(glyph('~'), None);
    assert_eq!(glyph('é'), None);
}

#[test]
fn draw_text_paints_above_the_baseline() {
    let mut surface = Surface::new(40, 20);
    surface.fill(Theme::Light.background());
    draw_text(&mut surface, Point::new(2.0, 15.0), "Hi", 1, BLACK);

    let lit = lit_pixels(&surface, BLACK);
    assert!(!lit.is_empty());
    for (_, y) in &lit {
        assert!(*y >= 8 && *y < 15, "pixel outside glyph band: y={y}");
    }
}

#[test]
fn draw_text_advances_six_columns_per_character() {
    let mut surface = Surface::new(40, 12);
    surface.fill(Theme::Light.background());
    // 'T' has a full top row, so each glyph's left edge is easy to find.
    draw_text(&mut surface, Point::new(0.0, 10.0), "TT", 1, BLACK);

    let lit = lit_pixels(&surface, BLACK);
    let top_row: Vec<u32> = lit.iter().filter(|(_, y)| *y == 3).map(|(x, _)| *x).collect();
    assert!(top_row.contains(&0), "first glyph starts at column 0");
    assert!(top_row.contains(&6), "second glyph starts at column 6");
    assert!(!top_row.contains(&5), "spacing column stays empty");
}

#[test]
fn draw_text_scales_blocks_by_integer_factor() {
    let mut small = Surface::new(60, 40);
    let mut large = Surface::new(60, 40);
    small.fill(Theme::Light.background());
    large.fill(Theme::Light.background());

    draw_text(&mut small, Point::new(0.0, 30.0), "I", 1, BLACK);
    draw_text(&mut large, Point::new(0.0, 30.0), "I", 3, BLACK);

    let small_count = lit_pixels(&small, BLACK).len();
    let large_count = lit_pixels(&large, BLACK).len();
    assert_eq!(large_count, small_count * 9);
}

#[test]
fn unknown_characters_render_the_hollow_box() {
    let mut surface = Surface::new(10, 10);
    surface.fill(Theme::Light.background());
    draw_text(&mut surface, Point::new(0.0, 8.0), "~", 1, BLACK);

    // Box outline: corners lit, center empty.
    assert_eq!(surface.pixel(0, 1), Some(BLACK));
    assert_eq!(surface.pixel(4, 1), Some(BLACK));
    assert_eq!(surface.pixel(2, 4), Some(Theme::Light.background()));
}

#[test]
fn zero_scale_is_clamped_to_one() {
    let mut surface = Surface::new(10, 10);
    surface.fill(Theme::Light.background());
    draw_text(&mut surface, Point::new(0.0, 8.0), "I", 0, BLACK);
    assert!(!lit_pixels(&surface, BLACK).is_empty());
}
