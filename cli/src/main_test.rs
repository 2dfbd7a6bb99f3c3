use super::*;
use board::element::{Point, Tool};
use board::surface::Theme;
use uuid::Uuid;

fn element(tool: Tool, points: Vec<Point>, color: &str) -> DrawingElement {
    DrawingElement {
        id: Uuid::new_v4(),
        points,
        color: color.to_owned(),
        tool,
        width: 2.0,
        text: None,
    }
}

#[test]
fn ws_url_maps_http_schemes_to_ws_schemes() {
    assert_eq!(
        ws_url("http://127.0.0.1:3000").expect("http url"),
        "ws://127.0.0.1:3000/api/ws"
    );
    assert_eq!(
        ws_url("https://board.example/").expect("https url"),
        "wss://board.example/api/ws"
    );
}

#[test]
fn ws_url_rejects_other_schemes() {
    assert!(matches!(ws_url("ftp://nope"), Err(CliError::InvalidBaseUrl(_))));
    assert!(matches!(ws_url("127.0.0.1:3000"), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn paint_with_no_elements_yields_the_background_only() {
    let mut surface = Surface::new(16, 16);
    let count = paint(&mut surface, Vec::new(), Theme::Dark, None).expect("paint");

    assert_eq!(count, 0);
    assert_eq!(surface.pixel(8, 8), Some(Theme::Dark.background()));
}

#[test]
fn paint_renders_snapshot_elements_in_order() {
    let mut surface = Surface::new(32, 32);
    let stroke = element(
        Tool::Line,
        vec![Point::new(4.0, 16.0), Point::new(28.0, 16.0)],
        "#ff0000",
    );
    let eraser = element(
        Tool::Eraser,
        vec![Point::new(14.0, 16.0), Point::new(18.0, 16.0)],
        "#123456",
    );

    let count = paint(
        &mut surface,
        vec![stroke, eraser],
        Theme::Light,
        None,
    )
    .expect("paint");

    assert_eq!(count, 2);
    // The red stroke survives outside the erased span.
    assert_eq!(surface.pixel(5, 16), Some(image_red()));
    // The eraser, arriving later, painted the background back over the middle.
    assert_eq!(surface.pixel(16, 16), Some(Theme::Light.background()));
}

fn image_red() -> image::Rgba<u8> {
    image::Rgba([0xff, 0x00, 0x00, 0xff])
}
