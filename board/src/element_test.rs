#![allow(clippy::float_cmp)]

use super::*;

fn element_id(n: u128) -> ElementId {
    Uuid::from_u128(n)
}

fn make_element(id: ElementId, tool: Tool) -> DrawingElement {
    DrawingElement {
        id,
        points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        color: "#000000".to_owned(),
        tool,
        width: 2.0,
        text: None,
    }
}

// ===== Point =====

#[test]
fn point_distance_is_euclidean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(b.distance(a), 5.0);
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(10.0, 80.5)).expect("serialize");
    assert_eq!(json, serde_json::json!({ "x": 10.0, "y": 80.5 }));
}

// ===== Tool serde =====

#[test]
fn tool_serializes_to_lowercase_names() {
    let cases = [
        (Tool::Pencil, "pencil"),
        (Tool::Line, "line"),
        (Tool::Square, "square"),
        (Tool::Circle, "circle"),
        (Tool::Text, "text"),
        (Tool::Eraser, "eraser"),
    ];
    for (tool, name) in cases {
        let json = serde_json::to_value(tool).expect("serialize");
        assert_eq!(json, serde_json::json!(name));
        let back: Tool = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, tool);
    }
}

#[test]
fn tool_rejects_unknown_name() {
    let result: Result<Tool, _> = serde_json::from_value(serde_json::json!("crayon"));
    assert!(result.is_err());
}

#[test]
fn tool_default_is_pencil() {
    assert_eq!(Tool::default(), Tool::Pencil);
}

#[test]
fn tool_freehand_covers_pencil_and_eraser() {
    assert!(Tool::Pencil.is_freehand());
    assert!(Tool::Eraser.is_freehand());
    assert!(!Tool::Line.is_freehand());
    assert!(!Tool::Text.is_freehand());
}

// ===== DrawingElement serde =====

#[test]
fn element_round_trips_field_for_field() {
    let element = DrawingElement {
        id: element_id(7),
        points: vec![Point::new(10.0, 10.0), Point::new(100.0, 80.0)],
        color: "#FF0000".to_owned(),
        tool: Tool::Square,
        width: 2.0,
        text: None,
    };
    let json = serde_json::to_string(&element).expect("serialize");
    let back: DrawingElement = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, element);
}

#[test]
fn element_omits_absent_text_from_json() {
    let element = make_element(element_id(1), Tool::Pencil);
    let json = serde_json::to_string(&element).expect("serialize");
    assert!(!json.contains("\"text\""));
}

#[test]
fn element_keeps_text_for_text_tool() {
    let element = DrawingElement {
        id: element_id(2),
        points: vec![Point::new(50.0, 50.0)],
        color: "#000000".to_owned(),
        tool: Tool::Text,
        width: 2.0,
        text: Some("Hi".to_owned()),
    };
    let json = serde_json::to_value(&element).expect("serialize");
    assert_eq!(json["text"], serde_json::json!("Hi"));
    assert_eq!(json["tool"], serde_json::json!("text"));
    let back: DrawingElement = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back.text.as_deref(), Some("Hi"));
}

#[test]
fn element_decodes_missing_text_as_none() {
    let json = serde_json::json!({
        "id": element_id(3),
        "points": [{ "x": 1.0, "y": 1.0 }],
        "color": "#000000",
        "tool": "pencil",
        "width": 2.0,
    });
    let element: DrawingElement = serde_json::from_value(json).expect("deserialize");
    assert_eq!(element.text, None);
}

#[test]
fn element_first_and_last_points() {
    let element = make_element(element_id(4), Tool::Line);
    assert_eq!(element.first_point(), Some(Point::new(1.0, 2.0)));
    assert_eq!(element.last_point(), Some(Point::new(3.0, 4.0)));

    let empty = DrawingElement { points: Vec::new(), ..element };
    assert_eq!(empty.first_point(), None);
    assert_eq!(empty.last_point(), None);
}

// ===== ElementMap =====

#[test]
fn upsert_appends_new_elements_in_arrival_order() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(1), Tool::Pencil));
    map.upsert(make_element(element_id(2), Tool::Line));
    map.upsert(make_element(element_id(3), Tool::Eraser));

    let ids: Vec<ElementId> = map.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![element_id(1), element_id(2), element_id(3)]);
}

#[test]
fn upsert_replaces_existing_and_moves_it_to_the_back() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(1), Tool::Pencil));
    map.upsert(make_element(element_id(2), Tool::Pencil));

    let mut updated = make_element(element_id(1), Tool::Pencil);
    updated.points.push(Point::new(9.0, 9.0));
    map.upsert(updated);

    let ids: Vec<ElementId> = map.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![element_id(2), element_id(1)]);
    assert_eq!(map.len(), 2);
    let stored = map.get(&element_id(1)).expect("element present");
    assert_eq!(stored.points.len(), 3);
}

#[test]
fn remove_returns_element_and_drops_it() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(1), Tool::Pencil));
    let removed = map.remove(&element_id(1)).expect("present");
    assert_eq!(removed.id, element_id(1));
    assert!(map.is_empty());
    assert!(map.remove(&element_id(1)).is_none());
}

#[test]
fn replace_all_adopts_snapshot_order() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(9), Tool::Pencil));

    map.replace_all(vec![
        make_element(element_id(3), Tool::Line),
        make_element(element_id(1), Tool::Pencil),
    ]);

    let ids: Vec<ElementId> = map.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![element_id(3), element_id(1)]);
    assert!(!map.contains(&element_id(9)));
}

#[test]
fn replace_all_with_empty_snapshot_empties_the_map() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(1), Tool::Pencil));
    map.replace_all(Vec::new());
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[test]
fn clear_removes_everything() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(1), Tool::Pencil));
    map.upsert(make_element(element_id(2), Tool::Text));
    map.clear();
    assert!(map.is_empty());
}

#[test]
fn to_vec_preserves_order() {
    let mut map = ElementMap::new();
    map.upsert(make_element(element_id(2), Tool::Pencil));
    map.upsert(make_element(element_id(1), Tool::Pencil));
    let ids: Vec<ElementId> = map.to_vec().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![element_id(2), element_id(1)]);
}
