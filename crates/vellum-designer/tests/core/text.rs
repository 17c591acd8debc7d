use std::rc::Rc;

use vellum_core::DocumentError;
use vellum_designer::fonts::testing::BoxFace;
use vellum_designer::{
    hit_test, local_bounds, Document, Modifiers, Point, Rect, Stroke, StrokeId, StrokeKind,
    TextAlign, Tool,
};
use vellum_settings::Config;

fn doc_with_box_font() -> Document {
    let mut config = Config::default();
    config.text.font_family = "Box".to_string();
    config.text.size = 100.0;
    let mut doc = Document::with_config(config);
    doc.fonts_mut().insert_face("Box", Rc::new(BoxFace));
    doc
}

fn place(doc: &mut Document, x: f64, y: f64) -> StrokeId {
    doc.set_tool(Tool::Text);
    doc.pointer_down(Point::new(x, y), Modifiers::NONE).unwrap()
}

fn bounds(doc: &Document, id: StrokeId) -> Rect {
    local_bounds(doc.store().get(id).unwrap(), doc.fonts())
        .known()
        .unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_placement_uses_settings_and_returns_to_select() {
    let mut doc = doc_with_box_font();
    let id = place(&mut doc, 10.0, 200.0);

    assert_eq!(doc.tool(), Tool::Select);
    assert_eq!(doc.selection().primary(), Some(id));
    match doc.store().get(id) {
        Some(Stroke::Text(t)) => {
            assert_eq!(t.text, "Text");
            assert_eq!(t.size, 100.0);
            assert_eq!(t.font_family, "Box");
        }
        other => panic!("expected text, got {:?}", other),
    }

    // Four glyphs, 50 wide each, ink inset 5 on both sides.
    let b = bounds(&doc, id);
    assert!(approx(b.x, 15.0) && approx(b.max_x(), 205.0));
    assert!(approx(b.y, 130.0) && approx(b.max_y(), 200.0));
}

#[test]
fn test_hits_follow_glyph_ink() {
    let mut doc = doc_with_box_font();
    let id = place(&mut doc, 10.0, 200.0);
    let hit = |x: f64, y: f64| hit_test(Point::new(x, y), doc.store().iter(), doc.fonts());

    assert_eq!(hit(20.0, 150.0), Some(id));
    // between the first and second glyph boxes
    assert_eq!(hit(60.0, 150.0), None);
    assert_eq!(hit(20.0, 210.0), None);
}

#[test]
fn test_set_text_applies_kerning() {
    let mut doc = doc_with_box_font();
    let id = place(&mut doc, 10.0, 200.0);
    doc.set_text(id, "AV").unwrap();

    let b = bounds(&doc, id);
    assert!(approx(b.x, 15.0));
    assert!(approx(b.w, 80.0));

    assert!(doc.undo());
    match doc.store().get(id) {
        Some(Stroke::Text(t)) => assert_eq!(t.text, "Text"),
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_set_text_on_other_kinds_fails() {
    let mut doc = doc_with_box_font();
    doc.set_tool(Tool::Shape);
    let shape = doc.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE).unwrap();
    doc.pointer_move(Point::new(20.0, 20.0), Modifiers::NONE);
    doc.pointer_up();

    assert_eq!(
        doc.set_text(shape, "nope"),
        Err(DocumentError::WrongKind {
            id: shape.to_string(),
            expected: "text".to_string(),
        })
    );
}

#[test]
fn test_alignment_patch_moves_the_box() {
    let mut doc = doc_with_box_font();
    let id = place(&mut doc, 10.0, 200.0);
    let patched = doc.patch_selected(Some(StrokeKind::Text), |s| {
        if let Stroke::Text(t) = s {
            t.align = TextAlign::Center;
        }
    });
    assert_eq!(patched, 1);

    let b = bounds(&doc, id);
    assert!(approx(b.x, -85.0));
    assert!(approx(b.max_x(), 95.0));
}

#[test]
fn test_multiline_text_stacks_by_line_height() {
    let mut doc = doc_with_box_font();
    let id = place(&mut doc, 0.0, 100.0);
    doc.set_text(id, "A\nB").unwrap();

    // line height 1.2 at size 100: second baseline at 220
    let b = bounds(&doc, id);
    assert!(approx(b.y, 30.0));
    assert!(approx(b.max_y(), 220.0));
}

#[test]
fn test_text_without_font_has_no_geometry() {
    let mut doc = Document::new();
    let id = place(&mut doc, 10.0, 200.0);
    assert_eq!(doc.missing_fonts(), vec!["Inter".to_string()]);
    assert!(local_bounds(doc.store().get(id).unwrap(), doc.fonts())
        .known()
        .is_none());
    assert_eq!(
        hit_test(Point::new(20.0, 150.0), doc.store().iter(), doc.fonts()),
        None
    );
}
