use vellum_designer::{
    Document, DocumentSnapshot, Modifiers, Point, ReorderOp, ShapeKind, ShapeStroke, Stroke,
    StrokeId, Tool,
};
use vellum_settings::Config;

fn square(x: f64, z: i64, fill: &str) -> ShapeStroke {
    let mut s = ShapeStroke::new(ShapeKind::Rect, x, 0.0)
        .with_size(40.0, 40.0)
        .with_fill(fill);
    s.meta.z = z;
    s
}

/// Red square at x 0..40 and blue square at x 50..90, both y 0..40.
fn two_squares() -> (Document, StrokeId, StrokeId) {
    let a = square(0.0, 1, "#ff0000");
    let b = square(50.0, 2, "#0000ff");
    let (ida, idb) = (a.meta.id, b.meta.id);
    let snapshot = DocumentSnapshot::new(vec![a.into(), b.into()], "#ffffff", true);
    let doc = Document::from_snapshot(Config::default(), snapshot).unwrap();
    (doc, ida, idb)
}

/// Horizontal eraser pass across both squares at y = 20.
fn erase_across(doc: &mut Document) -> Option<StrokeId> {
    doc.set_tool(Tool::Eraser);
    let id = doc.pointer_down(Point::new(20.0, 20.0), Modifiers::NONE);
    doc.pointer_move(Point::new(45.0, 20.0), Modifiers::NONE);
    doc.pointer_move(Point::new(70.0, 20.0), Modifiers::NONE);
    doc.pointer_up();
    doc.set_tool(Tool::Select);
    id
}

fn alpha_at(doc: &mut Document, x: u32, y: u32) -> u8 {
    doc.clear_selection();
    let opts = doc.raster_options(100, 50);
    let pixmap = doc.render(&opts).unwrap();
    pixmap.pixel(x, y).unwrap().alpha()
}

fn targets(doc: &Document, eraser: StrokeId) -> Vec<StrokeId> {
    match doc.store().get(eraser) {
        Some(Stroke::Eraser(e)) => e.target_ids.iter().copied().collect(),
        other => panic!("expected eraser, got {:?}", other),
    }
}

#[test]
fn test_selection_scopes_the_eraser() {
    let (mut doc, a, _) = two_squares();
    doc.select(a);
    let eraser = erase_across(&mut doc).unwrap();

    assert_eq!(targets(&doc, eraser), vec![a]);
    assert_eq!(alpha_at(&mut doc, 20, 20), 0);
    assert_eq!(alpha_at(&mut doc, 20, 3), 255);
    assert_eq!(alpha_at(&mut doc, 70, 20), 255);
}

#[test]
fn test_unselected_eraser_captures_what_it_passes_over() {
    let (mut doc, a, b) = two_squares();
    let eraser = erase_across(&mut doc).unwrap();

    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(targets(&doc, eraser), expected);
    assert_eq!(alpha_at(&mut doc, 70, 20), 0);
}

#[test]
fn test_eraser_over_nothing_is_discarded() {
    let (mut doc, _, _) = two_squares();
    doc.set_tool(Tool::Eraser);
    doc.pointer_down(Point::new(20.0, 45.0), Modifiers::NONE);
    doc.pointer_move(Point::new(90.0, 48.0), Modifiers::NONE);
    doc.pointer_up();
    assert_eq!(doc.store().len(), 2);
    assert!(!doc.can_undo());
}

#[test]
fn test_erasure_follows_target_across_reorder() {
    let (mut doc, a, _) = two_squares();
    doc.select(a);
    erase_across(&mut doc);

    doc.select(a);
    assert!(doc.reorder(ReorderOp::ToFront));
    assert_eq!(alpha_at(&mut doc, 20, 20), 0);
    assert_eq!(alpha_at(&mut doc, 70, 20), 255);
}

#[test]
fn test_eraser_of_deleted_target_stays_inert() {
    let (mut doc, a, _) = two_squares();
    doc.select(a);
    let eraser = erase_across(&mut doc).unwrap();

    doc.select(a);
    assert_eq!(doc.delete_selected(), 1);
    assert!(doc.store().contains(eraser));
    assert_eq!(alpha_at(&mut doc, 70, 20), 255);

    assert!(doc.undo());
    assert_eq!(alpha_at(&mut doc, 20, 20), 0);
    assert_eq!(alpha_at(&mut doc, 20, 3), 255);
}

#[test]
fn test_erasers_are_never_selected() {
    let (mut doc, a, _) = two_squares();
    doc.select(a);
    let eraser = erase_across(&mut doc).unwrap();
    assert!(!doc.select(eraser));
    doc.select_all();
    assert!(!doc.selection().contains(eraser));
}
