use vellum_core::DocumentError;
use vellum_designer::bounds::local_bounds;
use vellum_designer::{
    hit_test, Document, Modifiers, Point, Rect, ShapeKind, Stroke, StrokeId, Tool,
};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn stroke_at(doc: &Document, index: usize) -> &Stroke {
    doc.store().iter().nth(index).expect("stroke")
}

fn draw_pen(doc: &mut Document, from: Point, to: Point) {
    doc.pointer_down(from, Modifiers::NONE);
    doc.pointer_move(to, Modifiers::NONE);
    doc.pointer_up();
}

/// Rect (10,10) 50x50, created with the shape tool and shift held.
fn doc_with_square() -> (Document, StrokeId) {
    let mut doc = Document::new();
    doc.set_tool(Tool::Shape);
    let id = doc.pointer_down(p(10.0, 10.0), Modifiers::NONE).unwrap();
    doc.pointer_move(p(110.0, 60.0), Modifiers::SHIFT);
    doc.pointer_up();
    doc.set_tool(Tool::Select);
    (doc, id)
}

fn shape_box(doc: &Document, id: StrokeId) -> Rect {
    match doc.store().get(id) {
        Some(Stroke::Shape(s)) => Rect::new(s.x, s.y, s.w, s.h),
        other => panic!("expected shape, got {:?}", other),
    }
}

#[test]
fn test_pen_runs_coalesce_into_one_stroke() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Pen);
    draw_pen(&mut doc, p(0.0, 0.0), p(10.0, 0.0));
    draw_pen(&mut doc, p(20.0, 20.0), p(30.0, 20.0));

    assert_eq!(doc.store().len(), 1);
    let Stroke::Pen(pen) = stroke_at(&doc, 0) else {
        panic!("expected pen stroke");
    };
    assert_eq!(pen.sub_path_count(), 2);
    assert_eq!(pen.points.iter().filter(|p| p.is_gap()).count(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&doc.snapshot().to_json().unwrap()).unwrap();
    let points = json["strokes"][0]["points"].as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert!(points[2].is_null());
    assert_eq!(json["strokes"][0]["type"], "pen");
}

#[test]
fn test_pen_runs_undo_one_at_a_time() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Pen);
    draw_pen(&mut doc, p(0.0, 0.0), p(10.0, 0.0));
    draw_pen(&mut doc, p(20.0, 20.0), p(30.0, 20.0));

    assert!(doc.undo());
    match stroke_at(&doc, 0) {
        Stroke::Pen(pen) => assert_eq!(pen.sub_path_count(), 1),
        other => panic!("expected pen, got {:?}", other),
    }
    assert!(doc.undo());
    assert!(doc.store().is_empty());
    assert!(!doc.undo());

    assert!(doc.redo());
    assert_eq!(doc.store().len(), 1);
}

#[test]
fn test_style_or_tool_change_breaks_coalescing() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Pen);
    draw_pen(&mut doc, p(0.0, 0.0), p(10.0, 0.0));
    doc.set_pen_style("#ff0000", 4.0);
    draw_pen(&mut doc, p(0.0, 10.0), p(10.0, 10.0));
    assert_eq!(doc.store().len(), 2);

    doc.set_tool(Tool::Select);
    doc.set_tool(Tool::Pen);
    draw_pen(&mut doc, p(0.0, 20.0), p(10.0, 20.0));
    assert_eq!(doc.store().len(), 3);
}

#[test]
fn test_undo_last_pen_segment() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Pen);
    draw_pen(&mut doc, p(0.0, 0.0), p(10.0, 0.0));
    draw_pen(&mut doc, p(20.0, 20.0), p(30.0, 20.0));

    assert!(doc.undo_last_pen_segment());
    match stroke_at(&doc, 0) {
        Stroke::Pen(pen) => {
            assert_eq!(pen.sub_path_count(), 1);
            assert!(!pen.points.last().unwrap().is_gap());
        }
        other => panic!("expected pen, got {:?}", other),
    }
    assert!(doc.undo_last_pen_segment());
    assert!(doc.store().is_empty());
    assert!(!doc.undo_last_pen_segment());
}

#[test]
fn test_shift_squares_new_shape() {
    let (doc, id) = doc_with_square();
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 50.0, 50.0));
    assert!(doc.can_undo());
    assert!(doc.is_modified());
}

#[test]
fn test_click_without_drag_creates_nothing() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Shape);
    doc.pointer_down(p(10.0, 10.0), Modifiers::NONE);
    doc.pointer_up();
    assert!(doc.store().is_empty());
    assert!(!doc.can_undo());
}

#[test]
fn test_line_ignores_square_constraint() {
    let mut doc = Document::new();
    doc.config_mut().shape.kind = vellum_settings::ShapeKindSetting::Line;
    doc.set_tool(Tool::Shape);
    let id = doc.pointer_down(p(0.0, 0.0), Modifiers::NONE).unwrap();
    doc.pointer_move(p(100.0, 30.0), Modifiers::SHIFT);
    doc.pointer_up();
    match doc.store().get(id) {
        Some(Stroke::Shape(s)) => {
            assert_eq!(s.kind, ShapeKind::Line);
            assert_eq!((s.w, s.h), (100.0, 30.0));
        }
        other => panic!("expected line, got {:?}", other),
    }
}

#[test]
fn test_drag_moves_and_undoes_in_one_step() {
    let (mut doc, id) = doc_with_square();
    assert_eq!(doc.pointer_down(p(30.0, 30.0), Modifiers::NONE), Some(id));
    doc.pointer_move(p(35.0, 32.0), Modifiers::NONE);
    doc.pointer_move(p(40.0, 35.0), Modifiers::NONE);
    doc.pointer_up();
    assert_eq!(shape_box(&doc, id), Rect::new(20.0, 15.0, 50.0, 50.0));

    assert!(doc.undo());
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 50.0, 50.0));
}

#[test]
fn test_locked_stroke_does_not_move() {
    let (mut doc, id) = doc_with_square();
    assert_eq!(doc.toggle_locked(id), Ok(true));
    doc.pointer_down(p(30.0, 30.0), Modifiers::NONE);
    doc.pointer_move(p(80.0, 80.0), Modifiers::NONE);
    doc.pointer_up();
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 50.0, 50.0));

    assert_eq!(doc.rotate_selected(45.0), 0);
    assert_eq!(doc.store().get(id).unwrap().rotation(), 0.0);
}

#[test]
fn test_corner_handle_resize() {
    let (mut doc, id) = doc_with_square();
    doc.select(id);
    assert_eq!(doc.pointer_down(p(60.0, 60.0), Modifiers::NONE), Some(id));
    doc.pointer_move(p(110.0, 90.0), Modifiers::NONE);
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 100.0, 80.0));
    doc.pointer_move(p(110.0, 90.0), Modifiers::SHIFT);
    doc.pointer_up();
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 80.0, 80.0));
}

#[test]
fn test_cancel_restores_committed_state() {
    let (mut doc, id) = doc_with_square();
    doc.pointer_down(p(30.0, 30.0), Modifiers::NONE);
    doc.pointer_move(p(90.0, 90.0), Modifiers::NONE);
    doc.cancel();
    assert!(doc.session().is_idle());
    assert_eq!(shape_box(&doc, id), Rect::new(10.0, 10.0, 50.0, 50.0));
}

#[test]
fn test_click_selection_rules() {
    let (mut doc, id) = doc_with_square();
    doc.clear_selection();

    doc.pointer_down(p(30.0, 30.0), Modifiers::NONE);
    doc.pointer_up();
    assert_eq!(doc.selection().primary(), Some(id));

    // Shift-click on a selected stroke deselects it.
    assert_eq!(doc.pointer_down(p(30.0, 30.0), Modifiers::SHIFT), None);
    doc.pointer_up();
    assert!(doc.selection().is_empty());

    doc.select(id);
    doc.pointer_down(p(500.0, 500.0), Modifiers::NONE);
    assert!(doc.selection().is_empty());
}

#[test]
fn test_rotated_rect_hit_uses_its_frame() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Shape);
    let id = doc.pointer_down(p(10.0, 10.0), Modifiers::NONE).unwrap();
    doc.pointer_move(p(110.0, 60.0), Modifiers::NONE);
    doc.pointer_up();
    assert_eq!(doc.set_rotation_selected(90.0), 1);

    let strokes = doc.store();
    assert_eq!(hit_test(p(60.0, 80.0), strokes.iter(), doc.fonts()), Some(id));
    assert_eq!(hit_test(p(100.0, 35.0), strokes.iter(), doc.fonts()), None);
}

#[test]
fn test_polygon_closes_near_first_vertex() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Polygon);
    for v in [p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0)] {
        assert_eq!(doc.pointer_down(v, Modifiers::NONE), None);
        doc.pointer_up();
    }
    assert!(doc.store().is_empty());
    assert!(!doc.session().is_idle());

    doc.pointer_move(p(20.0, 40.0), Modifiers::NONE);
    let id = doc.pointer_down(p(3.0, 3.0), Modifiers::NONE).unwrap();
    assert!(doc.session().is_idle());
    match doc.store().get(id) {
        Some(Stroke::Polygon(poly)) => {
            assert!(poly.closed);
            assert_eq!(poly.points, vec![p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0)]);
            assert!(poly.is_filled());
        }
        other => panic!("expected polygon, got {:?}", other),
    }

    assert!(doc.undo());
    assert!(doc.store().is_empty());
}

#[test]
fn test_polygon_draft_cancel_and_tool_switch() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Polygon);
    doc.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    doc.pointer_down(p(50.0, 0.0), Modifiers::NONE);
    assert_eq!(doc.close_polygon(), None);
    assert!(doc.store().is_empty());

    doc.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    doc.pointer_down(p(50.0, 0.0), Modifiers::NONE);
    doc.pointer_down(p(50.0, 50.0), Modifiers::NONE);
    doc.cancel();
    assert!(doc.store().is_empty());

    doc.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    doc.pointer_down(p(50.0, 0.0), Modifiers::NONE);
    doc.pointer_down(p(50.0, 50.0), Modifiers::NONE);
    doc.set_tool(Tool::Select);
    assert_eq!(doc.store().len(), 1);
}

#[test]
fn test_reorder_and_delete_selected() {
    let mut doc = Document::new();
    doc.set_tool(Tool::Shape);
    let a = doc.pointer_down(p(0.0, 0.0), Modifiers::NONE).unwrap();
    doc.pointer_move(p(40.0, 40.0), Modifiers::NONE);
    doc.pointer_up();
    let b = doc.pointer_down(p(20.0, 20.0), Modifiers::NONE).unwrap();
    doc.pointer_move(p(60.0, 60.0), Modifiers::NONE);
    doc.pointer_up();

    let top = |doc: &Document| hit_test(p(30.0, 30.0), doc.store().iter(), doc.fonts());
    assert_eq!(top(&doc), Some(b));

    doc.select(a);
    assert!(doc.reorder(vellum_designer::ReorderOp::ToFront));
    assert_eq!(top(&doc), Some(a));

    assert_eq!(doc.delete_selected(), 1);
    assert!(doc.selection().is_empty());
    assert_eq!(top(&doc), Some(b));
    assert_eq!(doc.delete_selected(), 0);
}

#[test]
fn test_hidden_strokes_are_not_hit() {
    let (mut doc, id) = doc_with_square();
    assert_eq!(doc.toggle_visible(id), Ok(false));
    assert_eq!(hit_test(p(30.0, 30.0), doc.store().iter(), doc.fonts()), None);
    assert!(local_bounds(doc.store().get(id).unwrap(), doc.fonts())
        .known()
        .is_some());
}

#[test]
fn test_unknown_ids_are_errors() {
    let mut doc = Document::new();
    let ghost = StrokeId::new();
    assert!(matches!(
        doc.toggle_visible(ghost),
        Err(DocumentError::UnknownStroke { .. })
    ));
    assert!(matches!(
        doc.set_text(ghost, "x"),
        Err(DocumentError::UnknownStroke { .. })
    ));
}

#[test]
fn test_clear_is_undoable() {
    let (mut doc, _) = doc_with_square();
    doc.clear();
    assert!(doc.store().is_empty());
    assert!(doc.undo());
    assert_eq!(doc.store().len(), 1);
}
