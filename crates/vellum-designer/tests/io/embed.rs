use vellum_core::ImportError;
use vellum_designer::{Document, Modifiers, Point, Stroke, Tool};

const BADGE: &str = "<?xml version=\"1.0\"?>\n\
    <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"40\" height=\"20\" viewBox=\"0 0 80 40\">\
    <script>alert(1)</script>\
    <rect width=\"80\" height=\"40\" fill=\"#ff0000\"/></svg>";

#[test]
fn test_import_places_and_selects() {
    let mut doc = Document::new();
    let id = doc.import_svg(BADGE, Point::new(5.0, 5.0)).unwrap();

    assert_eq!(doc.selection().primary(), Some(id));
    match doc.store().get(id) {
        Some(Stroke::Embedded(e)) => {
            assert_eq!((e.iw, e.ih, e.scale), (40.0, 20.0, 1.0));
            assert!(!e.svg.contains("<script"));
        }
        other => panic!("expected embedded vector, got {:?}", other),
    }
    assert!(doc.undo());
    assert!(doc.store().is_empty());
}

#[test]
fn test_import_rejects_non_svg() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.import_svg("", Point::new(0.0, 0.0)),
        Err(ImportError::Empty)
    ));
    assert!(matches!(
        doc.import_svg("<div>hi</div>", Point::new(0.0, 0.0)),
        Err(ImportError::MissingRoot)
    ));
    assert!(!doc.can_undo());
}

#[test]
fn test_embedded_export_maps_view_box() {
    let mut doc = Document::new();
    doc.import_svg(BADGE, Point::new(5.0, 5.0)).unwrap();
    let report = doc.export_svg().unwrap();

    assert_eq!((report.width, report.height), (40, 20));
    assert!(report
        .svg
        .contains("<g transform=\"translate(0 0) scale(0.5 0.5) translate(0 0)\">"));
    assert!(report.svg.contains("fill=\"#ff0000\""));
    assert!(!report.svg.contains("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"40\""));
}

#[test]
fn test_embedded_raster_and_corner_resize() {
    let mut doc = Document::new();
    let id = doc.import_svg(BADGE, Point::new(5.0, 5.0)).unwrap();

    let pixmap = doc.rasterize().unwrap();
    let px = pixmap.pixel(20, 10).unwrap();
    assert_eq!((px.red(), px.alpha()), (255, 255));

    // se handle of the 40x20 box placed at (5, 5)
    doc.set_tool(Tool::Select);
    doc.pointer_down(Point::new(45.0, 25.0), Modifiers::NONE);
    doc.pointer_move(Point::new(85.0, 45.0), Modifiers::NONE);
    doc.pointer_up();
    match doc.store().get(id) {
        Some(Stroke::Embedded(e)) => {
            assert!((e.scale - 2.0).abs() < 1e-9);
            assert_eq!((e.x, e.y), (5.0, 5.0));
        }
        other => panic!("expected embedded vector, got {:?}", other),
    }
}
