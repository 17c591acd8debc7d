use proptest::prelude::*;
use vellum_core::constants::AA_MARGIN;
use vellum_core::{ExportError, Rgba};
use vellum_designer::{
    export_svg, union_bounds, Document, ExportOptions, FontRegistry, Modifiers, Point, ShapeKind,
    ShapeStroke, Stroke, Tool,
};

fn triangle_doc() -> Document {
    let mut doc = Document::new();
    doc.config_mut().polygon.fill = "#00ff00".to_string();
    doc.set_tool(Tool::Polygon);
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (50.0, 80.0), (0.0, 0.0)] {
        doc.pointer_down(Point::new(x, y), Modifiers::NONE);
    }
    doc
}

#[test]
fn test_polygon_document_export() {
    let doc = triangle_doc();
    let report = doc.export_svg().unwrap();

    assert_eq!((report.width, report.height), (102, 82));
    assert!(report.svg.starts_with("<svg"));
    assert!(report.svg.contains("viewBox=\"0 0 102 82\""));
    assert!(report
        .svg
        .contains("<polygon points=\"1,1 101,1 51,81\" fill=\"#00ff00\""));
    assert!(report.skipped_text.is_empty());
}

#[test]
fn test_raster_covers_the_exported_area() {
    let mut doc = triangle_doc();
    let report = doc.export_svg().unwrap();
    let pixmap = doc.rasterize().unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (report.width, report.height));

    // interior of the triangle, shifted by the export offset
    let px = pixmap.pixel(51, 30).unwrap();
    assert_eq!((px.red(), px.green(), px.alpha()), (0, 255, 255));
}

#[test]
fn test_empty_document_has_nothing_to_export() {
    let mut doc = Document::new();
    assert!(matches!(doc.export_svg(), Err(ExportError::NothingToExport)));
    assert!(matches!(doc.rasterize(), Err(ExportError::NothingToExport)));
}

#[test]
fn test_opaque_background_is_written() {
    let mut doc = triangle_doc();
    doc.set_background(Rgba::parse("#336699").unwrap(), false);
    let svg = doc.export_svg().unwrap().svg;
    assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"102\" height=\"82\" fill=\"#336699\""));

    doc.set_background(Rgba::parse("#336699").unwrap(), true);
    assert!(!doc.export_svg().unwrap().svg.contains("#336699"));
}

#[test]
fn test_hidden_strokes_are_left_out() {
    let mut doc = triangle_doc();
    doc.set_tool(Tool::Shape);
    doc.config_mut().shape.fill = "#abcdef".to_string();
    let id = doc.pointer_down(Point::new(200.0, 200.0), Modifiers::NONE).unwrap();
    doc.pointer_move(Point::new(240.0, 220.0), Modifiers::NONE);
    doc.pointer_up();
    assert!(doc.export_svg().unwrap().svg.contains("#abcdef"));

    doc.toggle_visible(id).unwrap();
    let report = doc.export_svg().unwrap();
    assert!(!report.svg.contains("#abcdef"));
    assert_eq!((report.width, report.height), (102, 82));
}

fn shapes() -> impl Strategy<Value = Vec<Stroke>> {
    let one = (
        -300.0f64..300.0,
        -300.0f64..300.0,
        -150.0f64..150.0,
        -150.0f64..150.0,
        0.0f64..8.0,
        0.0f64..360.0,
    )
        .prop_map(|(x, y, w, h, sw, rot)| {
            let mut s = ShapeStroke::new(ShapeKind::Rect, x, y).with_size(w, h);
            s.stroke_width = sw;
            s.rotation = rot;
            Stroke::from(s)
        });
    prop::collection::vec(one, 1..6)
}

proptest! {
    #[test]
    fn prop_export_size_is_ceiled_union(strokes in shapes()) {
        let fonts = FontRegistry::new();
        let union = union_bounds(strokes.iter(), &fonts, AA_MARGIN).unwrap();
        let report = export_svg(strokes.iter(), &fonts, &ExportOptions::default()).unwrap();
        prop_assert_eq!(report.width, union.w.ceil().max(1.0) as u32);
        prop_assert_eq!(report.height, union.h.ceil().max(1.0) as u32);
        prop_assert_eq!(report.bounds, union);
    }
}
