use std::rc::Rc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use vellum_core::Rgba;
use vellum_designer::fonts::testing::BoxFace;
use vellum_designer::{
    Document, DocumentSnapshot, EmbeddedVector, EraserStroke, Point, ShapeKind, ShapeStroke,
    Stroke, StrokeId, TextOutline, TextStroke,
};
use vellum_settings::Config;

/// Largest per-channel difference still counted as the same pixel.
const CHANNEL_TOLERANCE: u8 = 48;

fn document(strokes: Vec<Stroke>) -> Document {
    let snapshot = DocumentSnapshot::new(strokes, "#ffffff", true);
    let mut doc = Document::from_snapshot(Config::default(), snapshot).unwrap();
    doc.fonts_mut().insert_face("Box", Rc::new(BoxFace));
    doc
}

fn rect(x: f64, y: f64, w: f64, h: f64, fill: &str, z: i64) -> ShapeStroke {
    let mut s = ShapeStroke::new(ShapeKind::Rect, x, y)
        .with_size(w, h)
        .with_fill(fill);
    s.meta.z = z;
    s
}

fn eraser(points: &[(f64, f64)], size: f64, target: StrokeId, z: i64) -> EraserStroke {
    let mut e = EraserStroke::new(size);
    e.points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    e.target_ids.insert(target);
    e.meta.z = z;
    e
}

/// Render the exported document with resvg.
fn exported_pixels(doc: &Document) -> Pixmap {
    let report = doc.export_svg().unwrap();
    let tree = usvg::Tree::from_str(&report.svg, &usvg::Options::default()).unwrap();
    let mut pixmap = Pixmap::new(report.width, report.height).unwrap();
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    pixmap
}

fn channel_diff(a: u8, b: u8) -> u8 {
    a.abs_diff(b)
}

/// Raster and exported renders agree everywhere except a thin anti-aliased fringe.
fn assert_parity(doc: &mut Document) -> (Pixmap, Pixmap) {
    let exported = exported_pixels(doc);
    let raster = doc.rasterize().unwrap();
    assert_eq!(
        (raster.width(), raster.height()),
        (exported.width(), exported.height())
    );

    let total = raster.pixels().len();
    let differing = raster
        .pixels()
        .iter()
        .zip(exported.pixels())
        .filter(|(a, b)| {
            [
                channel_diff(a.red(), b.red()),
                channel_diff(a.green(), b.green()),
                channel_diff(a.blue(), b.blue()),
                channel_diff(a.alpha(), b.alpha()),
            ]
            .into_iter()
            .any(|d| d > CHANNEL_TOLERANCE)
        })
        .count();
    assert!(
        differing * 100 <= total,
        "{} of {} pixels differ between raster and export",
        differing,
        total
    );
    (raster, exported)
}

fn alpha(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
    pixmap.pixel(x, y).unwrap().alpha()
}

#[test]
fn test_rotated_shapes_match() {
    let mut tilted = rect(0.0, 0.0, 120.0, 40.0, "#ff0000", 1);
    tilted.rotation = 30.0;
    let mut oval = ShapeStroke::new(ShapeKind::Ellipse, 60.0, 50.0)
        .with_size(80.0, 30.0)
        .with_fill("#0000ff");
    oval.rotation = 90.0;
    oval.meta.z = 2;
    let mut doc = document(vec![tilted.into(), oval.into()]);

    assert_parity(&mut doc);
}

#[test]
fn test_eraser_masks_match() {
    let red = rect(0.0, 0.0, 40.0, 40.0, "#ff0000", 1);
    let blue = rect(50.0, 0.0, 40.0, 40.0, "#0000ff", 2);
    let cut = eraser(&[(20.0, 20.0), (45.0, 20.0), (70.0, 20.0)], 10.0, red.meta.id, 3);
    let mut doc = document(vec![red.into(), blue.into(), cut.into()]);

    let (raster, exported) = assert_parity(&mut doc);
    // export offset is (2, 2): half the outline plus the shape margin
    for pixmap in [&raster, &exported] {
        assert_eq!(alpha(pixmap, 22, 22), 0);
        assert_eq!(alpha(pixmap, 72, 22), 255);
    }
}

#[test]
fn test_rotated_stroke_with_eraser_matches() {
    let mut red = rect(10.0, 10.0, 100.0, 50.0, "#ff0000", 1);
    red.rotation = 45.0;
    let cut = eraser(&[(20.0, 35.0), (100.0, 35.0)], 12.0, red.meta.id, 2);
    let mut doc = document(vec![red.into(), cut.into()]);

    assert_parity(&mut doc);
}

#[test]
fn test_erased_background_matches() {
    let red = rect(0.0, 0.0, 60.0, 60.0, "#ff0000", 1);
    let cut = eraser(&[(0.0, 30.0), (60.0, 30.0)], 10.0, red.meta.id, 2);
    let mut doc = document(vec![red.into(), cut.into()]);
    doc.set_background(Rgba::parse("#336699").unwrap(), false);
    doc.config_mut().export.erase_background = true;

    let (raster, exported) = assert_parity(&mut doc);
    for pixmap in [&raster, &exported] {
        assert_eq!(alpha(pixmap, 32, 32), 0);
        assert_eq!(alpha(pixmap, 32, 10), 255);
    }
}

#[test]
fn test_outlined_text_matches() {
    let mut text = TextStroke::new("AV\nA", "Box", 10.0, 100.0).with_size(60.0);
    text.fill = "#00aa00".to_string();
    text.letter_spacing = 4.0;
    text.outline = Some(TextOutline::new("#000000", 4.0));
    text.rotation = 15.0;
    text.meta.z = 1;
    let mut doc = document(vec![text.into()]);

    assert!(doc.export_svg().unwrap().skipped_text.is_empty());
    assert_parity(&mut doc);
}

#[test]
fn test_embedded_artwork_keeps_its_aspect_in_both_outputs() {
    // 2:1 viewBox fitted into a square box: the art fills y 25..75 only
    let markup = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"100\" viewBox=\"0 0 200 100\">\
        <rect width=\"200\" height=\"100\" fill=\"#ff0000\"/></svg>";
    let art = EmbeddedVector::from_markup(markup, 0.0, 0.0).unwrap();
    let mut doc = document(vec![art.into()]);

    let (raster, exported) = assert_parity(&mut doc);
    for pixmap in [&raster, &exported] {
        assert_eq!(alpha(pixmap, 50, 10), 0);
        assert_eq!(alpha(pixmap, 50, 50), 255);
    }
}

#[test]
fn test_scaled_rotated_embedded_artwork_matches() {
    let markup = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"60\" height=\"20\" viewBox=\"10 10 30 30\">\
        <circle cx=\"25\" cy=\"25\" r=\"15\" fill=\"#0000ff\"/></svg>";
    let mut art = EmbeddedVector::from_markup(markup, 5.0, 5.0).unwrap();
    art.scale = 1.5;
    art.rotation = 20.0;
    let mut doc = document(vec![art.into()]);

    assert_parity(&mut doc);
}
