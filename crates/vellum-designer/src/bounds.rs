//! Local bounding boxes.
//!
//! Every box is axis-aligned in the stroke's own unrotated frame. The
//! stroke's rotation is applied about the center of this box, so the box is
//! also what fixes the pivot for rendering, hit-testing and export.

use crate::fonts::FontRegistry;
use crate::model::{ShapeKind, Stroke};
use crate::text_layout::layout_with;
use vellum_core::{Extent, Point, Rect};

/// Local box of `stroke`, padded by half its line width where relevant.
///
/// Returns [`Extent::Pending`] for text whose font is unresolved and
/// [`Extent::Empty`] for strokes without drawable geometry.
pub fn local_bounds(stroke: &Stroke, fonts: &FontRegistry) -> Extent {
    match stroke {
        Stroke::Pen(s) => padded_points(&s.points, s.size / 2.0),
        Stroke::Eraser(s) => padded_points(&s.points, s.size / 2.0),
        Stroke::Polygon(s) => padded_points(&s.points, s.stroke_width / 2.0),
        Stroke::Shape(s) => match s.kind {
            ShapeKind::Rect | ShapeKind::Ellipse => Extent::Known(s.normalized_box()),
            ShapeKind::Line => {
                let a = Point::new(s.x, s.y);
                let b = Point::new(s.x + s.w, s.y + s.h);
                Extent::Known(Rect::from_corners(a, b).inflate(s.stroke_width / 2.0))
            }
        },
        Stroke::Embedded(s) => Extent::Known(s.placed_box()),
        Stroke::Text(t) => match layout_with(t, fonts) {
            None => Extent::Pending,
            Some(layout) => match layout.ink {
                Some(ink) => Extent::Known(ink.inflate(t.outline_width() / 2.0)),
                None => Extent::Empty,
            },
        },
    }
}

fn padded_points(points: &[Point], pad: f64) -> Extent {
    match Rect::from_points(points) {
        Some(r) => Extent::Known(r.inflate(pad)),
        None => Extent::Empty,
    }
}

/// Pivot for the stroke's rotation: the center of its local box.
pub fn rotation_center(stroke: &Stroke, fonts: &FontRegistry) -> Option<Point> {
    local_bounds(stroke, fonts).known().map(|b| b.center())
}

/// Corners of the local box as drawn, rotated with the stroke (nw, ne, se, sw).
pub fn selection_frame(stroke: &Stroke, fonts: &FontRegistry) -> Option<[Point; 4]> {
    let b = local_bounds(stroke, fonts).known()?;
    let c = b.center();
    Some(
        b.corners()
            .map(|p| vellum_core::rotate_point(p, c, stroke.rotation())),
    )
}

/// Local box plus the padding the exporter needs to avoid clipping strokes.
///
/// Shapes gain half their stroke width (rect and ellipse) and `margin`.
pub fn export_box(stroke: &Stroke, fonts: &FontRegistry, margin: f64) -> Extent {
    let local = local_bounds(stroke, fonts);
    match (stroke, local) {
        (Stroke::Shape(s), Extent::Known(b)) => {
            let pad = match s.kind {
                ShapeKind::Line => margin,
                ShapeKind::Rect | ShapeKind::Ellipse => s.stroke_width / 2.0 + margin,
            };
            Extent::Known(b.inflate(pad))
        }
        _ => local,
    }
}

/// Union of the rotated export boxes of all visible, non-eraser strokes.
///
/// Text with an unresolved font does not contribute. `None` when nothing
/// has finite bounds.
pub fn union_bounds<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    fonts: &FontRegistry,
    margin: f64,
) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for stroke in strokes {
        if !stroke.is_visible() || stroke.is_eraser() {
            continue;
        }
        let Some(local) = local_bounds(stroke, fonts).known() else {
            continue;
        };
        let Some(padded) = export_box(stroke, fonts, margin).known() else {
            continue;
        };
        // Rotate about the local box center, not the padded one's.
        let rotated = rotate_box_about(padded, local.center(), stroke.rotation());
        if !rotated.is_finite() {
            continue;
        }
        acc = Some(acc.map_or(rotated, |a| a.union(&rotated)));
    }
    acc
}

fn rotate_box_about(b: Rect, center: Point, angle: f64) -> Rect {
    if angle == 0.0 {
        return b;
    }
    let corners = b
        .corners()
        .map(|p| vellum_core::rotate_point(p, center, angle));
    Rect::from_points(corners.iter()).unwrap_or(b)
}
