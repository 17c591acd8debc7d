//! Point queries against the stroke stack.

use crate::bounds::local_bounds;
use crate::fonts::FontRegistry;
use crate::model::{ShapeKind, ShapeStroke, Stroke, StrokeId};
use crate::text_layout::layout_with;
use crate::transform::Handle;
use lyon::algorithms::hit_test::hit_test_path;
use lyon::path::FillRule;
use vellum_core::constants::{HANDLE_SIZE, HIT_TOLERANCE, MIN_POLYGON_HIT_TOLERANCE};
use vellum_core::{dist_to_segment, point_in_polygon, unrotate_point, Point, Rect};

/// Topmost visible, non-eraser stroke containing `point`.
pub fn hit_test<'a>(
    point: Point,
    strokes: impl IntoIterator<Item = &'a Stroke>,
    fonts: &FontRegistry,
) -> Option<StrokeId> {
    let mut candidates: Vec<&Stroke> = strokes
        .into_iter()
        .filter(|s| s.is_visible() && !s.is_eraser())
        .collect();
    candidates.sort_by(|a, b| b.z().cmp(&a.z()));
    candidates
        .into_iter()
        .find(|s| contains(s, point, fonts))
        .map(|s| s.id())
}

/// Whether `point` (document space) touches the stroke's geometry.
pub fn contains(stroke: &Stroke, point: Point, fonts: &FontRegistry) -> bool {
    let p = to_local(stroke, point, fonts);
    match stroke {
        Stroke::Pen(s) => near_polyline(p, &s.points, s.size / 2.0 + HIT_TOLERANCE),
        Stroke::Eraser(s) => near_polyline(p, &s.points, s.size / 2.0 + HIT_TOLERANCE),
        Stroke::Shape(s) => shape_contains(s, p),
        Stroke::Polygon(s) => {
            let vertices: Vec<Point> = s.points.iter().copied().filter(Point::is_finite).collect();
            if vertices.len() < 2 {
                return false;
            }
            let tol = (s.stroke_width / 2.0 + HIT_TOLERANCE).max(MIN_POLYGON_HIT_TOLERANCE);
            let near_edge = vertices
                .windows(2)
                .any(|w| dist_to_segment(p, w[0], w[1]) <= tol);
            let near_closing = s.closed
                && dist_to_segment(p, vertices[vertices.len() - 1], vertices[0]) <= tol;
            near_edge || near_closing || (s.is_filled() && point_in_polygon(p, &vertices))
        }
        Stroke::Text(t) => {
            let Some(layout) = layout_with(t, fonts) else {
                return false;
            };
            let at = lyon::math::point(p.x as f32, p.y as f32);
            let inked = layout.inked().any(|g| {
                g.bounds.is_some_and(|b| b.contains(p))
                    && hit_test_path(&at, g.path.iter(), FillRule::NonZero, 0.1)
            });
            inked
        }
        Stroke::Embedded(s) => s.placed_box().contains(p),
    }
}

/// Map `point` into the stroke's unrotated frame.
fn to_local(stroke: &Stroke, point: Point, fonts: &FontRegistry) -> Point {
    let angle = stroke.rotation();
    if angle == 0.0 {
        return point;
    }
    match local_bounds(stroke, fonts).known() {
        Some(b) => unrotate_point(point, b.center(), angle),
        None => point,
    }
}

fn near_polyline(p: Point, points: &[Point], tol: f64) -> bool {
    let mut prev: Option<Point> = None;
    for q in points {
        if q.is_gap() {
            prev = None;
            continue;
        }
        let hit = match prev {
            Some(a) => dist_to_segment(p, a, *q) <= tol,
            None => p.distance_to(q) <= tol,
        };
        if hit {
            return true;
        }
        prev = Some(*q);
    }
    false
}

fn shape_contains(s: &ShapeStroke, p: Point) -> bool {
    let tol = s.stroke_width / 2.0 + HIT_TOLERANCE;
    match s.kind {
        ShapeKind::Rect => {
            let b = s.normalized_box();
            if s.has_fill() && b.contains(p) {
                return true;
            }
            let c = b.corners();
            (0..4).any(|i| dist_to_segment(p, c[i], c[(i + 1) % 4]) <= tol)
        }
        ShapeKind::Ellipse => {
            let b = s.normalized_box();
            let c = b.center();
            let (rx, ry) = (b.w / 2.0, b.h / 2.0);
            let (dx, dy) = (p.x - c.x, p.y - c.y);
            let within = |ax: f64, ay: f64| (dx / ax).powi(2) + (dy / ay).powi(2) <= 1.0;
            if s.has_fill() && rx > 0.0 && ry > 0.0 && within(rx, ry) {
                return true;
            }
            let outer = within(rx + tol, ry + tol);
            let inner = rx > tol && ry > tol && within(rx - tol, ry - tol);
            outer && !inner
        }
        ShapeKind::Line => {
            let a = Point::new(s.x, s.y);
            let b = Point::new(s.x + s.w, s.y + s.h);
            dist_to_segment(p, a, b) <= tol
        }
    }
}

/// Square of side [`HANDLE_SIZE`] centered on a corner.
pub fn handle_rect(corner: Point) -> Rect {
    let half = HANDLE_SIZE / 2.0;
    Rect::new(corner.x - half, corner.y - half, HANDLE_SIZE, HANDLE_SIZE)
}

/// Corner handle of `stroke`'s selection frame under `point`, if any.
pub fn hit_handle(point: Point, stroke: &Stroke, fonts: &FontRegistry) -> Option<Handle> {
    let b = local_bounds(stroke, fonts).known()?;
    let p = unrotate_point(point, b.center(), stroke.rotation());
    Handle::ALL
        .into_iter()
        .find(|h| handle_rect(h.corner(&b)).contains(p))
}
