//! Translate, resize and rotate as pure stroke transitions.
//!
//! Every function takes the stroke by reference and returns the new value;
//! callers decide whether to commit it. Locking is enforced by the document,
//! not here.

use crate::bounds::local_bounds;
use crate::fonts::FontRegistry;
use crate::model::{ShapeKind, Stroke};
use vellum_core::constants::{MIN_FONT_SIZE, MIN_RESIZE_EXTENT, MIN_SCALE_FACTOR};
use vellum_core::{unrotate_point, Point, Rect};

pub use crate::bounds::rotation_center;

/// Corner handle of a selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    /// Corner of `b` this handle sits on.
    pub fn corner(self, b: &Rect) -> Point {
        match self {
            Handle::Nw => Point::new(b.x, b.y),
            Handle::Ne => Point::new(b.max_x(), b.y),
            Handle::Sw => Point::new(b.x, b.max_y()),
            Handle::Se => Point::new(b.max_x(), b.max_y()),
        }
    }

    pub fn opposite(self) -> Handle {
        match self {
            Handle::Nw => Handle::Se,
            Handle::Ne => Handle::Sw,
            Handle::Sw => Handle::Ne,
            Handle::Se => Handle::Nw,
        }
    }

    /// Fixed corner while this handle is dragged.
    pub fn anchor(self, b: &Rect) -> Point {
        self.opposite().corner(b)
    }

    /// Top-left of a `w` x `h` box whose anchor corner sits on `anchor`.
    fn place(self, anchor: Point, w: f64, h: f64) -> Point {
        match self {
            Handle::Nw => Point::new(anchor.x - w, anchor.y - h),
            Handle::Ne => Point::new(anchor.x, anchor.y - h),
            Handle::Sw => Point::new(anchor.x - w, anchor.y),
            Handle::Se => anchor,
        }
    }
}

/// Shift a stroke by `(dx, dy)`.
pub fn translate(stroke: &Stroke, dx: f64, dy: f64) -> Stroke {
    let mut out = stroke.clone();
    if dx == 0.0 && dy == 0.0 {
        return out;
    }
    match &mut out {
        Stroke::Pen(s) => shift_points(&mut s.points, dx, dy),
        Stroke::Eraser(s) => shift_points(&mut s.points, dx, dy),
        Stroke::Polygon(s) => shift_points(&mut s.points, dx, dy),
        Stroke::Text(s) => {
            s.x += dx;
            s.y += dy;
        }
        Stroke::Embedded(s) => {
            s.x += dx;
            s.y += dy;
        }
        Stroke::Shape(s) => {
            s.x += dx;
            s.y += dy;
        }
    }
    out
}

fn shift_points(points: &mut [Point], dx: f64, dy: f64) {
    for p in points.iter_mut().filter(|p| !p.is_gap()) {
        *p = p.offset(dx, dy);
    }
}

/// Input of a corner-handle resize.
#[derive(Debug, Clone, Copy)]
pub struct ResizeRequest<'a> {
    pub handle: Handle,
    /// Pointer in document space
    pub pointer: Point,
    /// Local box of `start` when the drag began
    pub start_bounds: Rect,
    /// Stroke as it was when the drag began
    pub start: &'a Stroke,
    /// Force a square rect or ellipse
    pub keep_square: bool,
}

impl ResizeRequest<'_> {
    /// Pointer mapped into the stroke's unrotated frame.
    fn local_pointer(&self) -> Point {
        unrotate_point(
            self.pointer,
            self.start_bounds.center(),
            self.start.rotation(),
        )
    }

    /// Requested extents measured from the anchor, clamped to the minimum.
    fn extents(&self) -> (Point, f64, f64) {
        let anchor = self.handle.anchor(&self.start_bounds);
        let p = self.local_pointer();
        let w = (p.x - anchor.x).abs().max(MIN_RESIZE_EXTENT);
        let h = (p.y - anchor.y).abs().max(MIN_RESIZE_EXTENT);
        (anchor, w, h)
    }

    /// Uniform factor fitting the start box into the requested extents.
    fn factor(&self, w: f64, h: f64) -> f64 {
        let bw = self.start_bounds.w.max(MIN_RESIZE_EXTENT);
        let bh = self.start_bounds.h.max(MIN_RESIZE_EXTENT);
        (w / bw).min(h / bh).max(MIN_SCALE_FACTOR)
    }
}

/// Resize `req.start` so the corner opposite `req.handle` stays fixed.
///
/// Rects and ellipses follow the pointer freely (or squarely with
/// `keep_square`). Lines map their endpoints into the new box. Everything
/// else scales uniformly: point sets about the anchor, embedded vectors by
/// their scale factor, text by font size followed by a re-anchoring
/// translation computed from the laid-out box at the new size.
///
/// The anchor is fixed in the stroke's local frame. A rotated stroke keeps
/// its angle but pivots about the center of the resized box, so on screen
/// its anchor corner shifts by the change in pivot.
pub fn resize(req: &ResizeRequest<'_>, fonts: &FontRegistry) -> Stroke {
    let (anchor, w, h) = req.extents();
    let f = req.factor(w, h);
    let mut out = req.start.clone();

    match &mut out {
        Stroke::Shape(s) => match s.kind {
            ShapeKind::Rect | ShapeKind::Ellipse => {
                let (w, h) = if req.keep_square {
                    let m = w.min(h);
                    (m, m)
                } else {
                    (w, h)
                };
                let origin = req.handle.place(anchor, w, h);
                // Keep the drag direction the shape was created with.
                if s.w < 0.0 {
                    s.x = origin.x + w;
                    s.w = -w;
                } else {
                    s.x = origin.x;
                    s.w = w;
                }
                if s.h < 0.0 {
                    s.y = origin.y + h;
                    s.h = -h;
                } else {
                    s.y = origin.y;
                    s.h = h;
                }
            }
            ShapeKind::Line => {
                let sx = w / req.start_bounds.w.max(MIN_RESIZE_EXTENT);
                let sy = h / req.start_bounds.h.max(MIN_RESIZE_EXTENT);
                let a = scale_about(Point::new(s.x, s.y), anchor, sx, sy);
                let b = scale_about(Point::new(s.x + s.w, s.y + s.h), anchor, sx, sy);
                s.x = a.x;
                s.y = a.y;
                s.w = b.x - a.x;
                s.h = b.y - a.y;
            }
        },
        Stroke::Embedded(s) => {
            s.scale = (s.scale * f).max(MIN_SCALE_FACTOR);
            let origin = req.handle.place(anchor, s.iw * s.scale, s.ih * s.scale);
            s.x = origin.x;
            s.y = origin.y;
        }
        Stroke::Text(t) => {
            t.size = (t.size * f).max(MIN_FONT_SIZE);
            let scaled: Stroke = t.clone().into();
            // Size is not linear in the laid-out box, so re-anchor from the
            // box actually produced at the new size.
            if let Some(b) = local_bounds(&scaled, fonts).known() {
                let corner = req.handle.opposite().corner(&b);
                t.x += anchor.x - corner.x;
                t.y += anchor.y - corner.y;
            }
        }
        Stroke::Pen(s) => scale_points(&mut s.points, anchor, f),
        Stroke::Eraser(s) => scale_points(&mut s.points, anchor, f),
        Stroke::Polygon(s) => scale_points(&mut s.points, anchor, f),
    }
    out
}

fn scale_about(p: Point, anchor: Point, sx: f64, sy: f64) -> Point {
    Point::new(anchor.x + (p.x - anchor.x) * sx, anchor.y + (p.y - anchor.y) * sy)
}

fn scale_points(points: &mut [Point], anchor: Point, f: f64) {
    for p in points.iter_mut().filter(|p| !p.is_gap()) {
        *p = scale_about(*p, anchor, f, f);
    }
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d.is_finite() {
        d
    } else {
        0.0
    }
}

/// Set the stored rotation. Strokes without a rotation come back unchanged.
pub fn rotate_to(stroke: &Stroke, degrees: f64) -> Stroke {
    let mut out = stroke.clone();
    out.set_rotation(normalize_degrees(degrees));
    out
}

/// Add `delta` degrees to the stored rotation.
pub fn rotate_by(stroke: &Stroke, delta: f64) -> Stroke {
    rotate_to(stroke, stroke.rotation() + delta)
}

/// Angle in degrees from `center` to `pointer`, for rotation drags.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}
