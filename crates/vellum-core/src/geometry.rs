//! Document-space geometry primitives.
//!
//! Coordinates are `f64` in a y-down document space. Positive rotation
//! angles are in degrees and turn clockwise on screen, matching both the
//! raster canvas and the SVG `rotate()` transform.

use serde::{Deserialize, Serialize};

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Gap markers compare equal to each other.
impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.is_gap() && other.is_gap()) || (self.x == other.x && self.y == other.y)
    }
}

impl Point {
    /// Sub-path separator inside a freehand polyline.
    pub const GAP: Point = Point {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True for the [`Point::GAP`] marker (any non-finite coordinate).
    pub fn is_gap(&self) -> bool {
        !self.is_finite()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Build from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Bounding box of the finite points, `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if min_x.is_finite() {
            Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
        } else {
            None
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Corners in nw, ne, se, sw order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x, self.max_y()),
        ]
    }

    /// Grow by `pad` on every side.
    pub fn inflate(&self, pad: f64) -> Rect {
        Rect::new(
            self.x - pad,
            self.y - pad,
            self.w + 2.0 * pad,
            self.h + 2.0 * pad,
        )
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(x, y, max_x - x, max_y - y)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Axis-aligned box enclosing this rectangle rotated about its center.
    pub fn rotated_aabb(&self, angle_deg: f64) -> Rect {
        if angle_deg == 0.0 {
            return *self;
        }
        let c = self.center();
        let corners = self.corners().map(|p| rotate_point(p, c, angle_deg));
        Rect::from_points(corners.iter()).unwrap_or(*self)
    }
}

/// Outcome of a total geometry query.
///
/// `Pending` and `Empty` are ordinary states: text waiting for its font,
/// or a stroke with no drawable points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Known(Rect),
    Pending,
    Empty,
}

impl Extent {
    pub fn known(self) -> Option<Rect> {
        match self {
            Extent::Known(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Extent::Pending)
    }
}

/// Rotate `p` about `center` by `angle_deg` (clockwise on a y-down canvas).
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg == 0.0 {
        return p;
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Map a document point into the unrotated local frame of a stroke.
pub fn unrotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    rotate_point(p, center, -angle_deg)
}

/// Perpendicular distance from `p` to the segment `a`-`b`.
pub fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let len2 = vx * vx + vy * vy;
    if len2 == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * vx, a.y + t * vy))
}

/// Even-odd ray casting test against a closed vertex ring.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let cross_x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Serde helpers for polylines containing [`Point::GAP`] markers.
///
/// Gaps are written as `null` so the document stays valid JSON.
pub mod serde_points {
    use super::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point], s: S) -> Result<S::Ok, S::Error> {
        let items: Vec<Option<&Point>> = points
            .iter()
            .map(|p| if p.is_gap() { None } else { Some(p) })
            .collect();
        items.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point>, D::Error> {
        let items = Vec::<Option<Point>>::deserialize(d)?;
        Ok(items.into_iter().map(|p| p.unwrap_or(Point::GAP)).collect())
    }
}
