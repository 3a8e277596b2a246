//! Geometry kernel: integer vertices, axis-aligned bounds and the exact
//! predicates used for hit-testing and snapping.
//!
//! Model space uses integer inch units. Predicates take `kurbo::Point` so
//! they work on integer or fractional coordinates alike; all products stay
//! exactly representable in `f64` for magnitudes well past 10^6.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An integer-valued point in model space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i64,
    pub y: i64,
}

impl Vertex {
    pub const ORIGIN: Vertex = Vertex { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Round a fractional point to the nearest vertex.
    pub fn round(point: Point) -> Self {
        Self::new(point.x.round() as i64, point.y.round() as i64)
    }

    /// Truncate a fractional point toward zero.
    pub fn trunc(point: Point) -> Self {
        Self::new(point.x.trunc() as i64, point.y.trunc() as i64)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// Translate by an integer delta.
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<Vertex> for Point {
    fn from(v: Vertex) -> Self {
        v.to_point()
    }
}

impl From<(i64, i64)> for Vertex {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned integer rectangle (top-left corner plus size).
///
/// Width and height are non-negative for every rectangle produced by the
/// editor; [`Bounds::from_corners`] normalizes arbitrary corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Bounds {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Vertex, b: Vertex) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    pub fn top_left(&self) -> Vertex {
        Vertex::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Vertex {
        Vertex::new(self.x + self.w, self.y)
    }

    pub fn bottom_left(&self) -> Vertex {
        Vertex::new(self.x, self.y + self.h)
    }

    pub fn bottom_right(&self) -> Vertex {
        Vertex::new(self.x + self.w, self.y + self.h)
    }

    /// True when both width and height are non-zero.
    pub fn has_area(&self) -> bool {
        self.w != 0 && self.h != 0
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x as f64
            && p.x <= (self.x + self.w) as f64
            && p.y >= self.y as f64
            && p.y <= (self.y + self.h) as f64
    }

    /// Positive-area overlap. Rectangles that only share an edge do not
    /// overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            (self.x + self.w) as f64,
            (self.y + self.h) as f64,
        )
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Orientation test: true when `a`, `b`, `c` wind counter-clockwise in a
/// y-down coordinate system.
pub fn ccw(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Whether segment `p1-p2` properly crosses segment `p3-p4`.
///
/// Collinear overlap is not an intersection; touching at an endpoint of one
/// segment in the interior of the other is.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

/// Intersection point of the infinite lines through `p1-p2` and `p3-p4`.
///
/// Returns `None` when the lines are parallel or collinear.
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let a1 = p2.y - p1.y;
    let b1 = p1.x - p2.x;
    let c1 = a1 * p1.x + b1 * p1.y;

    let a2 = p4.y - p3.y;
    let b2 = p3.x - p4.x;
    let c2 = a2 * p3.x + b2 * p3.y;

    let det = a1 * b2 - a2 * b1;
    if det == 0.0 {
        return None;
    }

    Some(Point::new(
        (b2 * c1 - b1 * c2) / det,
        (a1 * c2 - a2 * c1) / det,
    ))
}

/// Whether `point` lies on segment `start-end`, comparing truncated
/// distances so integer pointers hit lines that pass between lattice points.
pub fn point_on_segment(point: Point, start: Point, end: Point) -> bool {
    let to_start = distance(start, point).trunc();
    let to_end = distance(end, point).trunc();
    to_start + to_end == distance(start, end).trunc()
}

/// Whether segment `start-end` crosses any of the four edges of `rect`.
pub fn rect_intersects_segment(rect: &Bounds, start: Point, end: Point) -> bool {
    let tl = rect.top_left().to_point();
    let tr = rect.top_right().to_point();
    let bl = rect.bottom_left().to_point();
    let br = rect.bottom_right().to_point();

    let edges = [(tl, bl), (tr, br), (tl, tr), (bl, br)];
    edges
        .iter()
        .any(|&(a, b)| segments_intersect(a, b, start, end))
}
