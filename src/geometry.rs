//! Planar geometry primitives shared by the clipper, the ray extender and the assembler.

use crate::error::{BoundingError, Result};

/// A point in the plane as `[x, y]`.
pub type Point = [f64; 2];

/// An implicitly closed polygon; the last vertex connects back to the first.
pub type Polygon = Vec<Point>;

/// Tolerance used by the tolerant segment intersection.
pub const SEGMENT_EPS: f64 = 1e-12;

/// Twice the signed area of the triangle `(a, b, c)`.
/// Positive when `c` lies to the left of the directed line `a -> b`.
#[inline]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Crossing-number test for `point` against `polygon`.
///
/// A horizontal ray is cast towards `+x` and edge crossings are counted with half-open
/// semantics on the edge's y-extent, so a ray through a shared vertex is counted once.
///
/// With `include_boundary`, points lying on an edge (including vertices and the touching
/// edges of a concave or self-touching polygon) are always reported as inside.
///
/// # Errors
/// `BoundingError::Configuration` if the polygon has fewer than 3 vertices.
pub fn point_in_polygon(point: &Point, polygon: &[Point], include_boundary: bool) -> Result<bool> {
    let n = polygon.len();
    if n < 3 {
        return Err(BoundingError::Configuration(format!(
            "polygon must have at least 3 vertices, got {}",
            n
        )));
    }

    let [x, y] = *point;

    if include_boundary && on_boundary(point, polygon) {
        return Ok(true);
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > y) != (yj > y) {
            let x_cross = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    Ok(inside)
}

fn on_boundary(point: &Point, polygon: &[Point]) -> bool {
    let [x, y] = *point;
    let n = polygon.len();
    (0..n).any(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let within = x >= a[0].min(b[0]) && x <= a[0].max(b[0]) && y >= a[1].min(b[1]) && y <= a[1].max(b[1]);
        within && (b[0] - a[0]) * (y - a[1]) == (b[1] - a[1]) * (x - a[0])
    })
}

/// Strict crossing test of segments `p1 p2` and `q1 q2`.
///
/// Only proper crossings count: segments that merely share an endpoint, or overlap
/// collinearly, do not cross.
pub fn segments_cross(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Intersection of the infinite lines `AB` and `CD`.
///
/// Returns `None` when the lines are parallel (zero determinant).
pub fn line_intersect(a: &Point, b: &Point, c: &Point, d: &Point) -> Option<Point> {
    let det = (a[0] - b[0]) * (c[1] - d[1]) - (a[1] - b[1]) * (c[0] - d[0]);
    if det == 0.0 {
        return None;
    }
    let n1 = a[0] * b[1] - a[1] * b[0];
    let n2 = c[0] * d[1] - c[1] * d[0];
    Some([
        (n1 * (c[0] - d[0]) - (a[0] - b[0]) * n2) / det,
        (n1 * (c[1] - d[1]) - (a[1] - b[1]) * n2) / det,
    ])
}

/// Intersection of the closed segments `p1 p2` and `q1 q2`.
///
/// Unlike [`segments_cross`] this accepts segments that touch at an endpoint (within
/// [`SEGMENT_EPS`] in parameter space), which is what a ray hitting a polygon corner needs.
/// Parallel segments yield `None`.
pub fn segment_intersection(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> Option<Point> {
    if segments_cross(p1, p2, q1, q2) {
        return line_intersect(p1, p2, q1, q2);
    }

    let r = [p2[0] - p1[0], p2[1] - p1[1]];
    let s = [q2[0] - q1[0], q2[1] - q1[1]];
    let denom = r[0] * s[1] - r[1] * s[0];
    let scale = (r[0].abs() + r[1].abs()) * (s[0].abs() + s[1].abs());
    if denom.abs() <= SEGMENT_EPS * scale {
        return None;
    }

    let qp = [q1[0] - p1[0], q1[1] - p1[1]];
    let t = (qp[0] * s[1] - qp[1] * s[0]) / denom;
    let u = (qp[0] * r[1] - qp[1] * r[0]) / denom;
    let range = -SEGMENT_EPS..=1.0 + SEGMENT_EPS;
    if range.contains(&t) && range.contains(&u) {
        Some([p1[0] + t * r[0], p1[1] + t * r[1]])
    } else {
        None
    }
}

/// Signed area of a polygon, positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 { return 0.0; }

    let mut area = 0.0;
    for i in 0..n {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[(i + 1) % n];
        area += xi * yj - xj * yi;
    }
    area * 0.5
}

/// Unsigned area of a polygon.
pub fn polygon_area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// Arithmetic mean of the vertices. `[0, 0]` for an empty slice.
pub fn vertex_centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return [0.0, 0.0];
    }
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    let n = points.len() as f64;
    [sx / n, sy / n]
}

/// Diagonal length of the axis-aligned bounding box of all given points.
pub fn extent<'a, I>(points: I) -> f64
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in points {
        for k in 0..2 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    if min[0] > max[0] {
        return 0.0;
    }
    let dx = max[0] - min[0];
    let dy = max[1] - min[1];
    (dx * dx + dy * dy).sqrt()
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, collinear points dropped.
/// Non-finite points are skipped.
pub fn convex_hull(points: &[Point]) -> Polygon {
    let mut pts: Vec<Point> = points.iter().filter(|p| p[0].is_finite() && p[1].is_finite()).copied().collect();
    // All finite, so the lexicographic order is total.
    pts.sort_by(|a, b| {
        a[0].partial_cmp(&b[0])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a[1].partial_cmp(&b[1]).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);
    for p in pts.iter() {
        while hull.len() >= 2 && orientation(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(*p);
    }
    let lower_len = hull.len() + 1;
    for p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && orientation(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();
    hull
}

/// Converts a flat `[x, y, x, y, ...]` slice into points.
///
/// # Errors
/// `BoundingError::Configuration` if the slice length is odd.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<Point>> {
    if flat.len() % 2 != 0 {
        return Err(BoundingError::Configuration(format!(
            "expected 2D coordinates as [x, y, x, y, ...], got {} values",
            flat.len()
        )));
    }
    Ok(flat.chunks_exact(2).map(|c| [c[0], c[1]]).collect())
}

/// Squared euclidean distance.
#[inline]
pub fn distance_sq(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}
