//! Sutherland–Hodgman polygon clipping.
//!
//! Both polygons are first brought into counter-clockwise order by sorting their vertices
//! by angle around their own vertex centroid. Raw Voronoi cell vertices arrive in no
//! particular order, and the half-plane test below assumes a fixed winding.

use crate::geometry::{Point, Polygon, orientation, vertex_centroid};

/// Smallest denominator magnitude used when intersecting an edge with a clip line.
/// Smaller values are floored (keeping their sign) instead of dividing by ~0.
pub const DENOMINATOR_FLOOR: f64 = 1e-12;

/// Returns the vertices sorted counter-clockwise by `atan2` around their vertex centroid.
///
/// The sort is stable, so vertices at identical angles keep their input order.
pub fn sort_polygon(polygon: &[Point]) -> Polygon {
    let center = vertex_centroid(polygon);
    sort_around(polygon, &center)
}

/// Returns the vertices sorted counter-clockwise by `atan2` around `center`.
pub fn sort_around(polygon: &[Point], center: &Point) -> Polygon {
    let mut keyed: Vec<(f64, Point)> = polygon
        .iter()
        .map(|p| ((p[1] - center[1]).atan2(p[0] - center[0]), *p))
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Intersection of `subject` and `boundary`.
///
/// The subject is clipped sequentially by the inner half-plane of every boundary edge.
/// The boundary should be convex; the subject may be concave as long as it is star-shaped
/// around its vertex centroid (the angular normalization would scramble it otherwise).
///
/// Returns an empty polygon when the two do not overlap in a region of positive extent.
pub fn clip(subject: &[Point], boundary: &[Point]) -> Polygon {
    if subject.len() < 3 || boundary.len() < 3 {
        return Vec::new();
    }

    let mut output = sort_polygon(subject);
    let boundary = sort_polygon(boundary);
    let mut input = Vec::with_capacity(output.len() * 2);

    let n = boundary.len();
    for i in 0..n {
        let a = boundary[i];
        let b = boundary[(i + 1) % n];
        if a == b {
            continue;
        }

        std::mem::swap(&mut input, &mut output);
        output.clear();

        let Some(&last) = input.last() else { break };
        let mut s = last;
        let mut s_inside = inside(&s, &a, &b);
        for &e in &input {
            let e_inside = inside(&e, &a, &b);
            if e_inside {
                if !s_inside {
                    output.push(intersection(&s, &e, &a, &b));
                }
                output.push(e);
            } else if s_inside {
                output.push(intersection(&s, &e, &a, &b));
            }
            s = e;
            s_inside = e_inside;
        }

        if output.is_empty() {
            return Vec::new();
        }
    }

    dedup_ring(&mut output);
    if output.len() < 3 {
        output.clear();
    }
    output
}

#[inline]
fn inside(p: &Point, a: &Point, b: &Point) -> bool {
    orientation(a, b, p) >= 0.0
}

/// Intersection of segment `s -> e` with the line through `a` and `b`.
fn intersection(s: &Point, e: &Point, a: &Point, b: &Point) -> Point {
    let d = [e[0] - s[0], e[1] - s[1]];
    let edge = [b[0] - a[0], b[1] - a[1]];
    let mut denom = d[0] * edge[1] - d[1] * edge[0];
    if denom.abs() < DENOMINATOR_FLOOR {
        denom = if denom < 0.0 { -DENOMINATOR_FLOOR } else { DENOMINATOR_FLOOR };
    }
    let t = ((a[0] - s[0]) * edge[1] - (a[1] - s[1]) * edge[0]) / denom;
    let t = t.clamp(0.0, 1.0);
    [s[0] + t * d[0], s[1] + t * d[1]]
}

/// Removes consecutive duplicates, including the one closing the ring.
fn dedup_ring(polygon: &mut Polygon) {
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
}
