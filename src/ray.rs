use crate::error::{BoundingError, Result};
use crate::geometry::{Point, Polygon, extent, segment_intersection, vertex_centroid};

/// Default multiplier applied to the diagram extent when pushing rays to infinity.
///
/// This is a heuristic sufficiency bound: it holds comfortably for ordinary inputs but
/// is not a proof, and extreme aspect ratios may need a larger value.
pub const DEFAULT_SAFETY_FACTOR: f64 = 10.0;

/// Replaces ridge ends at infinity by finite points.
///
/// A ridge between sites `p` and `q` with an end at infinity runs along the perpendicular
/// bisector of `p q`. Its direction is the unit normal of `q - p`, oriented away from the
/// centroid of all sites (towards it in furthest-site mode), and it is extended by
/// `radius = extent(sites ∪ vertices ∪ bounds) * safety_factor`.
///
/// `vertices` are the finite vertices of unbounded regions. Nearly collinear sites put
/// them far outside the bounds, and the radius has to outgrow them for rays anchored
/// there to come back across the bounds.
#[derive(Clone, Debug)]
pub struct RayExtender<'a> {
    bounds: &'a [Point],
    center: Point,
    radius: f64,
    furthest_site: bool,
}

impl<'a> RayExtender<'a> {
    pub fn new(sites: &[Point], vertices: &[Point], bounds: &'a [Point], furthest_site: bool, safety_factor: f64) -> Self {
        let size = extent(sites.iter().chain(vertices).chain(bounds));
        Self {
            bounds,
            center: vertex_centroid(sites),
            radius: size.max(f64::MIN_POSITIVE) * safety_factor,
            furthest_site,
        }
    }

    /// Distance by which rays are extended.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Centroid of all sites.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Unit direction of the unbounded end of the ridge between `p` and `q`.
    pub fn direction(&self, p: &Point, q: &Point) -> Point {
        let t = [q[0] - p[0], q[1] - p[1]];
        let len = (t[0] * t[0] + t[1] * t[1]).sqrt();
        if len == 0.0 {
            return [0.0, 0.0];
        }
        let n = [-t[1] / len, t[0] / len];

        let mid = [(p[0] + q[0]) * 0.5, (p[1] + q[1]) * 0.5];
        let side = (mid[0] - self.center[0]) * n[0] + (mid[1] - self.center[1]) * n[1];
        let mut sign = if side < 0.0 { -1.0 } else { 1.0 };
        if self.furthest_site {
            sign = -sign;
        }
        [n[0] * sign, n[1] * sign]
    }

    /// Finite stand-in for the end at infinity of a ray starting at `anchor`.
    pub fn far_point(&self, anchor: &Point, p: &Point, q: &Point) -> Point {
        let d = self.direction(p, q);
        self.far_along(anchor, &d)
    }

    pub(crate) fn far_along(&self, anchor: &Point, direction: &Point) -> Point {
        [anchor[0] + direction[0] * self.radius, anchor[1] + direction[1] * self.radius]
    }

    /// Point where the ray from `anchor` first meets the bounds.
    ///
    /// Bounds edges are tested in order and the first one crossed by the segment
    /// `anchor -> far_point` wins.
    ///
    /// # Errors
    /// `BoundingError::Geometry` if no bounds edge is crossed, which means the far point
    /// was not placed far enough or the bounds do not enclose the diagram.
    pub fn extend(&self, anchor: &Point, p: &Point, q: &Point) -> Result<Point> {
        let d = self.direction(p, q);
        self.extend_along(anchor, &d)
    }

    pub(crate) fn extend_along(&self, anchor: &Point, direction: &Point) -> Result<Point> {
        let far = self.far_along(anchor, direction);
        let n = self.bounds.len();
        (0..n)
            .find_map(|i| segment_intersection(anchor, &far, &self.bounds[i], &self.bounds[(i + 1) % n]))
            .ok_or_else(|| {
                BoundingError::Geometry(format!(
                    "ray from ({}, {}) towards ({}, {}) does not reach the bounds",
                    anchor[0], anchor[1], direction[0], direction[1]
                ))
            })
    }

    /// Square of half-size `radius` around the site centroid, counter-clockwise.
    ///
    /// It contains every site, vertex and bounds vertex the extender was built from.
    pub fn frame(&self) -> Polygon {
        let [cx, cy] = self.center;
        let r = self.radius;
        vec![[cx - r, cy - r], [cx + r, cy - r], [cx + r, cy + r], [cx - r, cy + r]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_direction_points_away_from_center() {
        let sites = vec![[0.25, 0.25], [0.75, 0.25], [0.5, 0.75]];
        let bounds = unit_square();
        let ext = RayExtender::new(&sites, &[], &bounds, false, DEFAULT_SAFETY_FACTOR);

        // The hull edge between the two bottom sites opens downwards.
        let d = ext.direction(&sites[0], &sites[1]);
        assert!(d[0].abs() < 1e-12);
        assert!((d[1] + 1.0).abs() < 1e-12);
        // Independent of the order of the two sites.
        assert_eq!(ext.direction(&sites[1], &sites[0]), d);

        let furthest = RayExtender::new(&sites, &[], &bounds, true, DEFAULT_SAFETY_FACTOR);
        let f = furthest.direction(&sites[0], &sites[1]);
        assert!((f[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_far_point_distance() {
        let sites = vec![[0.25, 0.5], [0.75, 0.5]];
        let bounds = unit_square();
        let ext = RayExtender::new(&sites, &[], &bounds, false, DEFAULT_SAFETY_FACTOR);
        assert!((ext.radius() - 2f64.sqrt() * 10.0).abs() < 1e-12);

        let anchor = [0.5, 0.4];
        let far = ext.far_point(&anchor, &sites[0], &sites[1]);
        let dx = far[0] - anchor[0];
        let dy = far[1] - anchor[1];
        assert!(((dx * dx + dy * dy).sqrt() - ext.radius()).abs() < 1e-9);
        assert!(dx.abs() < 1e-12);
    }

    #[test]
    fn test_extend_hits_boundary() {
        let sites = vec![[0.25, 0.25], [0.75, 0.25], [0.5, 0.75]];
        let bounds = unit_square();
        let ext = RayExtender::new(&sites, &[], &bounds, false, DEFAULT_SAFETY_FACTOR);
        let hit = ext.extend(&[0.5, 0.4], &sites[0], &sites[1]).unwrap();
        assert!((hit[0] - 0.5).abs() < 1e-12);
        assert!(hit[1].abs() < 1e-12);
    }

    #[test]
    fn test_extend_misses_boundary() {
        let sites = vec![[0.25, 0.25], [0.75, 0.25], [0.5, 0.75]];
        let bounds = unit_square();
        let ext = RayExtender::new(&sites, &[], &bounds, false, DEFAULT_SAFETY_FACTOR);
        // Starts below the square and heads further down.
        let err = ext.extend(&[0.5, -5.0], &sites[0], &sites[1]).unwrap_err();
        assert!(matches!(err, BoundingError::Geometry(_)));
    }

    #[test]
    fn test_radius_covers_far_vertices() {
        let sites = vec![[0.2, 0.5], [0.5, 0.5001], [0.8, 0.5]];
        let bounds = unit_square();
        let far_vertex = [0.5, -449.5];
        let ext = RayExtender::new(&sites, &[far_vertex], &bounds, false, DEFAULT_SAFETY_FACTOR);
        assert!(ext.radius() > 4500.0);

        // The ray anchored at the far vertex reaches back across the square.
        let hit = ext.extend(&far_vertex, &sites[0], &sites[1]);
        assert!(hit.is_ok());
        let frame = ext.frame();
        assert!(frame[0][1] < far_vertex[1] && frame[2][1] > 1.0);
    }

    #[test]
    fn test_frame() {
        let sites = vec![[0.0, 0.0], [2.0, 0.0]];
        let bounds = vec![[-1.0, -1.0], [3.0, -1.0], [3.0, 1.0], [-1.0, 1.0]];
        let ext = RayExtender::new(&sites, &[], &bounds, false, 10.0);
        let frame = ext.frame();
        let r = ext.radius();
        assert_eq!(frame[0], [1.0 - r, -r]);
        assert_eq!(frame[2], [1.0 + r, r]);
    }
}
