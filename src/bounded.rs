use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::clip::{clip, sort_polygon};
use crate::delaunay;
use crate::diagram::{RawDiagram, VERTEX_AT_INFINITY};
use crate::error::{BoundingError, Result};
use crate::geometry::{
    Point, Polygon, convex_hull, distance_sq, point_in_polygon, polygon_area, segments_cross,
    vertex_centroid,
};
use crate::ray::{DEFAULT_SAFETY_FACTOR, RayExtender};
use crate::store::VertexStore;

/// Margin added around the sites by [`default_bounds`] when no bounds are given.
pub const DEFAULT_MARGIN: f64 = 0.1;

/// Options controlling the bounding pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingOptions {
    /// Treat region vertices lying exactly on the bounds as inside.
    pub check_boundary: bool,
    /// Reorder regions taken over unchanged from the raw diagram by angle around their site.
    /// Clipped regions are always counter-clockwise already.
    pub sort_regions: bool,
    /// Multiplier on the diagram extent used to push rays to infinity. Must be >= 10.
    pub safety_factor: f64,
    /// Distance below which two vertices are considered the same.
    pub dedup_tolerance: f64,
    /// Process sites on the rayon thread pool.
    pub parallel: bool,
}

impl Default for BoundingOptions {
    fn default() -> Self {
        Self {
            check_boundary: true,
            sort_regions: true,
            safety_factor: DEFAULT_SAFETY_FACTOR,
            dedup_tolerance: 1e-9,
            parallel: true,
        }
    }
}

impl BoundingOptions {
    pub fn with_check_boundary(mut self, check_boundary: bool) -> Self {
        self.check_boundary = check_boundary;
        self
    }

    pub fn with_sort_regions(mut self, sort_regions: bool) -> Self {
        self.sort_regions = sort_regions;
        self
    }

    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    pub fn with_dedup_tolerance(mut self, dedup_tolerance: f64) -> Self {
        self.dedup_tolerance = dedup_tolerance;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.safety_factor >= DEFAULT_SAFETY_FACTOR) || !self.safety_factor.is_finite() {
            return Err(BoundingError::Configuration(format!(
                "safety factor must be a finite value >= {}, got {}",
                DEFAULT_SAFETY_FACTOR, self.safety_factor
            )));
        }
        if !(self.dedup_tolerance > 0.0) || !self.dedup_tolerance.is_finite() {
            return Err(BoundingError::Configuration(format!(
                "dedup tolerance must be positive and finite, got {}",
                self.dedup_tolerance
            )));
        }
        Ok(())
    }
}

/// Bounding box of the sites expanded by `margin`, as
/// `(min, min) (min, max) (max, max) (max, min)`.
///
/// # Errors
/// `BoundingError::Configuration` when there are no sites.
pub fn default_bounds(sites: &[Point], margin: f64) -> Result<Polygon> {
    if sites.is_empty() {
        return Err(BoundingError::Configuration("cannot derive bounds without sites".into()));
    }
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in sites {
        for k in 0..2 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    let (x0, y0) = (min[0] - margin, min[1] - margin);
    let (x1, y1) = (max[0] + margin, max[1] + margin);
    Ok(vec![[x0, y0], [x0, y1], [x1, y1], [x1, y0]])
}

fn validate_bounds(bounds: &[Point]) -> Result<()> {
    if bounds.len() < 3 {
        return Err(BoundingError::Configuration(format!(
            "bounds must have at least 3 vertices, got {}",
            bounds.len()
        )));
    }
    if let Some(p) = bounds.iter().find(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(BoundingError::Configuration(format!("bounds vertex {:?} is not finite", p)));
    }
    if polygon_area(bounds) == 0.0 {
        return Err(BoundingError::Configuration("bounds polygon has zero area".into()));
    }
    Ok(())
}

/// A Voronoi diagram whose every region has been clipped to a boundary polygon.
///
/// The vertex list is a superset of the raw diagram's vertices (which keep their
/// indices); vertices created by clipping are appended after them. There is exactly one
/// region per site, and every region index is valid. A region may be empty when its site
/// contributes no area within the bounds.
#[derive(Clone, Debug)]
pub struct BoundedVoronoi {
    sites: Vec<Point>,
    vertices: Vec<Point>,
    regions: Vec<Vec<usize>>,
    bounds: Polygon,
    furthest_site: bool,
    options: BoundingOptions,
}

impl BoundedVoronoi {
    /// Bounds a raw diagram.
    ///
    /// Bounds, options and the diagram are validated, and every site is checked to lie
    /// inside or on the bounds, before any region is computed.
    ///
    /// # Errors
    /// - `Configuration` for malformed bounds or options.
    /// - `InvalidDiagram` if the raw diagram breaks its contract.
    /// - `Domain` for the first site outside the bounds.
    /// - `Geometry` if a ray at infinity cannot be brought back onto the bounds.
    pub fn new(diagram: RawDiagram, bounds: Polygon, options: BoundingOptions) -> Result<Self> {
        validate_bounds(&bounds)?;
        options.validate()?;
        diagram.validate()?;

        for (site, point) in diagram.sites.iter().enumerate() {
            if !point_in_polygon(point, &bounds, true)? {
                return Err(BoundingError::Domain { site, point: *point });
            }
        }

        debug!(
            sites = diagram.sites.len(),
            vertices = diagram.vertices.len(),
            ridges = diagram.ridges.len(),
            furthest_site = diagram.furthest_site,
            "bounding voronoi diagram"
        );

        let ridges_by_site = diagram.ridges_by_site();
        let open_vertices: Vec<Point> = diagram
            .regions
            .iter()
            .filter(|region| region.contains(&VERTEX_AT_INFINITY))
            .flatten()
            .filter(|&&v| v != VERTEX_AT_INFINITY)
            .map(|&v| diagram.vertices[v as usize])
            .collect();
        let extender = RayExtender::new(
            &diagram.sites,
            &open_vertices,
            &bounds,
            diagram.furthest_site,
            options.safety_factor,
        );
        let assembler = Assembler {
            diagram: &diagram,
            bounds: &bounds,
            ridges_by_site: &ridges_by_site,
            extender,
            check_boundary: options.check_boundary,
        };

        let count = diagram.sites.len();
        let outcomes: Vec<Result<Outcome>> = if options.parallel {
            (0..count).into_par_iter().map(|i| assembler.site(i)).collect()
        } else {
            (0..count).map(|i| assembler.site(i)).collect()
        };

        // Store growth happens here, in site order, whatever the pass above did.
        let mut store = VertexStore::with_vertices(&diagram.vertices, options.dedup_tolerance);
        let mut regions = Vec::with_capacity(count);
        let mut kept = Vec::with_capacity(count);
        for (site, outcome) in outcomes.into_iter().enumerate() {
            let (region, is_kept) = match outcome? {
                Outcome::Kept(region) => (close_ring(region), true),
                Outcome::Clipped(polygon) => (close_ring(polygon.iter().map(|p| store.insert(*p)).collect()), false),
            };
            if region.is_empty() {
                // A nearest-site region always has area around a site strictly inside.
                let point = diagram.sites[site];
                if !diagram.furthest_site && point_in_polygon(&point, &bounds, false)? {
                    return Err(BoundingError::Geometry(format!(
                        "region of site {} at ({}, {}) collapsed although the site is inside the bounds",
                        site, point[0], point[1]
                    )));
                }
                warn!(site, "region has no area within the bounds");
            }
            regions.push(region);
            kept.push(is_kept);
        }

        let appended = store.len() - diagram.vertices.len();
        let RawDiagram { sites, furthest_site, .. } = diagram;
        let mut bounded = Self {
            sites,
            vertices: store.into_vertices(),
            regions,
            bounds,
            furthest_site,
            options,
        };
        if options.sort_regions {
            bounded.sort_regions(&kept);
        }

        debug!(regions = bounded.regions.len(), appended, "bounded voronoi diagram");
        Ok(bounded)
    }

    /// Computes the nearest-site diagram of `sites` with the Delaunay backend and bounds it.
    ///
    /// Without `bounds`, the bounding box of the sites expanded by [`DEFAULT_MARGIN`] is used.
    pub fn from_sites(sites: &[Point], bounds: Option<Polygon>, options: BoundingOptions) -> Result<Self> {
        let bounds = match bounds {
            Some(bounds) => bounds,
            None => default_bounds(sites, DEFAULT_MARGIN)?,
        };
        validate_bounds(&bounds)?;
        let diagram = delaunay::voronoi(sites)?;
        Self::new(diagram, bounds, options)
    }

    /// Angular sort of the regions flagged in `kept`. Clipped regions keep the clipper's
    /// winding; sorting them around the site would scramble any region that is not
    /// star-shaped around it, such as one wrapping a concave bounds corner.
    fn sort_regions(&mut self, kept: &[bool]) {
        let tol_sq = self.options.dedup_tolerance * self.options.dedup_tolerance;
        for (site, region) in self.regions.iter_mut().enumerate() {
            if !kept[site] || region.len() < 3 {
                continue;
            }
            let polygon: Vec<Point> = region.iter().map(|&v| self.vertices[v]).collect();
            let site_pos = self.sites[site];
            // In furthest-site mode, or when the site is itself a region vertex, the site
            // does not give a usable angular order.
            let center = if self.furthest_site || polygon.iter().any(|p| distance_sq(p, &site_pos) <= tol_sq) {
                vertex_centroid(&polygon)
            } else {
                site_pos
            };
            let mut keyed: Vec<(f64, usize)> = region
                .iter()
                .zip(&polygon)
                .map(|(&v, p)| ((p[1] - center[1]).atan2(p[0] - center[0]), v))
                .collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            *region = keyed.into_iter().map(|(_, v)| v).collect();
        }
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn regions(&self) -> &[Vec<usize>] {
        &self.regions
    }

    pub fn region(&self, site: usize) -> Option<&[usize]> {
        self.regions.get(site).map(|r| r.as_slice())
    }

    /// Coordinates of the region of `site`.
    pub fn region_polygon(&self, site: usize) -> Option<Polygon> {
        self.region(site).map(|r| r.iter().map(|&v| self.vertices[v]).collect())
    }

    pub fn region_area(&self, site: usize) -> Option<f64> {
        self.region_polygon(site).map(|p| polygon_area(&p))
    }

    /// Sum of all region areas; equals the bounds area up to rounding.
    pub fn total_area(&self) -> f64 {
        (0..self.regions.len()).filter_map(|i| self.region_area(i)).sum()
    }

    pub fn bounds(&self) -> &[Point] {
        &self.bounds
    }

    pub fn count_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn is_furthest_site(&self) -> bool {
        self.furthest_site
    }

    pub fn options(&self) -> &BoundingOptions {
        &self.options
    }

    /// Sites, vertices, regions and bounds, in that order.
    pub fn into_parts(self) -> (Vec<Point>, Vec<Point>, Vec<Vec<usize>>, Polygon) {
        (self.sites, self.vertices, self.regions, self.bounds)
    }
}

/// Result of processing a single site, before touching the vertex store.
enum Outcome {
    /// The raw region already lies within the bounds.
    Kept(Vec<usize>),
    /// Coordinates of the clipped region, still to be resolved to store indices.
    Clipped(Polygon),
}

/// Per-site region reconstruction. Read-only, so sites can be processed in any order.
struct Assembler<'a> {
    diagram: &'a RawDiagram,
    bounds: &'a [Point],
    ridges_by_site: &'a [Vec<usize>],
    extender: RayExtender<'a>,
    check_boundary: bool,
}

impl Assembler<'_> {
    fn site(&self, site: usize) -> Result<Outcome> {
        let raw = &self.diagram.regions[site];
        let finite: Vec<Point> = raw
            .iter()
            .filter(|&&v| v != VERTEX_AT_INFINITY)
            .map(|&v| self.diagram.vertices[v as usize])
            .collect();

        if finite.len() == raw.len() {
            let mut inside = true;
            for v in &finite {
                if !point_in_polygon(v, self.bounds, self.check_boundary)? {
                    inside = false;
                    break;
                }
            }
            // With concave bounds an edge between two inside vertices can still leave them.
            if inside && self.crosses_bounds(&sort_polygon(&finite)) {
                inside = false;
            }
            if inside {
                trace!(site, "finite region inside bounds");
                return Ok(Outcome::Kept(raw.iter().map(|&v| v as usize).collect()));
            }
            trace!(site, "finite region crosses bounds");
            return Ok(Outcome::Clipped(clip(self.bounds, &finite)));
        }

        trace!(site, "unbounded region");
        let working = self.close_region(site, finite)?;
        Ok(Outcome::Clipped(clip(self.bounds, &working)))
    }

    /// Turns an unbounded region into a finite convex polygon that agrees with it
    /// everywhere near the bounds.
    fn close_region(&self, site: usize, mut working: Vec<Point>) -> Result<Polygon> {
        let sites = &self.diagram.sites;
        let p = sites[site];

        for &r in &self.ridges_by_site[site] {
            let ridge = &self.diagram.ridges[r];
            if !ridge.is_unbounded() {
                continue;
            }
            let Some(other) = ridge.other(site) else { continue };
            let q = sites[other];
            let d = self.extender.direction(&p, &q);

            match ridge.vertices {
                [VERTEX_AT_INFINITY, VERTEX_AT_INFINITY] => {
                    // The ridge is the full bisector line.
                    let mid = [(p[0] + q[0]) * 0.5, (p[1] + q[1]) * 0.5];
                    working.push(mid);
                    self.close_ray(&mid, &d, &mut working)?;
                    self.close_ray(&mid, &[-d[0], -d[1]], &mut working)?;
                }
                [VERTEX_AT_INFINITY, v] | [v, VERTEX_AT_INFINITY] => {
                    let anchor = self.diagram.vertices[v as usize];
                    self.close_ray(&anchor, &d, &mut working)?;
                }
                _ => {}
            }
        }

        for corner in self.extender.frame() {
            if self.in_cell(site, &corner) {
                working.push(corner);
            }
        }

        let hull = convex_hull(&working);
        if !self.diagram.furthest_site && (hull.len() < 3 || !point_in_polygon(&p, &hull, true)?) {
            return Err(BoundingError::Geometry(format!(
                "closed region of site {} at ({}, {}) does not contain its site",
                site, p[0], p[1]
            )));
        }
        Ok(hull)
    }

    fn crosses_bounds(&self, polygon: &[Point]) -> bool {
        let n = polygon.len();
        let m = self.bounds.len();
        (0..n).any(|i| {
            let (a, b) = (&polygon[i], &polygon[(i + 1) % n]);
            (0..m).any(|j| segments_cross(a, b, &self.bounds[j], &self.bounds[(j + 1) % m]))
        })
    }

    fn close_ray(&self, anchor: &Point, direction: &Point, working: &mut Vec<Point>) -> Result<()> {
        let far = self.extender.far_along(anchor, direction);
        if point_in_polygon(anchor, self.bounds, true)? {
            let hit = self.extender.extend_along(anchor, direction)?;
            trace!(?anchor, ?hit, "ray leaves bounds");
            working.push(hit);
        } else if point_in_polygon(&far, self.bounds, true)? {
            return Err(BoundingError::Geometry(format!(
                "ray from ({}, {}) still inside the bounds after extension by {}",
                anchor[0],
                anchor[1],
                self.extender.radius()
            )));
        }
        working.push(far);
        Ok(())
    }

    /// Whether `point` belongs to the region of `site`, judged against its ridge neighbours.
    fn in_cell(&self, site: usize, point: &Point) -> bool {
        let sites = &self.diagram.sites;
        let d_site = distance_sq(point, &sites[site]);
        let slack = 1e-12 * d_site.max(1.0);
        self.ridges_by_site[site].iter().all(|&r| {
            let Some(other) = self.diagram.ridges[r].other(site) else { return true };
            let d_other = distance_sq(point, &sites[other]);
            if self.diagram.furthest_site {
                d_site >= d_other - slack
            } else {
                d_site <= d_other + slack
            }
        })
    }
}

/// Collapses repeated consecutive indices; fewer than 3 left means no area.
fn close_ring(mut region: Vec<usize>) -> Vec<usize> {
    region.dedup();
    while region.len() > 1 && region.first() == region.last() {
        region.pop();
    }
    if region.len() < 3 {
        region.clear();
    }
    region
}
