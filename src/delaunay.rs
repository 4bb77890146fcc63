//! Raw (unbounded) Voronoi diagrams computed as the dual of a Delaunay triangulation.
//!
//! This is one possible producer of a [`RawDiagram`]; the bounding pass does not depend
//! on it and accepts diagrams from any other source.

use delaunator::{EMPTY, next_halfedge, triangulate};

use crate::diagram::{RawDiagram, Ridge, VERTEX_AT_INFINITY};
use crate::error::{BoundingError, Result};
use crate::geometry::Point;

/// Nearest-site Voronoi diagram of `sites`.
///
/// Voronoi vertices are the circumcenters of the Delaunay triangles, in triangle order.
/// Every Delaunay edge becomes a ridge; hull edges have one end at infinity. Fewer than
/// three sites, or sites on a common line, give parallel ridges that are unbounded at both
/// ends.
///
/// # Errors
/// `BoundingError::Configuration` if two sites coincide.
pub fn voronoi(sites: &[Point]) -> Result<RawDiagram> {
    let points: Vec<delaunator::Point> = sites.iter().map(|p| delaunator::Point { x: p[0], y: p[1] }).collect();
    let triangulation = triangulate(&points);

    if triangulation.triangles.is_empty() {
        return collinear(sites);
    }

    let triangles = &triangulation.triangles;
    let halfedges = &triangulation.halfedges;
    let count = triangles.len() / 3;

    let vertices: Vec<Point> = (0..count)
        .map(|t| circumcenter(&sites[triangles[3 * t]], &sites[triangles[3 * t + 1]], &sites[triangles[3 * t + 2]]))
        .collect();

    let mut regions: Vec<Vec<i64>> = vec![Vec::new(); sites.len()];
    for (e, &site) in triangles.iter().enumerate() {
        regions[site].push((e / 3) as i64);
    }

    let mut on_hull = vec![false; sites.len()];
    let mut ridges = Vec::with_capacity(triangles.len() / 2 + 1);
    for e in 0..triangles.len() {
        let opposite = halfedges[e];
        if opposite != EMPTY && opposite < e {
            continue;
        }
        let a = triangles[e];
        let b = triangles[next_halfedge(e)];
        let far_end = if opposite == EMPTY {
            on_hull[a] = true;
            on_hull[b] = true;
            VERTEX_AT_INFINITY
        } else {
            (opposite / 3) as i64
        };
        ridges.push(Ridge::new([a, b], [(e / 3) as i64, far_end]));
    }

    for (site, region) in regions.iter_mut().enumerate() {
        if region.is_empty() {
            return Err(BoundingError::Configuration(format!(
                "site {} at ({}, {}) coincides with another site",
                site, sites[site][0], sites[site][1]
            )));
        }
        let [sx, sy] = sites[site];
        region.sort_by(|&u, &v| {
            let pu = vertices[u as usize];
            let pv = vertices[v as usize];
            let au = (pu[1] - sy).atan2(pu[0] - sx);
            let av = (pv[1] - sy).atan2(pv[0] - sx);
            au.partial_cmp(&av).unwrap_or(std::cmp::Ordering::Equal)
        });
        if on_hull[site] {
            region.push(VERTEX_AT_INFINITY);
        }
    }

    Ok(RawDiagram::new(sites.to_vec(), vertices, ridges, regions))
}

/// Diagram of sites on a common line: a stack of parallel strips.
fn collinear(sites: &[Point]) -> Result<RawDiagram> {
    let regions = vec![vec![VERTEX_AT_INFINITY]; sites.len()];
    if sites.len() < 2 {
        return Ok(RawDiagram::new(sites.to_vec(), Vec::new(), Vec::new(), regions));
    }

    // Project onto the direction towards the site furthest from the first one.
    let origin = sites[0];
    let Some(far) = sites.iter().copied().max_by(|a, b| {
        let da = (a[0] - origin[0]).hypot(a[1] - origin[1]);
        let db = (b[0] - origin[0]).hypot(b[1] - origin[1]);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    }) else {
        return Ok(RawDiagram::new(sites.to_vec(), Vec::new(), Vec::new(), regions));
    };
    let dir = [far[0] - origin[0], far[1] - origin[1]];

    let mut order: Vec<(f64, usize)> = sites
        .iter()
        .enumerate()
        .map(|(i, p)| ((p[0] - origin[0]) * dir[0] + (p[1] - origin[1]) * dir[1], i))
        .collect();
    order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut ridges = Vec::with_capacity(sites.len() - 1);
    for pair in order.windows(2) {
        let (a, b) = (pair[0].1, pair[1].1);
        if sites[a] == sites[b] {
            return Err(BoundingError::Configuration(format!(
                "site {} at ({}, {}) coincides with another site",
                b, sites[b][0], sites[b][1]
            )));
        }
        ridges.push(Ridge::new([a, b], [VERTEX_AT_INFINITY, VERTEX_AT_INFINITY]));
    }

    Ok(RawDiagram::new(sites.to_vec(), Vec::new(), ridges, regions))
}

fn circumcenter(a: &Point, b: &Point, c: &Point) -> Point {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let ex = c[0] - a[0];
    let ey = c[1] - a[1];

    let bl = dx * dx + dy * dy;
    let cl = ex * ex + ey * ey;
    let d = 0.5 / (dx * ey - dy * ex);

    [a[0] + (ey * bl - dy * cl) * d, a[1] + (dx * cl - ex * bl) * d]
}
