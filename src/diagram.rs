use crate::error::{BoundingError, Result};
use crate::geometry::Point;

/// Vertex index marking a ridge end or region vertex at infinity. It is negative to
/// prevent conflicts with vertex indices.
pub const VERTEX_AT_INFINITY: i64 = -1;

/// A shared edge between the regions of two sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ridge {
    /// The two sites separated by this ridge.
    pub sites: [usize; 2],
    /// Indices into the vertex list, [`VERTEX_AT_INFINITY`] for an unbounded end.
    pub vertices: [i64; 2],
}

impl Ridge {
    pub fn new(sites: [usize; 2], vertices: [i64; 2]) -> Self {
        Self { sites, vertices }
    }

    pub fn is_unbounded(&self) -> bool {
        self.vertices.contains(&VERTEX_AT_INFINITY)
    }

    /// The site on the other side of this ridge, if `site` is one of its two sites.
    pub fn other(&self, site: usize) -> Option<usize> {
        match self.sites {
            [a, b] if a == site => Some(b),
            [a, b] if b == site => Some(a),
            _ => None,
        }
    }
}

/// An unbounded planar Voronoi diagram, as produced by a tessellation backend.
///
/// This is the full contract between the bounding pass and whatever computed the diagram:
/// `regions[i]` lists the vertices of site `i`'s region (possibly including
/// [`VERTEX_AT_INFINITY`]) and every ridge names the two sites it separates.
#[derive(Clone, Debug, Default)]
pub struct RawDiagram {
    pub sites: Vec<Point>,
    pub vertices: Vec<Point>,
    pub ridges: Vec<Ridge>,
    pub regions: Vec<Vec<i64>>,
    /// Regions are those of the furthest rather than the nearest site.
    pub furthest_site: bool,
}

impl RawDiagram {
    pub fn new(sites: Vec<Point>, vertices: Vec<Point>, ridges: Vec<Ridge>, regions: Vec<Vec<i64>>) -> Self {
        Self {
            sites,
            vertices,
            ridges,
            regions,
            furthest_site: false,
        }
    }

    pub fn with_furthest_site(mut self, furthest_site: bool) -> Self {
        self.furthest_site = furthest_site;
        self
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len()
    }

    /// Checks region count and index ranges.
    ///
    /// # Errors
    /// `BoundingError::InvalidDiagram` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let n_sites = self.sites.len();
        let n_vertices = self.vertices.len() as i64;

        if self.regions.len() != n_sites {
            return Err(BoundingError::InvalidDiagram(format!(
                "expected one region per site ({}), got {}",
                n_sites,
                self.regions.len()
            )));
        }

        let check_vertex = |v: i64, context: &dyn Fn() -> String| {
            if v < VERTEX_AT_INFINITY || v >= n_vertices {
                Err(BoundingError::InvalidDiagram(format!(
                    "{} references vertex {} but only {} vertices exist",
                    context(),
                    v,
                    n_vertices
                )))
            } else {
                Ok(())
            }
        };

        for (i, region) in self.regions.iter().enumerate() {
            for &v in region {
                check_vertex(v, &|| format!("region {}", i))?;
            }
        }

        for (i, ridge) in self.ridges.iter().enumerate() {
            if let Some(&s) = ridge.sites.iter().find(|&&s| s >= n_sites) {
                return Err(BoundingError::InvalidDiagram(format!(
                    "ridge {} references site {} but only {} sites exist",
                    i, s, n_sites
                )));
            }
            for &v in &ridge.vertices {
                check_vertex(v, &|| format!("ridge {}", i))?;
            }
        }

        if let Some(p) = self.sites.iter().chain(self.vertices.iter()).find(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(BoundingError::InvalidDiagram(format!("non-finite coordinate {:?}", p)));
        }

        Ok(())
    }

    /// For every site, the indices of the ridges bordering its region.
    pub fn ridges_by_site(&self) -> Vec<Vec<usize>> {
        let mut by_site = vec![Vec::new(); self.sites.len()];
        for (i, ridge) in self.ridges.iter().enumerate() {
            let [a, b] = ridge.sites;
            by_site[a].push(i);
            if b != a {
                by_site[b].push(i);
            }
        }
        by_site
    }
}
