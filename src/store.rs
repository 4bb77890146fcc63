use std::collections::HashMap;

use crate::geometry::{Point, distance_sq};

/// Append-only vertex list with tolerance-bucketed deduplication.
///
/// Vertices are referenced by their stable `usize` index. Existing entries are never
/// changed or reordered; [`VertexStore::insert`] either returns the index of a stored
/// vertex within `tolerance` of the query or appends a new one.
///
/// Lookup quantizes coordinates to buckets of size `tolerance` and searches the 3x3
/// neighbourhood of the query bucket, so two points within tolerance are always found
/// even when they straddle a bucket edge.
#[derive(Clone, Debug)]
pub struct VertexStore {
    vertices: Vec<Point>,
    buckets: HashMap<(i64, i64), Vec<usize>>,
    tolerance: f64,
}

impl VertexStore {
    /// Creates an empty store. `tolerance` must be positive.
    pub fn new(tolerance: f64) -> Self {
        Self {
            vertices: Vec::new(),
            buckets: HashMap::new(),
            tolerance,
        }
    }

    /// Creates a store seeded with the vertices of a raw diagram.
    ///
    /// Every seed keeps its index, even when it duplicates an earlier seed, so
    /// that the raw regions stay valid. Lookups resolve to the first such index.
    pub fn with_vertices(vertices: &[Point], tolerance: f64) -> Self {
        let mut store = Self::new(tolerance);
        store.vertices.reserve(vertices.len());
        for v in vertices {
            store.push(*v);
        }
        store
    }

    fn key(&self, p: &Point) -> (i64, i64) {
        ((p[0] / self.tolerance).round() as i64, (p[1] / self.tolerance).round() as i64)
    }

    fn push(&mut self, p: Point) -> usize {
        let index = self.vertices.len();
        self.vertices.push(p);
        let key = self.key(&p);
        self.buckets.entry(key).or_default().push(index);
        index
    }

    /// Index of a stored vertex within tolerance of `p`, if any.
    pub fn find(&self, p: &Point) -> Option<usize> {
        let (kx, ky) = self.key(p);
        let tol_sq = self.tolerance * self.tolerance;
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(kx.saturating_add(dx), ky.saturating_add(dy))) else {
                    continue;
                };
                for &i in bucket {
                    if distance_sq(&self.vertices[i], p) <= tol_sq && best.is_none_or(|b| i < b) {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }

    /// Returns the index of `p`, appending it if no stored vertex lies within tolerance.
    pub fn insert(&mut self, p: Point) -> usize {
        match self.find(&p) {
            Some(index) => index,
            None => self.push(p),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.vertices.get(index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }
}
