use crate::bounded::{BoundedVoronoi, BoundingOptions};
use crate::error::BoundingError;
use crate::geometry::points_from_flat;
use crate::sampling::random_sites;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS: &'static str = r#"
export const VERTEX_AT_INFINITY = -1;
"#;

fn to_js(err: BoundingError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn flatten(points: &[[f64; 2]]) -> Vec<f64> {
    points.iter().flat_map(|p| p.iter().copied()).collect()
}

// --- Bounded Voronoi ---

#[wasm_bindgen(js_name = BoundedVoronoi2D)]
pub struct BoundedVoronoi2D {
    inner: BoundedVoronoi,
}

#[wasm_bindgen(js_class = BoundedVoronoi2D)]
impl BoundedVoronoi2D {
    /// Sites and bounds as flat `[x, y, x, y, ...]` arrays. Empty bounds use the box
    /// around the sites.
    #[wasm_bindgen(constructor)]
    pub fn new(sites: &[f64], bounds: &[f64]) -> Result<BoundedVoronoi2D, JsValue> {
        let sites = points_from_flat(sites).map_err(to_js)?;
        let bounds = if bounds.is_empty() { None } else { Some(points_from_flat(bounds).map_err(to_js)?) };
        let inner = BoundedVoronoi::from_sites(&sites, bounds, BoundingOptions::default()).map_err(to_js)?;
        Ok(BoundedVoronoi2D { inner })
    }

    /// `count` random sites inside `bounds`.
    pub fn random(count: usize, bounds: &[f64], seed: Option<u32>) -> Result<BoundedVoronoi2D, JsValue> {
        let bounds = points_from_flat(bounds).map_err(to_js)?;
        let sites = random_sites(&bounds, count, seed.map(u64::from)).map_err(to_js)?;
        let inner = BoundedVoronoi::from_sites(&sites, Some(bounds), BoundingOptions::default()).map_err(to_js)?;
        Ok(BoundedVoronoi2D { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { flatten(self.inner.vertices()) }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { flatten(self.inner.sites()) }
    #[wasm_bindgen(getter)]
    pub fn bounds(&self) -> Vec<f64> { flatten(self.inner.bounds()) }
    #[wasm_bindgen(getter)]
    pub fn count_regions(&self) -> usize { self.inner.count_regions() }

    pub fn region(&self, index: usize) -> Option<Vec<u32>> {
        self.inner.region(index).map(|r| r.iter().map(|&v| v as u32).collect())
    }
    pub fn region_area(&self, index: usize) -> Option<f64> { self.inner.region_area(index) }
    pub fn total_area(&self) -> f64 { self.inner.total_area() }
}
