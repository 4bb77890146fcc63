use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BoundingError, Result};
use crate::geometry::{Point, point_in_polygon};

/// Draws `count` sites uniformly inside `bounds` by rejection sampling its bounding box.
///
/// With `seed == None` the seed is taken from the environment on wasm and fixed otherwise,
/// so native runs are reproducible.
///
/// # Errors
/// `BoundingError::Configuration` for bounds with fewer than 3 vertices, or when the
/// bounds are so thin that the attempt limit is reached first.
pub fn random_sites(bounds: &[Point], count: usize, seed: Option<u64>) -> Result<Vec<Point>> {
    if bounds.len() < 3 {
        return Err(BoundingError::Configuration(format!(
            "bounds must have at least 3 vertices, got {}",
            bounds.len()
        )));
    }

    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in bounds {
        for k in 0..2 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    let w = max[0] - min[0];
    let h = max[1] - min[1];

    let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(get_seed));
    let mut sites = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(1000);
    let mut attempts = 0;

    while sites.len() < count && attempts < max_attempts {
        attempts += 1;
        let p = [min[0] + rng.r#gen::<f64>() * w, min[1] + rng.r#gen::<f64>() * h];
        if point_in_polygon(&p, bounds, false)? {
            sites.push(p);
        }
    }

    if sites.len() < count {
        return Err(BoundingError::Configuration(format!(
            "placed only {} of {} sites after {} attempts",
            sites.len(),
            count,
            attempts
        )));
    }
    Ok(sites)
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sites_inside_concave_bounds() {
        let bounds = vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [1.0, 1.0], [0.0, 2.0]];
        let sites = random_sites(&bounds, 200, Some(7)).unwrap();
        assert_eq!(sites.len(), 200);
        for p in &sites {
            assert!(point_in_polygon(p, &bounds, true).unwrap());
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let bounds = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let a = random_sites(&bounds, 20, Some(42)).unwrap();
        let b = random_sites(&bounds, 20, Some(42)).unwrap();
        let c = random_sites(&bounds, 20, Some(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_degenerate_bounds() {
        assert!(random_sites(&[[0.0, 0.0], [1.0, 0.0]], 3, None).is_err());
        let flat = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(random_sites(&flat, 3, None).is_err());
        assert!(random_sites(&flat, 0, None).unwrap().is_empty());
    }
}
