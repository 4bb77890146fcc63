use approx::assert_abs_diff_eq;
use boundvor::geometry::{Point, polygon_area};
use boundvor::{BoundedVoronoi, BoundingOptions, point_in_polygon, random_sites};
use proptest::prelude::*;

fn hexagon() -> Vec<Point> {
    (0..6)
        .map(|k| {
            let a = k as f64 * std::f64::consts::PI / 3.0;
            [2.0 * a.cos(), 2.0 * a.sin()]
        })
        .collect()
}

fn chevron() -> Vec<Point> {
    vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [2.0, 3.0], [0.0, 4.0]]
}

fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0);
    let d = [ap[0] - t * ab[0], ap[1] - t * ab[1]];
    (d[0] * d[0] + d[1] * d[1]).sqrt()
}

/// Clipped vertices on slanted edges are only inside up to rounding.
fn inside_or_near(p: &Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    point_in_polygon(p, polygon, true).unwrap()
        || (0..n).any(|i| distance_to_segment(p, &polygon[i], &polygon[(i + 1) % n]) < 1e-9)
}

/// Vertices at sorted angles around the origin on an integer grid, so the polygon is
/// simple, possibly concave, and edge points at multiples of 1/8 are exact.
fn star_polygon() -> impl Strategy<Value = Vec<Point>> {
    (3usize..10)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0.0..0.4f64, 8.0..16.0f64), n)))
        .prop_map(|(n, params)| {
            params
                .iter()
                .enumerate()
                .map(|(k, &(jitter, r))| {
                    let a = (k as f64 + jitter) * std::f64::consts::TAU / n as f64;
                    [(r * a.cos()).round(), (r * a.sin()).round()]
                })
                .collect()
        })
}

/// Parity of the crossings of an upward vertical ray, for comparison.
fn inside_by_vertical_ray(p: &Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    let mut crossings = 0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a[0] > p[0]) != (b[0] > p[0]) {
            let y = a[1] + (p[0] - a[0]) * (b[1] - a[1]) / (b[0] - a[0]);
            if y > p[1] {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

fn in_notch(p: &Point) -> bool {
    // Triangle (0,4) (2,3) (4,4) cut out of the 4x4 square.
    p[1] > 3.0 + (p[0] - 2.0).abs() * 0.5
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_point_in_rectangle(
        x0 in -10.0..0.0f64, y0 in -10.0..0.0f64,
        w in 0.1..10.0f64, h in 0.1..10.0f64,
        px in -20.0..20.0f64, py in -20.0..20.0f64,
    ) {
        let (x1, y1) = (x0 + w, y0 + h);
        let rect = vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
        let margin = 1e-9;
        prop_assume!((px - x0).abs() > margin && (px - x1).abs() > margin);
        prop_assume!((py - y0).abs() > margin && (py - y1).abs() > margin);

        let expected = px > x0 && px < x1 && py > y0 && py < y1;
        prop_assert_eq!(point_in_polygon(&[px, py], &rect, false).unwrap(), expected);
        prop_assert_eq!(point_in_polygon(&[px, py], &rect, true).unwrap(), expected);
    }

    #[test]
    fn prop_point_in_chevron(px in -1.0..5.0f64, py in -1.0..5.0f64) {
        let p = [px, py];
        let notch_edge = (py - 3.0 - (px - 2.0).abs() * 0.5).abs();
        prop_assume!(notch_edge > 1e-9);
        prop_assume!(px.abs() > 1e-9 && (px - 4.0).abs() > 1e-9 && py.abs() > 1e-9);

        let expected = px > 0.0 && px < 4.0 && py > 0.0 && py < 4.0 && !in_notch(&p);
        prop_assert_eq!(point_in_polygon(&p, &chevron(), false).unwrap(), expected);
    }

    #[test]
    fn prop_point_in_star_polygon(polygon in star_polygon(), px in -20.0..20.0f64, py in -20.0..20.0f64) {
        let p = [px, py];
        let n = polygon.len();
        let clearance = (0..n)
            .map(|i| distance_to_segment(&p, &polygon[i], &polygon[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min);
        prop_assume!(clearance > 1e-6);

        let expected = inside_by_vertical_ray(&p, &polygon);
        prop_assert_eq!(point_in_polygon(&p, &polygon, false).unwrap(), expected);
        prop_assert_eq!(point_in_polygon(&p, &polygon, true).unwrap(), expected);
    }

    #[test]
    fn prop_points_on_star_polygon_edges(polygon in star_polygon(), edge in any::<prop::sample::Index>(), step in 0u32..=8) {
        let n = polygon.len();
        let i = edge.index(n);
        let (a, b) = (polygon[i], polygon[(i + 1) % n]);
        let t = step as f64 / 8.0;
        let p = [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t];

        prop_assert!(point_in_polygon(&p, &polygon, true).unwrap());
    }

    #[test]
    fn prop_nearly_collinear_sites(
        theta in 0.0..std::f64::consts::PI,
        jitter in 1e-6..1e-2f64,
        below in any::<bool>(),
        offset in -0.1..0.1f64,
    ) {
        let u = [theta.cos(), theta.sin()];
        let v = [-u[1], u[0]];
        let lift = if below { -jitter } else { jitter };
        let sites: Vec<Point> = [(-0.3, 0.0), (offset, lift), (0.3, 0.0)]
            .iter()
            .map(|&(s, h)| [0.5 + s * u[0] + h * v[0], 0.5 + s * u[1] + h * v[1]])
            .collect();
        let bounds = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let bounded = BoundedVoronoi::from_sites(&sites, Some(bounds), BoundingOptions::default()).unwrap();

        for region in bounded.regions() {
            prop_assert!(region.len() >= 3);
        }
        assert_abs_diff_eq!(bounded.total_area(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn prop_regions_partition_convex_bounds(count in 1usize..60, seed in any::<u64>()) {
        let bounds = hexagon();
        let sites = random_sites(&bounds, count, Some(seed)).unwrap();
        let bounded = BoundedVoronoi::from_sites(&sites, Some(bounds.clone()), BoundingOptions::default()).unwrap();

        prop_assert_eq!(bounded.count_regions(), count);
        for region in bounded.regions() {
            for &v in region {
                prop_assert!(inside_or_near(&bounded.vertices()[v], &bounds));
            }
        }
        assert_abs_diff_eq!(bounded.total_area(), polygon_area(&bounds), epsilon = 1e-6);
    }

    #[test]
    fn prop_regions_partition_concave_bounds(count in 1usize..40, seed in any::<u64>()) {
        let bounds = chevron();
        let sites = random_sites(&bounds, count, Some(seed)).unwrap();
        let bounded = BoundedVoronoi::from_sites(&sites, Some(bounds.clone()), BoundingOptions::default()).unwrap();

        for region in bounded.regions() {
            prop_assert!(region.is_empty() || region.len() >= 3);
            for &v in region {
                prop_assert!(inside_or_near(&bounded.vertices()[v], &bounds));
            }
        }
        assert_abs_diff_eq!(bounded.total_area(), polygon_area(&bounds), epsilon = 1e-6);
    }

    #[test]
    fn prop_serial_matches_parallel(count in 2usize..50, seed in any::<u64>()) {
        let bounds = hexagon();
        let sites = random_sites(&bounds, count, Some(seed)).unwrap();
        let options = BoundingOptions::default();
        let parallel = BoundedVoronoi::from_sites(&sites, Some(bounds.clone()), options.with_parallel(true)).unwrap();
        let serial = BoundedVoronoi::from_sites(&sites, Some(bounds), options.with_parallel(false)).unwrap();

        prop_assert_eq!(parallel.vertices(), serial.vertices());
        prop_assert_eq!(parallel.regions(), serial.regions());
    }
}
