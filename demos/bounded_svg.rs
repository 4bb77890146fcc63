use boundvor::{BoundedVoronoi, BoundingOptions, random_sites};
use plotters::prelude::*;
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("bounded_square.svg", vec![[5.0, 5.0], [95.0, 5.0], [95.0, 95.0], [5.0, 95.0]])?;

    let hexagon = (0..6)
        .map(|k| {
            let a = k as f64 * std::f64::consts::PI / 3.0;
            [50.0 + 45.0 * a.cos(), 50.0 + 45.0 * a.sin()]
        })
        .collect();
    run_example("bounded_hexagon.svg", hexagon)?;

    run_example(
        "bounded_chevron.svg",
        vec![[5.0, 5.0], [95.0, 5.0], [95.0, 95.0], [50.0, 70.0], [5.0, 95.0]],
    )?;

    Ok(())
}

fn run_example(filename: &str, bounds: Vec<[f64; 2]>) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root).build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let seed: u64 = rand::thread_rng().r#gen();
    let sites = random_sites(&bounds, 300, Some(seed))?;
    let diagram = BoundedVoronoi::from_sites(&sites, Some(bounds), BoundingOptions::default())?;

    // Draw bounds
    let mut outline: Vec<(f64, f64)> = diagram.bounds().iter().map(|p| (p[0], p[1])).collect();
    outline.push(outline[0]);
    chart.draw_series(std::iter::once(PathElement::new(outline, BLACK.stroke_width(2))))?;

    // Draw regions
    for i in 0..diagram.count_regions() {
        let Some(region) = diagram.region_polygon(i) else { continue };
        if region.len() < 3 {
            continue;
        }

        let mut poly: Vec<(f64, f64)> = region.iter().map(|p| (p[0], p[1])).collect();
        chart.draw_series(std::iter::once(Polygon::new(poly.clone(), BLUE.mix(0.1).filled())))?;

        poly.push(poly[0]);
        chart.draw_series(std::iter::once(PathElement::new(poly, BLACK.mix(0.5))))?;
    }

    // Draw sites
    chart.draw_series(sites.iter().map(|p| Circle::new((p[0], p[1]), 2, RED.filled())))?;

    root.present()?;
    println!("Output saved to {} (total area {:.3})", filename, diagram.total_area());
    Ok(())
}
