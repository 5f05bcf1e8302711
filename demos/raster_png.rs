use plotters::prelude::*;
use vororaster::{AlgorithmBruteForce, AlgorithmKdTree, SpatialAlgorithm, Voronoi, VoronoiConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    run_example("raster_kdtree.png", AlgorithmKdTree::new())?;
    run_example("raster_brute_force.png", AlgorithmBruteForce::new())?;

    Ok(())
}

fn run_example<A: SpatialAlgorithm>(filename: &str, algorithm: A) -> Result<(), Box<dyn std::error::Error>> {
    // Same seed for both strategies, so the two images are identical.
    let config = VoronoiConfig::new(800, 600, 1000).with_seed(2024);
    let mut voronoi = Voronoi::new(config, algorithm)?;
    voronoi.regenerate(100);
    voronoi.draw(true);

    let (width, height) = (voronoi.width(), voronoi.height());
    let root = BitMapBackend::new(filename, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    for (i, &pixel) in voronoi.pixels().iter().enumerate() {
        let x = (i % width as usize) as i32;
        let y = (i / width as usize) as i32;
        let (r, g, b) = vororaster::color::channels(pixel);
        root.draw_pixel((x, y), &RGBColor(r, g, b))?;
    }

    root.present()?;
    println!("Output saved to {}", filename);
    Ok(())
}
