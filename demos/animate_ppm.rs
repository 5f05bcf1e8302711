use std::fs::File;
use std::io::BufWriter;
use vororaster::{AlgorithmKdTree, InputEvent, PpmSink, Voronoi, VoronoiConfig};

const FRAMES: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // An optional JSON config path, otherwise a small default grid.
    let config = match std::env::args().nth(1) {
        Some(path) => VoronoiConfig::from_json_file(path)?,
        None => VoronoiConfig::new(200, 150, 64).with_seed(1),
    };
    let mut voronoi = Voronoi::new(config, AlgorithmKdTree::new())?;

    voronoi.handle(InputEvent::Regenerate(32));
    voronoi.handle(InputEvent::ToggleAnimation);

    for frame in 0..FRAMES {
        voronoi.handle(InputEvent::Tick);
        let filename = format!("frame_{:03}.ppm", frame);
        let mut sink = PpmSink::new(BufWriter::new(File::create(&filename)?));
        voronoi.present(&mut sink)?;
        println!("Output saved to {}", filename);
    }

    voronoi.export_sites("sites.txt")?;
    println!("Sites saved to sites.txt");
    Ok(())
}
