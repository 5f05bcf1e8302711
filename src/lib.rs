//! # vororaster
//!
//! `vororaster` is a Rust library for raster Voronoi diagrams, designed to be used in Rust
//! as well as compiled to WebAssembly (WASM). Every pixel of a grid is colored with the
//! color of its nearest site, and the coloring is kept up to date as sites are added or moved.
//!
//! ## Features
//!
//! - **Dynamic K-d tree**: Insert, delete-by-coordinate and nearest-neighbor queries on a 2D tree
//!   that is never rebalanced (average-case logarithmic, worst-case linear).
//! - **Brute force baseline**: A linear scan that produces the exact same raster, used for validation.
//! - **Parallel raster**: Pixel rows are resolved in parallel with `rayon`.
//! - **Animation**: Sites carry velocities and bounce off the grid edges.
//! - **File formats**: Point-list import/export and plain-text PPM (`P3`) pixel dumps.
//!
//! ## Example
//!
//! See the `demos/` directory for PNG rendering and PPM animation dumps.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Voronoi`] struct, which owns the sites, the
//! [`SpatialAlgorithm`] and the pixel buffer.

pub mod algorithm;
pub mod color;
mod config;
mod error;
pub mod io;
pub mod kdtree;
pub mod raster;
mod site;
mod voronoi;
mod wasm;

pub use algorithm::brute_force::AlgorithmBruteForce;
pub use algorithm::d2_kdtree::AlgorithmKdTree;
pub use algorithm::AlgorithmDynamic;
pub use algorithm::SpatialAlgorithm;
pub use algorithm::Strategy;
pub use config::PaletteMode;
pub use config::VoronoiConfig;
pub use error::Result;
pub use error::VoronoiError;
pub use io::PixelSink;
pub use io::PpmSink;
pub use kdtree::KdTree;
pub use kdtree::Neighbor;
pub use site::Site;
pub use site::SiteStore;
pub use voronoi::InputEvent;
pub use voronoi::Voronoi;
