use crate::algorithm::SpatialAlgorithm;
use crate::color::BLACK;
use crate::config::{PaletteMode, VoronoiConfig};
use crate::error::{Result, VoronoiError};
use crate::io::{self, PixelSink};
use crate::kdtree::Neighbor;
use crate::raster;
use crate::site::{Site, SiteStore};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Discrete events delivered by the embedding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Place a site at a grid cell, e.g. on a mouse click.
    AddSite { x: i32, y: i32 },
    /// Start or stop moving the sites on [`InputEvent::Tick`].
    ToggleAnimation,
    /// Show or hide the site markers.
    ToggleSites,
    /// Replace all sites with the given number of random ones.
    Regenerate(usize),
    /// Advance one animation frame.
    Tick,
}

/// A raster Voronoi diagram: the sites, the lookup structure and the pixel buffer.
///
/// The sites and the spatial algorithm are always mutated together, and every
/// mutation made through [`Voronoi::handle`] is followed by a full redraw.
/// Sites can also be mutated directly, in which case [`Voronoi::draw`] has to be
/// called before reading [`Voronoi::pixels`].
pub struct Voronoi<A: SpatialAlgorithm> {
    config: VoronoiConfig,
    sites: SiteStore,
    algorithm: A,
    pixels: Vec<u32>,
    rng: StdRng,
    next_color: usize,
    animating: bool,
    show_sites: bool,
}

impl<A: SpatialAlgorithm> Voronoi<A> {
    /// Creates an empty diagram. The pixel buffer starts out black.
    pub fn new(config: VoronoiConfig, algorithm: A) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Voronoi {
            sites: SiteStore::with_capacity(config.max_sites),
            pixels: vec![BLACK; config.pixel_count()],
            config,
            algorithm,
            rng,
            next_color: 0,
            animating: false,
            show_sites: true,
        })
    }

    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn sites(&self) -> &[Site] {
        self.sites.as_slice()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Swaps the lookup structure, rebuilding it from the current sites.
    pub fn set_algorithm(&mut self, mut algorithm: A) {
        algorithm.set_sites(self.sites.as_slice());
        self.algorithm = algorithm;
    }

    /// The row-major pixel buffer as of the last redraw.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.config.width || y >= self.config.height {
            return None;
        }
        self.pixels.get(y as usize * self.config.width as usize + x as usize).copied()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn shows_sites(&self) -> bool {
        self.show_sites
    }

    pub fn set_show_sites(&mut self, show: bool) {
        self.show_sites = show;
    }

    /// The site owning `point`, or `None` without sites.
    pub fn nearest(&self, point: [i32; 2]) -> Option<Neighbor> {
        self.algorithm.nearest(self.sites.as_slice(), point)
    }

    /// Appends a site at (`x`, `y`) and mirrors it into the spatial algorithm.
    ///
    /// The site gets a random nonzero velocity on both axes and a palette color.
    pub fn add_site(&mut self, x: i32, y: i32) -> Result<usize> {
        self.check_bounds(x as i64, y as i64)?;
        if self.sites.is_full() {
            return Err(VoronoiError::CapacityExceeded { max: self.sites.capacity() });
        }

        let velocity_x = self.random_velocity();
        let velocity_y = self.random_velocity();
        let color = self.next_palette_color();
        let site = Site::new(x, y, velocity_x, velocity_y, color);

        let index = self
            .sites
            .push(site)
            .ok_or(VoronoiError::CapacityExceeded { max: self.sites.capacity() })?;
        self.algorithm.insert_site(index, &site);
        Ok(index)
    }

    /// Moves every site by its velocity, bouncing off the grid edges, and
    /// re-registers each one at its new position.
    pub fn move_all(&mut self) {
        let width = self.config.width as i32;
        let height = self.config.height as i32;
        for (index, site) in self.sites.iter_mut().enumerate() {
            let old = site.step(width, height);
            self.algorithm.update_site(index, old, site);
        }
    }

    /// Replaces all sites with `count` sites at random positions.
    ///
    /// Stops at the configured capacity. Returns the number of sites created.
    pub fn regenerate(&mut self, count: usize) -> usize {
        self.clear_sites();

        let max = self.sites.capacity();
        if count > max {
            log::warn!("requested {} sites, capacity is {}", count, max);
        }

        let width = self.config.width as i32;
        let height = self.config.height as i32;
        for _ in 0..count.min(max) {
            let x = self.rng.gen_range(0..width);
            let y = self.rng.gen_range(0..height);
            if let Err(e) = self.add_site(x, y) {
                log::warn!("regenerate stopped early: {}", e);
                break;
            }
        }
        log::info!("regenerated {} sites", self.sites.len());
        self.sites.len()
    }

    /// Replaces all sites with sites at the given points, in order.
    ///
    /// The points are validated first; on error the current sites are kept.
    pub fn set_sites(&mut self, points: &[[i32; 2]]) -> Result<()> {
        let max = self.sites.capacity();
        if points.len() > max {
            return Err(VoronoiError::TooManySites { count: points.len(), max });
        }
        for &[x, y] in points {
            self.check_bounds(x as i64, y as i64)?;
        }

        self.next_color = 0;
        let mut sites = Vec::with_capacity(points.len());
        for &[x, y] in points {
            let velocity_x = self.random_velocity();
            let velocity_y = self.random_velocity();
            let color = self.next_palette_color();
            sites.push(Site::new(x, y, velocity_x, velocity_y, color));
        }
        self.sites.replace(sites);
        self.algorithm.set_sites(self.sites.as_slice());
        Ok(())
    }

    /// Removes every site.
    pub fn clear_sites(&mut self) {
        self.sites.clear();
        self.algorithm.set_sites(&[]);
        self.next_color = 0;
    }

    /// Loads sites from a point-list file. See [`crate::io`] for the format.
    pub fn import_sites<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.import_sites_from(BufReader::new(file))?;
        log::info!("imported {} sites from {}", self.sites.len(), path.as_ref().display());
        Ok(())
    }

    pub fn import_sites_from<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let points = io::read_points(reader, self.config.width, self.config.height, self.sites.capacity())?;
        self.set_sites(&points)
    }

    /// Writes the site positions as a point-list file.
    pub fn export_sites<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.export_sites_to(File::create(path)?)
    }

    pub fn export_sites_to<W: Write>(&self, writer: W) -> Result<()> {
        io::write_points(writer, self.sites.as_slice().iter().map(|s| s.position()))
    }

    /// Writes the pixel buffer as a P3 dump.
    pub fn export_pixels<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        io::write_ppm(File::create(path)?, self.config.width, self.config.height, &self.pixels)
    }

    /// Recomputes the whole pixel buffer and optionally paints the site markers.
    ///
    /// Without sites the buffer is left untouched.
    pub fn draw(&mut self, draw_sites: bool) {
        if self.sites.is_empty() {
            return;
        }

        raster::rasterize(&mut self.pixels, self.config.width as usize, &self.algorithm, self.sites.as_slice());

        if draw_sites {
            self.draw_sites();
        }
        log::debug!("redrew {}x{} pixels for {} sites", self.config.width, self.config.height, self.sites.len());
    }

    /// Paints a marker over every site.
    pub fn draw_sites(&mut self) {
        let width = self.config.width as usize;
        let height = self.config.height as usize;
        for site in self.sites.as_slice() {
            raster::draw_circle(
                &mut self.pixels,
                width,
                height,
                site.position(),
                self.config.site_radius,
                self.config.site_color,
            );
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: u32) {
        raster::fill(&mut self.pixels, color);
    }

    /// Hands the current buffer to a sink.
    pub fn present<S: PixelSink>(&self, sink: &mut S) -> Result<()> {
        sink.present(self.config.width, self.config.height, &self.pixels)
    }

    /// Applies an input event and redraws if anything visible changed.
    ///
    /// Rejected site placements (full store, off-grid click) are ignored.
    /// Returns `true` when the buffer was redrawn.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::AddSite { x, y } => {
                if let Err(e) = self.add_site(x, y) {
                    log::debug!("ignored site at ({}, {}): {}", x, y, e);
                    return false;
                }
            }
            InputEvent::ToggleAnimation => {
                self.animating = !self.animating;
                return false;
            }
            InputEvent::ToggleSites => {
                self.show_sites = !self.show_sites;
            }
            InputEvent::Regenerate(count) => {
                self.regenerate(count);
            }
            InputEvent::Tick => {
                if !self.animating {
                    return false;
                }
                self.move_all();
            }
        }
        self.draw(self.show_sites);
        true
    }

    fn check_bounds(&self, x: i64, y: i64) -> Result<()> {
        let (width, height) = (self.config.width, self.config.height);
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return Err(VoronoiError::OutOfBounds { x, y, width, height });
        }
        Ok(())
    }

    fn random_velocity(&mut self) -> i32 {
        loop {
            let v = self.rng.gen_range(-5..5);
            if v != 0 {
                return v;
            }
        }
    }

    fn next_palette_color(&mut self) -> u32 {
        let palette = &self.config.palette;
        match self.config.palette_mode {
            PaletteMode::Random => palette[self.rng.gen_range(0..palette.len())],
            PaletteMode::Rotate => {
                let color = palette[self.next_color % palette.len()];
                self.next_color += 1;
                color
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::brute_force::AlgorithmBruteForce;
    use crate::algorithm::d2_kdtree::AlgorithmKdTree;
    use crate::color::{BLUE, GREEN, RED};

    fn rgb_config(width: u32, height: u32, max_sites: usize) -> VoronoiConfig {
        VoronoiConfig::new(width, height, max_sites)
            .with_palette(vec![RED, GREEN, BLUE], PaletteMode::Rotate)
            .with_seed(1)
    }

    #[test]
    fn test_add_site_mirrors_into_tree() {
        let mut v = Voronoi::new(rgb_config(20, 20, 10), AlgorithmKdTree::new()).unwrap();
        assert_eq!(v.add_site(3, 4).unwrap(), 0);
        assert_eq!(v.add_site(15, 2).unwrap(), 1);
        assert_eq!(v.site_count(), 2);
        assert_eq!(v.algorithm().tree.len(), 2);

        let site = v.sites()[0];
        assert_ne!(site.velocity_x, 0);
        assert_ne!(site.velocity_y, 0);
        assert!((-5..5).contains(&site.velocity_x));
        assert_eq!(v.sites()[0].color, RED);
        assert_eq!(v.sites()[1].color, GREEN);
    }

    #[test]
    fn test_add_site_rejects_out_of_bounds() {
        let mut v = Voronoi::new(rgb_config(20, 20, 10), AlgorithmBruteForce::new()).unwrap();
        assert!(matches!(v.add_site(20, 0), Err(VoronoiError::OutOfBounds { .. })));
        assert!(matches!(v.add_site(0, -1), Err(VoronoiError::OutOfBounds { .. })));
        assert_eq!(v.site_count(), 0);
    }

    #[test]
    fn test_capacity_rejection() {
        let mut v = Voronoi::new(rgb_config(20, 20, 2), AlgorithmKdTree::new()).unwrap();
        v.add_site(1, 1).unwrap();
        v.add_site(2, 2).unwrap();
        assert!(matches!(v.add_site(3, 3), Err(VoronoiError::CapacityExceeded { max: 2 })));
        assert_eq!(v.site_count(), 2);
        assert_eq!(v.algorithm().tree.len(), 2);

        // The event path swallows the rejection.
        assert!(!v.handle(InputEvent::AddSite { x: 4, y: 4 }));
        assert_eq!(v.site_count(), 2);
    }

    #[test]
    fn test_move_all_keeps_tree_in_sync() {
        let mut v = Voronoi::new(rgb_config(50, 40, 100), AlgorithmKdTree::new()).unwrap();
        v.regenerate(60);
        for _ in 0..100 {
            v.move_all();
        }
        let tree = &v.algorithm().tree;
        assert_eq!(tree.len(), 60);
        assert!(tree.is_partitioned());
        for (i, site) in v.sites().iter().enumerate() {
            assert!(site.x >= 0 && site.x < 50 && site.y >= 0 && site.y < 40);
            assert!(tree.iter().any(|e| e.site == i && e.point == site.position()));
        }
    }

    #[test]
    fn test_regenerate_clamps_to_capacity() {
        let mut v = Voronoi::new(rgb_config(30, 30, 5), AlgorithmKdTree::new()).unwrap();
        v.add_site(1, 1).unwrap();
        assert_eq!(v.regenerate(8), 5);
        assert_eq!(v.algorithm().tree.len(), 5);
        assert_eq!(v.regenerate(0), 0);
        assert!(v.algorithm().tree.is_empty());
    }

    #[test]
    fn test_set_sites_is_all_or_nothing() {
        let mut v = Voronoi::new(rgb_config(10, 10, 3), AlgorithmKdTree::new()).unwrap();
        v.set_sites(&[[1, 1], [2, 2]]).unwrap();
        assert!(v.set_sites(&[[3, 3], [10, 3]]).is_err());
        assert!(matches!(v.set_sites(&[[0, 0]; 4]), Err(VoronoiError::TooManySites { count: 4, max: 3 })));
        let positions: Vec<[i32; 2]> = v.sites().iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![[1, 1], [2, 2]]);
        assert_eq!(v.algorithm().tree.len(), 2);
    }

    #[test]
    fn test_draw_without_sites_is_noop() {
        let mut v = Voronoi::new(rgb_config(4, 4, 3), AlgorithmKdTree::new()).unwrap();
        v.fill(GREEN);
        v.draw(true);
        assert!(v.pixels().iter().all(|&p| p == GREEN));
    }

    #[test]
    fn test_draw_sites_paints_markers() {
        let config = rgb_config(9, 9, 3).with_markers(2, 0xFF12_3456);
        let mut v = Voronoi::new(config, AlgorithmKdTree::new()).unwrap();
        v.add_site(4, 4).unwrap();
        v.draw(false);
        assert_eq!(v.pixel(4, 4), Some(RED));
        v.draw(true);
        assert_eq!(v.pixel(4, 4), Some(0xFF12_3456));
        assert_eq!(v.pixel(3, 3), Some(0xFF12_3456));
        assert_eq!(v.pixel(6, 6), Some(RED));
        assert_eq!(v.pixel(9, 0), None);
    }

    #[test]
    fn test_handle_events() {
        let mut v = Voronoi::new(rgb_config(16, 16, 8), AlgorithmKdTree::new()).unwrap();
        assert!(v.handle(InputEvent::Regenerate(4)));
        assert_eq!(v.site_count(), 4);

        assert!(!v.handle(InputEvent::Tick));
        let before: Vec<Site> = v.sites().to_vec();
        assert!(!v.handle(InputEvent::ToggleAnimation));
        assert!(v.is_animating());
        assert!(v.handle(InputEvent::Tick));
        assert_ne!(v.sites(), before.as_slice());

        assert!(v.handle(InputEvent::ToggleSites));
        assert!(!v.shows_sites());
        assert!(v.handle(InputEvent::AddSite { x: 0, y: 0 }));
        assert_eq!(v.site_count(), 5);
    }

    #[test]
    fn test_set_algorithm_rebuilds() {
        let mut v = Voronoi::new(rgb_config(16, 16, 8), AlgorithmKdTree::new()).unwrap();
        v.regenerate(6);
        v.set_algorithm(AlgorithmKdTree::new());
        assert_eq!(v.algorithm().tree.len(), 6);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut v = Voronoi::new(rgb_config(32, 32, 16), AlgorithmKdTree::new()).unwrap();
        v.regenerate(10);
        let mut buf = Vec::new();
        v.export_sites_to(&mut buf).unwrap();

        let mut w = Voronoi::new(rgb_config(32, 32, 16), AlgorithmBruteForce::new()).unwrap();
        w.import_sites_from(buf.as_slice()).unwrap();
        let a: Vec<[i32; 2]> = v.sites().iter().map(|s| s.position()).collect();
        let b: Vec<[i32; 2]> = w.sites().iter().map(|s| s.position()).collect();
        assert_eq!(a, b);
    }
}
