use crate::kdtree::Neighbor;
use crate::site::Site;

pub mod brute_force;
pub mod d2_kdtree;

use brute_force::AlgorithmBruteForce;
use d2_kdtree::AlgorithmKdTree;

/// Trait defining the nearest-site lookup behind the raster.
/// This allows swapping between the linear scan and the K-d tree.
///
/// Implementations are only read during a redraw, which is what allows the
/// raster to be computed in parallel.
pub trait SpatialAlgorithm: Send + Sync {
    /// Rebuild the index from scratch for the given sites, in index order.
    fn set_sites(&mut self, sites: &[Site]);

    /// Register a site that was just appended at `index`.
    fn insert_site(&mut self, index: usize, site: &Site);

    /// Move the site at `index` from `old_pos` to its current position.
    fn update_site(&mut self, index: usize, old_pos: [i32; 2], site: &Site);

    /// Find the site closest to `point`. Exact ties go to the lowest index.
    ///
    /// # Arguments
    /// * `sites` - The full list of sites, for algorithms that do not keep copies.
    /// * `point` - The grid cell being resolved.
    fn nearest(&self, sites: &[Site], point: [i32; 2]) -> Option<Neighbor>;
}

/// Runtime choice between the two lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    BruteForce,
    #[default]
    KdTree,
}

/// A [`SpatialAlgorithm`] whose strategy is picked at runtime.
#[derive(Clone, Debug)]
pub enum AlgorithmDynamic {
    BruteForce(AlgorithmBruteForce),
    KdTree(AlgorithmKdTree),
}

impl AlgorithmDynamic {
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BruteForce => AlgorithmDynamic::BruteForce(AlgorithmBruteForce::new()),
            Strategy::KdTree => AlgorithmDynamic::KdTree(AlgorithmKdTree::new()),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            AlgorithmDynamic::BruteForce(_) => Strategy::BruteForce,
            AlgorithmDynamic::KdTree(_) => Strategy::KdTree,
        }
    }
}

impl SpatialAlgorithm for AlgorithmDynamic {
    fn set_sites(&mut self, sites: &[Site]) {
        match self {
            AlgorithmDynamic::BruteForce(a) => a.set_sites(sites),
            AlgorithmDynamic::KdTree(a) => a.set_sites(sites),
        }
    }

    fn insert_site(&mut self, index: usize, site: &Site) {
        match self {
            AlgorithmDynamic::BruteForce(a) => a.insert_site(index, site),
            AlgorithmDynamic::KdTree(a) => a.insert_site(index, site),
        }
    }

    fn update_site(&mut self, index: usize, old_pos: [i32; 2], site: &Site) {
        match self {
            AlgorithmDynamic::BruteForce(a) => a.update_site(index, old_pos, site),
            AlgorithmDynamic::KdTree(a) => a.update_site(index, old_pos, site),
        }
    }

    fn nearest(&self, sites: &[Site], point: [i32; 2]) -> Option<Neighbor> {
        match self {
            AlgorithmDynamic::BruteForce(a) => a.nearest(sites, point),
            AlgorithmDynamic::KdTree(a) => a.nearest(sites, point),
        }
    }
}
