use crate::algorithm::SpatialAlgorithm;
use crate::kdtree::{dist_sq, Neighbor};
use crate::site::Site;

/// Linear scan over every site.
///
/// Costs O(sites) per query and keeps no state of its own. It is the
/// correctness baseline the K-d tree is validated against.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlgorithmBruteForce;

impl AlgorithmBruteForce {
    pub fn new() -> Self {
        AlgorithmBruteForce
    }
}

impl SpatialAlgorithm for AlgorithmBruteForce {
    fn set_sites(&mut self, _sites: &[Site]) {}

    fn insert_site(&mut self, _index: usize, _site: &Site) {}

    fn update_site(&mut self, _index: usize, _old_pos: [i32; 2], _site: &Site) {}

    fn nearest(&self, sites: &[Site], point: [i32; 2]) -> Option<Neighbor> {
        let mut best: Option<Neighbor> = None;
        for (i, site) in sites.iter().enumerate() {
            let d = dist_sq(site.position(), point);
            // Strict comparison keeps the earliest site on ties.
            if best.as_ref().map_or(true, |b| d < b.dist_sq) {
                best = Some(Neighbor { site: i, point: site.position(), color: site.color, dist_sq: d });
            }
        }
        best
    }
}
