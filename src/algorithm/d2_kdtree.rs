use crate::algorithm::SpatialAlgorithm;
use crate::kdtree::{KdEntry, KdTree, Neighbor};
use crate::site::Site;

/// A spatial index based on a dynamic, unbalanced 2D K-d tree.
///
/// Each node holds its own copy of a site's position and color, so a moved
/// site is removed at its old coordinate and inserted at the new one.
#[derive(Clone, Debug, Default)]
pub struct AlgorithmKdTree {
    pub tree: KdTree,
}

impl AlgorithmKdTree {
    pub fn new() -> Self {
        AlgorithmKdTree { tree: KdTree::new() }
    }
}

impl SpatialAlgorithm for AlgorithmKdTree {
    fn set_sites(&mut self, sites: &[Site]) {
        self.tree = KdTree::from_entries(
            sites
                .iter()
                .enumerate()
                .map(|(i, s)| KdEntry { point: s.position(), color: s.color, site: i }),
        );
    }

    fn insert_site(&mut self, index: usize, site: &Site) {
        self.tree.insert(site.position(), site.color, index);
    }

    fn update_site(&mut self, index: usize, old_pos: [i32; 2], site: &Site) {
        if !self.tree.remove_site(old_pos, index) {
            log::warn!("site {} not found at {:?} in the K-d tree", index, old_pos);
        }
        self.tree.insert(site.position(), site.color, index);
    }

    fn nearest(&self, _sites: &[Site], point: [i32; 2]) -> Option<Neighbor> {
        self.tree.nearest(point)
    }
}
