use std::fmt;

/// Number of dimensions the tree splits on. Even depths split on x, odd depths on y.
const K: usize = 2;

/// Squared Euclidean distance between two integer points.
///
/// Widened to `i64` so grids of any `i32` extent cannot overflow.
#[inline]
pub fn dist_sq(a: [i32; 2], b: [i32; 2]) -> i64 {
    let dx = a[0] as i64 - b[0] as i64;
    let dy = a[1] as i64 - b[1] as i64;
    dx * dx + dy * dy
}

/// The payload stored at every node: a copy of a site's position and color,
/// plus the index of the site it was copied from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdEntry {
    pub point: [i32; 2],
    pub color: u32,
    pub site: usize,
}

/// Result of a nearest-neighbor query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub site: usize,
    pub point: [i32; 2],
    pub color: u32,
    pub dist_sq: i64,
}

impl Neighbor {
    fn from_entry(entry: &KdEntry, query: [i32; 2]) -> Self {
        Neighbor {
            site: entry.site,
            point: entry.point,
            color: entry.color,
            dist_sq: dist_sq(entry.point, query),
        }
    }

    /// Ordering used to pick a winner: closer first, then lower site index.
    #[inline]
    pub fn beats(&self, other: &Neighbor) -> bool {
        (self.dist_sq, self.site) < (other.dist_sq, other.site)
    }
}

struct KdNode {
    entry: KdEntry,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

impl KdNode {
    fn leaf(entry: KdEntry) -> Self {
        KdNode { entry, left: None, right: None }
    }
}

/// A dynamic 2D K-d tree over integer points.
///
/// The tree is never rebalanced: its shape follows insertion order, so
/// nearest-neighbor queries are logarithmic on average but degrade to linear
/// for adversarial orders (e.g. monotonically increasing coordinates).
///
/// Every node owns its children, so dropping the tree frees every node and
/// deletions cannot leave dangling or shared subtrees behind. A degenerate
/// tree is as deep as it is long, so no operation recurses per level.
#[derive(Default)]
pub struct KdTree {
    root: Option<Box<KdNode>>,
    len: usize,
}

impl KdTree {
    pub fn new() -> Self {
        KdTree { root: None, len: 0 }
    }

    /// Builds a tree by inserting the entries in the given order.
    pub fn from_entries<I: IntoIterator<Item = KdEntry>>(entries: I) -> Self {
        let mut tree = KdTree::new();
        for entry in entries {
            tree.insert(entry.point, entry.color, entry.site);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        free(self.root.take());
        self.len = 0;
    }

    /// Number of levels on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&KdNode, usize)> = self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, level + 1));
            }
        }
        deepest
    }

    /// Inserts a point, descending left when strictly less on the splitting axis.
    pub fn insert(&mut self, point: [i32; 2], color: u32, site: usize) {
        let mut slot = &mut self.root;
        let mut depth = 0;
        while let Some(node) = slot {
            let axis = depth % K;
            slot = if point[axis] < node.entry.point[axis] {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
        }
        *slot = Some(Box::new(KdNode::leaf(KdEntry { point, color, site })));
        self.len += 1;
    }

    /// Removes one node whose coordinates match `point` exactly.
    ///
    /// Returns `false` and leaves the tree untouched when nothing matches.
    pub fn delete(&mut self, point: [i32; 2]) -> bool {
        let removed = delete_entry(&mut self.root, point, None);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Removes the node at `point` that belongs to `site`.
    ///
    /// Unlike [`KdTree::delete`], a different site sitting on the same
    /// coordinate is left alone.
    pub fn remove_site(&mut self, point: [i32; 2], site: usize) -> bool {
        let removed = delete_entry(&mut self.root, point, Some(site));
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Returns the closest entry to `point`, or `None` for an empty tree.
    ///
    /// Exact distance ties go to the lower site index.
    pub fn nearest(&self, point: [i32; 2]) -> Option<Neighbor> {
        enum Step<'a> {
            Descend(&'a KdNode, usize),
            // The near side is done: score the node, then maybe cross the split.
            Settle(&'a KdNode, usize),
        }

        let mut best: Option<Neighbor> = None;
        let mut stack: Vec<Step<'_>> = self.root.as_deref().map(|n| Step::Descend(n, 0)).into_iter().collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Descend(node, depth) => {
                    let axis = depth % K;
                    let near = if point[axis] < node.entry.point[axis] {
                        node.left.as_deref()
                    } else {
                        node.right.as_deref()
                    };
                    stack.push(Step::Settle(node, depth));
                    if let Some(near) = near {
                        stack.push(Step::Descend(near, depth + 1));
                    }
                }
                Step::Settle(node, depth) => {
                    let candidate = Neighbor::from_entry(&node.entry, point);
                    if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                        best = Some(candidate);
                    }

                    let axis = depth % K;
                    let far = if point[axis] < node.entry.point[axis] {
                        node.right.as_deref()
                    } else {
                        node.left.as_deref()
                    };
                    // A far-side point at exactly the best distance can still win on site index.
                    let split = point[axis] as i64 - node.entry.point[axis] as i64;
                    if let Some(far) = far {
                        if best.as_ref().map_or(true, |b| split * split <= b.dist_sq) {
                            stack.push(Step::Descend(far, depth + 1));
                        }
                    }
                }
            }
        }
        best
    }

    /// Returns `true` if `point` is stored in the tree.
    pub fn contains(&self, point: [i32; 2]) -> bool {
        let mut node = self.root.as_deref();
        let mut depth = 0;
        while let Some(n) = node {
            if n.entry.point == point {
                return true;
            }
            let axis = depth % K;
            node = if point[axis] < n.entry.point[axis] {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
            depth += 1;
        }
        false
    }

    /// Pre-order iterator over the stored entries.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: self.root.as_deref().into_iter().collect() }
    }

    /// Checks the axis partition invariant at every node: everything in a
    /// left subtree is strictly less on the node's splitting axis, everything
    /// in a right subtree is greater or equal.
    pub fn is_partitioned(&self) -> bool {
        // Upper bounds are exclusive, so widen by one past i32::MAX.
        let lo = [i64::MIN, i64::MIN];
        let hi = [i32::MAX as i64 + 1, i32::MAX as i64 + 1];
        let mut stack: Vec<(&KdNode, usize, [i64; 2], [i64; 2])> =
            self.root.as_deref().map(|n| (n, 0, lo, hi)).into_iter().collect();

        while let Some((node, depth, lo, hi)) = stack.pop() {
            let p = node.entry.point;
            for axis in 0..K {
                let v = p[axis] as i64;
                if v < lo[axis] || v >= hi[axis] {
                    return false;
                }
            }
            let axis = depth % K;
            let split = p[axis] as i64;
            if let Some(left) = node.left.as_deref() {
                let mut left_hi = hi;
                left_hi[axis] = split;
                stack.push((left, depth + 1, lo, left_hi));
            }
            if let Some(right) = node.right.as_deref() {
                let mut right_lo = lo;
                right_lo[axis] = split;
                stack.push((right, depth + 1, right_lo, hi));
            }
        }
        true
    }
}

// Re-inserting in pre-order reproduces the exact shape.
impl Clone for KdTree {
    fn clone(&self) -> Self {
        KdTree::from_entries(self.iter().copied())
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for KdTree {
    fn drop(&mut self) {
        free(self.root.take());
    }
}

/// Frees a subtree without recursing through the boxes' own drops.
fn free(root: Option<Box<KdNode>>) {
    let mut stack: Vec<Box<KdNode>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a KdNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a KdEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.entry)
    }
}

/// Finds the entry with the smallest coordinate along `axis` in the subtree
/// whose root sits at `depth`.
///
/// Where a level splits on `axis` only the left branch can hold the minimum;
/// on the other axis both branches must be searched.
fn find_min(root: &KdNode, axis: usize, depth: usize) -> KdEntry {
    let mut min = root.entry;
    let mut stack = vec![(root, depth)];
    while let Some((node, depth)) = stack.pop() {
        if node.entry.point[axis] < min.point[axis] {
            min = node.entry;
        }
        if let Some(left) = node.left.as_deref() {
            stack.push((left, depth + 1));
        }
        if depth % K != axis {
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }
    }
    min
}

/// Removes the first node on the search path matching `point` (and `site`,
/// when given).
///
/// An inner node is replaced by the axis minimum of one of its subtrees, and
/// that entry is then removed from the subtree, until a leaf is cut off.
fn delete_entry(root: &mut Option<Box<KdNode>>, mut point: [i32; 2], mut site: Option<usize>) -> bool {
    let mut slot = root;
    let mut depth = 0;
    let mut removed = false;

    loop {
        let Some(node) = slot.as_deref() else { return removed };
        let axis = depth % K;
        let is_match = node.entry.point == point && site.map_or(true, |s| s == node.entry.site);
        let is_leaf = node.left.is_none() && node.right.is_none();
        let go_left = point[axis] < node.entry.point[axis];

        if is_match && is_leaf {
            *slot = None;
            return true;
        }

        let Some(node) = slot else { return removed };
        if !is_match {
            slot = if go_left { &mut node.left } else { &mut node.right };
            depth += 1;
            continue;
        }

        removed = true;
        let min = if let Some(right) = node.right.as_deref() {
            find_min(right, axis, depth + 1)
        } else if let Some(left) = node.left.as_deref() {
            // The promoted entry is the axis minimum of the old left subtree,
            // so every survivor is >= it and the subtree belongs on the right.
            let min = find_min(left, axis, depth + 1);
            node.right = node.left.take();
            min
        } else {
            return true;
        };
        node.entry = min;
        point = min.point;
        site = Some(min.site);
        slot = &mut node.right;
        depth += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn brute_nearest(points: &[[i32; 2]], query: [i32; 2]) -> usize {
        let mut best = 0;
        for (i, p) in points.iter().enumerate() {
            if dist_sq(*p, query) < dist_sq(points[best], query) {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_insert_follows_axis() {
        let mut tree = KdTree::new();
        tree.insert([5, 5], 0, 0);
        tree.insert([3, 9], 1, 1); // x < 5 -> left
        tree.insert([7, 1], 2, 2); // x >= 5 -> right
        tree.insert([5, 0], 3, 3); // equal x -> right, then y < 1 -> left

        let order: Vec<usize> = tree.iter().map(|e| e.site).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(tree.is_partitioned());
    }

    #[test]
    fn test_nearest_empty() {
        let tree = KdTree::new();
        assert!(tree.nearest([0, 0]).is_none());
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<[i32; 2]> = (0..300).map(|_| [rng.gen_range(0..200), rng.gen_range(0..150)]).collect();
        let tree = KdTree::from_entries(points.iter().enumerate().map(|(i, &p)| KdEntry { point: p, color: i as u32, site: i }));

        for _ in 0..2000 {
            let q = [rng.gen_range(-20..220), rng.gen_range(-20..170)];
            let found = tree.nearest(q).unwrap();
            let expected = brute_nearest(&points, q);
            assert_eq!(found.site, expected, "query {:?}", q);
            assert_eq!(found.dist_sq, dist_sq(points[expected], q));
        }
    }

    #[test]
    fn test_tie_prefers_lower_site() {
        // Root is site 0; site 1 is visited first for the query but only ties.
        let mut tree = KdTree::new();
        tree.insert([0, 0], 0xff0000, 0);
        tree.insert([10, 0], 0x00ff00, 1);
        tree.insert([5, 10], 0x0000ff, 2);
        let n = tree.nearest([5, 0]).unwrap();
        assert_eq!(n.site, 0);
        assert_eq!(n.dist_sq, 25);

        // Same tie, but the lower index lives on the far side of the split.
        let mut tree = KdTree::new();
        tree.insert([10, 0], 0x00ff00, 1);
        tree.insert([0, 0], 0xff0000, 0);
        let n = tree.nearest([5, 0]).unwrap();
        assert_eq!(n.site, 0);
    }

    #[test]
    fn test_delete_leaf_and_missing() {
        let mut tree = KdTree::new();
        tree.insert([1, 1], 1, 0);
        tree.insert([4, 4], 2, 1);
        assert!(!tree.delete([9, 9]));
        assert_eq!(tree.len(), 2);

        assert!(tree.delete([4, 4]));
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains([4, 4]));
        assert_eq!(tree.nearest([4, 4]).unwrap().color, 1);

        assert!(tree.delete([1, 1]));
        assert!(tree.is_empty());
        assert!(tree.nearest([0, 0]).is_none());
    }

    #[test]
    fn test_delete_promotes_from_left_subtree() {
        // Root (10, 10) only has a left subtree; deleting it must promote the
        // x-minimum and hang the remainder on the right.
        let mut tree = KdTree::new();
        tree.insert([10, 10], 0, 0);
        tree.insert([5, 12], 1, 1);
        tree.insert([7, 3], 2, 2);
        tree.insert([2, 15], 3, 3);
        tree.insert([8, 20], 4, 4);

        assert!(tree.delete([10, 10]));
        assert_eq!(tree.len(), 4);
        assert!(tree.is_partitioned());
        assert!(!tree.contains([10, 10]));

        let root = tree.root.as_deref().unwrap();
        assert_eq!(root.entry.point, [2, 15]);
        assert!(root.left.is_none());
        assert!(root.right.is_some());

        let mut sites: Vec<usize> = tree.iter().map(|e| e.site).collect();
        sites.sort();
        assert_eq!(sites, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_delete_root_with_right_subtree() {
        let mut tree = KdTree::new();
        for (i, p) in [[50, 50], [70, 20], [60, 80], [90, 10], [55, 5], [30, 40]].iter().enumerate() {
            tree.insert(*p, i as u32, i);
        }
        assert!(tree.delete([50, 50]));
        assert!(tree.is_partitioned());
        // x-minimum of the right subtree is (55, 5).
        assert_eq!(tree.root.as_deref().unwrap().entry.point, [55, 5]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_remove_site_with_coincident_points() {
        let mut tree = KdTree::new();
        tree.insert([3, 3], 10, 0);
        tree.insert([3, 3], 20, 1);
        tree.insert([1, 1], 30, 2);

        assert!(tree.remove_site([3, 3], 1));
        assert!(!tree.remove_site([3, 3], 1));
        assert!(tree.contains([3, 3]));
        assert_eq!(tree.nearest([3, 3]).unwrap().color, 10);
        assert!(tree.is_partitioned());
    }

    #[test]
    fn test_random_insert_delete_keeps_invariant() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut tree = KdTree::new();
        let mut live: Vec<([i32; 2], usize)> = Vec::new();

        for step in 0..3000 {
            if live.is_empty() || rng.gen_bool(0.6) {
                let p = [rng.gen_range(0..40), rng.gen_range(0..40)];
                tree.insert(p, step as u32, step);
                live.push((p, step));
            } else {
                let idx = rng.gen_range(0..live.len());
                let (p, site) = live.swap_remove(idx);
                assert!(tree.remove_site(p, site));
            }
            assert_eq!(tree.len(), live.len());
            if step % 50 == 0 {
                assert!(tree.is_partitioned(), "invariant broken at step {}", step);
            }
        }
        assert!(tree.is_partitioned());

        let points: Vec<[i32; 2]> = live.iter().map(|(p, _)| *p).collect();
        for _ in 0..500 {
            let q = [rng.gen_range(0..40), rng.gen_range(0..40)];
            let n = tree.nearest(q).unwrap();
            let expected = brute_nearest(&points, q);
            assert_eq!(n.dist_sq, dist_sq(points[expected], q));
        }
    }

    #[test]
    fn test_sorted_insertion_degenerates() {
        let mut tree = KdTree::new();
        for i in 0..64 {
            tree.insert([i, i], 0, i as usize);
        }
        assert_eq!(tree.depth(), 64);
        assert_eq!(tree.nearest([40, 41]).unwrap().point, [40, 40]);
    }

    #[test]
    fn test_degenerate_tree_runs_on_small_stack() {
        // A sorted chain this long cannot be walked one stack frame per level
        // inside 64 KiB, so every operation below must be iterative.
        const N: i32 = 10_000;
        let worker = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| {
                let mut tree = KdTree::new();
                for i in 0..N {
                    tree.insert([i, i], i as u32, i as usize);
                }
                assert_eq!(tree.depth(), N as usize);
                assert!(tree.is_partitioned());
                assert_eq!(tree.nearest([N + 5, N + 5]).unwrap().site, (N - 1) as usize);
                assert_eq!(tree.nearest([-3, 0]).unwrap().site, 0);

                assert!(tree.remove_site([N - 10, N - 10], (N - 10) as usize));
                assert!(!tree.contains([N - 10, N - 10]));
                assert_eq!(tree.len(), (N - 1) as usize);

                let copy = tree.clone();
                assert_eq!(copy.len(), tree.len());
                drop(copy);
                drop(tree);
            })
            .unwrap();
        worker.join().unwrap();
    }
}
