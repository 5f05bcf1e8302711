/// A generator point of the diagram with its animation velocity and display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    pub x: i32,
    pub y: i32,
    pub velocity_x: i32,
    pub velocity_y: i32,
    pub color: u32,
}

impl Site {
    pub fn new(x: i32, y: i32, velocity_x: i32, velocity_y: i32, color: u32) -> Self {
        Site { x, y, velocity_x, velocity_y, color }
    }

    #[inline]
    pub fn position(&self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// Advances the site by one velocity step inside a `width` x `height` grid.
    ///
    /// An axis that leaves the grid has its velocity inverted and is reflected
    /// from the previous position instead. This happens once per axis; a
    /// velocity larger than the grid itself is finally clamped.
    ///
    /// Returns the position before the step.
    pub fn step(&mut self, width: i32, height: i32) -> [i32; 2] {
        let old = self.position();
        (self.x, self.velocity_x) = bounce(self.x, self.velocity_x, width);
        (self.y, self.velocity_y) = bounce(self.y, self.velocity_y, height);
        old
    }
}

fn bounce(pos: i32, velocity: i32, extent: i32) -> (i32, i32) {
    let next = pos + velocity;
    if next >= 0 && next < extent {
        return (next, velocity);
    }
    let velocity = -velocity;
    ((pos + velocity).clamp(0, extent - 1), velocity)
}

/// Ordered, fixed-capacity storage for the sites of a diagram.
///
/// A site's index is its identity. Entries are only ever appended, moved in
/// place or cleared all at once, so indices stay stable between regenerations.
#[derive(Clone, Debug)]
pub struct SiteStore {
    sites: Vec<Site>,
    capacity: usize,
}

impl SiteStore {
    pub fn with_capacity(capacity: usize) -> Self {
        SiteStore { sites: Vec::with_capacity(capacity), capacity }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.sites.len() >= self.capacity
    }

    /// Appends a site and returns its index, or `None` when the store is full.
    pub fn push(&mut self, site: Site) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.sites.push(site);
        Some(self.sites.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn as_slice(&self) -> &[Site] {
        &self.sites
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Site> {
        self.sites.iter_mut()
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }

    /// Replaces every site at once. The caller guarantees `sites.len() <= capacity`.
    pub(crate) fn replace(&mut self, sites: Vec<Site>) {
        debug_assert!(sites.len() <= self.capacity);
        self.sites = sites;
    }
}
