//! Site table and spatial index.
//!
//! # Data layout
//!
//! Sites are stored in a `Vec<Option<Site>>` indexed by `SiteId`; removed
//! sites leave a `None` hole so ids stay stable for agents that still hold
//! them.  An R-tree (via `rstar`) over integer `[x, y, z]` cells answers box
//! queries, so a scan touches only the sites inside the search volume rather
//! than the whole world.

use rstar::{AABB, RTree, RTreeObject};

use hl_core::{BlockPos, ContainerId, SiteId};

use crate::{Site, SiteTags, SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq)]
struct SiteEntry {
    point: [i32; 3],
    id:    SiteId,
}

impl RTreeObject for SiteEntry {
    type Envelope = AABB<[i32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

#[inline]
fn point_of(pos: BlockPos) -> [i32; 3] {
    [pos.x, pos.y, pos.z]
}

// ── SiteIndex ─────────────────────────────────────────────────────────────────

/// All sites in the world plus a 3-D index for bounded queries.
///
/// Do not construct directly; use [`SiteIndexBuilder`].
pub struct SiteIndex {
    sites:   Vec<Option<Site>>,
    spatial: RTree<SiteEntry>,
}

impl SiteIndex {
    /// An index with no sites.
    pub fn empty() -> Self {
        SiteIndexBuilder::new().build()
    }

    /// Number of live (not removed) sites.
    pub fn len(&self) -> usize {
        self.spatial.size()
    }

    pub fn is_empty(&self) -> bool {
        self.spatial.size() == 0
    }

    /// Look up a live site.
    #[inline]
    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.index()).and_then(Option::as_ref)
    }

    /// Every live site in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Site> + '_ {
        self.sites.iter().flatten()
    }

    /// The other half of a linked site, if both halves are live.
    pub fn linked(&self, site: &Site) -> Option<&Site> {
        site.linked.and_then(|id| self.get(id))
    }

    /// Iterate over every live site inside the box of half-extents
    /// `horizontal` (x/z) and `vertical` (y) centred on `center`.
    ///
    /// Bounds are inclusive and clamp at the edges of the `i32` grid.  Cost
    /// is proportional to the number of sites in the box, not the world size.
    pub fn in_box(
        &self,
        center:     BlockPos,
        horizontal: i32,
        vertical:   i32,
    ) -> impl Iterator<Item = &Site> + '_ {
        let envelope = AABB::from_corners(
            [
                center.x.saturating_sub(horizontal),
                center.y.saturating_sub(vertical),
                center.z.saturating_sub(horizontal),
            ],
            [
                center.x.saturating_add(horizontal),
                center.y.saturating_add(vertical),
                center.z.saturating_add(horizontal),
            ],
        );
        self.spatial
            .locate_in_envelope(&envelope)
            .filter_map(move |e| self.get(e.id))
    }

    /// Replace a site's tags (e.g. when the block at that cell changes kind).
    pub fn set_tags(&mut self, id: SiteId, tags: SiteTags) -> SpatialResult<()> {
        let site = self
            .sites
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(SpatialError::SiteNotFound(id))?;
        site.tags = tags;
        Ok(())
    }

    /// Remove a site from the world.  Its id is never reused.
    pub fn remove(&mut self, id: SiteId) -> SpatialResult<Site> {
        let site = self
            .sites
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(SpatialError::SiteNotFound(id))?;
        self.spatial.remove(&SiteEntry { point: point_of(site.pos), id });
        Ok(site)
    }
}

// ── SiteIndexBuilder ──────────────────────────────────────────────────────────

/// Construct a [`SiteIndex`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use hl_core::{BlockPos, ContainerId};
/// use hl_spatial::{SiteIndexBuilder, SiteTags};
///
/// let mut b = SiteIndexBuilder::new();
/// let left  = b.add_site(BlockPos::new(0, 64, 0), ContainerId(0), SiteTags::bit(1));
/// let right = b.add_site(BlockPos::new(1, 64, 0), ContainerId(0), SiteTags::bit(1));
/// b.link(left, right);
/// let index = b.build();
/// assert_eq!(index.len(), 2);
/// ```
pub struct SiteIndexBuilder {
    sites: Vec<Site>,
}

impl SiteIndexBuilder {
    pub fn new() -> Self {
        Self { sites: Vec::new() }
    }

    pub fn with_capacity(sites: usize) -> Self {
        Self { sites: Vec::with_capacity(sites) }
    }

    /// Add a site and return its `SiteId` (sequential from 0).
    pub fn add_site(&mut self, pos: BlockPos, container: ContainerId, tags: SiteTags) -> SiteId {
        let id = SiteId(self.sites.len() as u32);
        self.sites.push(Site { id, pos, container, tags, linked: None });
        id
    }

    /// Mark two sites as halves of one two-cell container.
    ///
    /// # Panics
    /// Panics if either id was not returned by `add_site`.
    pub fn link(&mut self, a: SiteId, b: SiteId) {
        self.sites[a.index()].linked = Some(b);
        self.sites[b.index()].linked = Some(a);
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Consume the builder and bulk-load the R-tree.
    pub fn build(self) -> SiteIndex {
        let entries: Vec<SiteEntry> = self
            .sites
            .iter()
            .map(|s| SiteEntry { point: point_of(s.pos), id: s.id })
            .collect();
        SiteIndex {
            sites:   self.sites.into_iter().map(Some).collect(),
            spatial: RTree::bulk_load(entries),
        }
    }
}

impl Default for SiteIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
