//! Bounded site scanning.
//!
//! A scan looks at the axis-aligned box around the agent (horizontal radius
//! on x/z, independent vertical radius on y), evaluates the source and the
//! destination predicates independently, drops anything the caller excludes,
//! and returns both candidate lists ranked nearest-first.  It has no side
//! effects; an empty result is the ordinary "no work" answer.

use hl_core::{BlockPos, ContainerId, SiteId, WorldPos};

use crate::{Site, SiteIndex, SiteTags, SpatialError, SpatialResult};

/// Default horizontal search radius in blocks.
pub const DEFAULT_HORIZONTAL_RADIUS: i32 = 32;
/// Default vertical search radius in blocks.
pub const DEFAULT_VERTICAL_RADIUS: i32 = 16;

// ── SearchRadii ───────────────────────────────────────────────────────────────

/// Half-extents of the search box.  Both are strictly positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchRadii {
    pub horizontal: i32,
    pub vertical:   i32,
}

impl SearchRadii {
    /// Validated constructor.
    pub fn new(horizontal: i32, vertical: i32) -> SpatialResult<Self> {
        let radii = Self { horizontal, vertical };
        radii.validate()?;
        Ok(radii)
    }

    /// Reject non-positive radii.  Used after deserialising a config, where
    /// the fields were filled without going through [`new`](Self::new).
    pub fn validate(&self) -> SpatialResult<()> {
        if self.horizontal <= 0 || self.vertical <= 0 {
            return Err(SpatialError::InvalidRadius {
                horizontal: self.horizontal,
                vertical:   self.vertical,
            });
        }
        Ok(())
    }

    /// `true` if `pos` lies inside the box centred on `origin`.
    #[inline]
    pub fn contains(&self, origin: WorldPos, pos: BlockPos) -> bool {
        pos.within_box(origin.block(), self.horizontal, self.vertical)
    }
}

impl Default for SearchRadii {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_HORIZONTAL_RADIUS,
            vertical:   DEFAULT_VERTICAL_RADIUS,
        }
    }
}

// ── Candidates ────────────────────────────────────────────────────────────────

/// One site that passed a role predicate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub site:        SiteId,
    pub pos:         BlockPos,
    pub container:   ContainerId,
    /// Squared distance from the scan origin to the site's centre.
    pub distance_sq: f32,
}

/// Result of one scan.  Both lists are sorted nearest-first, ties broken by
/// `SiteId` so results are deterministic.
#[derive(Clone, Debug, Default)]
pub struct Candidates {
    pub sources:      Vec<Candidate>,
    pub destinations: Vec<Candidate>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty()
    }
}

// ── SiteScanner ───────────────────────────────────────────────────────────────

/// A role test over a site's static properties.
pub type SitePredicate = Box<dyn Fn(&Site) -> bool + Send + Sync>;

/// Finds source and destination candidates around an agent.
pub struct SiteScanner {
    radii:          SearchRadii,
    is_source:      SitePredicate,
    is_destination: SitePredicate,
}

impl SiteScanner {
    pub fn new(radii: SearchRadii, is_source: SitePredicate, is_destination: SitePredicate) -> Self {
        Self { radii, is_source, is_destination }
    }

    /// Scanner whose predicates are "site carries any of these tags".
    pub fn from_tags(radii: SearchRadii, source_tags: SiteTags, destination_tags: SiteTags) -> Self {
        Self::new(
            radii,
            Box::new(move |s: &Site| s.tags.intersects(source_tags)),
            Box::new(move |s: &Site| s.tags.intersects(destination_tags)),
        )
    }

    #[inline]
    pub fn radii(&self) -> SearchRadii {
        self.radii
    }

    #[inline]
    pub fn is_source(&self, site: &Site) -> bool {
        (self.is_source)(site)
    }

    #[inline]
    pub fn is_destination(&self, site: &Site) -> bool {
        (self.is_destination)(site)
    }

    /// `true` if `pos` is inside the search box around `origin`.
    #[inline]
    pub fn in_range(&self, origin: WorldPos, pos: BlockPos) -> bool {
        self.radii.contains(origin, pos)
    }

    /// Scan around `origin`, skipping every site for which `excluded` is true.
    pub fn scan<F>(&self, index: &SiteIndex, origin: WorldPos, excluded: F) -> Candidates
    where
        F: Fn(&Site) -> bool,
    {
        let mut out = Candidates::default();
        for site in index.in_box(origin.block(), self.radii.horizontal, self.radii.vertical) {
            let source = self.is_source(site);
            let destination = self.is_destination(site);
            if !(source || destination) || excluded(site) {
                continue;
            }
            let candidate = Candidate {
                site:        site.id,
                pos:         site.pos,
                container:   site.container,
                distance_sq: origin.distance_sq(site.pos.center()),
            };
            if source {
                out.sources.push(candidate);
            }
            if destination {
                out.destinations.push(candidate);
            }
        }
        sort_nearest_first(&mut out.sources);
        sort_nearest_first(&mut out.destinations);
        out
    }
}

fn sort_nearest_first(list: &mut [Candidate]) {
    list.sort_by(|a, b| {
        a.distance_sq
            .total_cmp(&b.distance_sq)
            .then(a.site.cmp(&b.site))
    });
}
