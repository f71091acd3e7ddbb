//! Sites: tagged world locations that front a container.

use std::ops::BitOr;

use hl_core::{BlockPos, ContainerId, SiteId};

/// A small tag bitset.  Tags are not mutually exclusive: the same site may be
/// tagged both source- and destination-capable, and each role is evaluated
/// independently.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SiteTags(pub u32);

impl SiteTags {
    pub const NONE: SiteTags = SiteTags(0);

    /// Tag with only bit `n` set.
    #[inline]
    pub const fn bit(n: u32) -> SiteTags {
        SiteTags(1 << n)
    }

    /// `true` if every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: SiteTags) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if `self` and `other` share at least one bit.
    #[inline]
    pub fn intersects(self, other: SiteTags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SiteTags {
    type Output = SiteTags;
    fn bitor(self, rhs: SiteTags) -> SiteTags {
        SiteTags(self.0 | rhs.0)
    }
}

/// A world location backed by a container.
///
/// The container itself (capacity, contents, viewers) is owned by the world;
/// a site only holds a handle to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub id:        SiteId,
    pub pos:       BlockPos,
    pub container: ContainerId,
    pub tags:      SiteTags,
    /// The other half of a two-cell container, if any.
    pub linked:    Option<SiteId>,
}
