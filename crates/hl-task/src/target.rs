//! The task's committed target.

use hl_core::{BlockPos, ContainerId, SiteId};
use hl_spatial::{Candidate, Site};

/// A site the task is bound to: enough to path to it and reach its container
/// without going back to the index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SiteRef {
    pub site:      SiteId,
    pub pos:       BlockPos,
    pub container: ContainerId,
}

impl From<&Site> for SiteRef {
    fn from(s: &Site) -> Self {
        Self { site: s.id, pos: s.pos, container: s.container }
    }
}

impl From<&Candidate> for SiteRef {
    fn from(c: &Candidate) -> Self {
        Self { site: c.site, pos: c.pos, container: c.container }
    }
}

/// Which way the current leg is headed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Leg {
    ToSource,
    ToDestination,
    /// Carrying an item nobody accepts back to where it came from.
    ReturnToSource,
}

impl Leg {
    /// `true` if the leg ends by taking items rather than placing them.
    #[inline]
    pub fn picks_up(self) -> bool {
        matches!(self, Leg::ToSource)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Leg::ToSource       => "to_source",
            Leg::ToDestination  => "to_destination",
            Leg::ReturnToSource => "return_to_source",
        }
    }
}

/// The current leg's site plus the two ends of the cycle.
///
/// Created when a pair is committed, re-pointed at the destination when the
/// source leg completes, and dropped when the cycle ends.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TransportTarget {
    pub site:        SiteRef,
    pub leg:         Leg,
    /// Where the carried item was picked up, if known.
    pub source:      Option<SiteRef>,
    /// Destination chosen at pairing time.
    pub destination: Option<SiteRef>,
}

impl TransportTarget {
    pub fn to_source(source: SiteRef, destination: SiteRef) -> Self {
        Self { site: source, leg: Leg::ToSource, source: Some(source), destination: Some(destination) }
    }

    pub fn to_destination(destination: SiteRef, source: Option<SiteRef>) -> Self {
        Self { site: destination, leg: Leg::ToDestination, source, destination: Some(destination) }
    }

    pub fn return_to(source: SiteRef) -> Self {
        Self { site: source, leg: Leg::ReturnToSource, source: Some(source), destination: None }
    }
}
