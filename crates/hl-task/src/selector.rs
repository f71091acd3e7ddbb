//! Choosing what to work on.
//!
//! The selector turns a scan into a committed pair.  Three filters sit on
//! top of the scanner's tag predicates:
//!
//! - **Exclusion**: a site (or its linked half) that is blacklisted as
//!   unreachable or recently yielded nothing never becomes a candidate.
//! - **Queueing**: a site whose container has any viewer is skipped, and the
//!   next-best candidate is tried.  The check is advisory and is made only at
//!   selection time; two agents may still pick the same container in the
//!   same tick.
//! - **Contents**: a source must hold something takeable and a destination
//!   must accept it under the configured [`MatchMode`].

use tracing::debug;

use hl_core::{ItemStack, MatchMode, SiteId, Tick};
use hl_spatial::{Candidate, Site, SiteIndex, SiteScanner};

use crate::{ContainerHost, HaulerMemory, Leg, SiteRef, SourcePolicy, TaskContext};

/// A committed (source, destination) pair.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SelectedPair {
    pub source:      SiteRef,
    pub destination: SiteRef,
}

pub struct TargetSelector {
    scanner:    SiteScanner,
    match_mode: MatchMode,
    policy:     SourcePolicy,
}

impl TargetSelector {
    pub fn new(scanner: SiteScanner, match_mode: MatchMode, policy: SourcePolicy) -> Self {
        Self { scanner, match_mode, policy }
    }

    #[inline]
    pub fn scanner(&self) -> &SiteScanner {
        &self.scanner
    }

    #[inline]
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    // ── Predicates ────────────────────────────────────────────────────────

    /// `true` if `site` or its linked half is blacklisted or exhausted.
    pub fn is_excluded(&self, sites: &SiteIndex, memory: &HaulerMemory, now: Tick, site: &Site) -> bool {
        let hit = |s: &Site| {
            memory.unreachable.is_blacklisted(s.pos, now) || memory.exhausted.contains(&s.pos, now)
        };
        hit(site) || sites.linked(site).is_some_and(hit)
    }

    /// The queueing predicate: someone is using this container (or the
    /// container of its linked half) right now.
    pub fn is_occupied(&self, sites: &SiteIndex, containers: &dyn ContainerHost, site: &Site) -> bool {
        containers.viewer_count(site.container) > 0
            || sites.linked(site).is_some_and(|other| {
                other.container != site.container && containers.viewer_count(other.container) > 0
            })
    }

    /// Whether a committed site may still be travelled to for `leg`: it
    /// exists at the same position, still plays its role, and its container
    /// exists and is unlocked.
    pub fn is_still_valid(&self, ctx: &TaskContext<'_>, target: &SiteRef, leg: Leg) -> bool {
        let Some(site) = ctx.sites.get(target.site) else {
            return false;
        };
        if site.pos != target.pos {
            return false;
        }
        let role = match leg {
            Leg::ToSource | Leg::ReturnToSource => self.scanner.is_source(site),
            Leg::ToDestination => self.scanner.is_destination(site),
        };
        role && ctx
            .containers
            .snapshot(target.container)
            .is_some_and(|snap| !snap.locked)
    }

    /// Whether `target` would take `stack` now: unoccupied and accepting.
    pub fn accepts(&self, ctx: &TaskContext<'_>, target: &SiteRef, stack: &ItemStack) -> bool {
        let Some(site) = ctx.sites.get(target.site) else {
            return false;
        };
        if self.is_occupied(ctx.sites, &*ctx.containers, site) {
            debug!(agent = %ctx.agent, site = %site.pos, "destination occupied, skipping");
            return false;
        }
        ctx.containers
            .snapshot(target.container)
            .is_some_and(|snap| snap.accepts(stack, self.match_mode))
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Pick a source holding something takeable and the nearest destination
    /// that would accept it.  `None` means there is no work in range.
    pub fn select_pair(&self, ctx: &mut TaskContext<'_>, memory: &HaulerMemory) -> Option<SelectedPair> {
        let now = ctx.tick;
        let sites = ctx.sites;
        let found = self
            .scanner
            .scan(sites, ctx.position, |s| self.is_excluded(sites, memory, now, s));
        if found.sources.is_empty() || found.destinations.is_empty() {
            return None;
        }

        let mut viable: Vec<(Candidate, ItemStack)> = found
            .sources
            .iter()
            .filter_map(|c| {
                let site = sites.get(c.site)?;
                if self.is_occupied(sites, &*ctx.containers, site) {
                    debug!(agent = %ctx.agent, site = %site.pos, "source occupied, skipping");
                    return None;
                }
                let snap = ctx.containers.snapshot(c.container)?;
                let first = *snap.first_takeable(|kind| memory.is_item_blocked(kind, now))?;
                Some((*c, first))
            })
            .collect();

        while !viable.is_empty() {
            let pick = match self.policy {
                SourcePolicy::Nearest => 0,
                SourcePolicy::WeightedByDistance => {
                    let weights: Vec<f64> = viable
                        .iter()
                        .map(|(c, _)| 1.0 / (f64::from(c.distance_sq) + 1.0))
                        .collect();
                    ctx.rng.weighted_index(&weights).unwrap_or(0)
                }
            };
            let (source, first) = viable.remove(pick);
            let destination = found.destinations.iter().find(|d| {
                d.site != source.site
                    && d.container != source.container
                    && self.accepts(ctx, &SiteRef::from(*d), &first)
            });
            if let Some(destination) = destination {
                return Some(SelectedPair {
                    source:      SiteRef::from(&source),
                    destination: SiteRef::from(destination),
                });
            }
        }
        None
    }

    /// Find a destination for a carried stack, skipping `skip`.
    ///
    /// Remembered destinations already holding a matching item are tried
    /// first; entries that are gone, out of range, or no longer
    /// destinations are forgotten on the way.  Otherwise the nearest
    /// accepting destination in range wins.
    pub fn select_destination(
        &self,
        ctx:    &TaskContext<'_>,
        memory: &mut HaulerMemory,
        stack:  &ItemStack,
        skip:   Option<SiteId>,
    ) -> Option<SiteRef> {
        let now = ctx.tick;
        let sites = ctx.sites;
        memory.destinations.purge_expired(now);

        for remembered in memory.destinations.recall(stack, self.match_mode, now) {
            if Some(remembered.site) == skip {
                continue;
            }
            let live = sites.get(remembered.site).filter(|s| {
                s.pos == remembered.pos
                    && self.scanner.is_destination(s)
                    && self.scanner.in_range(ctx.position, s.pos)
            });
            let Some(site) = live else {
                memory.destinations.forget(remembered.pos);
                continue;
            };
            if !self.is_excluded(sites, memory, now, site) && self.accepts(ctx, &remembered, stack) {
                return Some(remembered);
            }
        }

        let found = self
            .scanner
            .scan(sites, ctx.position, |s| self.is_excluded(sites, memory, now, s));
        found
            .destinations
            .iter()
            .map(SiteRef::from)
            .find(|d| Some(d.site) != skip && self.accepts(ctx, d, stack))
    }

    /// Find a source with room to take a carried stack back, preferring the
    /// one it came from.
    pub fn select_return_source(
        &self,
        ctx:    &TaskContext<'_>,
        memory: &HaulerMemory,
        stack:  &ItemStack,
        origin: Option<SiteRef>,
    ) -> Option<SiteRef> {
        let now = ctx.tick;
        let sites = ctx.sites;
        let has_room = |target: &SiteRef| {
            let Some(site) = sites.get(target.site) else {
                return false;
            };
            site.pos == target.pos
                && !self.is_occupied(sites, &*ctx.containers, site)
                && ctx
                    .containers
                    .snapshot(target.container)
                    .is_some_and(|snap| !snap.locked && snap.has_room_for(stack))
        };

        if let Some(origin) = origin.filter(|o| has_room(o)) {
            return Some(origin);
        }
        let found = self
            .scanner
            .scan(sites, ctx.position, |s| self.is_excluded(sites, memory, now, s));
        found.sources.iter().map(SiteRef::from).find(|s| has_room(s))
    }
}
