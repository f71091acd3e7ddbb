//! Sites the agent recently failed to path to.

use hl_core::{BlockPos, Tick};

use crate::ExpiringSet;

/// Default number of ticks a failed site stays excluded from scans.
pub const DEFAULT_UNREACHABLE_EXPIRY_TICKS: u64 = 6000;
/// Default number of sites remembered at once.
pub const DEFAULT_UNREACHABLE_CAPACITY: usize = 64;

/// Per-agent blacklist of unreachable site positions.
///
/// A position recorded at tick `N` is blacklisted for `[N, N + window)` and
/// retried afterwards.  Reaching a site clears it at once, so a site that
/// becomes reachable never stays excluded.
#[derive(Clone, Debug)]
pub struct UnreachableTracker {
    entries: ExpiringSet<BlockPos>,
}

impl UnreachableTracker {
    pub fn new(window: u64, capacity: usize) -> Self {
        Self { entries: ExpiringSet::new(window).with_capacity(capacity) }
    }

    /// Insert or refresh `pos`.
    pub fn record(&mut self, pos: BlockPos, now: Tick) {
        self.entries.record(pos, now);
    }

    pub fn is_blacklisted(&self, pos: BlockPos, now: Tick) -> bool {
        self.entries.contains(&pos, now)
    }

    pub fn clear(&mut self, pos: BlockPos) {
        self.entries.remove(&pos);
    }

    /// Forget every entry, so all sites are scanned again.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn purge_expired(&mut self, now: Tick) {
        self.entries.purge_expired(now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for UnreachableTracker {
    fn default() -> Self {
        Self::new(DEFAULT_UNREACHABLE_EXPIRY_TICKS, DEFAULT_UNREACHABLE_CAPACITY)
    }
}
