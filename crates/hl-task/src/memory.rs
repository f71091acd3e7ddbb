//! Per-agent memory carried between cycles.

use rustc_hash::FxHashMap;

use hl_core::{BlockPos, ItemKind, ItemStack, MatchMode, Tick};

use crate::{CooldownGate, ExpiringSet, SiteRef, TaskConfig, UnreachableTracker};

// ── DestinationMemory ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Remembered {
    site:   SiteRef,
    stacks: Vec<ItemStack>,
    seen:   Tick,
}

/// What the agent last saw inside destinations it has visited.
///
/// Lets a carrying agent head straight for a container that already holds
/// the same item instead of the nearest one that merely has room.
#[derive(Clone, Debug)]
pub struct DestinationMemory {
    entries: FxHashMap<BlockPos, Remembered>,
    window:  u64,
}

impl DestinationMemory {
    pub fn new(window: u64) -> Self {
        Self { entries: FxHashMap::default(), window }
    }

    /// Record the contents of `site` as seen at `now`.
    pub fn remember(&mut self, site: SiteRef, stacks: &[ItemStack], now: Tick) {
        self.purge_expired(now);
        let stacks = stacks.iter().filter(|s| !s.is_empty()).copied().collect();
        self.entries.insert(site.pos, Remembered { site, stacks, seen: now });
    }

    /// Remembered, unexpired sites holding something that matches `stack`,
    /// most recently seen first.
    pub fn recall(&self, stack: &ItemStack, mode: MatchMode, now: Tick) -> Vec<SiteRef> {
        let mut hits: Vec<&Remembered> = self
            .entries
            .values()
            .filter(|r| now.since(r.seen) < self.window)
            .filter(|r| r.stacks.iter().any(|s| s.matches(stack, mode)))
            .collect();
        hits.sort_by(|a, b| b.seen.cmp(&a.seen).then(a.site.site.cmp(&b.site.site)));
        hits.into_iter().map(|r| r.site).collect()
    }

    pub fn forget(&mut self, pos: BlockPos) {
        self.entries.remove(&pos);
    }

    pub fn purge_expired(&mut self, now: Tick) {
        let window = self.window;
        self.entries.retain(|_, r| now.since(r.seen) < window);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── HaulerMemory ──────────────────────────────────────────────────────────────

/// Everything one agent remembers across ticks, outside the task's own
/// state machine.  Never shared between agents.
#[derive(Clone, Debug)]
pub struct HaulerMemory {
    pub cooldown:             CooldownGate,
    pub unreachable:          UnreachableTracker,
    /// Sites whose last interaction yielded or accepted nothing.
    pub exhausted:            ExpiringSet<BlockPos>,
    /// Item kinds no destination would take.
    pub blocked_items:        ExpiringSet<ItemKind>,
    pub destinations:         DestinationMemory,
    /// The stack currently carried.
    pub hand:                 Option<ItemStack>,
    /// Set by a completed delivery.  While set, a scan that finds nothing
    /// forgets the unreachable sites and scans once more; the retry clears
    /// it again.
    pub last_round_succeeded: bool,
}

impl HaulerMemory {
    pub fn new(config: &TaskConfig) -> Self {
        Self {
            cooldown:             CooldownGate::default(),
            unreachable:          UnreachableTracker::new(
                config.unreachable_expiry_ticks,
                config.unreachable_capacity,
            ),
            exhausted:            ExpiringSet::new(config.exhausted_expiry_ticks),
            blocked_items:        ExpiringSet::new(config.item_blacklist_ticks),
            destinations:         DestinationMemory::new(config.memory_expiry_ticks),
            hand:                 None,
            last_round_succeeded: false,
        }
    }

    /// `true` if the agent is carrying a non-empty stack.
    #[inline]
    pub fn is_carrying(&self) -> bool {
        self.hand.is_some_and(|s| !s.is_empty())
    }

    #[inline]
    pub fn is_item_blocked(&self, kind: ItemKind, now: Tick) -> bool {
        self.blocked_items.contains(&kind, now)
    }
}
