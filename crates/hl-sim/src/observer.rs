//! Simulation observer trait for progress reporting and data collection.

use hl_core::{AgentId, BlockPos, DisplayState, ItemStack, Tick, WorldPos};
use hl_task::TaskState;

/// One agent's state at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct HaulerSnapshot {
    pub agent:     AgentId,
    pub state:     TaskState,
    pub display:   DisplayState,
    pub position:  WorldPos,
    pub open_site: Option<BlockPos>,
    pub carrying:  Option<ItemStack>,
    pub cooldown:  u32,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, busy: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {busy} agents hauling");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `busy` counts agents whose task
    /// ended the tick outside `Idle`.
    fn on_tick_end(&mut self, _tick: Tick, _busy: usize) {}

    /// Called every `settings.trace_interval_ticks` ticks with one row per
    /// agent in ascending id order.
    fn on_snapshot(&mut self, _tick: Tick, _haulers: &[HaulerSnapshot]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
