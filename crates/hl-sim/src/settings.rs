//! Run-level settings: length, seed, walking speed and trace cadence.

use serde::{Deserialize, Serialize};

use hl_core::Tick;

use crate::{SimError, SimResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Ticks to run for `Sim::run`.
    pub total_ticks: u64,
    /// Global seed; each agent's RNG is derived from it and its id.
    pub seed: u64,
    /// Base walking speed before task speed multipliers.
    pub blocks_per_tick: f32,
    /// Emit a snapshot every N ticks.  `0` disables snapshots.
    pub trace_interval_ticks: u64,
    /// Longest straight-line path the planner accepts.
    pub max_path_length: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            total_ticks:          2_400,
            seed:                 0,
            blocks_per_tick:      0.25,
            trace_interval_ticks: 20,
            max_path_length:      96.0,
        }
    }
}

impl SimSettings {
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// `true` if a snapshot is due at `tick`.
    pub fn snapshot_due(&self, tick: Tick) -> bool {
        self.trace_interval_ticks > 0 && tick.0.is_multiple_of(self.trace_interval_ticks)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.blocks_per_tick.is_finite() && self.blocks_per_tick > 0.0) {
            return Err(SimError::Config(format!(
                "blocks_per_tick must be positive, got {}",
                self.blocks_per_tick
            )));
        }
        if !(self.max_path_length.is_finite() && self.max_path_length > 0.0) {
            return Err(SimError::Config(format!(
                "max_path_length must be positive, got {}",
                self.max_path_length
            )));
        }
        Ok(())
    }
}
