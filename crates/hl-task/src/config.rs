//! Tunable parameters of the transport task.
//!
//! Every field has a documented default; [`TaskConfig::validate`] rejects
//! malformed values once, at setup, so the per-tick path never has to.

use hl_core::MatchMode;
use hl_spatial::SearchRadii;

use crate::unreachable::{DEFAULT_UNREACHABLE_CAPACITY, DEFAULT_UNREACHABLE_EXPIRY_TICKS};
use crate::{OutcomeTable, TaskError, TaskResult};

/// Speed multiplier while transporting.
pub const DEFAULT_SPEED_MULTIPLIER: f32 = 1.0;
/// One minute at 20 ticks per second.
pub const DEFAULT_TRAVEL_TIMEOUT_TICKS: u64 = 1200;
/// Speed multiplier of the higher-priority panic behaviour.  Both multipliers
/// scale the same base speed.
pub const PANIC_SPEED_MULTIPLIER: f32 = 1.5;

/// How a source is chosen among the viable candidates.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourcePolicy {
    /// Always the nearest.
    #[default]
    Nearest,
    /// Random, weighted by `1 / (d² + 1)`.
    WeightedByDistance,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TaskConfig {
    pub radii:                    SearchRadii,
    pub speed_multiplier:         f32,
    /// A travel leg still unfinished after this many ticks is abandoned and
    /// its site marked unreachable.
    pub travel_timeout_ticks:     u64,
    /// Cooldown after a completed cycle.
    pub success_cooldown_ticks:   u32,
    /// Cooldown after an abandoned or empty-handed cycle.
    pub abandon_cooldown_ticks:   u32,
    /// Cooldown after a scan that found no usable pair.  `0` retries on the
    /// next tick.
    pub no_target_cooldown_ticks: u32,
    pub unreachable_expiry_ticks: u64,
    pub unreachable_capacity:     usize,
    /// How long a site that yielded or accepted nothing is skipped.
    pub exhausted_expiry_ticks:   u64,
    /// Units picked up per trip.
    pub max_carry:                u32,
    pub match_mode:               MatchMode,
    /// How long a remembered destination stays useful.
    pub memory_expiry_ticks:      u64,
    /// How long an item kind nobody would accept is left alone.
    pub item_blacklist_ticks:     u64,
    pub source_policy:            SourcePolicy,
    pub outcomes:                 OutcomeTable,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            radii:                    SearchRadii::default(),
            speed_multiplier:         DEFAULT_SPEED_MULTIPLIER,
            travel_timeout_ticks:     DEFAULT_TRAVEL_TIMEOUT_TICKS,
            success_cooldown_ticks:   140,
            abandon_cooldown_ticks:   40,
            no_target_cooldown_ticks: 140,
            unreachable_expiry_ticks: DEFAULT_UNREACHABLE_EXPIRY_TICKS,
            unreachable_capacity:     DEFAULT_UNREACHABLE_CAPACITY,
            exhausted_expiry_ticks:   6000,
            max_carry:                16,
            match_mode:               MatchMode::default(),
            memory_expiry_ticks:      24_000,
            item_blacklist_ticks:     6000,
            source_policy:            SourcePolicy::default(),
            outcomes:                 OutcomeTable::default(),
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> TaskResult<()> {
        self.radii
            .validate()
            .map_err(|e| TaskError::Config(e.to_string()))?;
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(TaskError::Config(format!(
                "speed_multiplier must be positive, got {}",
                self.speed_multiplier
            )));
        }
        if self.travel_timeout_ticks == 0 {
            return Err(TaskError::Config("travel_timeout_ticks must be at least 1".into()));
        }
        if self.max_carry == 0 {
            return Err(TaskError::Config("max_carry must be at least 1".into()));
        }
        if self.unreachable_capacity == 0 {
            return Err(TaskError::Config("unreachable_capacity must be at least 1".into()));
        }
        self.outcomes.validate()
    }
}
