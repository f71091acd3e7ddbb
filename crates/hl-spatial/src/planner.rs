//! Path planning trait and a straight-line default implementation.
//!
//! # Pluggability
//!
//! Movement code calls planning through the [`PathPlanner`] trait so a host
//! can swap in a real navigation mesh or grid A* without touching the
//! transport behaviour.  [`LinePlanner`] is enough for flat test worlds: it
//! walks the straight segment and fails if the segment crosses an obstacle
//! cell or exceeds the maximum path length.

use rustc_hash::FxHashSet;

use hl_core::{BlockPos, WorldPos};

use crate::{SpatialError, SpatialResult};

/// Segment sampling step, in blocks.
const SAMPLE_STEP: f32 = 0.25;

// ── Path ──────────────────────────────────────────────────────────────────────

/// A planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Points to pass through in order; the last one is the stand position
    /// next to the target.
    pub waypoints: Vec<WorldPos>,
    /// Total length in blocks.
    pub length: f32,
}

impl Path {
    /// Ticks needed to walk the path at `blocks_per_tick`, rounded up so an
    /// agent never arrives early.  A non-trivial path takes at least one tick.
    pub fn travel_ticks(&self, blocks_per_tick: f32) -> u64 {
        if self.length <= 0.0 || blocks_per_tick <= 0.0 {
            return 0;
        }
        (self.length / blocks_per_tick).ceil().max(1.0) as u64
    }

    /// `true` if start and end coincide.
    pub fn is_trivial(&self) -> bool {
        self.length <= f32::EPSILON
    }

    /// Final waypoint, if any.
    pub fn end(&self) -> Option<WorldPos> {
        self.waypoints.last().copied()
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable path computation.
///
/// Implementations must be `Send + Sync` so one planner can be shared by
/// every agent's movement state.
pub trait PathPlanner: Send + Sync {
    /// Plan from `from` to a stand position at the target cell `to`.
    fn plan(&self, from: WorldPos, to: BlockPos) -> SpatialResult<Path>;
}

// ── LinePlanner ───────────────────────────────────────────────────────────────

/// Straight-line planner over a set of impassable cells.
#[derive(Debug, Clone)]
pub struct LinePlanner {
    obstacles:  FxHashSet<BlockPos>,
    max_length: f32,
}

impl LinePlanner {
    /// A planner with no obstacles and the given maximum path length.
    pub fn new(max_length: f32) -> Self {
        Self { obstacles: FxHashSet::default(), max_length }
    }

    pub fn with_obstacles<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = BlockPos>,
    {
        self.obstacles.extend(cells);
        self
    }

    pub fn add_obstacle(&mut self, cell: BlockPos) {
        self.obstacles.insert(cell);
    }

    pub fn remove_obstacle(&mut self, cell: BlockPos) -> bool {
        self.obstacles.remove(&cell)
    }

    fn segment_blocked(&self, from: WorldPos, to: WorldPos, target: BlockPos) -> bool {
        let length = from.distance(to);
        let steps = (length / SAMPLE_STEP).ceil().max(1.0) as u32;
        (0..=steps).any(|i| {
            let cell = from.lerp(to, i as f32 / steps as f32).block();
            cell != target && self.obstacles.contains(&cell)
        })
    }
}

impl PathPlanner for LinePlanner {
    fn plan(&self, from: WorldPos, to: BlockPos) -> SpatialResult<Path> {
        let end = to.bottom_center();
        let length = from.distance(end);
        if length > self.max_length || self.obstacles.contains(&to) {
            return Err(SpatialError::NoPath { from, to });
        }
        if self.segment_blocked(from, end, to) {
            return Err(SpatialError::NoPath { from, to });
        }
        Ok(Path { waypoints: vec![from, end], length })
    }
}
