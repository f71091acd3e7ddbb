//! Per-agent movement along planned paths, exposed to tasks as a `Navigator`.
//!
//! Movement is continuous: an agent in transit is somewhere on its path,
//! interpolated by elapsed ticks, and snaps to the path's end on
//! `arrival_tick`.  Arrival is only observed on ticks after the one that
//! planned the path.

use rustc_hash::FxHashMap;

use hl_core::{AgentId, BlockPos, PathHandle, Tick, WorldPos};
use hl_spatial::{Path, PathPlanner, SpatialResult};
use hl_task::{Navigator, PathStatus};

/// Movement state of one agent.
///
/// Stationary agents (`in_transit = false`) sit at `origin`.  Agents in
/// transit walk `path` from `departure_tick` until `arrival_tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    pub in_transit:     bool,
    /// Where the agent started its current path, or where it stands.
    pub origin:         WorldPos,
    pub path:           Option<Path>,
    pub handle:         Option<PathHandle>,
    pub departure_tick: Tick,
    pub arrival_tick:   Tick,
}

impl MovementState {
    pub fn stationary(pos: WorldPos, tick: Tick) -> Self {
        Self {
            in_transit:     false,
            origin:         pos,
            path:           None,
            handle:         None,
            departure_tick: tick,
            arrival_tick:   tick,
        }
    }

    /// Fraction of the journey completed at `now`, in `[0.0, 1.0]`.
    pub fn progress(&self, now: Tick) -> f32 {
        if !self.in_transit || self.arrival_tick <= self.departure_tick {
            return 1.0;
        }
        let elapsed = now.since(self.departure_tick) as f32;
        let total   = self.arrival_tick.since(self.departure_tick) as f32;
        (elapsed / total).min(1.0)
    }

    /// Position at `now`.
    pub fn position(&self, now: Tick) -> WorldPos {
        match (&self.path, self.in_transit) {
            (Some(path), true) => point_along(self.origin, path, self.progress(now)),
            _ => self.origin,
        }
    }
}

/// Point at `fraction` of the path's length, walking its waypoints in order.
fn point_along(start: WorldPos, path: &Path, fraction: f32) -> WorldPos {
    let Some(end) = path.end() else {
        return start;
    };
    if path.is_trivial() || fraction >= 1.0 {
        return end;
    }
    let mut remaining = path.length * fraction.max(0.0);
    let mut from = start;
    for &to in &path.waypoints {
        let seg = from.distance(to);
        if seg > 0.0 && remaining <= seg {
            return from.lerp(to, remaining / seg);
        }
        remaining -= seg;
        from = to;
    }
    end
}

// ── MotionEngine ──────────────────────────────────────────────────────────────

/// Wraps a [`PathPlanner`] and every agent's [`MovementState`].
///
/// `P` is picked at compile time; [`hl_spatial::LinePlanner`] is the default
/// used by scenarios.
pub struct MotionEngine<P: PathPlanner> {
    pub planner:         P,
    pub states:          Vec<MovementState>,
    /// Base walking speed.  Task speed multipliers scale it.
    pub blocks_per_tick: f32,
    /// Live handle → owning agent.  Replaced or stopped paths are removed.
    handles:             FxHashMap<PathHandle, AgentId>,
    next_handle:         u32,
    now:                 Tick,
}

impl<P: PathPlanner> MotionEngine<P> {
    pub fn new(planner: P, blocks_per_tick: f32) -> Self {
        Self {
            planner,
            states: Vec::new(),
            blocks_per_tick,
            handles: FxHashMap::default(),
            next_handle: 0,
            now: Tick::ZERO,
        }
    }

    /// Add a stationary agent at `pos`.  Agents must be added in id order.
    pub fn add_agent(&mut self, pos: WorldPos) -> AgentId {
        let id = AgentId(self.states.len() as u32);
        self.states.push(MovementState::stationary(pos, self.now));
        id
    }

    /// Teleport `agent` to `pos`, cancelling any path.
    pub fn place(&mut self, agent: AgentId, pos: WorldPos) {
        self.drop_handle(agent);
        if let Some(state) = self.states.get_mut(agent.index()) {
            *state = MovementState::stationary(pos, self.now);
        }
    }

    pub fn position(&self, agent: AgentId, now: Tick) -> WorldPos {
        self.states
            .get(agent.index())
            .map_or_else(WorldPos::default, |s| s.position(now))
    }

    pub fn is_moving(&self, agent: AgentId) -> bool {
        self.states.get(agent.index()).is_some_and(|s| s.in_transit)
    }

    /// Finish every journey whose `arrival_tick <= now`, and make `now` the
    /// departure tick for paths planned later this tick.
    ///
    /// Returns `(agent, position)` for each arrival.
    pub fn tick_arrivals(&mut self, now: Tick) -> Vec<(AgentId, WorldPos)> {
        self.now = now;
        let mut arrived = Vec::new();
        for (i, state) in self.states.iter_mut().enumerate() {
            if !state.in_transit || state.arrival_tick > now {
                continue;
            }
            let end = state.position(now);
            state.in_transit     = false;
            state.origin         = end;
            state.departure_tick = now;
            arrived.push((AgentId(i as u32), end));
        }
        arrived
    }

    fn drop_handle(&mut self, agent: AgentId) {
        if let Some(handle) = self.states.get_mut(agent.index()).and_then(|s| s.handle.take()) {
            self.handles.remove(&handle);
        }
    }
}

impl<P: PathPlanner> Navigator for MotionEngine<P> {
    fn plan_path(
        &mut self,
        agent: AgentId,
        from:  WorldPos,
        to:    BlockPos,
        speed: f32,
    ) -> SpatialResult<PathHandle> {
        let path  = self.planner.plan(from, to)?;
        let ticks = path.travel_ticks(self.blocks_per_tick * speed).max(1);

        self.drop_handle(agent);
        let handle = PathHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        if let Some(state) = self.states.get_mut(agent.index()) {
            *state = MovementState {
                in_transit:     true,
                origin:         from,
                path:           Some(path),
                handle:         Some(handle),
                departure_tick: self.now,
                arrival_tick:   self.now.offset(ticks),
            };
            self.handles.insert(handle, agent);
        }
        Ok(handle)
    }

    fn path_status(&self, path: PathHandle) -> PathStatus {
        match self.handles.get(&path).and_then(|agent| self.states.get(agent.index())) {
            Some(state) if state.in_transit => PathStatus::Following,
            Some(_) => PathStatus::Arrived,
            None => PathStatus::Lost,
        }
    }

    fn stop(&mut self, agent: AgentId) {
        let now = self.now;
        self.drop_handle(agent);
        if let Some(state) = self.states.get_mut(agent.index()) {
            *state = MovementState::stationary(state.position(now), now);
        }
    }
}
