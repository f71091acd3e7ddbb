//! The `Sim` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use hl_core::{AgentId, AgentRng, Tick};
use hl_spatial::{PathPlanner, SiteIndex};
use hl_task::{HaulerMemory, TaskContext, TaskState, TransportPlan, TransportTask};

use crate::{
    ContainerStore, HaulerSnapshot, MotionEngine, Presentation, SimObserver, SimResult,
    SimSettings,
};

/// One simulated agent's task and memory.
pub struct Hauler {
    pub task:   TransportTask,
    pub memory: HaulerMemory,
}

impl Hauler {
    pub fn new(plan: Arc<TransportPlan>) -> Self {
        let memory = plan.new_memory();
        Self { task: TransportTask::new(plan), memory }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The reference world and its tick loop.
///
/// Each tick runs three phases:
///
/// 1. **Arrivals**: journeys whose arrival tick has come are completed.
/// 2. **Interrupts**: scheduled interrupts for this tick are delivered.
/// 3. **Tasks**: in ascending `AgentId` order, each agent's cooldown counts
///    down once and its task ticks once.
///
/// Agents run sequentially, so an agent opening a container this tick is
/// already visible to higher-numbered agents selecting targets.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PathPlanner> {
    pub settings:     SimSettings,
    /// The tick `run` will process next.
    pub clock:        Tick,
    pub sites:        SiteIndex,
    pub containers:   ContainerStore,
    pub motion:       MotionEngine<P>,
    pub presentation: Presentation,
    pub haulers:      Vec<Hauler>,
    /// Per-agent RNGs, split from `haulers` for disjoint borrows.
    pub rngs:         Vec<AgentRng>,
    pub(crate) interrupts: BTreeMap<Tick, Vec<AgentId>>,
}

impl<P: PathPlanner> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `settings.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.haulers.len(),
            sites = self.sites.len(),
            end = %self.settings.end_tick(),
            "simulation started",
        );
        while self.clock < self.settings.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock);
        info!(tick = %self.clock, "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.haulers.len()
    }

    pub fn hauler(&self, agent: AgentId) -> Option<&Hauler> {
        self.haulers.get(agent.index())
    }

    /// Queue an interrupt for `agent` at the start of `tick`.
    pub fn schedule_interrupt(&mut self, tick: Tick, agent: AgentId) {
        self.interrupts.entry(tick).or_default().push(agent);
    }

    /// Interrupt `agent` now.  Returns `false` if its task refused (idle or
    /// interacting) or the agent does not exist.
    pub fn interrupt(&mut self, agent: AgentId) -> bool {
        self.interrupt_at(agent, self.clock)
    }

    /// One row per agent describing its state at `now`.
    pub fn snapshot(&self, now: Tick) -> Vec<HaulerSnapshot> {
        self.haulers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let agent = AgentId(i as u32);
                let view  = self.presentation.view(agent).cloned().unwrap_or_default();
                HaulerSnapshot {
                    agent,
                    state:     h.task.state(),
                    display:   view.display,
                    position:  self.motion.position(agent, now),
                    open_site: view.open_site,
                    carrying:  h.memory.hand,
                    cooldown:  h.memory.cooldown.remaining(),
                }
            })
            .collect()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock;
        observer.on_tick_start(now);
        let busy = self.process_tick(now);
        observer.on_tick_end(now, busy);
        if self.settings.snapshot_due(now) {
            observer.on_snapshot(now, &self.snapshot(now));
        }
        self.clock = now.next();
    }

    fn process_tick(&mut self, now: Tick) -> usize {
        // ── Phase 1: arrivals ─────────────────────────────────────────────
        for (agent, pos) in self.motion.tick_arrivals(now) {
            debug!(%agent, tick = %now, x = pos.x, y = pos.y, z = pos.z, "arrived");
        }

        // ── Phase 2: scheduled interrupts ─────────────────────────────────
        if let Some(due) = self.interrupts.remove(&now) {
            for agent in due {
                self.interrupt_at(agent, now);
            }
        }

        // ── Phase 3: tasks, ascending AgentId ─────────────────────────────
        let mut busy = 0;
        for (i, hauler) in self.haulers.iter_mut().enumerate() {
            let agent = AgentId(i as u32);
            hauler.memory.cooldown.count_down();
            let mut ctx = TaskContext {
                tick:       now,
                agent,
                position:   self.motion.position(agent, now),
                sites:      &self.sites,
                navigator:  &mut self.motion,
                containers: &mut self.containers,
                presenter:  &mut self.presentation,
                rng:        &mut self.rngs[i],
            };
            if hauler.task.tick(&mut ctx, &mut hauler.memory) != TaskState::Idle {
                busy += 1;
            }
        }
        busy
    }

    fn interrupt_at(&mut self, agent: AgentId, now: Tick) -> bool {
        let i = agent.index();
        let (Some(hauler), Some(rng)) = (self.haulers.get_mut(i), self.rngs.get_mut(i)) else {
            return false;
        };
        let mut ctx = TaskContext {
            tick:       now,
            agent,
            position:   self.motion.position(agent, now),
            sites:      &self.sites,
            navigator:  &mut self.motion,
            containers: &mut self.containers,
            presenter:  &mut self.presentation,
            rng,
        };
        let accepted = hauler.task.interrupt(&mut ctx);
        if !accepted {
            debug!(%agent, tick = %now, state = %hauler.task.state(), "interrupt refused");
        }
        accepted
    }
}
