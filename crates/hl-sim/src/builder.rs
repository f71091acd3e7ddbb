//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeMap;
use std::sync::Arc;

use hl_core::{AgentId, AgentRng, ItemStack, Tick, WorldPos};
use hl_spatial::{PathPlanner, SiteIndex};
use hl_task::TransportPlan;

use crate::{ContainerStore, Hauler, MotionEngine, Presentation, Sim, SimError, SimResult, SimSettings};

/// Fluent builder for [`Sim<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                         |
/// |-----------------------|---------------------------------|
/// | `.agents(v)`          | No agents                       |
/// | `.carrying(v)`        | Every agent empty-handed        |
/// | `.interrupt(t, a)`    | No scheduled interrupts         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(settings, plan, sites, containers, LinePlanner::new(96.0))
///     .agents(vec![WorldPos::new(0.5, 0.0, 0.5)])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathPlanner> {
    settings:   SimSettings,
    plan:       TransportPlan,
    sites:      SiteIndex,
    containers: ContainerStore,
    planner:    P,
    agents:     Vec<WorldPos>,
    carrying:   Option<Vec<Option<ItemStack>>>,
    interrupts: BTreeMap<Tick, Vec<AgentId>>,
}

impl<P: PathPlanner> SimBuilder<P> {
    pub fn new(
        settings:   SimSettings,
        plan:       TransportPlan,
        sites:      SiteIndex,
        containers: ContainerStore,
        planner:    P,
    ) -> Self {
        Self {
            settings,
            plan,
            sites,
            containers,
            planner,
            agents:     Vec::new(),
            carrying:   None,
            interrupts: BTreeMap::new(),
        }
    }

    /// Starting position of each agent; agent `i` gets `AgentId(i)`.
    pub fn agents(mut self, positions: Vec<WorldPos>) -> Self {
        self.agents = positions;
        self
    }

    /// What each agent holds at tick 0.  Must be one entry per agent.
    pub fn carrying(mut self, hands: Vec<Option<ItemStack>>) -> Self {
        self.carrying = Some(hands);
        self
    }

    pub fn interrupt(mut self, tick: Tick, agent: AgentId) -> Self {
        self.interrupts.entry(tick).or_default().push(agent);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.settings.validate()?;
        let agent_count = self.agents.len();

        let hands = match self.carrying {
            Some(h) if h.len() != agent_count => {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      h.len(),
                    what:     "carried stacks",
                });
            }
            Some(h) => h,
            None => vec![None; agent_count],
        };

        if let Some(site) = self.sites.iter().find(|s| self.containers.get(s.container).is_none()) {
            return Err(SimError::Config(format!(
                "{} at {:?} uses unknown {}",
                site.id, site.pos, site.container
            )));
        }
        if let Some(agent) = self.interrupts.values().flatten().find(|a| a.index() >= agent_count) {
            return Err(SimError::Config(format!("interrupt scheduled for unknown {agent}")));
        }

        let mut motion = MotionEngine::new(self.planner, self.settings.blocks_per_tick);
        let plan = Arc::new(self.plan);
        let mut haulers = Vec::with_capacity(agent_count);
        let mut rngs = Vec::with_capacity(agent_count);
        for (&pos, hand) in self.agents.iter().zip(hands) {
            let agent = motion.add_agent(pos);
            let mut hauler = Hauler::new(Arc::clone(&plan));
            hauler.memory.hand = hand.filter(|s| !s.is_empty());
            haulers.push(hauler);
            rngs.push(AgentRng::new(self.settings.seed, agent));
        }

        Ok(Sim {
            clock:        Tick::ZERO,
            settings:     self.settings,
            sites:        self.sites,
            containers:   self.containers,
            motion,
            presentation: Presentation::new(agent_count),
            haulers,
            rngs,
            interrupts:   self.interrupts,
        })
    }
}
