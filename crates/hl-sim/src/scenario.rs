//! TOML scenario files.
//!
//! ```toml
//! [sim]
//! total_ticks = 1200
//! seed        = 7
//!
//! [task]
//! success_cooldown_ticks = 140
//!
//! [[sites]]
//! pos   = { x = 0, y = 64, z = 0 }
//! role  = "source"
//! items = [{ kind = 1, count = 20 }]
//!
//! [[sites]]
//! pos  = { x = 12, y = 64, z = 0 }
//! role = "destination"
//!
//! [[sites]]
//! pos  = { x = 13, y = 64, z = 0 }
//! role = "destination"
//! link = 1            # second half of a double chest: shares site 1's container
//!
//! [[agents]]
//! pos = { x = 4.5, y = 64.0, z = 2.5 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use hl_core::{AgentId, BlockPos, ItemStack, SiteId, Tick, WorldPos};
use hl_spatial::{LinePlanner, SiteIndexBuilder, SiteTags};
use hl_task::{TaskConfig, TransportPlan};

use crate::container::DEFAULT_SLOTS;
use crate::{ContainerStore, Sim, SimBuilder, SimError, SimResult, SimSettings};

/// Tag bit carried by source sites.
pub const SOURCE_TAG: SiteTags = SiteTags::bit(0);
/// Tag bit carried by destination sites.
pub const DESTINATION_TAG: SiteTags = SiteTags::bit(1);

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteRole {
    Source,
    Destination,
}

impl SiteRole {
    pub fn tags(self) -> SiteTags {
        match self {
            SiteRole::Source => SOURCE_TAG,
            SiteRole::Destination => DESTINATION_TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSpec {
    pub pos:     BlockPos,
    pub role:    SiteRole,
    #[serde(default = "default_slots")]
    pub slots:   usize,
    #[serde(default)]
    pub items:   Vec<ItemStack>,
    #[serde(default)]
    pub locked:  bool,
    /// Non-agent viewers holding the container open for the whole run.
    #[serde(default)]
    pub viewers: u32,
    /// Index of an earlier site whose container this one shares.
    #[serde(default)]
    pub link:    Option<usize>,
}

fn default_slots() -> usize {
    DEFAULT_SLOTS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub pos:      WorldPos,
    #[serde(default)]
    pub carrying: Option<ItemStack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterruptSpec {
    pub tick:  u64,
    pub agent: u32,
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub sim:        SimSettings,
    pub task:       TaskConfig,
    pub obstacles:  Vec<BlockPos>,
    pub sites:      Vec<SiteSpec>,
    pub agents:     Vec<AgentSpec>,
    pub interrupts: Vec<InterruptSpec>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the world and a ready-to-run [`Sim`] with a [`LinePlanner`].
    pub fn build(self) -> SimResult<Sim<LinePlanner>> {
        let plan = TransportPlan::from_tags(self.task, SOURCE_TAG, DESTINATION_TAG)?;

        let mut containers = ContainerStore::new();
        let mut sites = SiteIndexBuilder::with_capacity(self.sites.len());
        let mut site_containers = Vec::with_capacity(self.sites.len());
        for (i, spec) in self.sites.iter().enumerate() {
            let container = match spec.link {
                Some(j) if j < i => {
                    if !spec.items.is_empty() {
                        return Err(SimError::Config(format!(
                            "site {i} shares site {j}'s container and cannot list items"
                        )));
                    }
                    site_containers[j]
                }
                Some(j) => {
                    return Err(SimError::Config(format!(
                        "site {i} links to site {j}; links must point to an earlier site"
                    )));
                }
                None => {
                    let id = containers.add(spec.slots, &spec.items)?;
                    containers.set_locked(id, spec.locked)?;
                    containers.set_external_viewers(id, spec.viewers)?;
                    id
                }
            };
            site_containers.push(container);
            let id = sites.add_site(spec.pos, container, spec.role.tags());
            if let Some(j) = spec.link {
                sites.link(SiteId(j as u32), id);
            }
        }

        let planner = LinePlanner::new(self.sim.max_path_length).with_obstacles(self.obstacles);
        let (positions, hands): (Vec<_>, Vec<_>) = self.agents.into_iter().map(|a| (a.pos, a.carrying)).unzip();

        let mut builder = SimBuilder::new(self.sim, plan, sites.build(), containers, planner)
            .agents(positions)
            .carrying(hands);
        for i in &self.interrupts {
            builder = builder.interrupt(Tick(i.tick), AgentId(i.agent));
        }
        builder.build()
    }
}
