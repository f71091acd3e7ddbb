//! The world as seen from the transport task.
//!
//! The task never owns containers, paths, or rendering.  It reaches them
//! through three collaborator traits, all borrowed for the duration of one
//! agent's tick via [`TaskContext`]:
//!
//! | Trait              | Backs                                                  |
//! |--------------------|--------------------------------------------------------|
//! | [`Navigator`]      | path requests and path progress                        |
//! | [`ContainerHost`]  | contents, viewer counts, open/close, item transfer     |
//! | [`AgentPresenter`] | display state, cues, the "site held open" marker       |
//!
//! Every call returns synchronously within the tick.

use hl_core::{
    AgentId, AgentRng, BlockPos, ContainerId, CueId, DisplayState, ItemKind, ItemStack, MatchMode,
    PathHandle, Tick, WorldPos,
};
use hl_spatial::{SiteIndex, SpatialResult};

// ── Navigator ─────────────────────────────────────────────────────────────────

/// Progress of a planned path, as reported by the [`Navigator`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathStatus {
    /// Still walking.
    Following,
    /// Reached the end of the path.
    Arrived,
    /// The navigator dropped the path (cancelled, replaced, or the agent was
    /// moved off it) before it was finished.
    Lost,
}

/// Path-following service.
pub trait Navigator {
    /// Request a path for `agent` from `from` to a stand position at `to`,
    /// moving at `speed` times its base speed.  A failed request leaves the
    /// agent where it is.
    fn plan_path(
        &mut self,
        agent: AgentId,
        from:  WorldPos,
        to:    BlockPos,
        speed: f32,
    ) -> SpatialResult<PathHandle>;

    /// Where the agent following `path` stands with respect to it.
    fn path_status(&self, path: PathHandle) -> PathStatus;

    /// Cancel whatever path `agent` is following.
    fn stop(&mut self, agent: AgentId);
}

// ── ContainerHost ─────────────────────────────────────────────────────────────

/// Read-only view of a container's contents at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerSnapshot {
    /// Non-empty slots, in slot order.
    pub stacks:     Vec<ItemStack>,
    pub free_slots: u32,
    pub locked:     bool,
}

impl ContainerSnapshot {
    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(ItemStack::is_empty)
    }

    /// `true` if at least one unit of `stack` would fit.
    pub fn has_room_for(&self, stack: &ItemStack) -> bool {
        self.free_slots > 0
            || self.stacks.iter().any(|s| s.stacks_with(stack) && s.room() > 0)
    }

    /// `true` if there is room for anything at all.
    pub fn has_spare_capacity(&self) -> bool {
        self.free_slots > 0 || self.stacks.iter().any(|s| s.room() > 0)
    }

    /// Whether this container is a valid place to drop `stack`: unlocked,
    /// empty or already holding a matching item, and with room left.
    pub fn accepts(&self, stack: &ItemStack, mode: MatchMode) -> bool {
        !self.locked
            && self.has_room_for(stack)
            && (self.is_empty() || self.stacks.iter().any(|s| s.matches(stack, mode)))
    }

    /// First stack an agent could pick up, skipping blocked kinds.
    pub fn first_takeable<F>(&self, blocked: F) -> Option<&ItemStack>
    where
        F: Fn(ItemKind) -> bool,
    {
        if self.locked {
            return None;
        }
        self.stacks.iter().find(|s| !s.is_empty() && !blocked(s.kind))
    }
}

/// Access to world containers.
pub trait ContainerHost {
    /// Current contents, or `None` if the container no longer exists.
    fn snapshot(&self, container: ContainerId) -> Option<ContainerSnapshot>;

    /// Number of agents (or players) currently holding the container open.
    fn viewer_count(&self, container: ContainerId) -> u32;

    fn open(&mut self, container: ContainerId, agent: AgentId);

    fn close(&mut self, container: ContainerId, agent: AgentId);

    /// Remove up to `limit` units of one item, merging further slots of the
    /// same item until the limit is reached.  Stacks rejected by `allow` are
    /// skipped.  Returns `None` if nothing was taken.
    fn take(
        &mut self,
        container: ContainerId,
        limit:     u32,
        allow:     &dyn Fn(&ItemStack) -> bool,
    ) -> Option<ItemStack>;

    /// Insert as much of `stack` as fits and return what is left over
    /// (a zero-count stack when everything was placed).
    fn put(&mut self, container: ContainerId, stack: ItemStack) -> ItemStack;
}

// ── AgentPresenter ────────────────────────────────────────────────────────────

/// Agent-visible state consumed by renderers and audio.
pub trait AgentPresenter {
    fn set_display_state(&mut self, agent: AgentId, state: DisplayState);

    fn play_cue(&mut self, agent: AgentId, cue: CueId);

    /// Mark `site` as held open by `agent`.
    fn set_open_site(&mut self, agent: AgentId, site: BlockPos);

    fn clear_open_site(&mut self, agent: AgentId);
}

// ── TaskContext ───────────────────────────────────────────────────────────────

/// Everything one agent's task may touch during one tick.
///
/// Built by the caller immediately before [`TransportTask::tick`] and dropped
/// right after, so the collaborator borrows never outlive the tick.
///
/// [`TransportTask::tick`]: crate::TransportTask::tick
pub struct TaskContext<'a> {
    pub tick:       Tick,
    pub agent:      AgentId,
    pub position:   WorldPos,
    pub sites:      &'a SiteIndex,
    pub navigator:  &'a mut dyn Navigator,
    pub containers: &'a mut dyn ContainerHost,
    pub presenter:  &'a mut dyn AgentPresenter,
    pub rng:        &'a mut AgentRng,
}
