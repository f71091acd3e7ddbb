//! Slot-based containers backing the sites of the reference world.

use hl_core::{AgentId, ContainerId, ItemStack};
use hl_task::{ContainerHost, ContainerSnapshot};

use crate::{SimError, SimResult};

/// Slot count of a single chest.
pub const DEFAULT_SLOTS: usize = 27;

/// One container: fixed slots, the agents holding it open, and a lock flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    slots:            Vec<Option<ItemStack>>,
    viewers:          Vec<AgentId>,
    /// Viewers that are not simulated agents (e.g. a player at the chest).
    external_viewers: u32,
    locked:           bool,
}

impl Container {
    pub fn new(slot_count: usize) -> Self {
        Self { slots: vec![None; slot_count], viewers: Vec::new(), external_viewers: 0, locked: false }
    }

    /// Non-empty stacks in slot order.
    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> + '_ {
        self.slots.iter().flatten()
    }

    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Total units of items matching `pred`.
    pub fn count_where<F>(&self, pred: F) -> u32
    where
        F: Fn(&ItemStack) -> bool,
    {
        self.stacks().filter(|s| pred(s)).map(|s| s.count).sum()
    }

    pub fn viewers(&self) -> &[AgentId] {
        &self.viewers
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn viewer_count(&self) -> u32 {
        self.viewers.len() as u32 + self.external_viewers
    }

    /// Remove up to `limit` units of the first allowed stack, then merge in
    /// later slots of the same item until the limit is reached.
    fn take(&mut self, limit: u32, allow: &dyn Fn(&ItemStack) -> bool) -> Option<ItemStack> {
        if self.locked || limit == 0 {
            return None;
        }
        let first = self
            .slots
            .iter()
            .position(|s| s.is_some_and(|s| !s.is_empty() && allow(&s)))?;
        let mut taken = self.slots[first].as_mut()?.split(limit);
        for slot in self.slots.iter_mut().skip(first + 1) {
            if taken.count >= limit {
                break;
            }
            if let Some(stack) = slot.as_mut().filter(|s| s.stacks_with(&taken)) {
                taken.count += stack.split(limit - taken.count).count;
            }
        }
        for slot in &mut self.slots {
            if slot.is_some_and(|s| s.is_empty()) {
                *slot = None;
            }
        }
        Some(taken)
    }

    /// Top up matching stacks, then fill empty slots.  Returns the rest.
    fn put(&mut self, stack: ItemStack) -> ItemStack {
        let mut left = stack;
        if self.locked {
            return left;
        }
        for existing in self.slots.iter_mut().flatten() {
            if left.is_empty() {
                break;
            }
            if existing.stacks_with(&left) {
                let n = existing.room().min(left.count);
                existing.count += n;
                left.count -= n;
            }
        }
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            if left.is_empty() {
                break;
            }
            let n = left.count.min(left.max_stack);
            *slot = Some(ItemStack { count: n, ..left });
            left.count -= n;
        }
        left
    }
}

// ── ContainerStore ────────────────────────────────────────────────────────────

/// Every container in the world, indexed by `ContainerId`.
#[derive(Clone, Debug, Default)]
pub struct ContainerStore {
    containers: Vec<Container>,
}

impl ContainerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container with `slot_count` slots pre-filled with `contents`.
    pub fn add(&mut self, slot_count: usize, contents: &[ItemStack]) -> SimResult<ContainerId> {
        if slot_count == 0 {
            return Err(SimError::Config("container needs at least one slot".into()));
        }
        if contents.len() > slot_count {
            return Err(SimError::Config(format!(
                "{} initial stacks do not fit in {slot_count} slots",
                contents.len()
            )));
        }
        let mut container = Container::new(slot_count);
        for (slot, stack) in container.slots.iter_mut().zip(contents) {
            stack.validate()?;
            *slot = (!stack.is_empty()).then_some(*stack);
        }
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(container);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.index())
    }

    pub fn set_locked(&mut self, id: ContainerId, locked: bool) -> SimResult<()> {
        self.get_mut(id)?.locked = locked;
        Ok(())
    }

    /// Set the number of non-agent viewers (players) holding `id` open.
    pub fn set_external_viewers(&mut self, id: ContainerId, viewers: u32) -> SimResult<()> {
        self.get_mut(id)?.external_viewers = viewers;
        Ok(())
    }

    fn get_mut(&mut self, id: ContainerId) -> SimResult<&mut Container> {
        self.containers
            .get_mut(id.index())
            .ok_or_else(|| SimError::Config(format!("unknown container {id}")))
    }
}

impl ContainerHost for ContainerStore {
    fn snapshot(&self, container: ContainerId) -> Option<ContainerSnapshot> {
        let c = self.get(container)?;
        Some(ContainerSnapshot {
            stacks:     c.stacks().copied().collect(),
            free_slots: c.free_slots() as u32,
            locked:     c.locked,
        })
    }

    fn viewer_count(&self, container: ContainerId) -> u32 {
        self.get(container).map_or(0, Container::viewer_count)
    }

    fn open(&mut self, container: ContainerId, agent: AgentId) {
        if let Some(c) = self.containers.get_mut(container.index()) {
            if !c.viewers.contains(&agent) {
                c.viewers.push(agent);
            }
        }
    }

    fn close(&mut self, container: ContainerId, agent: AgentId) {
        if let Some(c) = self.containers.get_mut(container.index()) {
            c.viewers.retain(|&a| a != agent);
        }
    }

    fn take(
        &mut self,
        container: ContainerId,
        limit:     u32,
        allow:     &dyn Fn(&ItemStack) -> bool,
    ) -> Option<ItemStack> {
        self.containers.get_mut(container.index())?.take(limit, allow)
    }

    fn put(&mut self, container: ContainerId, stack: ItemStack) -> ItemStack {
        match self.containers.get_mut(container.index()) {
            Some(c) => c.put(stack),
            None => stack,
        }
    }
}
