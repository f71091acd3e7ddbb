//! The transport state machine.
//!
//! ```text
//!            ┌──────────── abandon / target invalid / interrupt ─────────────┐
//!            ▼                                                                │
//!  Idle ─► TravelToSource ─► InteractAtSource ─► TravelToDestination ─► InteractAtDestination ─► Idle
//! ```
//!
//! One [`TransportTask`] exists per agent.  It is polled once per tick and
//! never blocks: waiting for a path, a cooldown, or an interaction is just
//! staying in a state.  Configuration shared by every agent lives in an
//! [`Arc<TransportPlan>`]; memory that outlives a cycle lives in the agent's
//! [`HaulerMemory`].
//!
//! # Side-effect ordering
//!
//! Every tick spent in a travel state starts with the travel effect (clear
//! the held-open site, restore the idle display).  Entering a travel state
//! applies it immediately as well, so no interaction visuals survive into a
//! leg.  Interactions are never cut short: once an `InteractAt*` state is
//! entered it runs to the `End` signal.
//!
//! # Travel failure
//!
//! A leg is abandoned (site marked unreachable, short cooldown armed) when
//! the navigator refuses the path, reports it [`PathStatus::Lost`], or the
//! agent is still walking `travel_timeout_ticks` after setting off.

use std::sync::Arc;

use tracing::{debug, trace};

use hl_core::{DisplayState, ItemStack, PathHandle, SiteId, Tick};
use hl_spatial::{Site, SitePredicate, SiteScanner, SiteTags};

use crate::{
    HaulerMemory, InteractionOutcome, InteractionSignal, InteractionTimer, Leg, PathStatus,
    SiteRef, TargetSelector, TaskConfig, TaskContext, TaskError, TaskResult, TransportTarget,
};

// ── TaskState ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskState {
    #[default]
    Idle,
    TravelToSource,
    InteractAtSource,
    TravelToDestination,
    InteractAtDestination,
}

impl TaskState {
    #[inline]
    pub fn is_travelling(self) -> bool {
        matches!(self, TaskState::TravelToSource | TaskState::TravelToDestination)
    }

    #[inline]
    pub fn is_interacting(self) -> bool {
        matches!(self, TaskState::InteractAtSource | TaskState::InteractAtDestination)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Idle                  => "idle",
            TaskState::TravelToSource        => "travel_to_source",
            TaskState::InteractAtSource      => "interact_at_source",
            TaskState::TravelToDestination   => "travel_to_destination",
            TaskState::InteractAtDestination => "interact_at_destination",
        }
    }

    fn travel(leg: Leg) -> Self {
        match leg {
            Leg::ToSource | Leg::ReturnToSource => TaskState::TravelToSource,
            Leg::ToDestination => TaskState::TravelToDestination,
        }
    }

    fn interact(leg: Leg) -> Self {
        match leg {
            Leg::ToSource | Leg::ReturnToSource => TaskState::InteractAtSource,
            Leg::ToDestination => TaskState::InteractAtDestination,
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TransportPlan ─────────────────────────────────────────────────────────────

/// Validated configuration plus the site selector, shared by all agents.
pub struct TransportPlan {
    config:   TaskConfig,
    selector: TargetSelector,
}

impl TransportPlan {
    /// Validate `config` and build the selector around the two role
    /// predicates.
    pub fn new(
        config:         TaskConfig,
        is_source:      SitePredicate,
        is_destination: SitePredicate,
    ) -> TaskResult<Self> {
        config.validate()?;
        let scanner = SiteScanner::new(config.radii, is_source, is_destination);
        let selector = TargetSelector::new(scanner, config.match_mode, config.source_policy);
        Ok(Self { config, selector })
    }

    /// Plan whose roles are "site carries any of these tags".
    pub fn from_tags(
        config:           TaskConfig,
        source_tags:      SiteTags,
        destination_tags: SiteTags,
    ) -> TaskResult<Self> {
        Self::new(
            config,
            Box::new(move |s: &Site| s.tags.intersects(source_tags)),
            Box::new(move |s: &Site| s.tags.intersects(destination_tags)),
        )
    }

    #[inline]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    #[inline]
    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    /// Fresh per-agent memory sized by this plan's config.
    pub fn new_memory(&self) -> HaulerMemory {
        HaulerMemory::new(&self.config)
    }
}

// ── TransportTask ─────────────────────────────────────────────────────────────

pub struct TransportTask {
    plan:     Arc<TransportPlan>,
    state:    TaskState,
    target:   Option<TransportTarget>,
    path:     Option<PathHandle>,
    /// Tick the current travel leg started.
    departed: Tick,
    timer:    Option<InteractionTimer>,
}

impl TransportTask {
    pub fn new(plan: Arc<TransportPlan>) -> Self {
        Self {
            plan,
            state: TaskState::Idle,
            target: None,
            path: None,
            departed: Tick::ZERO,
            timer: None,
        }
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    #[inline]
    pub fn target(&self) -> Option<&TransportTarget> {
        self.target.as_ref()
    }

    #[inline]
    pub fn timer(&self) -> Option<&InteractionTimer> {
        self.timer.as_ref()
    }

    #[inline]
    pub fn plan(&self) -> &TransportPlan {
        &self.plan
    }

    /// Advance one tick and return the state the task ends the tick in.
    pub fn tick(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory) -> TaskState {
        match self.state {
            TaskState::Idle => self.tick_idle(ctx, memory),
            TaskState::TravelToSource | TaskState::TravelToDestination => {
                self.tick_travel(ctx, memory)
            }
            TaskState::InteractAtSource | TaskState::InteractAtDestination => {
                self.tick_interact(ctx, memory)
            }
        }
        self.state
    }

    /// Abandon the current travel leg on behalf of a higher-priority
    /// behaviour.  Refused (returns `false`) while idle or mid-interaction.
    pub fn interrupt(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        if !self.state.is_travelling() {
            return false;
        }
        debug!(agent = %ctx.agent, from = %self.state, "transport interrupted");
        self.reset(ctx);
        true
    }

    // ── Idle ──────────────────────────────────────────────────────────────

    fn tick_idle(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory) {
        if !memory.cooldown.is_ready() {
            return;
        }
        let mut next = self.find_target(ctx, memory);
        memory.unreachable.purge_expired(ctx.tick);
        if next.is_none() && memory.last_round_succeeded && !memory.unreachable.is_empty() {
            debug!(
                agent   = %ctx.agent,
                entries = memory.unreachable.len(),
                "nothing reachable left, retrying unreachable sites"
            );
            memory.unreachable.clear_all();
            memory.last_round_succeeded = false;
            next = self.find_target(ctx, memory);
        }
        match next {
            Some(target) => self.begin_leg(ctx, memory, target),
            None => {
                trace!(agent = %ctx.agent, "no transport target");
                memory.cooldown.arm(self.plan.config.no_target_cooldown_ticks);
            }
        }
    }

    fn find_target(&self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory) -> Option<TransportTarget> {
        match memory.hand.filter(|s| !s.is_empty()) {
            Some(stack) => self.target_for_carried(ctx, memory, stack, None, None),
            None => self
                .plan
                .selector
                .select_pair(ctx, memory)
                .map(|pair| TransportTarget::to_source(pair.source, pair.destination)),
        }
    }

    /// Destination for a carried stack, or a source to return it to when no
    /// destination takes it (which also blocks the item for a while).
    fn target_for_carried(
        &self,
        ctx:    &TaskContext<'_>,
        memory: &mut HaulerMemory,
        stack:  ItemStack,
        skip:   Option<SiteId>,
        origin: Option<SiteRef>,
    ) -> Option<TransportTarget> {
        let selector = &self.plan.selector;
        if !memory.is_item_blocked(stack.kind, ctx.tick) {
            if let Some(dest) = selector.select_destination(ctx, memory, &stack, skip) {
                return Some(TransportTarget::to_destination(dest, origin));
            }
            debug!(agent = %ctx.agent, kind = %stack.kind, "no destination accepts carried item");
            memory.blocked_items.record(stack.kind, ctx.tick);
        }
        selector
            .select_return_source(ctx, memory, &stack, origin)
            .map(TransportTarget::return_to)
    }

    // ── Travel ────────────────────────────────────────────────────────────

    fn begin_leg(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory, target: TransportTarget) {
        let speed = self.plan.config.speed_multiplier;
        match ctx.navigator.plan_path(ctx.agent, ctx.position, target.site.pos, speed) {
            Ok(path) => {
                let to = TaskState::travel(target.leg);
                debug!(
                    agent = %ctx.agent,
                    from  = %self.state,
                    to    = %to,
                    site  = %target.site.pos,
                    leg   = target.leg.as_str(),
                    "transport transition"
                );
                self.state = to;
                self.target = Some(target);
                self.path = Some(path);
                self.departed = ctx.tick;
                self.timer = None;
                self.apply_travel_effect(ctx);
            }
            Err(err) => self.abandon(ctx, memory, target.site, &TaskError::Spatial(err)),
        }
    }

    fn tick_travel(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory) {
        self.apply_travel_effect(ctx);
        let Some(target) = self.target else {
            self.reset(ctx);
            return;
        };
        if !self.plan.selector.is_still_valid(ctx, &target.site, target.leg) {
            debug!(agent = %ctx.agent, site = %target.site.pos, "target no longer valid, dropping");
            self.reset(ctx);
            return;
        }
        let Some(path) = self.path else {
            self.reset(ctx);
            return;
        };
        match ctx.navigator.path_status(path) {
            PathStatus::Arrived => self.arrive(ctx, memory, target),
            PathStatus::Lost => {
                self.abandon(ctx, memory, target.site, &TaskError::PathLost(target.site.pos));
            }
            PathStatus::Following => {
                let ticks = ctx.tick.since(self.departed);
                if ticks >= self.plan.config.travel_timeout_ticks {
                    let reason = TaskError::TravelTimeout { site: target.site.pos, ticks };
                    self.abandon(ctx, memory, target.site, &reason);
                }
            }
        }
    }

    fn apply_travel_effect(&self, ctx: &mut TaskContext<'_>) {
        ctx.presenter.clear_open_site(ctx.agent);
        ctx.presenter.set_display_state(ctx.agent, DisplayState::Idle);
    }

    fn arrive(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory, target: TransportTarget) {
        memory.unreachable.clear(target.site.pos);
        let expected = self.expected_outcome(ctx, memory, &target);
        let to = TaskState::interact(target.leg);
        debug!(
            agent    = %ctx.agent,
            from     = %self.state,
            to       = %to,
            site     = %target.site.pos,
            expected = expected.as_str(),
            "transport transition"
        );
        self.state = to;
        self.path = None;
        self.timer = Some(InteractionTimer::start(expected));
    }

    /// Outcome predicted from the container as it looks on arrival.
    fn expected_outcome(
        &self,
        ctx:    &TaskContext<'_>,
        memory: &HaulerMemory,
        target: &TransportTarget,
    ) -> InteractionOutcome {
        let snapshot = ctx.containers.snapshot(target.site.container);
        let hand = memory.hand.filter(|s| !s.is_empty());
        match target.leg {
            Leg::ToSource => {
                let takeable = snapshot.is_some_and(|snap| {
                    snap.first_takeable(|kind| memory.is_item_blocked(kind, ctx.tick)).is_some()
                });
                if takeable {
                    InteractionOutcome::PickedUpItem
                } else {
                    InteractionOutcome::PickedUpNothing
                }
            }
            Leg::ToDestination | Leg::ReturnToSource => {
                let accepted = match (snapshot, hand) {
                    (Some(snap), Some(stack)) if target.leg == Leg::ToDestination => {
                        snap.accepts(&stack, self.plan.selector.match_mode())
                    }
                    (Some(snap), Some(stack)) => !snap.locked && snap.has_room_for(&stack),
                    _ => false,
                };
                if accepted {
                    InteractionOutcome::PlacedItem
                } else {
                    InteractionOutcome::PlacedNothing
                }
            }
        }
    }

    // ── Interaction ───────────────────────────────────────────────────────

    fn tick_interact(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory) {
        let (Some(target), Some(timer)) = (self.target, self.timer.as_mut()) else {
            self.reset(ctx);
            return;
        };
        let signal = timer.advance();
        let outcome = timer.outcome();
        let effects = self.plan.config.outcomes.effects(outcome);
        let container = target.site.container;

        match signal {
            None => {}
            Some(InteractionSignal::Begin) => {
                trace!(agent = %ctx.agent, site = %target.site.pos, "interaction begin");
                ctx.containers.open(container, ctx.agent);
                ctx.presenter.set_open_site(ctx.agent, target.site.pos);
                ctx.presenter.set_display_state(ctx.agent, effects.display);
            }
            Some(InteractionSignal::Cue) => {
                if let Some(cue) = effects.cue {
                    trace!(agent = %ctx.agent, cue = %cue, "interaction cue");
                    ctx.presenter.play_cue(ctx.agent, cue);
                }
            }
            Some(InteractionSignal::End) => {
                let actual = self.transfer(ctx, memory, &target);
                let corrected = self.timer.as_mut().is_some_and(|t| t.resolve(actual));
                if corrected {
                    let display = self.plan.config.outcomes.effects(actual).display;
                    ctx.presenter.set_display_state(ctx.agent, display);
                }
                trace!(agent = %ctx.agent, outcome = actual.as_str(), "interaction end");
                ctx.containers.close(container, ctx.agent);
                ctx.presenter.clear_open_site(ctx.agent);
                self.timer = None;
                self.finish_leg(ctx, memory, target, actual);
            }
        }
    }

    /// Move items between hand and container and report what happened.
    fn transfer(
        &self,
        ctx:    &mut TaskContext<'_>,
        memory: &mut HaulerMemory,
        target: &TransportTarget,
    ) -> InteractionOutcome {
        let now = ctx.tick;
        let container = target.site.container;
        match target.leg {
            Leg::ToSource => {
                let limit = self.plan.config.max_carry;
                let taken = {
                    let blocked = &memory.blocked_items;
                    ctx.containers
                        .take(container, limit, &|s: &ItemStack| !blocked.contains(&s.kind, now))
                };
                match taken.filter(|s| !s.is_empty()) {
                    Some(stack) => {
                        memory.hand = Some(stack);
                        InteractionOutcome::PickedUpItem
                    }
                    None => InteractionOutcome::PickedUpNothing,
                }
            }
            Leg::ToDestination | Leg::ReturnToSource => {
                let Some(stack) = memory.hand.take().filter(|s| !s.is_empty()) else {
                    return InteractionOutcome::PlacedNothing;
                };
                let left = ctx.containers.put(container, stack);
                memory.hand = (!left.is_empty()).then_some(left);
                if target.leg == Leg::ToDestination {
                    if let Some(snap) = ctx.containers.snapshot(container) {
                        memory.destinations.remember(target.site, &snap.stacks, now);
                    }
                }
                if left.count < stack.count {
                    InteractionOutcome::PlacedItem
                } else {
                    InteractionOutcome::PlacedNothing
                }
            }
        }
    }

    fn finish_leg(
        &mut self,
        ctx:     &mut TaskContext<'_>,
        memory:  &mut HaulerMemory,
        target:  TransportTarget,
        outcome: InteractionOutcome,
    ) {
        let now = ctx.tick;
        let config = &self.plan.config;
        let (success, abandon) = (config.success_cooldown_ticks, config.abandon_cooldown_ticks);

        if outcome.is_empty_handed() {
            memory.exhausted.record(target.site.pos, now);
        }

        match (target.leg, outcome) {
            (Leg::ToSource, InteractionOutcome::PickedUpItem) => {
                let Some(stack) = memory.hand else {
                    self.end_cycle(ctx, memory, abandon);
                    return;
                };
                let paired = target
                    .destination
                    .filter(|d| self.plan.selector.accepts(ctx, d, &stack))
                    .map(|d| TransportTarget::to_destination(d, Some(target.site)));
                let next = match paired {
                    Some(next) => Some(next),
                    None => self.target_for_carried(ctx, memory, stack, None, Some(target.site)),
                };
                match next {
                    Some(next) => self.begin_leg(ctx, memory, next),
                    None => self.end_cycle(ctx, memory, abandon),
                }
            }
            (Leg::ToDestination, InteractionOutcome::PlacedItem) => {
                memory.exhausted.clear();
                memory.last_round_succeeded = true;
                self.end_cycle(ctx, memory, success);
            }
            (Leg::ToDestination, _) => {
                let hand = memory.hand;
                let next = hand.and_then(|stack| {
                    self.target_for_carried(ctx, memory, stack, Some(target.site.site), target.source)
                });
                match next {
                    Some(next) => self.begin_leg(ctx, memory, next),
                    None => self.end_cycle(ctx, memory, abandon),
                }
            }
            (Leg::ReturnToSource, InteractionOutcome::PlacedItem) => {
                self.end_cycle(ctx, memory, success);
            }
            _ => self.end_cycle(ctx, memory, abandon),
        }
    }

    // ── Terminal transitions ──────────────────────────────────────────────

    /// Cycle over: clear agent-visible state and arm the cooldown.
    fn end_cycle(&mut self, ctx: &mut TaskContext<'_>, memory: &mut HaulerMemory, cooldown: u32) {
        debug!(agent = %ctx.agent, from = %self.state, cooldown, "transport cycle finished");
        memory.cooldown.arm(cooldown);
        self.reset(ctx);
    }

    /// Path failure: blacklist the site and back off briefly.
    fn abandon(
        &mut self,
        ctx:    &mut TaskContext<'_>,
        memory: &mut HaulerMemory,
        site:   SiteRef,
        reason: &TaskError,
    ) {
        debug!(agent = %ctx.agent, site = %site.pos, %reason, "transport abandoned");
        memory.unreachable.record(site.pos, ctx.tick);
        memory.cooldown.arm(self.plan.config.abandon_cooldown_ticks);
        self.reset(ctx);
    }

    /// Drop the target and return to `Idle` without touching the cooldown.
    fn reset(&mut self, ctx: &mut TaskContext<'_>) {
        if self.path.take().is_some() {
            ctx.navigator.stop(ctx.agent);
        }
        ctx.presenter.clear_open_site(ctx.agent);
        ctx.presenter.set_display_state(ctx.agent, DisplayState::Idle);
        self.state = TaskState::Idle;
        self.target = None;
        self.timer = None;
    }
}
