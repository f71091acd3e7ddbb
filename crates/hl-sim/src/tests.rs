//! Tests for hl-sim: the reference world and its tick loop.

use hl_core::{AgentId, BlockPos, DisplayState, ItemKind, ItemStack, Tick, WorldPos};
use hl_spatial::LinePlanner;
use hl_task::{ContainerHost, Navigator, PathStatus, TaskConfig, TaskState, TransportPlan};

use crate::{
    ContainerStore, NoopObserver, Scenario, Sim, SimBuilder, SimError, SimSettings, SOURCE_TAG,
    DESTINATION_TAG,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One source with 20 items at x=2, one empty destination at x=6, one agent
/// standing on the source.  Walking speed 1 block per tick.
const TWO_CHESTS: &str = r#"
[sim]
total_ticks          = 600
seed                 = 1
blocks_per_tick      = 1.0
trace_interval_ticks = 20

[[sites]]
pos   = { x = 2, y = 0, z = 0 }
role  = "source"
items = [{ kind = 1, count = 20 }]

[[sites]]
pos  = { x = 6, y = 0, z = 0 }
role = "destination"

[[agents]]
pos = { x = 2.5, y = 0.0, z = 0.5 }
"#;

fn two_chests() -> Sim<LinePlanner> {
    Scenario::parse(TWO_CHESTS).unwrap().build().unwrap()
}

fn count_of(sim: &Sim<LinePlanner>, container: u32, kind: u16) -> u32 {
    sim.containers
        .get(hl_core::ContainerId(container))
        .map_or(0, |c| c.count_where(|s| s.kind == ItemKind(kind)))
}

fn stack(kind: u16, count: u32) -> ItemStack {
    ItemStack::new(ItemKind(kind), count)
}

fn settings() -> SimSettings {
    SimSettings { blocks_per_tick: 1.0, ..SimSettings::default() }
}

fn plan() -> TransportPlan {
    TransportPlan::from_tags(TaskConfig::default(), SOURCE_TAG, DESTINATION_TAG).unwrap()
}

fn close(a: WorldPos, b: WorldPos) -> bool {
    a.distance(b) < 1e-4
}

// ── ContainerStore ────────────────────────────────────────────────────────────

#[cfg(test)]
mod container {
    use super::*;

    #[test]
    fn take_merges_later_slots_up_to_limit() {
        let mut store = ContainerStore::new();
        let id = store.add(3, &[stack(1, 10), stack(2, 5), stack(1, 10)]).unwrap();

        let taken = store.take(id, 16, &|_| true).unwrap();
        assert_eq!(taken.kind, ItemKind(1));
        assert_eq!(taken.count, 16);

        let snap = store.snapshot(id).unwrap();
        assert_eq!(snap.stacks, vec![stack(2, 5), stack(1, 4)]);
        assert_eq!(snap.free_slots, 1);
    }

    #[test]
    fn take_skips_disallowed_kinds() {
        let mut store = ContainerStore::new();
        let id = store.add(2, &[stack(1, 3), stack(2, 3)]).unwrap();
        let taken = store.take(id, 16, &|s| s.kind != ItemKind(1)).unwrap();
        assert_eq!(taken, stack(2, 3));
        assert!(store.take(id, 16, &|s| s.kind != ItemKind(1)).is_none());
    }

    #[test]
    fn put_tops_up_then_fills_empty_slots() {
        let mut store = ContainerStore::new();
        let id = store.add(2, &[stack(1, 60)]).unwrap();

        let left = store.put(id, stack(1, 70));
        assert_eq!(left.count, 2);
        let snap = store.snapshot(id).unwrap();
        assert_eq!(snap.stacks, vec![stack(1, 64), stack(1, 64)]);
        assert_eq!(snap.free_slots, 0);
    }

    #[test]
    fn locked_container_refuses_both_directions() {
        let mut store = ContainerStore::new();
        let id = store.add(2, &[stack(1, 5)]).unwrap();
        store.set_locked(id, true).unwrap();

        assert!(store.take(id, 16, &|_| true).is_none());
        assert_eq!(store.put(id, stack(1, 3)), stack(1, 3));
        assert!(store.snapshot(id).unwrap().locked);
    }

    #[test]
    fn viewers_are_deduplicated_and_include_external() {
        let mut store = ContainerStore::new();
        let id = store.add(1, &[]).unwrap();
        store.open(id, AgentId(0));
        store.open(id, AgentId(0));
        store.open(id, AgentId(1));
        store.set_external_viewers(id, 1).unwrap();
        assert_eq!(store.viewer_count(id), 3);

        store.close(id, AgentId(0));
        assert_eq!(store.get(id).unwrap().viewers(), &[AgentId(1)]);
        assert_eq!(store.viewer_count(id), 2);
    }

    #[test]
    fn overfull_initial_contents_rejected() {
        let mut store = ContainerStore::new();
        assert!(matches!(
            store.add(1, &[stack(1, 1), stack(2, 1)]),
            Err(SimError::Config(_))
        ));
        assert!(matches!(store.add(0, &[]), Err(SimError::Config(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_initial_stack_is_a_core_error() {
        let mut store = ContainerStore::new();
        let result = store.add(1, &[stack(1, 65)]);
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn unknown_container_is_inert() {
        let mut store = ContainerStore::new();
        let ghost = hl_core::ContainerId(9);
        assert!(store.snapshot(ghost).is_none());
        assert_eq!(store.viewer_count(ghost), 0);
        assert_eq!(store.put(ghost, stack(1, 2)), stack(1, 2));
        assert!(store.set_locked(ghost, true).is_err());
    }
}

// ── MotionEngine ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;
    use crate::MotionEngine;

    fn engine() -> (MotionEngine<LinePlanner>, AgentId) {
        let mut engine = MotionEngine::new(LinePlanner::new(100.0), 1.0);
        let agent = engine.add_agent(WorldPos::new(0.5, 0.0, 0.5));
        engine.tick_arrivals(Tick(0));
        (engine, agent)
    }

    #[test]
    fn agent_interpolates_and_arrives_on_time() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        let path = engine.plan_path(agent, start, BlockPos::new(10, 0, 0), 1.0).unwrap();

        assert!(engine.is_moving(agent));
        assert!(close(engine.position(agent, Tick(5)), WorldPos::new(5.5, 0.0, 0.5)));

        assert!(engine.tick_arrivals(Tick(9)).is_empty());
        assert_eq!(engine.path_status(path), PathStatus::Following);

        let arrived = engine.tick_arrivals(Tick(10));
        assert_eq!(arrived.len(), 1);
        assert_eq!(arrived[0].0, agent);
        assert!(close(arrived[0].1, WorldPos::new(10.5, 0.0, 0.5)));
        assert_eq!(engine.path_status(path), PathStatus::Arrived);
        assert!(close(engine.position(agent, Tick(50)), WorldPos::new(10.5, 0.0, 0.5)));
    }

    #[test]
    fn speed_multiplier_shortens_the_trip() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        engine.plan_path(agent, start, BlockPos::new(10, 0, 0), 2.0).unwrap();
        assert_eq!(engine.states[agent.index()].arrival_tick, Tick(5));
    }

    #[test]
    fn zero_length_path_arrives_next_tick() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        let path = engine.plan_path(agent, start, BlockPos::new(0, 0, 0), 1.0).unwrap();
        assert_eq!(engine.path_status(path), PathStatus::Following);
        assert_eq!(engine.tick_arrivals(Tick(1)).len(), 1);
        assert_eq!(engine.path_status(path), PathStatus::Arrived);
    }

    #[test]
    fn stop_freezes_mid_path_and_retires_handle() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        let path = engine.plan_path(agent, start, BlockPos::new(10, 0, 0), 1.0).unwrap();

        engine.tick_arrivals(Tick(4));
        engine.stop(agent);

        assert!(!engine.is_moving(agent));
        assert_eq!(engine.path_status(path), PathStatus::Lost);
        assert!(close(engine.position(agent, Tick(8)), WorldPos::new(4.5, 0.0, 0.5)));
    }

    #[test]
    fn placing_an_agent_loses_its_path() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        let path = engine.plan_path(agent, start, BlockPos::new(10, 0, 0), 1.0).unwrap();

        engine.place(agent, WorldPos::new(-3.5, 0.0, 0.5));
        assert_eq!(engine.path_status(path), PathStatus::Lost);
        assert!(!engine.is_moving(agent));
    }

    #[test]
    fn replanning_retires_the_old_handle() {
        let (mut engine, agent) = engine();
        let start = engine.position(agent, Tick(0));
        let first = engine.plan_path(agent, start, BlockPos::new(10, 0, 0), 1.0).unwrap();
        let second = engine.plan_path(agent, start, BlockPos::new(3, 0, 0), 1.0).unwrap();
        assert_ne!(first, second);

        engine.tick_arrivals(Tick(3));
        assert_eq!(engine.path_status(second), PathStatus::Arrived);
        assert_eq!(engine.path_status(first), PathStatus::Lost);
    }

    #[test]
    fn failed_plan_leaves_agent_in_place() {
        let planner = LinePlanner::new(100.0).with_obstacles([BlockPos::new(5, 0, 0)]);
        let mut engine = MotionEngine::new(planner, 1.0);
        let agent = engine.add_agent(WorldPos::new(0.5, 0.0, 0.5));

        let result = engine.plan_path(agent, WorldPos::new(0.5, 0.0, 0.5), BlockPos::new(10, 0, 0), 1.0);
        assert!(result.is_err());
        assert!(!engine.is_moving(agent));
        assert!(close(engine.position(agent, Tick(3)), WorldPos::new(0.5, 0.0, 0.5)));
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use hl_spatial::{SiteIndex, SiteIndexBuilder};

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(settings(), plan(), SiteIndex::empty(), ContainerStore::new(), LinePlanner::new(50.0))
            .agents(vec![WorldPos::default(); 3])
            .build()
            .unwrap();
        assert_eq!(sim.agent_count(), 3);
        assert_eq!(sim.rngs.len(), 3);
        assert_eq!(sim.presentation.views().len(), 3);
        assert_eq!(sim.clock, Tick::ZERO);
    }

    #[test]
    fn carried_count_mismatch_errors() {
        let result = SimBuilder::new(settings(), plan(), SiteIndex::empty(), ContainerStore::new(), LinePlanner::new(50.0))
            .agents(vec![WorldPos::default(); 3])
            .carrying(vec![None; 2])
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn site_with_unknown_container_errors() {
        let mut b = SiteIndexBuilder::new();
        b.add_site(BlockPos::new(0, 0, 0), hl_core::ContainerId(4), SOURCE_TAG);
        let result = SimBuilder::new(settings(), plan(), b.build(), ContainerStore::new(), LinePlanner::new(50.0))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn interrupt_for_unknown_agent_errors() {
        let result = SimBuilder::new(settings(), plan(), SiteIndex::empty(), ContainerStore::new(), LinePlanner::new(50.0))
            .agents(vec![WorldPos::default()])
            .interrupt(Tick(5), AgentId(1))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn non_positive_speed_errors() {
        let bad = SimSettings { blocks_per_tick: 0.0, ..SimSettings::default() };
        let result = SimBuilder::new(bad, plan(), SiteIndex::empty(), ContainerStore::new(), LinePlanner::new(50.0))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn empty_carried_stacks_become_empty_hands() {
        let sim = SimBuilder::new(settings(), plan(), SiteIndex::empty(), ContainerStore::new(), LinePlanner::new(50.0))
            .agents(vec![WorldPos::default(); 2])
            .carrying(vec![Some(stack(1, 0)), Some(stack(1, 3))])
            .build()
            .unwrap();
        assert_eq!(sim.haulers[0].memory.hand, None);
        assert_eq!(sim.haulers[1].memory.hand, Some(stack(1, 3)));
    }
}

// ── Scenario loading ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;
    use hl_core::SiteId;

    #[test]
    fn parses_defaults_and_overrides() {
        let s = Scenario::parse(TWO_CHESTS).unwrap();
        assert_eq!(s.sim.total_ticks, 600);
        assert_eq!(s.sim.trace_interval_ticks, 20);
        assert_eq!(s.task, TaskConfig::default());
        assert_eq!(s.sites.len(), 2);
        assert_eq!(s.sites[0].slots, 27);
        assert_eq!(s.sites[0].items, vec![stack(1, 20)]);
        assert_eq!(s.agents[0].carrying, None);
    }

    #[test]
    fn task_section_overrides_config() {
        let text = r#"
            [task]
            success_cooldown_ticks = 10
            match_mode             = "exact"
            source_policy          = "weighted_by_distance"
        "#;
        let s = Scenario::parse(text).unwrap();
        assert_eq!(s.task.success_cooldown_ticks, 10);
        assert_eq!(s.task.match_mode, hl_core::MatchMode::Exact);
        assert_eq!(s.task.source_policy, hl_task::SourcePolicy::WeightedByDistance);
        assert_eq!(s.task.abandon_cooldown_ticks, TaskConfig::default().abandon_cooldown_ticks);
    }

    #[test]
    fn linked_sites_share_one_container() {
        let text = r#"
            [[sites]]
            pos  = { x = 0, y = 0, z = 0 }
            role = "destination"

            [[sites]]
            pos  = { x = 1, y = 0, z = 0 }
            role = "destination"
            link = 0
        "#;
        let sim = Scenario::parse(text).unwrap().build().unwrap();
        assert_eq!(sim.containers.len(), 1);
        let a = sim.sites.get(SiteId(0)).unwrap();
        let b = sim.sites.get(SiteId(1)).unwrap();
        assert_eq!(a.container, b.container);
        assert_eq!(a.linked, Some(SiteId(1)));
        assert_eq!(b.linked, Some(SiteId(0)));
    }

    #[test]
    fn forward_link_is_rejected() {
        let text = r#"
            [[sites]]
            pos  = { x = 0, y = 0, z = 0 }
            role = "destination"
            link = 1

            [[sites]]
            pos  = { x = 1, y = 0, z = 0 }
            role = "destination"
        "#;
        let result = Scenario::parse(text).unwrap().build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_task_config_is_a_task_error() {
        let text = "[task]\nmax_carry = 0\n";
        let result = Scenario::parse(text).unwrap().build();
        assert!(matches!(result, Err(SimError::Task(_))));
    }

    #[test]
    fn malformed_toml_is_a_scenario_error() {
        assert!(matches!(Scenario::parse("[sim\n"), Err(SimError::Scenario(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scenario::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(SimError::Io(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, TWO_CHESTS).unwrap();
        let s = Scenario::from_file(&path).unwrap();
        assert_eq!(s.agents.len(), 1);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sim {
    use super::*;
    use crate::SimObserver;

    #[derive(Default)]
    struct Recorder {
        starts:    u64,
        busy:      Vec<usize>,
        snapshots: Vec<Tick>,
        ended_at:  Option<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, _tick: Tick, busy: usize) {
            self.busy.push(busy);
        }
        fn on_snapshot(&mut self, tick: Tick, haulers: &[crate::HaulerSnapshot]) {
            assert_eq!(haulers.len(), 1);
            self.snapshots.push(tick);
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.ended_at = Some(final_tick);
        }
    }

    #[test]
    fn agent_opens_source_on_first_interaction_tick() {
        let mut sim = two_chests();
        sim.run_ticks(3, &mut NoopObserver).unwrap();

        let hauler = sim.hauler(AgentId(0)).unwrap();
        assert_eq!(hauler.task.state(), TaskState::InteractAtSource);
        let view = sim.presentation.view(AgentId(0)).unwrap();
        assert_eq!(view.display, DisplayState::GettingItem);
        assert_eq!(view.open_site, Some(BlockPos::new(2, 0, 0)));
        let source = sim.containers.get(hl_core::ContainerId(0)).unwrap();
        assert_eq!(source.viewers(), &[AgentId(0)]);
    }

    #[test]
    fn one_cycle_moves_a_capped_stack() {
        let mut sim = two_chests();
        // Arrive 1, pick up at 61, arrive at x=6 on 65, drop at 125.
        sim.run_ticks(126, &mut NoopObserver).unwrap();

        assert_eq!(count_of(&sim, 0, 1), 4);
        assert_eq!(count_of(&sim, 1, 1), 16);

        let hauler = sim.hauler(AgentId(0)).unwrap();
        assert_eq!(hauler.task.state(), TaskState::Idle);
        assert_eq!(hauler.memory.hand, None);
        assert_eq!(hauler.memory.cooldown.remaining(), 140);

        let view = sim.presentation.view(AgentId(0)).unwrap();
        assert_eq!(view.display, DisplayState::Idle);
        assert_eq!(view.open_site, None);
        assert_eq!(view.cues, 2);
        assert!(sim.containers.get(hl_core::ContainerId(1)).unwrap().viewers().is_empty());
    }

    #[test]
    fn full_run_empties_the_source() {
        let mut sim = two_chests();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(count_of(&sim, 0, 1), 0);
        assert_eq!(count_of(&sim, 1, 1), 20);
        assert_eq!(rec.starts, 600);
        assert_eq!(rec.busy.len(), 600);
        assert_eq!(rec.snapshots.len(), 30);
        assert_eq!(rec.ended_at, Some(Tick(600)));
        assert_eq!(sim.clock, Tick(600));
    }

    #[test]
    fn same_tick_race_shares_the_source_without_losing_items() {
        let text = format!("{TWO_CHESTS}\n[[agents]]\npos = {{ x = 2.5, y = 0.0, z = 0.5 }}\n");
        let mut sim = Scenario::parse(&text).unwrap().build().unwrap();

        // Both pick the source on tick 0, before either has opened it.
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        let source = sim.containers.get(hl_core::ContainerId(0)).unwrap();
        assert_eq!(source.viewers(), &[AgentId(0), AgentId(1)]);

        // Agent 0 takes 16, agent 1 the remaining 4; both drop at 125.
        sim.run_ticks(123, &mut NoopObserver).unwrap();
        assert_eq!(count_of(&sim, 0, 1), 0);
        assert_eq!(count_of(&sim, 1, 1), 20);
        for hauler in &sim.haulers {
            assert_eq!(hauler.task.state(), TaskState::Idle);
            assert_eq!(hauler.memory.hand, None);
        }
    }

    #[test]
    fn held_open_source_is_skipped() {
        let text = TWO_CHESTS.replace("role  = \"source\"", "role  = \"source\"\nviewers = 1");
        let mut sim = Scenario::parse(&text).unwrap().build().unwrap();
        sim.run_ticks(50, &mut NoopObserver).unwrap();

        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::Idle);
        assert_eq!(count_of(&sim, 0, 1), 20);
    }

    #[test]
    fn interrupt_stops_travel_but_not_interaction() {
        let mut sim = two_chests();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::TravelToSource);

        assert!(sim.interrupt(AgentId(0)));
        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::Idle);
        assert!(!sim.motion.is_moving(AgentId(0)));

        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::InteractAtSource);
        assert!(!sim.interrupt(AgentId(0)));
        assert!(!sim.interrupt(AgentId(7)));
    }

    #[test]
    fn scheduled_interrupt_fires_before_tasks_tick() {
        let text = format!("{TWO_CHESTS}\n[[interrupts]]\ntick  = 1\nagent = 0\n");
        let mut sim = Scenario::parse(&text).unwrap().build().unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();

        // Interrupted on its arrival tick before the task saw the arrival,
        // then the same pair is selected again on that tick.
        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::TravelToSource);
        assert_eq!(count_of(&sim, 0, 1), 20);
    }

    #[test]
    fn carried_stack_goes_straight_to_destination() {
        let text = TWO_CHESTS.replace(
            "pos = { x = 2.5, y = 0.0, z = 0.5 }",
            "pos = { x = 2.5, y = 0.0, z = 0.5 }\ncarrying = { kind = 1, count = 5 }",
        );
        let mut sim = Scenario::parse(&text).unwrap().build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.hauler(AgentId(0)).unwrap().task.state(), TaskState::TravelToDestination);

        // Arrive at 4, drop at 64.
        sim.run_ticks(64, &mut NoopObserver).unwrap();
        assert_eq!(count_of(&sim, 1, 1), 5);
        assert_eq!(sim.hauler(AgentId(0)).unwrap().memory.hand, None);
    }

    #[test]
    fn blocked_path_blacklists_the_source() {
        let text = format!("obstacles = [{{ x = 2, y = 0, z = 0 }}]\n{TWO_CHESTS}");
        let mut sim = Scenario::parse(&text).unwrap().build().unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        let hauler = sim.hauler(AgentId(0)).unwrap();
        assert_eq!(hauler.task.state(), TaskState::Idle);
        assert!(hauler.memory.unreachable.is_blacklisted(BlockPos::new(2, 0, 0), Tick(1)));
        assert_eq!(hauler.memory.cooldown.remaining(), 40);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let text = r#"
            [sim]
            total_ticks     = 400
            seed            = 99
            blocks_per_tick = 0.5

            [task]
            source_policy = "weighted_by_distance"

            [[sites]]
            pos   = { x = 0, y = 0, z = 0 }
            role  = "source"
            items = [{ kind = 1, count = 64 }]

            [[sites]]
            pos   = { x = 8, y = 0, z = 0 }
            role  = "source"
            items = [{ kind = 1, count = 64 }]

            [[sites]]
            pos  = { x = 4, y = 0, z = 6 }
            role = "destination"

            [[agents]]
            pos = { x = 4.5, y = 0.0, z = 0.5 }

            [[agents]]
            pos = { x = 3.5, y = 0.0, z = 2.5 }
        "#;
        let run = || {
            let mut sim = Scenario::parse(text).unwrap().build().unwrap();
            sim.run(&mut NoopObserver).unwrap();
            sim.snapshot(sim.clock)
        };
        assert_eq!(run(), run());
    }
}

// ── CSV trace ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use super::*;
    use crate::trace::{SNAPSHOT_FILE, SUMMARY_FILE};
    use crate::CsvTraceObserver;

    #[test]
    fn writes_headers_snapshots_and_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let mut trace = CsvTraceObserver::new(dir.path()).unwrap();
        let mut sim = two_chests();
        sim.settings.total_ticks = 200;
        sim.run(&mut trace).unwrap();
        assert!(trace.take_error().is_none());

        let mut snapshots = csv::Reader::from_path(dir.path().join(SNAPSHOT_FILE)).unwrap();
        let headers = snapshots.headers().unwrap().clone();
        assert_eq!(&headers[0], "tick");
        assert_eq!(&headers[2], "state");
        assert_eq!(headers.len(), 11);

        let rows: Vec<csv::StringRecord> = snapshots.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][2], TaskState::TravelToSource.as_str());
        // Tick 20: mid-interaction at the source.
        assert_eq!(&rows[1][3], DisplayState::GettingItem.as_str());
        assert_eq!(rows[1][7].parse::<BlockPos>().unwrap(), BlockPos::new(2, 0, 0));
        assert_eq!(&rows[0][7], "");

        let summaries = csv::Reader::from_path(dir.path().join(SUMMARY_FILE))
            .unwrap()
            .records()
            .count();
        assert_eq!(summaries, 200);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut trace = CsvTraceObserver::new(dir.path()).unwrap();
        trace.finish().unwrap();
        trace.finish().unwrap();
    }

    #[test]
    fn missing_directory_fails_on_create() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvTraceObserver::new(&dir.path().join("nope")).is_err());
    }
}
