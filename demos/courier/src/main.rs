//! courier: a storeroom run of the transport task.
//!
//! Loads a TOML scenario (first argument, default `scenario.toml` next to
//! this crate), runs it with a CSV trace under `output/courier/`, and prints
//! where everything ended up.
//!
//! Set `RUST_LOG=hl_task=debug` to watch every transition.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hl_core::{AgentId, Tick};
use hl_sim::{CsvTraceObserver, HaulerSnapshot, Scenario, SimObserver};
use hl_task::TaskState;

const OUTPUT_DIR: &str = "output/courier";

// ── Observer wrapper to count deliveries ─────────────────────────────────────

/// Forwards to the CSV trace and counts container visits per agent.
struct CountingObserver {
    inner:    CsvTraceObserver,
    previous: Vec<TaskState>,
    visits:   Vec<u32>,
}

impl CountingObserver {
    fn new(inner: CsvTraceObserver, agents: usize) -> Self {
        Self { inner, previous: vec![TaskState::Idle; agents], visits: vec![0; agents] }
    }
}

impl SimObserver for CountingObserver {
    fn on_tick_end(&mut self, tick: Tick, busy: usize) {
        self.inner.on_tick_end(tick, busy);
    }

    fn on_snapshot(&mut self, tick: Tick, haulers: &[HaulerSnapshot]) {
        for h in haulers {
            let before = &mut self.previous[h.agent.index()];
            if before.is_interacting() && !h.state.is_interacting() {
                self.visits[h.agent.index()] += 1;
            }
            *before = h.state;
        }
        self.inner.on_snapshot(tick, haulers);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("scenario.toml"));
    let scenario = Scenario::from_file(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    info!(
        path   = %path.display(),
        sites  = scenario.sites.len(),
        agents = scenario.agents.len(),
        ticks  = scenario.sim.total_ticks,
        "scenario loaded",
    );

    let mut sim = scenario.build().context("building simulation")?;

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let trace = CsvTraceObserver::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(trace, sim.agent_count());

    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("trace error: {e}");
    }

    println!("Simulation complete in {:.3} s ({} ticks)", elapsed.as_secs_f64(), sim.clock.0);
    println!("Trace written to {OUTPUT_DIR}/");
    println!();

    // Visits are sampled at snapshot ticks; back-to-back interactions can merge.
    println!("{:<8} {:<24} {:<10} {:<9} {:<8}", "Agent", "State", "Carrying", "Cooldown", "Visits");
    println!("{}", "-".repeat(62));
    for row in sim.snapshot(sim.clock) {
        let carrying = row
            .carrying
            .map(|s| format!("{}x{}", s.count, s.kind.0))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<8} {:<24} {:<10} {:<9} {:<8}",
            row.agent.0,
            row.state.as_str(),
            carrying,
            row.cooldown,
            obs.visits[row.agent.index()],
        );
    }
    println!();

    println!("{:<10} {:<14} {:<8} {}", "Container", "Site", "Items", "Contents");
    println!("{}", "-".repeat(62));
    for site in sim.sites.iter() {
        if site.linked.is_some_and(|other| other < site.id) {
            continue;
        }
        let Some(container) = sim.containers.get(site.container) else {
            continue;
        };
        let contents: Vec<String> = container
            .stacks()
            .map(|s| format!("{}x{}", s.count, s.kind.0))
            .collect();
        println!(
            "{:<10} {:<14} {:<8} {}",
            site.container.0,
            format!("{} {} {}", site.pos.x, site.pos.y, site.pos.z),
            container.count_where(|_| true),
            contents.join(" "),
        );
    }

    let stuck: Vec<AgentId> = sim
        .haulers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.memory.hand.is_some())
        .map(|(i, _)| AgentId(i as u32))
        .collect();
    if !stuck.is_empty() {
        println!();
        println!("Still carrying at end of run: {stuck:?}");
    }

    Ok(())
}
