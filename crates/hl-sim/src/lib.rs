//! `hl-sim`: a tick-stepped reference world for the transport task.
//!
//! Provides concrete implementations of the three collaborator traits the
//! task runs against, plus the loop that drives every agent.
//!
//! | Module           | Contents                                            |
//! |------------------|-----------------------------------------------------|
//! | `container`      | `ContainerStore`: slot containers (`ContainerHost`) |
//! | `motion`         | `MotionEngine<P>`: path following (`Navigator`)     |
//! | `presentation`   | `Presentation`: display state and cues              |
//! | `sim`            | `Sim<P>` and its tick loop                          |
//! | `builder`        | `SimBuilder` with input validation                  |
//! | `observer`       | `SimObserver` hooks and `HaulerSnapshot` rows       |
//! | `trace`          | `CsvTraceObserver`                                  |
//! | `scenario`       | TOML scenario loading                               |
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..settings.total_ticks:
//!   ① Arrivals    journeys whose arrival tick has come are completed
//!   ② Interrupts  scheduled interrupts for this tick are delivered
//!   ③ Tasks       ascending AgentId: cooldown.count_down(); task.tick(ctx)
//!   ④ Observers   on_tick_end, then on_snapshot every trace interval
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hl_sim::{NoopObserver, Scenario};
//!
//! let mut sim = Scenario::from_file("scenario.toml".as_ref())?.build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod container;
pub mod error;
pub mod motion;
pub mod observer;
pub mod presentation;
pub mod scenario;
pub mod settings;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use container::{Container, ContainerStore};
pub use error::{SimError, SimResult};
pub use motion::{MotionEngine, MovementState};
pub use observer::{HaulerSnapshot, NoopObserver, SimObserver};
pub use presentation::{AgentView, Presentation};
pub use scenario::{AgentSpec, DESTINATION_TAG, InterruptSpec, SOURCE_TAG, Scenario, SiteRole, SiteSpec};
pub use settings::SimSettings;
pub use sim::{Hauler, Sim};
pub use trace::CsvTraceObserver;
