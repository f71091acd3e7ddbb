//! `hl-task`: the tick-driven transport task.
//!
//! An agent repeatedly picks a source and a destination site near it, walks
//! to the source, takes items out during a timed interaction, walks to the
//! destination, and puts them in.  Agents never coordinate directly: a
//! container somebody is already using is simply skipped.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                         |
//! |-----------------|------------------------------------------------------------------|
//! | [`env`]         | `Navigator`, `PathStatus`, `ContainerHost`, `TaskContext`, ...   |
//! | [`expiring`]    | `ExpiringSet<K>`: keyed set with lazy expiry                     |
//! | [`unreachable`] | `UnreachableTracker`                                             |
//! | [`cooldown`]    | `CooldownGate`                                                   |
//! | [`interaction`] | `InteractionTimer`, `InteractionOutcome`, `OutcomeTable`         |
//! | [`memory`]      | `HaulerMemory`, `DestinationMemory`                              |
//! | [`target`]      | `TransportTarget`, `SiteRef`, `Leg`                              |
//! | [`selector`]    | `TargetSelector`: pairing, queueing, destination lookup          |
//! | [`task`]        | `TransportTask` state machine, `TransportPlan`, `TaskState`      |
//! | [`config`]      | `TaskConfig`, `SourcePolicy`, speed multipliers                  |
//! | [`error`]       | `TaskError`, `TaskResult<T>`                                     |
//!
//! # Per-tick contract
//!
//! The owner of the agent loop, once per tick and per agent:
//!
//! 1. counts the agent's [`CooldownGate`] down by one;
//! 2. builds a [`TaskContext`] and calls [`TransportTask::tick`].
//!
//! Nothing here blocks, allocates per world site, or performs I/O.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on configuration types. |

pub mod config;
pub mod cooldown;
pub mod env;
pub mod error;
pub mod expiring;
pub mod interaction;
pub mod memory;
pub mod selector;
pub mod target;
pub mod task;
pub mod unreachable;


pub use config::{
    DEFAULT_SPEED_MULTIPLIER, DEFAULT_TRAVEL_TIMEOUT_TICKS, PANIC_SPEED_MULTIPLIER, SourcePolicy,
    TaskConfig,
};
pub use cooldown::CooldownGate;
pub use env::{
    AgentPresenter, ContainerHost, ContainerSnapshot, Navigator, PathStatus, TaskContext,
};
pub use error::{TaskError, TaskResult};
pub use expiring::ExpiringSet;
pub use interaction::{
    BEGIN_TICK, CUE_TICK, INTERACTION_TICKS, InteractionOutcome, InteractionSignal,
    InteractionTimer, OutcomeEffects, OutcomeTable,
};
pub use memory::{DestinationMemory, HaulerMemory};
pub use selector::{SelectedPair, TargetSelector};
pub use target::{Leg, SiteRef, TransportTarget};
pub use task::{TaskState, TransportPlan, TransportTask};
pub use unreachable::UnreachableTracker;
