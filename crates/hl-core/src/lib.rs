//! `hl-core`: foundational types for the `rust_haul` workspace.
//!
//! This crate is a dependency of every other `hl-*` crate.  It intentionally
//! has no `hl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `SiteId`, `ContainerId`, `PathHandle`, `ItemKind`, … |
//! | [`geo`]       | `BlockPos` (integer cell), `WorldPos` (continuous point)       |
//! | [`time`]      | `Tick`                                                         |
//! | [`rng`]       | `AgentRng` (per-agent deterministic RNG)                       |
//! | [`display`]   | `DisplayState`: what an agent shows to renderers               |
//! | [`item`]      | `ItemStack`, `MatchMode`                                       |
//! | [`error`]     | `CoreError`, `CoreResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod display;
pub mod error;
pub mod geo;
pub mod ids;
pub mod item;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use display::DisplayState;
pub use error::{CoreError, CoreResult};
pub use geo::{BlockPos, WorldPos};
pub use ids::{AgentId, CategoryId, ContainerId, CueId, ItemKind, PathHandle, SiteId};
pub use item::{ItemStack, MatchMode};
pub use rng::AgentRng;
pub use time::Tick;
