//! `hl-spatial`: sites, spatial indexing, bounded scans, and path planning.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`site`]     | `Site`, `SiteTags`                                           |
//! | [`index`]    | `SiteIndex` (site table + 3-D R-tree), `SiteIndexBuilder`    |
//! | [`scanner`]  | `SiteScanner`, `SearchRadii`, `Candidate`, `Candidates`      |
//! | [`planner`]  | `PathPlanner` trait, `Path`, `LinePlanner`                   |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod index;
pub mod planner;
pub mod scanner;
pub mod site;


pub use error::{SpatialError, SpatialResult};
pub use index::{SiteIndex, SiteIndexBuilder};
pub use planner::{LinePlanner, Path, PathPlanner};
pub use scanner::{Candidate, Candidates, SearchRadii, SitePredicate, SiteScanner};
pub use site::{Site, SiteTags};
