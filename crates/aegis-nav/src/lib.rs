//! `aegis-nav` — turn a raw node path into a navigable route package.
//!
//! ```text
//! nodes ─► polyline::expand ─► timeline ─► steps ─► RoutePackage
//!                                 └──────► pivots ──┘
//! ```
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`speed`]    | `maxspeed` parsing and road-class defaults                |
//! | [`polyline`] | `expand`, `EdgeSpan`, `Expansion`                         |
//! | [`timeline`] | cumulative distance and time arrays                       |
//! | [`steps`]    | `NavigationStep`, `Maneuver`, `build_steps`               |
//! | [`pivots`]   | `Pivot`, `find_pivots`                                    |
//! | [`package`]  | `RoutePackage`, `NarrativeBuilder`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize` on the package types.                    |

pub mod error;
pub mod package;
pub mod pivots;
pub mod polyline;
pub mod speed;
pub mod steps;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use error::{NavError, NavResult};
pub use package::{NarrativeBuilder, RoutePackage};
pub use pivots::{find_pivots, Pivot, PIVOT_CATEGORY};
pub use polyline::{expand, EdgeSpan, Expansion, UNNAMED_ROAD};
pub use speed::{class_speed_kmh, edge_speed_kmh, parse_maxspeed_kmh};
pub use steps::{build_steps, Maneuver, NavigationStep};
pub use timeline::{cumulative_distance, cumulative_time};
