//! `aegis-core` — foundational types for the aegis emergency routing engine.
//!
//! This crate is a dependency of every other `aegis-*` crate.  It has no
//! `aegis-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`                                     |
//! | [`geo`]        | `GeoPoint` (haversine, bearing, midpoint), `BoundingBox` |
//! | [`scenario`]   | `Scenario` classification and speed multipliers        |
//! | [`error`]      | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod scenario;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{bearing_delta, BoundingBox, GeoPoint, EARTH_RADIUS_M};
pub use ids::{EdgeId, NodeId};
pub use scenario::Scenario;
