//! `aegis-spatial` — road graph, corridor caching, and closures.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`network`]  | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `EdgeAttrs` |
//! | [`corridor`] | `CorridorKey`, `GraphProvider`, `CorridorCache`, `Corridor` |
//! | [`provider`] | `ClippingProvider` over a preloaded regional graph        |
//! | [`closure`]  | `ClosureFilter`                                           |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod closure;
pub mod corridor;
pub mod error;
pub mod network;
pub mod provider;


pub use closure::{ClosureFilter, DEFAULT_CLOSURE_RADIUS_M};
pub use corridor::{Corridor, CorridorCache, CorridorKey, GraphProvider, DEFAULT_CORRIDOR_CAPACITY};
pub use error::{SpatialError, SpatialResult};
pub use network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
pub use provider::ClippingProvider;
