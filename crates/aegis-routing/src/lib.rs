//! `aegis-routing` — shortest-path strategies over a corridor graph.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`path`]         | `ShortestPath`, `TraceSegment`                            |
//! | [`strategy`]     | `PathStrategy` trait, `BaselineStrategy`, `TracedStrategy` |
//! | [`experimental`] | `ExperimentalStrategy`, `SolverBackend`, `SolverInput`    |
//! | [`process`]      | `ProcessBackend` (out-of-process solver with hard timeout) |
//! | [`tree`]         | `DestinationTree`, `DestinationTreeCache`, `PrecomputedStrategy` |
//! | [`solver`]       | `PathSolver` dispatcher, `StrategyKind`, `Algorithm`      |
//! | [`error`]        | `RoutingError`, `RoutingResult<T>`                        |
//!
//! # Weights
//!
//! Every strategy minimises total edge length in metres.  Speeds only enter
//! the picture later, when `aegis-nav` derives arrival times.

pub mod error;
pub mod experimental;
pub mod path;
pub mod process;
pub mod solver;
pub mod strategy;
pub mod tree;

mod frontier;


pub use error::{RoutingError, RoutingResult};
pub use experimental::{ExperimentalStrategy, SolverBackend, SolverInput};
pub use path::{ShortestPath, TraceSegment};
pub use process::{ProcessBackend, DEFAULT_SOLVER_TIMEOUT};
pub use solver::{Algorithm, PathSolver, Resolution, StrategyKind};
pub use strategy::{BaselineStrategy, PathStrategy, TracedStrategy};
pub use tree::{DestinationTree, DestinationTreeCache, Landmark, PrecomputedStrategy};
