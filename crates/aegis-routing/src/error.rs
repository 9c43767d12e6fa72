//! Routing error type.
//!
//! `Solver` and `TreeMiss` are recovered inside [`PathSolver`](crate::PathSolver)
//! by falling back to the baseline strategy; callers of `resolve` only ever
//! see `EmptyCorridor`, `NodeNotFound`, or `NoPath`.

use thiserror::Error;

use aegis_core::NodeId;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("corridor graph is empty")]
    EmptyCorridor,

    #[error("node {0} is not in the corridor graph")]
    NodeNotFound(NodeId),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("external solver failed: {0}")]
    Solver(String),

    #[error("precomputed tree unusable: {0}")]
    TreeMiss(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
