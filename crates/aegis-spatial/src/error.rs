//! Spatial-subsystem error type.

use thiserror::Error;

use aegis_core::NodeId;

/// Errors produced by `aegis-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("road graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("corridor graph has no nodes")]
    EmptyGraph,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
