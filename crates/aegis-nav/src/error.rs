use thiserror::Error;

use aegis_core::NodeId;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("path has no nodes")]
    EmptyPath,

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("path step {from} -> {to} has no edge in the graph")]
    MissingEdge { from: NodeId, to: NodeId },
}

pub type NavResult<T> = Result<T, NavError>;
