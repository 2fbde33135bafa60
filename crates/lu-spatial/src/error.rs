//! Spatial-subsystem error type.

use thiserror::Error;

use lu_core::NodeId;

/// Errors produced by `lu-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("network has no nodes to snap to")]
    EmptyNetwork,

    #[error("disutility covers {actual} edges but the network has {expected}")]
    EdgeCountMismatch { expected: usize, actual: usize },

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
