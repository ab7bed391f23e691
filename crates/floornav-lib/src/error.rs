use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::floor::NodeId;

/// Convenient result alias for the floor navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a route query referenced a missing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Endpoint::Start => "Starting",
            Endpoint::End => "Destination",
        };
        f.write_str(value)
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a node identifier is not part of the graph.
    #[error("{}", format_unknown_node(.id, .role))]
    UnknownNode { id: NodeId, role: Option<Endpoint> },

    /// Raised when adding a node whose identifier is already taken.
    #[error("node {id} already exists")]
    DuplicateNode { id: NodeId },

    /// Raised when an edge between the pair already exists and may not be replaced.
    #[error("edge between {a} and {b} already exists")]
    DuplicateEdge { a: NodeId, b: NodeId },

    /// Raised when both endpoints of an edge are the same node.
    #[error("refusing to connect {id} to itself")]
    SelfLoop { id: NodeId },

    /// Raised when Bellman-Ford keeps relaxing after |V| rounds.
    #[error("graph contains a negative-weight cycle")]
    NegativeCycle,

    /// Raised when the goal is unreachable from the start.
    #[error("No path found between {start} and {goal}")]
    NoPath { start: NodeId, goal: NodeId },

    /// Raised when an algorithm name does not resolve to a supported search.
    #[error("Unknown algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    /// Raised when asked to summarise a route with no steps.
    #[error("route contains no steps")]
    EmptyRoute,

    /// Raised when a floor description file cannot be read.
    #[error("failed to read floor plan from {path}")]
    FloorPlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_unknown_node(id: &str, role: &Option<Endpoint>) -> String {
    match role {
        Some(role) => format!("{role} room {id} not found"),
        None => format!("unknown node: {id}"),
    }
}
