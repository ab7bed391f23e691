//! Floor-plan navigation library.
//!
//! This crate turns a floor description (rooms, doors, dimensions) into a
//! weighted graph and answers route queries over it with BFS, Dijkstra or
//! A*. Graphs that carry negative weights are reweighted with Johnson's
//! algorithm before searching. Higher-level consumers (the CLI) should only
//! depend on the items exported here instead of reimplementing behavior.

pub mod context;
pub mod error;
pub mod features;
pub mod floor;
pub mod graph;
pub mod johnson;
pub mod output;
pub mod path;
pub mod routing;

pub use context::{FloorState, NavigationContext};
pub use error::{Endpoint, Error, Result};
pub use features::{
    AccessibilitySummary, Distribution, FeatureAnalyzer, FloorFeatures, PathFeatures, RoomFeatures,
    Transition,
};
pub use floor::{
    load_floor_plan, Bounds, Dimensions, Door, FloorPlan, Network, NetworkEdge, NetworkNode, NodeId,
    Point, Room,
};
pub use graph::{
    build_graph, DoorWeight, EdgeKind, Graph, GraphBuildOptions, GraphStats, Node, NodeKind,
};
pub use johnson::{reweight, Reweighted};
pub use output::{RouteRenderMode, RouteSummary};
pub use routing::{
    PathFinder, PathResult, Route, RouteAlgorithm, DEFAULT_MAX_RESULTS, DEFAULT_PATH_CUTOFF,
    MAX_PATH_CUTOFF,
};
