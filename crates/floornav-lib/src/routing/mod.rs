//! Route planning over a floor graph.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported routing algorithms (BFS, Dijkstra, A*)
//! - [`Route`] - Planned route result
//! - [`PathResult`] - Boundary shape handed to renderers and exporters
//! - [`PathFinder`] - Query entry point bound to a read-only graph
//!
//! # Failure contract
//!
//! [`PathFinder::find_path`] is strict: unknown endpoints and unreachable
//! goals are typed errors. [`PathFinder::find_all_paths`] and
//! [`PathFinder::shortest_distance`] are convenience queries that fold every
//! failure into an empty list or the `-1.0` sentinel respectively.
//!
//! # Example
//!
//! ```ignore
//! use floornav_lib::{build_graph, FloorPlan, GraphBuildOptions, PathFinder, RouteAlgorithm};
//!
//! let graph = build_graph(&floor, &GraphBuildOptions::default())?;
//! let finder = PathFinder::new(&graph);
//! let route = finder.find_path("101", "102", RouteAlgorithm::Dijkstra)?;
//! println!("Route: {} hops", route.hop_count());
//! ```

mod alternatives;

pub use alternatives::{DEFAULT_MAX_RESULTS, DEFAULT_PATH_CUTOFF, MAX_PATH_CUTOFF};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Endpoint, Error, Result};
use crate::floor::NodeId;
use crate::graph::Graph;
use crate::johnson::reweight;
use crate::path::{
    admissible_scale, find_route_a_star, find_route_bfs, find_route_dijkstra, Heuristic,
    Traversal,
};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (weighted graph).
    #[default]
    Dijkstra,
    /// A* search (heuristic guided).
    #[serde(rename = "astar")]
    AStar,
    /// Breadth-first search (unweighted graph).
    Bfs,
}

impl RouteAlgorithm {
    /// Whether the search minimises edge weights rather than hop count.
    pub fn is_weighted(self) -> bool {
        !matches!(self, RouteAlgorithm::Bfs)
    }
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "astar",
            RouteAlgorithm::Bfs => "bfs",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "astar" | "a-star" | "a_star" => Ok(RouteAlgorithm::AStar),
            "bfs" => Ok(RouteAlgorithm::Bfs),
            _ => Err(Error::UnsupportedAlgorithm {
                name: value.to_string(),
            }),
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub algorithm: RouteAlgorithm,
    pub steps: Vec<NodeId>,
    /// Weighted length for Dijkstra/A*, hop count for BFS.
    pub distance: f64,
}

impl Route {
    fn from_traversal(algorithm: RouteAlgorithm, traversal: Traversal) -> Self {
        Self {
            algorithm,
            steps: traversal.steps,
            distance: traversal.cost,
        }
    }

    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&str> {
        self.steps.first().map(String::as_str)
    }

    pub fn goal(&self) -> Option<&str> {
        self.steps.last().map(String::as_str)
    }
}

/// Serializable outcome of a route query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub success: bool,
    pub path: Vec<NodeId>,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Hop count, reported for alternative routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
}

impl PathResult {
    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            path: Vec::new(),
            distance: 0.0,
            error: Some(error.to_string()),
            steps: None,
        }
    }
}

impl From<Route> for PathResult {
    fn from(route: Route) -> Self {
        Self {
            success: true,
            path: route.steps,
            distance: route.distance,
            error: None,
            steps: None,
        }
    }
}

impl From<Result<Route>> for PathResult {
    fn from(result: Result<Route>) -> Self {
        match result {
            Ok(route) => route.into(),
            Err(error) => PathResult::failure(&error),
        }
    }
}

/// Stateless route queries against a shared, read-only graph.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g> {
    graph: &'g Graph,
    heuristic_scale: f64,
    has_negative_weights: bool,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let has_negative_weights = graph.has_negative_weights();
        let heuristic_scale = if has_negative_weights {
            0.0
        } else {
            admissible_scale(graph)
        };

        Self {
            graph,
            heuristic_scale,
            has_negative_weights,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Find a route between two nodes with the requested algorithm.
    ///
    /// Weighted searches over a graph with negative weights are transparently
    /// run on a Johnson reweighting and report the true distance.
    pub fn find_path(&self, start: &str, goal: &str, algorithm: RouteAlgorithm) -> Result<Route> {
        self.ensure_endpoints(start, goal)?;

        if start == goal {
            return Ok(Route {
                algorithm,
                steps: vec![start.to_string()],
                distance: 0.0,
            });
        }

        if algorithm.is_weighted() && self.has_negative_weights {
            return self.find_path_reweighted(start, goal, algorithm);
        }

        let traversal = match algorithm {
            RouteAlgorithm::Bfs => find_route_bfs(self.graph, start, goal),
            RouteAlgorithm::Dijkstra => find_route_dijkstra(self.graph, start, goal),
            RouteAlgorithm::AStar => {
                let heuristic = Heuristic::euclidean(self.heuristic_scale, self.graph, goal);
                find_route_a_star(self.graph, start, goal, &heuristic)
            }
        };

        traversal
            .map(|traversal| Route::from_traversal(algorithm, traversal))
            .ok_or_else(|| no_path(start, goal))
    }

    /// Resolve an algorithm name and run [`PathFinder::find_path`].
    pub fn find_path_named(&self, start: &str, goal: &str, algorithm: &str) -> Result<Route> {
        let algorithm = algorithm.parse::<RouteAlgorithm>()?;
        self.find_path(start, goal, algorithm)
    }

    /// Always reweight with Johnson's algorithm, then run Dijkstra.
    pub fn find_path_johnson(&self, start: &str, goal: &str) -> Result<Route> {
        self.ensure_endpoints(start, goal)?;
        if start == goal {
            return Ok(Route {
                algorithm: RouteAlgorithm::Dijkstra,
                steps: vec![start.to_string()],
                distance: 0.0,
            });
        }
        self.find_path_reweighted(start, goal, RouteAlgorithm::Dijkstra)
    }

    fn find_path_reweighted(
        &self,
        start: &str,
        goal: &str,
        algorithm: RouteAlgorithm,
    ) -> Result<Route> {
        let reweighted = reweight(self.graph)?;
        let graph = reweighted.graph();

        let traversal = match algorithm {
            RouteAlgorithm::AStar => {
                let heuristic = Heuristic::euclidean(admissible_scale(graph), graph, goal);
                find_route_a_star(graph, start, goal, &heuristic)
            }
            _ => find_route_dijkstra(graph, start, goal),
        }
        .ok_or_else(|| no_path(start, goal))?;

        let distance = reweighted.true_distance(start, goal, traversal.cost);
        debug!(
            %start,
            %goal,
            reweighted = traversal.cost,
            distance,
            "recovered true distance from reweighted search"
        );

        Ok(Route {
            algorithm,
            steps: traversal.steps,
            distance,
        })
    }

    /// Shortest weighted distance, or `-1.0` when no route can be produced.
    pub fn shortest_distance(&self, start: &str, goal: &str) -> f64 {
        match self.find_path(start, goal, RouteAlgorithm::Dijkstra) {
            Ok(route) => route.distance,
            Err(error) => {
                debug!(%start, %goal, %error, "shortest distance unavailable");
                -1.0
            }
        }
    }

    /// Identifiers adjacent to `id`, empty if the node is unknown.
    pub fn neighbours(&self, id: &str) -> &'g [NodeId] {
        self.graph.neighbour_ids(id)
    }

    /// Whether the two nodes share a direct edge.
    pub fn is_connected(&self, a: &str, b: &str) -> bool {
        self.graph.has_edge(a, b)
    }

    fn ensure_endpoints(&self, start: &str, goal: &str) -> Result<()> {
        for (id, role) in [(start, Endpoint::Start), (goal, Endpoint::End)] {
            if !self.graph.contains(id) {
                return Err(Error::UnknownNode {
                    id: id.to_string(),
                    role: Some(role),
                });
            }
        }
        Ok(())
    }
}

fn no_path(start: &str, goal: &str) -> Error {
    Error::NoPath {
        start: start.to_string(),
        goal: goal.to_string(),
    }
}
