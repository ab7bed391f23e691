//! Johnson's reweighting for graphs that may carry negative arc weights.
//!
//! Bellman-Ford computes a potential `h(v)` for every node; each arc
//! `u -> v` is then rewritten as `w + h(u) - h(v)`, which is never negative
//! unless the graph contains a negative cycle. Shortest paths are preserved,
//! and true distances are recovered with [`Reweighted::true_distance`].
//!
//! The caller's graph is never modified: the reweighted arcs live in a copy.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::floor::NodeId;
use crate::graph::Graph;

/// Improvements smaller than this are treated as floating-point noise.
const TOLERANCE: f64 = 1e-9;

/// A reweighted working copy of a graph plus the potentials that produced it.
#[derive(Debug, Clone)]
pub struct Reweighted {
    graph: Graph,
    potentials: HashMap<NodeId, f64>,
}

impl Reweighted {
    /// The graph with every arc weight made non-negative.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn potentials(&self) -> &HashMap<NodeId, f64> {
        &self.potentials
    }

    /// Potential of a node, zero for unknown identifiers.
    pub fn potential(&self, id: &str) -> f64 {
        self.potentials.get(id).copied().unwrap_or(0.0)
    }

    /// Convert a distance measured on the reweighted graph back into the
    /// original weights.
    pub fn true_distance(&self, start: &str, goal: &str, reweighted: f64) -> f64 {
        reweighted - self.potential(start) + self.potential(goal)
    }
}

/// Produce a non-negative reweighting of `graph`.
///
/// Fails with [`Error::NegativeCycle`] when some cycle has a negative total
/// weight; note that in an undirected graph any negative edge is such a cycle.
pub fn reweight(graph: &Graph) -> Result<Reweighted> {
    let potentials = bellman_ford_potentials(graph)?;

    let reweighted = graph.map_weights(|from, edge| {
        let adjusted = edge.weight + potentials[from] - potentials[edge.target.as_str()];
        if adjusted < 0.0 {
            debug_assert!(adjusted > -TOLERANCE, "reweighted arc {adjusted} is negative");
            0.0
        } else {
            adjusted
        }
    });

    let potentials = potentials
        .into_iter()
        .map(|(id, h)| (id.to_string(), h))
        .collect();

    Ok(Reweighted {
        graph: reweighted,
        potentials,
    })
}

/// Shortest distance to every node from a synthetic source joined to all
/// nodes by zero-weight arcs.
///
/// The source is never inserted into the graph. Relaxing its arcs is the
/// same as starting every potential at zero, so the search begins there and
/// continues with the real arcs only.
pub fn bellman_ford_potentials(graph: &Graph) -> Result<HashMap<&str, f64>> {
    let mut potentials: HashMap<&str, f64> = graph.nodes().map(|node| (node.id.as_str(), 0.0)).collect();

    for round in 0..graph.node_count() {
        if !relax_all(graph, &mut potentials) {
            debug!(rounds = round + 1, "bellman-ford converged");
            return Ok(potentials);
        }
    }

    if relax_all(graph, &mut potentials) {
        debug!("bellman-ford detected a negative cycle");
        return Err(Error::NegativeCycle);
    }
    Ok(potentials)
}

fn relax_all<'g>(graph: &'g Graph, potentials: &mut HashMap<&'g str, f64>) -> bool {
    let mut changed = false;
    for (from, edge) in graph.arcs() {
        let candidate = potentials[from] + edge.weight;
        if let Some(current) = potentials.get_mut(edge.target.as_str()) {
            if candidate < *current - TOLERANCE {
                *current = candidate;
                changed = true;
            }
        }
    }
    changed
}
