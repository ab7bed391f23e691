//! Bounded enumeration of alternative simple routes.

use tracing::debug;

use super::{PathFinder, PathResult};
use crate::path::{find_simple_paths, route_distance};

/// Number of alternatives returned when the caller has no preference.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Longest alternative considered, in hops, when the caller has no preference.
pub const DEFAULT_PATH_CUTOFF: usize = 10;

/// Hard ceiling on the hop cutoff. Simple-path enumeration grows
/// exponentially with depth, so larger requests are clamped.
pub const MAX_PATH_CUTOFF: usize = 16;

impl PathFinder<'_> {
    /// Enumerate up to `max_results` simple paths of at most `cutoff` hops,
    /// shortest hop count first.
    ///
    /// Never fails: unknown endpoints or an empty search yield an empty list.
    pub fn find_all_paths(
        &self,
        start: &str,
        goal: &str,
        max_results: usize,
        cutoff: usize,
    ) -> Vec<PathResult> {
        let graph = self.graph();
        let cutoff = cutoff
            .min(MAX_PATH_CUTOFF)
            .min(graph.node_count().saturating_sub(1));

        let paths = find_simple_paths(graph, start, goal, max_results, cutoff);
        debug!(%start, %goal, found = paths.len(), cutoff, "enumerated alternative routes");

        paths
            .into_iter()
            .filter_map(|path| {
                let distance = route_distance(graph, &path)?;
                let steps = path.len().saturating_sub(1);
                Some(PathResult {
                    success: true,
                    path,
                    distance,
                    error: None,
                    steps: Some(steps),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::floor::Point;
    use crate::graph::{EdgeKind, Graph, Node};
    use crate::routing::PathFinder;

    fn ladder() -> Graph {
        // a - b - c
        // |   |   |
        // d - e - f
        let mut graph = Graph::new();
        for (i, id) in ["a", "b", "c", "d", "e", "f"].into_iter().enumerate() {
            let center = Point::new((i % 3) as f64 * 10.0, (i / 3) as f64 * 10.0);
            graph.add_node(Node::room(id, center)).unwrap();
        }
        let rungs = [("a", "d"), ("b", "e"), ("c", "f")];
        let rails = [("a", "b"), ("b", "c"), ("d", "e"), ("e", "f")];
        for (a, b) in rails.into_iter().chain(rungs) {
            graph.add_edge(a, b, EdgeKind::Corridor, 12.0, None).unwrap();
        }
        graph
    }

    #[test]
    fn alternatives_are_simple_and_sorted() {
        let graph = ladder();
        let finder = PathFinder::new(&graph);
        let results = finder.find_all_paths("a", "f", 10, 10);

        assert!(!results.is_empty());
        let mut previous = 0;
        for result in &results {
            assert!(result.success);
            let hops = result.steps.expect("hop count");
            assert!(hops >= previous);
            previous = hops;

            let mut seen = std::collections::HashSet::new();
            assert!(result.path.iter().all(|id| seen.insert(id)));
            assert!((result.distance - 12.0 * hops as f64).abs() < 1e-9);
        }
        assert_eq!(results[0].steps, Some(3));
    }

    #[test]
    fn alternatives_respect_limits() {
        let graph = ladder();
        let finder = PathFinder::new(&graph);
        assert_eq!(finder.find_all_paths("a", "f", 2, 10).len(), 2);
        assert!(finder.find_all_paths("a", "f", 5, 2).is_empty());
        assert!(finder.find_all_paths("a", "missing", 5, 10).is_empty());
    }
}
