use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::floor::{NodeId, Point};
use crate::graph::Graph;

/// Steps and accumulated cost of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub steps: Vec<NodeId>,
    pub cost: f64,
}

impl Traversal {
    fn single(node: &str) -> Self {
        Self {
            steps: vec![node.to_string()],
            cost: 0.0,
        }
    }

    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Straight-line estimate of the remaining cost towards a goal.
///
/// The Euclidean distance is multiplied by the smallest `weight / length`
/// ratio found on any arc so the estimate never exceeds the true remaining
/// cost, even when doors are weighted below their geometric length.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    scale: f64,
    goal: Option<Point>,
}

impl Heuristic {
    /// Heuristic that always returns zero, turning A* into Dijkstra.
    pub const fn zero() -> Self {
        Self {
            scale: 0.0,
            goal: None,
        }
    }

    pub fn euclidean(scale: f64, graph: &Graph, goal: &str) -> Self {
        Self {
            scale,
            goal: graph.node(goal).and_then(|node| node.center),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn estimate(&self, graph: &Graph, node: &str) -> f64 {
        if self.scale <= 0.0 {
            return 0.0;
        }
        let Some(goal) = self.goal else {
            return 0.0;
        };
        match graph.node(node).and_then(|node| node.center) {
            Some(center) => self.scale * center.distance_to(&goal),
            None => 0.0,
        }
    }
}

/// Largest factor by which straight-line distance can be scaled while staying
/// admissible and consistent for every arc in `graph`.
///
/// Returns 0 when any arc touches a node without a center.
pub fn admissible_scale(graph: &Graph) -> f64 {
    let center = |id: &str| graph.node(id).and_then(|node| node.center);

    let mut scale = 1.0_f64;
    for (from, edge) in graph.arcs() {
        let (Some(a), Some(b)) = (center(from), center(&edge.target)) else {
            return 0.0;
        };
        let length = a.distance_to(&b);
        if length <= f64::EPSILON {
            continue;
        }
        scale = scale.min(edge.weight / length);
    }
    scale.clamp(0.0, 1.0)
}

/// Run breadth-first search; the cost is the number of hops.
pub fn find_route_bfs(graph: &Graph, start: &str, goal: &str) -> Option<Traversal> {
    let start = graph.node(start)?.id.as_str();
    if start == goal {
        return Some(Traversal::single(start));
    }

    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    let mut queue = VecDeque::new();

    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for edge in graph.neighbours(current) {
            let next = edge.target.as_str();
            if parents.contains_key(next) {
                continue;
            }

            parents.insert(next, Some(current));
            if next == goal {
                let steps = reconstruct_path(&parents, start, next);
                let cost = steps.len().saturating_sub(1) as f64;
                return Some(Traversal { steps, cost });
            }
            queue.push_back(next);
        }
    }

    None
}

/// Run Dijkstra's algorithm to find the lowest-cost path.
///
/// Arc weights must be non-negative. Nodes settle in ascending
/// `(cost, id)` order; when two predecessors reach a node at the same cost,
/// the one settled last wins.
pub fn find_route_dijkstra(graph: &Graph, start: &str, goal: &str) -> Option<Traversal> {
    find_route_a_star(graph, start, goal, &Heuristic::zero())
}

/// Run A* search guided by `heuristic`.
///
/// Uses the same settlement and tie-break rules as [`find_route_dijkstra`],
/// ordered by estimated total cost instead of cost so far.
pub fn find_route_a_star(
    graph: &Graph,
    start: &str,
    goal: &str,
    heuristic: &Heuristic,
) -> Option<Traversal> {
    let start = graph.node(start)?.id.as_str();
    if start == goal {
        return Some(Traversal::single(start));
    }

    let mut g_score: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(AStarEntry::new(
        start,
        0.0,
        heuristic.estimate(graph, start),
    ));

    while let Some(entry) = queue.pop() {
        // First pop of a node carries its final score; later pops are stale.
        if !settled.insert(entry.node) {
            continue;
        }
        let current_score = entry.cost.0;

        if entry.node == goal {
            return Some(Traversal {
                steps: reconstruct_path(&parents, start, entry.node),
                cost: current_score,
            });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target.as_str();
            if settled.contains(next) {
                continue;
            }

            let tentative = current_score + edge.weight;
            if tentative <= *g_score.get(next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative);
                parents.insert(next, Some(entry.node));
                let estimate = heuristic.estimate(graph, next);
                queue.push(AStarEntry::new(next, tentative, estimate));
            }
        }
    }

    None
}

/// Sum of arc weights along `steps`, or `None` if a hop is not traversable.
pub fn route_distance(graph: &Graph, steps: &[NodeId]) -> Option<f64> {
    steps
        .windows(2)
        .map(|pair| graph.arc(&pair[0], &pair[1]).map(|edge| edge.weight))
        .sum()
}

/// Enumerate simple paths from `start` to `goal` of at most `cutoff` hops.
///
/// Paths come out ordered by hop count, ties in depth-first discovery order,
/// and enumeration stops as soon as `limit` paths have been found.
pub fn find_simple_paths(
    graph: &Graph,
    start: &str,
    goal: &str,
    limit: usize,
    cutoff: usize,
) -> Vec<Vec<NodeId>> {
    let (Some(start), Some(goal)) = (graph.node(start), graph.node(goal)) else {
        return Vec::new();
    };
    if limit == 0 || start.id == goal.id {
        return Vec::new();
    }

    let hops_to_goal = reverse_hop_counts(graph, &goal.id);
    let mut walker = PathWalker {
        graph,
        goal: &goal.id,
        limit,
        hops_to_goal,
        trail: vec![start.id.as_str()],
        on_trail: HashSet::from([start.id.as_str()]),
        found: Vec::new(),
    };

    for depth in 1..=cutoff {
        walker.walk(&start.id, depth);
        if walker.found.len() >= limit {
            break;
        }
    }
    walker.found
}

struct PathWalker<'g> {
    graph: &'g Graph,
    goal: &'g str,
    limit: usize,
    hops_to_goal: HashMap<&'g str, usize>,
    trail: Vec<&'g str>,
    on_trail: HashSet<&'g str>,
    found: Vec<Vec<NodeId>>,
}

impl<'g> PathWalker<'g> {
    /// Extend the trail by exactly `remaining` more hops.
    fn walk(&mut self, current: &'g str, remaining: usize) {
        if self.found.len() >= self.limit {
            return;
        }
        if remaining == 0 {
            if current == self.goal {
                self.found
                    .push(self.trail.iter().map(|id| id.to_string()).collect());
            }
            return;
        }
        if current == self.goal {
            return;
        }

        let graph = self.graph;
        for edge in graph.neighbours(current) {
            let next = edge.target.as_str();
            if self.on_trail.contains(next) {
                continue;
            }
            // Prune branches that can no longer reach the goal in time.
            match self.hops_to_goal.get(next) {
                Some(&hops) if hops < remaining => {}
                _ => continue,
            }

            self.trail.push(next);
            self.on_trail.insert(next);
            self.walk(next, remaining - 1);
            self.on_trail.remove(next);
            self.trail.pop();
        }
    }
}

/// Fewest hops from every node to `goal`, following arcs forwards.
fn reverse_hop_counts<'g>(graph: &'g Graph, goal: &'g str) -> HashMap<&'g str, usize> {
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, edge) in graph.arcs() {
        incoming.entry(edge.target.as_str()).or_default().push(from);
    }

    let mut hops = HashMap::from([(goal, 0usize)]);
    let mut queue = VecDeque::from([goal]);
    while let Some(current) = queue.pop_front() {
        let next_hops = hops[current] + 1;
        for &source in incoming.get(current).map(Vec::as_slice).unwrap_or(&[]) {
            if !hops.contains_key(source) {
                hops.insert(source, next_hops);
                queue.push_back(source);
            }
        }
    }
    hops
}

fn reconstruct_path(parents: &HashMap<&str, Option<&str>>, start: &str, goal: &str) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == start {
            break;
        }
        current = parents.get(node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry<'g> {
    node: &'g str,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl<'g> AStarEntry<'g> {
    fn new(node: &'g str, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for AStarEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, Node};

    fn diamond() -> Graph {
        let mut graph = Graph::new();
        for id in ["A", "B", "C", "D"] {
            graph.add_node(Node::junction(id, None)).unwrap();
        }
        graph.add_edge("A", "B", EdgeKind::Corridor, 1.0, None).unwrap();
        graph.add_edge("B", "C", EdgeKind::Corridor, 2.0, None).unwrap();
        graph.add_edge("C", "D", EdgeKind::Corridor, 1.0, None).unwrap();
        graph.add_edge("A", "D", EdgeKind::Corridor, 4.0, None).unwrap();
        graph
    }

    #[test]
    fn dijkstra_tie_prefers_last_settled_predecessor() {
        let graph = diamond();
        let route = find_route_dijkstra(&graph, "A", "D").expect("route");
        assert_eq!(route.steps, vec!["A", "B", "C", "D"]);
        assert_eq!(route.cost, 4.0);
    }

    #[test]
    fn bfs_counts_hops() {
        let graph = diamond();
        let route = find_route_bfs(&graph, "A", "D").expect("route");
        assert_eq!(route.steps, vec!["A", "D"]);
        assert_eq!(route.cost, 1.0);
    }

    #[test]
    fn zero_weight_edges_do_not_create_parent_cycles() {
        let mut graph = Graph::new();
        for id in ["a", "b", "c"] {
            graph.add_node(Node::junction(id, None)).unwrap();
        }
        graph.add_edge("a", "b", EdgeKind::Door, 0.0, None).unwrap();
        graph.add_edge("b", "c", EdgeKind::Door, 0.0, None).unwrap();

        let route = find_route_dijkstra(&graph, "a", "c").expect("route");
        assert_eq!(route.steps, vec!["a", "b", "c"]);
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn admissible_scale_tracks_cheapest_ratio() {
        let mut graph = Graph::new();
        graph.add_node(Node::room("a", Point::new(0.0, 0.0))).unwrap();
        graph.add_node(Node::room("b", Point::new(10.0, 0.0))).unwrap();
        graph.add_node(Node::room("c", Point::new(20.0, 0.0))).unwrap();
        graph.add_edge("a", "b", EdgeKind::Corridor, 12.0, None).unwrap();
        assert_eq!(admissible_scale(&graph), 1.0);

        graph.add_edge("b", "c", EdgeKind::Door, 5.0, None).unwrap();
        assert_eq!(admissible_scale(&graph), 0.5);

        graph.add_node(Node::junction("j", None)).unwrap();
        graph.add_edge("c", "j", EdgeKind::Corridor, 1.0, None).unwrap();
        assert_eq!(admissible_scale(&graph), 0.0);
    }

    #[test]
    fn simple_paths_are_ordered_by_hops() {
        let graph = diamond();
        let paths = find_simple_paths(&graph, "A", "D", 10, 10);
        assert_eq!(paths, vec![vec!["A", "D"], vec!["A", "B", "C", "D"]]);
        assert_eq!(find_simple_paths(&graph, "A", "D", 1, 10).len(), 1);
        assert!(find_simple_paths(&graph, "A", "D", 5, 0).is_empty());
    }

    #[test]
    fn route_distance_sums_arc_weights() {
        let graph = diamond();
        let steps: Vec<NodeId> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(route_distance(&graph, &steps), Some(3.0));
        let broken: Vec<NodeId> = ["A", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(route_distance(&graph, &broken), None);
    }
}
