use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::floor::{Bounds, Door, FloorPlan, Network, NodeId, Point, Room};

/// Rooms whose centers are closer than this are linked by an inferred corridor.
pub const DEFAULT_CORRIDOR_THRESHOLD: f64 = 200.0;

/// Corridors wind around furniture and walls, so they cost a little more than
/// the straight line between room centers.
pub const DEFAULT_CORRIDOR_PENALTY: f64 = 1.2;

/// Classification for a node in the floor graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Room,
    Junction,
}

/// Classification for the edge used in the floor graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Authored connection taken from the floor's door list.
    Door,
    /// Inferred connection between geometrically close rooms.
    Corridor,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EdgeKind::Door => "door",
            EdgeKind::Corridor => "corridor",
        };
        f.write_str(value)
    }
}

/// Door metadata carried by `door` edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorRef {
    pub id: String,
    pub position: Point,
}

impl From<&Door> for DoorRef {
    fn from(door: &Door) -> Self {
        Self {
            id: door.id.clone(),
            position: door.position,
        }
    }
}

/// Vertex within the floor graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub center: Option<Point>,
    pub bounds: Option<Bounds>,
    pub name: Option<String>,
}

impl Node {
    pub fn room(id: impl Into<NodeId>, center: Point) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Room,
            center: Some(center),
            bounds: None,
            name: None,
        }
    }

    pub fn junction(id: impl Into<NodeId>, center: Option<Point>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Junction,
            center,
            bounds: None,
            name: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown to people, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl From<&Room> for Node {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            kind: NodeKind::Room,
            center: Some(room.center),
            bounds: room.bounds,
            name: room.name.clone(),
        }
    }
}

/// Directed arc stored in a node's adjacency list.
///
/// Undirected edges are stored as a pair of arcs with identical metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub kind: EdgeKind,
    pub weight: f64,
    pub door: Option<DoorRef>,
}

/// How a door edge is weighted when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorWeight {
    /// Every door costs the same fixed amount. The default is zero: passing
    /// through a door is free and only corridors add distance.
    Constant(f64),
    /// Door cost is the Euclidean distance between the two room centers.
    CenterDistance,
}

impl Default for DoorWeight {
    fn default() -> Self {
        DoorWeight::Constant(0.0)
    }
}

impl DoorWeight {
    fn resolve(&self, graph: &Graph, a: &str, b: &str) -> f64 {
        match *self {
            DoorWeight::Constant(weight) => weight,
            DoorWeight::CenterDistance => {
                let center = |id: &str| graph.node(id).and_then(|node| node.center);
                match (center(a), center(b)) {
                    (Some(from), Some(to)) => from.distance_to(&to),
                    _ => 0.0,
                }
            }
        }
    }
}

/// Tunables for [`build_graph`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBuildOptions {
    pub corridor_threshold: f64,
    pub corridor_penalty: f64,
    pub door_weight: DoorWeight,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            corridor_threshold: DEFAULT_CORRIDOR_THRESHOLD,
            corridor_penalty: DEFAULT_CORRIDOR_PENALTY,
            door_weight: DoorWeight::default(),
        }
    }
}

/// Summary statistics for a built graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub is_connected: bool,
    pub density: f64,
    pub average_clustering: f64,
}

/// Weighted floor graph used by the pathfinding algorithms.
///
/// Nodes keep their insertion order so that every traversal, and therefore
/// every tie-break, is reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    linked: HashMap<NodeId, Vec<NodeId>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, failing if the identifier is already present.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }
        self.order.push(node.id.clone());
        self.adjacency.insert(node.id.clone(), Vec::new());
        self.linked.insert(node.id.clone(), Vec::new());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Connect `a` and `b` in both directions.
    ///
    /// A `door` edge replaces an existing `corridor` edge; any other clash
    /// fails with [`Error::DuplicateEdge`]. The graph is left untouched on error.
    pub fn add_edge(
        &mut self,
        a: &str,
        b: &str,
        kind: EdgeKind,
        weight: f64,
        door: Option<DoorRef>,
    ) -> Result<()> {
        let replacing = self.validate_edge(a, b, kind)?;
        if replacing {
            self.remove_arcs(a, b);
        }
        self.push_arc(a, b, kind, weight, door.clone());
        self.push_arc(b, a, kind, weight, door);
        if !replacing {
            self.link(a, b);
        }
        Ok(())
    }

    /// Connect `from` to `to` in one direction only.
    ///
    /// The pair is considered occupied afterwards, exactly like an undirected
    /// edge, so the duplicate policy of [`Graph::add_edge`] applies.
    pub fn add_one_way_edge(
        &mut self,
        from: &str,
        to: &str,
        kind: EdgeKind,
        weight: f64,
        door: Option<DoorRef>,
    ) -> Result<()> {
        let replacing = self.validate_edge(from, to, kind)?;
        if replacing {
            self.remove_arcs(from, to);
        }
        self.push_arc(from, to, kind, weight, door);
        if !replacing {
            self.link(from, to);
        }
        Ok(())
    }

    fn validate_edge(&self, a: &str, b: &str, kind: EdgeKind) -> Result<bool> {
        for id in [a, b] {
            if !self.contains(id) {
                return Err(Error::UnknownNode {
                    id: id.to_string(),
                    role: None,
                });
            }
        }
        if a == b {
            return Err(Error::SelfLoop { id: a.to_string() });
        }

        match self.edge_kind(a, b) {
            None => Ok(false),
            Some(EdgeKind::Corridor) if kind == EdgeKind::Door => Ok(true),
            Some(_) => Err(Error::DuplicateEdge {
                a: a.to_string(),
                b: b.to_string(),
            }),
        }
    }

    fn push_arc(&mut self, from: &str, to: &str, kind: EdgeKind, weight: f64, door: Option<DoorRef>) {
        self.adjacency.entry(from.to_string()).or_default().push(Edge {
            target: to.to_string(),
            kind,
            weight,
            door,
        });
    }

    fn remove_arcs(&mut self, a: &str, b: &str) {
        if let Some(edges) = self.adjacency.get_mut(a) {
            edges.retain(|edge| edge.target != b);
        }
        if let Some(edges) = self.adjacency.get_mut(b) {
            edges.retain(|edge| edge.target != a);
        }
    }

    fn link(&mut self, a: &str, b: &str) {
        self.linked.entry(a.to_string()).or_default().push(b.to_string());
        self.linked.entry(b.to_string()).or_default().push(a.to_string());
        self.edge_count += 1;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterate nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Outgoing arcs for a given node, empty if the node is unknown.
    pub fn neighbours(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Identifiers of every node sharing an edge with `id`, regardless of direction.
    pub fn neighbour_ids(&self, id: &str) -> &[NodeId] {
        self.linked.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The arc leading from `from` to `to`, if traversable in that direction.
    pub fn arc(&self, from: &str, to: &str) -> Option<&Edge> {
        self.neighbours(from).iter().find(|edge| edge.target == to)
    }

    /// The edge joining the pair in either direction.
    pub fn edge(&self, a: &str, b: &str) -> Option<&Edge> {
        self.arc(a, b).or_else(|| self.arc(b, a))
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge(a, b).is_some()
    }

    /// Kind of the edge joining the pair, `None` when they are not adjacent.
    pub fn edge_kind(&self, a: &str, b: &str) -> Option<EdgeKind> {
        self.edge(a, b).map(|edge| edge.kind)
    }

    /// Iterate every arc as `(source, arc)` in deterministic order.
    pub fn arcs(&self) -> impl Iterator<Item = (&str, &Edge)> + '_ {
        self.order
            .iter()
            .flat_map(move |id| self.neighbours(id).iter().map(move |edge| (id.as_str(), edge)))
    }

    pub fn has_negative_weights(&self) -> bool {
        self.arcs().any(|(_, edge)| edge.weight < 0.0)
    }

    /// Copy the graph, replacing every arc weight with `weigh(source, arc)`.
    pub(crate) fn map_weights(&self, mut weigh: impl FnMut(&str, &Edge) -> f64) -> Graph {
        let mut copy = self.clone();
        for id in &self.order {
            if let Some(edges) = copy.adjacency.get_mut(id) {
                for edge in edges.iter_mut() {
                    edge.weight = weigh(id, edge);
                }
            }
        }
        copy
    }

    /// Compute node/edge counts, connectivity, density and clustering.
    pub fn stats(&self) -> GraphStats {
        let nodes = self.node_count();
        let edges = self.edge_count;
        let density = if nodes < 2 {
            0.0
        } else {
            edges as f64 / (nodes as f64 * (nodes as f64 - 1.0) / 2.0)
        };

        GraphStats {
            nodes,
            edges,
            is_connected: self.is_connected(),
            density,
            average_clustering: self.average_clustering(),
        }
    }

    /// True when a single connected component spans every node.
    pub fn is_connected(&self) -> bool {
        let Some(first) = self.order.first() else {
            return false;
        };

        let mut seen: HashSet<&str> = HashSet::from([first.as_str()]);
        let mut queue = VecDeque::from([first.as_str()]);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbour_ids(current) {
                if seen.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        seen.len() == self.node_count()
    }

    /// Local clustering coefficient of a node: the fraction of its neighbour
    /// pairs that are themselves adjacent. Nodes of degree < 2 score 0.
    pub fn clustering(&self, id: &str) -> f64 {
        let neighbours = self.neighbour_ids(id);
        let k = neighbours.len();
        if k < 2 {
            return 0.0;
        }

        let mut triangles = 0usize;
        for (i, a) in neighbours.iter().enumerate() {
            for b in &neighbours[i + 1..] {
                if self.has_edge(a, b) {
                    triangles += 1;
                }
            }
        }
        triangles as f64 / (k * (k - 1) / 2) as f64
    }

    /// Mean clustering coefficient across all nodes.
    pub fn average_clustering(&self) -> f64 {
        if self.order.is_empty() {
            return 0.0;
        }
        let total: f64 = self.order.iter().map(|id| self.clustering(id)).sum();
        total / self.order.len() as f64
    }

    /// Plain-text adjacency dump, nodes sorted by identifier.
    pub fn render(&self) -> String {
        if self.order.is_empty() {
            return "Empty graph".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "Graph Structure:");
        let _ = writeln!(out, "Nodes: {}", self.node_count());
        let _ = writeln!(out, "Edges: {}", self.edge_count);
        let _ = writeln!(out);

        let mut ids: Vec<&NodeId> = self.order.iter().collect();
        ids.sort();
        for id in ids {
            let _ = writeln!(out, "{}: [{}]", id, self.neighbour_ids(id).join(", "));
        }
        out
    }
}

/// Build the floor graph: one node per room and network node, door edges,
/// explicit network edges, then inferred corridors between listed rooms.
///
/// Duplicate node identifiers abort the build. Doors that do not connect
/// exactly two distinct known rooms, network edges with a missing or repeated
/// endpoint pair, and anything that repeats an existing connection are
/// skipped with a warning.
pub fn build_graph(floor: &FloorPlan, options: &GraphBuildOptions) -> Result<Graph> {
    let mut graph = Graph::new();
    for room in &floor.rooms {
        graph.add_node(Node::from(room))?;
    }
    if let Some(network) = &floor.network {
        add_network_nodes(&mut graph, network)?;
    }

    add_door_edges(&mut graph, &floor.doors, options);
    if let Some(network) = &floor.network {
        add_network_edges(&mut graph, network);
    }
    add_corridor_edges(&mut graph, &floor.rooms, options);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built floor graph"
    );
    Ok(graph)
}

fn add_door_edges(graph: &mut Graph, doors: &[Door], options: &GraphBuildOptions) {
    for door in doors {
        let [a, b] = door.connects.as_slice() else {
            debug!(
                door = %door.id,
                connects = door.connects.len(),
                "skipping door that does not join exactly two rooms"
            );
            continue;
        };

        let weight = options.door_weight.resolve(graph, a, b);
        if let Err(error) = graph.add_edge(a, b, EdgeKind::Door, weight, Some(DoorRef::from(door)))
        {
            warn!(door = %door.id, %error, "skipping door");
        }
    }
}

fn add_network_nodes(graph: &mut Graph, network: &Network) -> Result<()> {
    for (id, info) in &network.nodes {
        graph.add_node(Node {
            id: id.clone(),
            kind: info.kind(),
            center: info.center,
            bounds: info.bounds,
            name: info.name.clone(),
        })?;
    }
    Ok(())
}

fn add_network_edges(graph: &mut Graph, network: &Network) {
    for edge in &network.edges {
        let added = if edge.one_way {
            graph.add_one_way_edge(&edge.from, &edge.to, edge.kind, edge.distance, None)
        } else {
            graph.add_edge(&edge.from, &edge.to, edge.kind, edge.distance, None)
        };
        if let Err(error) = added {
            warn!(from = %edge.from, to = %edge.to, %error, "skipping network edge");
        }
    }
}

fn add_corridor_edges(graph: &mut Graph, rooms: &[Room], options: &GraphBuildOptions) {
    for (i, first) in rooms.iter().enumerate() {
        for second in &rooms[i + 1..] {
            if graph.has_edge(&first.id, &second.id) {
                continue;
            }

            let distance = first.center.distance_to(&second.center);
            if distance >= options.corridor_threshold {
                continue;
            }

            let weight = distance * options.corridor_penalty;
            if let Err(error) =
                graph.add_edge(&first.id, &second.id, EdgeKind::Corridor, weight, None)
            {
                warn!(a = %first.id, b = %second.id, %error, "skipping corridor");
            }
        }
    }
}
