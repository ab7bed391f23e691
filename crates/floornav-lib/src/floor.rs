use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{EdgeKind, NodeKind};

/// Identifier for a room or junction in the floor graph.
pub type NodeId = String;

/// Planar coordinates on the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from this point towards `other`, in radians.
    pub fn bearing_to(&self, other: &Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Axis-aligned rectangle occupied by a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }
}

/// Overall extent of the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Geometric center of the floor rectangle anchored at the origin.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A navigable room as described by the floor input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub center: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

/// An authored connection between rooms.
///
/// Only doors connecting exactly two rooms become graph edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub position: Point,
    #[serde(default)]
    pub connects: Vec<NodeId>,
}

/// Node of an explicit routing network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    /// Defaults to `room` when a center is given and `junction` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl NetworkNode {
    pub fn kind(&self) -> NodeKind {
        match (self.kind, self.center) {
            (Some(kind), _) => kind,
            (None, Some(_)) => NodeKind::Room,
            (None, None) => NodeKind::Junction,
        }
    }
}

/// Weighted connection of an explicit routing network.
///
/// The weight is taken as given and may be negative. Negative weights are
/// only usable on `one_way` edges; an undirected negative edge is a
/// negative cycle on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    #[serde(default = "default_network_edge_kind")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub one_way: bool,
}

fn default_network_edge_kind() -> EdgeKind {
    EdgeKind::Corridor
}

/// Authored routing network: nodes keyed by identifier plus weighted edges.
///
/// Nodes are added in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, NetworkNode>,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
}

/// Raw floor description consumed by the graph builder.
///
/// A floor may list rooms and doors, an explicit weighted network, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_number: Option<i64>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub doors: Vec<Door>,
    #[serde(
        default,
        rename = "floor_plan",
        skip_serializing_if = "Option::is_none"
    )]
    pub network: Option<Network>,
}

impl FloorPlan {
    /// Decode a floor description from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lookup a room by identifier.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// Load a floor description from a JSON file on disk.
pub fn load_floor_plan(path: &Path) -> Result<FloorPlan> {
    let contents = fs::read_to_string(path).map_err(|source| Error::FloorPlanRead {
        path: path.to_path_buf(),
        source,
    })?;
    let floor = FloorPlan::from_json_str(&contents)?;
    debug!(
        path = %path.display(),
        rooms = floor.rooms.len(),
        doors = floor.doors.len(),
        network_nodes = floor.network.as_ref().map_or(0, |network| network.nodes.len()),
        network_edges = floor.network.as_ref().map_or(0, |network| network.edges.len()),
        "loaded floor plan"
    );
    Ok(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(100.0, 100.0);
        let b = Point::new(400.0, 500.0);
        assert!((a.distance_to(&b) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn decodes_minimal_floor() {
        let json = r#"{
            "rooms": [
                {"id": "101", "center": {"x": 100, "y": 100}},
                {"id": "102", "name": "Lab", "center": {"x": 300, "y": 100},
                 "bounds": {"x": 250, "y": 50, "width": 100, "height": 100}}
            ],
            "doors": [
                {"id": "d1", "position": {"x": 200, "y": 100}, "connects": ["101", "102"]}
            ]
        }"#;

        let floor = FloorPlan::from_json_str(json).expect("valid floor");
        assert_eq!(floor.rooms.len(), 2);
        assert_eq!(floor.dimensions, Dimensions::default());
        assert_eq!(floor.room("102").and_then(|r| r.name.as_deref()), Some("Lab"));
        assert_eq!(floor.room("102").and_then(|r| r.bounds).map(|b| b.area()), Some(10_000.0));
    }

    #[test]
    fn decodes_weighted_network() {
        let json = r#"{
            "floor_plan": {
                "nodes": {
                    "rm_101": {"center": {"x": 0, "y": 0}},
                    "jn_t01": {},
                    "jn_t02": {"kind": "junction", "center": {"x": 5, "y": 5}}
                },
                "edges": [
                    {"from": "rm_101", "to": "jn_t01", "distance": 4},
                    {"from": "jn_t01", "to": "jn_t02", "distance": -1.5, "one_way": true,
                     "kind": "door"}
                ]
            }
        }"#;

        let floor = FloorPlan::from_json_str(json).expect("valid floor");
        assert!(floor.rooms.is_empty());
        let network = floor.network.expect("network section");

        let kinds: Vec<NodeKind> = network.nodes.values().map(NetworkNode::kind).collect();
        assert_eq!(kinds, [NodeKind::Junction, NodeKind::Junction, NodeKind::Room]);

        assert_eq!(network.edges[0].kind, EdgeKind::Corridor);
        assert!(!network.edges[0].one_way);
        assert_eq!(network.edges[1].distance, -1.5);
        assert!(network.edges[1].one_way);
    }

    #[test]
    fn rejects_malformed_json() {
        let error = FloorPlan::from_json_str("{\"rooms\": 7}").expect_err("invalid");
        assert!(matches!(error, Error::Json(_)));
    }
}
