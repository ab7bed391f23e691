//! Scalar metrics derived from a floor graph and the routes through it.
//!
//! Nothing here feeds back into routing; the figures exist for reports and
//! for the CLI `features` command.

use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_4, PI};

use serde::Serialize;

use crate::floor::{Dimensions, NodeId, Point};
use crate::graph::{EdgeKind, Graph, NodeKind};

/// Door count at which a room is considered fully reachable.
const WELL_CONNECTED_DOORS: f64 = 4.0;

/// Weight of the "close to the middle of the floor" bonus in accessibility.
const CENTRALITY_BONUS: f64 = 0.3;

/// Turns sharper than this count towards path complexity.
const SHARP_TURN: f64 = FRAC_PI_4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomFeatures {
    pub id: NodeId,
    pub area: f64,
    pub perimeter: f64,
    pub neighbours: Vec<NodeId>,
    pub door_count: usize,
    pub accessibility: f64,
    pub isolation: f64,
}

/// One hop of a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_position: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFeatures {
    /// Sum of center-to-center segment lengths.
    pub total_distance: f64,
    /// Straight-line distance over traversed distance; 1.0 is a perfectly
    /// direct route.
    pub efficiency: f64,
    /// Fraction of intermediate stops where the route turns by more than 45°.
    pub complexity: f64,
    pub average_accessibility: f64,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccessibilitySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
}

/// Spread of a set of points across the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub x_center: f64,
    pub y_center: f64,
    pub x_variance: f64,
    pub y_variance: f64,
}

impl Distribution {
    /// `None` when there are no points.
    fn of(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let x = summarize(points.iter().map(|point| point.x));
        let y = summarize(points.iter().map(|point| point.y));
        Some(Self {
            x_range: [x.min, x.max],
            y_range: [y.min, y.max],
            x_center: x.mean,
            y_center: y.mean,
            x_variance: x.variance,
            y_variance: y.variance,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorFeatures {
    pub total_area: f64,
    pub room_count: usize,
    pub door_count: usize,
    pub average_room_area: f64,
    /// Rooms per unit of floor area.
    pub room_density: f64,
    pub connectivity_score: f64,
    pub accessibility: AccessibilitySummary,
    /// Room centers.
    pub room_distribution: Option<Distribution>,
    /// Positions of doors that became graph edges.
    pub door_distribution: Option<Distribution>,
}

/// Computes features against a graph and the floor's overall extent.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAnalyzer<'g> {
    graph: &'g Graph,
    dimensions: Dimensions,
}

impl<'g> FeatureAnalyzer<'g> {
    pub fn new(graph: &'g Graph, dimensions: Dimensions) -> Self {
        Self { graph, dimensions }
    }

    /// Features for a single node, `None` if the identifier is unknown.
    pub fn room_features(&self, id: &str) -> Option<RoomFeatures> {
        let node = self.graph.node(id)?;
        let door_count = self.door_count(id);
        let (area, perimeter) = node
            .bounds
            .map(|bounds| (bounds.area(), bounds.perimeter()))
            .unwrap_or((0.0, 0.0));

        Some(RoomFeatures {
            id: node.id.clone(),
            area,
            perimeter,
            neighbours: self.graph.neighbour_ids(id).to_vec(),
            door_count,
            accessibility: self.accessibility(door_count, node.center),
            isolation: (1.0 - door_count as f64 / WELL_CONNECTED_DOORS).clamp(0.0, 1.0),
        })
    }

    /// Features for a route. Returns `None` for routes shorter than two
    /// nodes or that name an unknown node.
    pub fn path_features(&self, path: &[NodeId]) -> Option<PathFeatures> {
        if path.len() < 2 {
            return None;
        }

        let centers = path
            .iter()
            .map(|id| self.graph.node(id).map(|node| node.center))
            .collect::<Option<Vec<_>>>()?;

        let mut transitions = Vec::with_capacity(path.len() - 1);
        for (pair, ends) in path.windows(2).zip(centers.windows(2)) {
            let distance = match (ends[0], ends[1]) {
                (Some(a), Some(b)) => a.distance_to(&b),
                _ => 0.0,
            };
            let door = self
                .graph
                .edge(&pair[0], &pair[1])
                .filter(|edge| edge.kind == EdgeKind::Door)
                .and_then(|edge| edge.door.as_ref());

            transitions.push(Transition {
                from: pair[0].clone(),
                to: pair[1].clone(),
                distance,
                door_id: door.map(|door| door.id.clone()),
                door_position: door.map(|door| door.position),
            });
        }

        let total_distance: f64 = transitions.iter().map(|hop| hop.distance).sum();
        let straight = match (centers[0], centers[centers.len() - 1]) {
            (Some(a), Some(b)) => a.distance_to(&b),
            _ => 0.0,
        };
        let efficiency = if total_distance > 0.0 {
            straight / total_distance
        } else {
            0.0
        };

        let accessibility_sum: f64 = path
            .iter()
            .filter_map(|id| self.room_features(id))
            .map(|features| features.accessibility)
            .sum();

        Some(PathFeatures {
            total_distance,
            efficiency,
            complexity: turn_complexity(&centers),
            average_accessibility: accessibility_sum / path.len() as f64,
            transitions,
        })
    }

    /// Aggregate metrics over every room node.
    pub fn floor_features(&self) -> FloorFeatures {
        let rooms: Vec<RoomFeatures> = self
            .graph
            .nodes()
            .filter(|node| node.kind == NodeKind::Room)
            .filter_map(|node| self.room_features(&node.id))
            .collect();

        let room_count = rooms.len();
        let total_area: f64 = rooms.iter().map(|room| room.area).sum();
        let door_total: usize = rooms.iter().map(|room| room.door_count).sum();
        let floor_area = self.dimensions.area();

        let connectivity_score = if room_count < 2 {
            0.0
        } else {
            door_total as f64 / (room_count * (room_count - 1)) as f64
        };

        FloorFeatures {
            total_area,
            room_count,
            door_count: self.door_edge_count(),
            average_room_area: if room_count == 0 {
                0.0
            } else {
                total_area / room_count as f64
            },
            room_density: if floor_area > 0.0 {
                room_count as f64 / floor_area
            } else {
                0.0
            },
            connectivity_score,
            accessibility: summarize(rooms.iter().map(|room| room.accessibility)),
            room_distribution: Distribution::of(&self.room_centers()),
            door_distribution: Distribution::of(&self.door_positions()),
        }
    }

    fn room_centers(&self) -> Vec<Point> {
        self.graph
            .nodes()
            .filter(|node| node.kind == NodeKind::Room)
            .filter_map(|node| node.center)
            .collect()
    }

    /// One position per door edge; one-way doors are seen from their source.
    fn door_positions(&self) -> Vec<Point> {
        let mut seen = HashSet::new();
        self.graph
            .arcs()
            .filter(|(_, edge)| edge.kind == EdgeKind::Door)
            .filter_map(|(from, edge)| {
                let door = edge.door.as_ref()?;
                let pair = if from < edge.target.as_str() {
                    (from, edge.target.as_str())
                } else {
                    (edge.target.as_str(), from)
                };
                seen.insert(pair).then_some(door.position)
            })
            .collect()
    }

    fn door_count(&self, id: &str) -> usize {
        self.graph
            .neighbour_ids(id)
            .iter()
            .filter(|other| self.graph.edge_kind(id, other) == Some(EdgeKind::Door))
            .count()
    }

    fn door_edge_count(&self) -> usize {
        self.graph
            .nodes()
            .map(|node| self.door_count(&node.id))
            .sum::<usize>()
            / 2
    }

    fn accessibility(&self, door_count: usize, center: Option<Point>) -> f64 {
        let doors = (door_count as f64 / WELL_CONNECTED_DOORS).min(1.0);

        let floor_center = self.dimensions.center();
        let max_distance = Point::new(0.0, 0.0).distance_to(&floor_center);
        let centrality = match center {
            Some(center) if max_distance > 0.0 => {
                CENTRALITY_BONUS * (1.0 - center.distance_to(&floor_center) / max_distance)
            }
            _ => 0.0,
        };

        (doors + centrality).min(1.0)
    }
}

/// Share of interior vertices where the heading changes by more than 45°.
fn turn_complexity(centers: &[Option<Point>]) -> f64 {
    if centers.len() < 3 {
        return 0.0;
    }

    let interior = centers.len() - 2;
    let sharp = centers
        .windows(3)
        .filter(|triple| match (triple[0], triple[1], triple[2]) {
            (Some(a), Some(b), Some(c)) => {
                let turn = (b.bearing_to(&c) - a.bearing_to(&b)).abs() % (2.0 * PI);
                let turn = if turn > PI { 2.0 * PI - turn } else { turn };
                turn > SHARP_TURN
            }
            _ => false,
        })
        .count();

    sharp as f64 / interior as f64
}

fn summarize(values: impl Iterator<Item = f64>) -> AccessibilitySummary {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return AccessibilitySummary {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            variance: 0.0,
        };
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    AccessibilitySummary {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean,
        variance,
    }
}
