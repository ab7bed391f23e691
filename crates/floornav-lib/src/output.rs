use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::floor::NodeId;
use crate::graph::{EdgeKind, Graph};
use crate::routing::{Route, RouteAlgorithm};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    /// Header line followed by one numbered line per stop.
    PlainText,
    /// Turn-by-turn instructions.
    Directions,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteEndpoint {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteEndpoint {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Stop visited along a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kind of connection used to arrive here; absent for the first stop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<EdgeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door: Option<String>,
}

impl RouteStep {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub hops: usize,
    pub distance: f64,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`Route`] into a summary with resolved room names and the
    /// connection used for each hop.
    pub fn from_route(graph: &Graph, route: &Route) -> Result<Self> {
        let mut steps = Vec::with_capacity(route.steps.len());
        let mut previous: Option<&str> = None;
        for (index, id) in route.steps.iter().enumerate() {
            let node = graph.node(id).ok_or_else(|| Error::UnknownNode {
                id: id.clone(),
                role: None,
            })?;
            let edge = previous.and_then(|from| graph.edge(from, id));
            steps.push(RouteStep {
                index,
                id: id.clone(),
                name: node.name.clone(),
                via: edge.map(|edge| edge.kind),
                door: edge
                    .and_then(|edge| edge.door.as_ref())
                    .map(|door| door.id.clone()),
            });
            previous = Some(id.as_str());
        }

        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Err(Error::EmptyRoute);
        };
        let start = RouteEndpoint {
            id: first.id.clone(),
            name: first.name.clone(),
        };
        let goal = RouteEndpoint {
            id: last.id.clone(),
            name: last.name.clone(),
        };

        Ok(Self {
            algorithm: route.algorithm,
            hops: route.hop_count(),
            distance: route.distance,
            start,
            goal,
            steps,
        })
    }

    /// Human-readable instructions, one per stop.
    ///
    /// A route that never leaves its starting room has no instructions.
    pub fn directions(&self) -> Vec<String> {
        if self.steps.len() < 2 {
            return Vec::new();
        }
        let last = self.steps.len().saturating_sub(1);
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let verb = match i {
                    0 => "Start at",
                    i if i == last => "Arrive at",
                    _ => "Continue to",
                };
                match (&step.door, i) {
                    (Some(door), i) if i > 0 => {
                        format!("{verb} {} through door {door}", step.display_name())
                    }
                    _ => format!("{verb} {}", step.display_name()),
                }
            })
            .collect()
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Directions => self.render_directions(),
        }
    }

    fn header(&self) -> String {
        format!(
            "Route: {} -> {} ({} hops, distance {:.2}, algorithm: {})",
            self.start.display_name(),
            self.goal.display_name(),
            self.hops,
            self.distance,
            self.algorithm
        )
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.header());
        for step in &self.steps {
            let via = step.via.map(|kind| format!(" via {kind}")).unwrap_or_default();
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}){}",
                step.index,
                step.display_name(),
                step.id,
                via
            );
        }
        buffer
    }

    fn render_directions(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.header());
        for (i, line) in self.directions().iter().enumerate() {
            let _ = writeln!(buffer, "{:>3}. {line}", i + 1);
        }
        buffer
    }
}
