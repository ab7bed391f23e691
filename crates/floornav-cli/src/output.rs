//! Output formatting for command results.
//!
//! Renderers return strings so they can be unit tested; the command
//! handlers decide where the text goes.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use floornav_lib::{
    Distribution, EdgeKind, FloorFeatures, GraphStats, PathFeatures, PathResult, RoomFeatures,
    RouteSummary,
};

use crate::terminal::ColorPalette;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Serialise any result as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialise output as JSON")
}

/// Render a route with one tagged line per stop, optionally followed by
/// turn-by-turn directions.
pub fn render_route(summary: &RouteSummary, palette: &ColorPalette, directions: bool) -> String {
    let p = palette;
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Route from {} to {} ({} hops; distance {}{:.2}{}; algorithm: {}):",
        summary.start.name.as_deref().unwrap_or(&summary.start.id),
        summary.goal.name.as_deref().unwrap_or(&summary.goal.id),
        summary.hops,
        p.green,
        summary.distance,
        p.reset,
        summary.algorithm
    );

    let last = summary.steps.len().saturating_sub(1);
    for (i, step) in summary.steps.iter().enumerate() {
        let (color, tag) = match (i, step.via) {
            (0, _) => (p.tag_start, "STRT"),
            (i, _) if i == last => (p.tag_goal, "GOAL"),
            (_, Some(EdgeKind::Corridor)) => (p.tag_hall, "HALL"),
            _ => (p.tag_door, "DOOR"),
        };
        let door = step
            .door
            .as_deref()
            .map(|door| format!(" via door {door}"))
            .unwrap_or_default();
        let _ = writeln!(
            buffer,
            " {color}{tag}{reset} {bold}{name}{reset} {gray}({id}){reset}{door}",
            reset = p.reset,
            bold = p.white_bold,
            name = step.display_name(),
            gray = p.gray,
            id = step.id,
        );
    }

    if directions {
        let _ = writeln!(buffer, "\nDirections:");
        for (i, line) in summary.directions().iter().enumerate() {
            let _ = writeln!(buffer, "{:>3}. {line}", i + 1);
        }
    }
    buffer
}

pub fn render_alternatives(start: &str, goal: &str, results: &[PathResult]) -> String {
    if results.is_empty() {
        return format!("No alternative routes found between {start} and {goal}.\n");
    }

    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} route(s) from {start} to {goal}:",
        results.len()
    );
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            buffer,
            "{:>3}. {} ({} hops, distance {:.2})",
            i + 1,
            result.path.join(" -> "),
            result.steps.unwrap_or_else(|| result.path.len().saturating_sub(1)),
            result.distance
        );
    }
    buffer
}

pub fn render_stats(stats: &GraphStats) -> String {
    format!(
        "Nodes: {}\nEdges: {}\nConnected: {}\nDensity: {:.4}\nAverage clustering: {:.4}\n",
        stats.nodes,
        stats.edges,
        if stats.is_connected { "yes" } else { "no" },
        stats.density,
        stats.average_clustering
    )
}

pub fn render_room_features(room: &RoomFeatures) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Room {}", room.id);
    let _ = writeln!(buffer, "  Area: {:.2}", room.area);
    let _ = writeln!(buffer, "  Perimeter: {:.2}", room.perimeter);
    let _ = writeln!(buffer, "  Doors: {}", room.door_count);
    let _ = writeln!(buffer, "  Neighbours: {}", room.neighbours.join(", "));
    let _ = writeln!(buffer, "  Accessibility: {:.3}", room.accessibility);
    let _ = writeln!(buffer, "  Isolation: {:.3}", room.isolation);
    buffer
}

pub fn render_path_features(path: &PathFeatures) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Total distance: {:.2}", path.total_distance);
    let _ = writeln!(buffer, "Efficiency: {:.3}", path.efficiency);
    let _ = writeln!(buffer, "Complexity: {:.3}", path.complexity);
    let _ = writeln!(buffer, "Average accessibility: {:.3}", path.average_accessibility);
    for hop in &path.transitions {
        let door = hop
            .door_id
            .as_deref()
            .map(|id| format!(" through door {id}"))
            .unwrap_or_default();
        let _ = writeln!(
            buffer,
            " - {} -> {} ({:.2}){door}",
            hop.from, hop.to, hop.distance
        );
    }
    buffer
}

pub fn render_floor_features(floor: &FloorFeatures) -> String {
    let a = &floor.accessibility;
    let mut buffer = format!(
        "Rooms: {}\nDoors: {}\nTotal room area: {:.2}\nAverage room area: {:.2}\n\
         Room density: {:.6}\nConnectivity score: {:.4}\n\
         Accessibility: min {:.3}, max {:.3}, mean {:.3}, variance {:.4}\n",
        floor.room_count,
        floor.door_count,
        floor.total_area,
        floor.average_room_area,
        floor.room_density,
        floor.connectivity_score,
        a.min,
        a.max,
        a.mean,
        a.variance
    );
    render_distribution(&mut buffer, "Room spread", floor.room_distribution.as_ref());
    render_distribution(&mut buffer, "Door spread", floor.door_distribution.as_ref());
    buffer
}

fn render_distribution(buffer: &mut String, label: &str, spread: Option<&Distribution>) {
    let Some(d) = spread else {
        let _ = writeln!(buffer, "{label}: none");
        return;
    };
    let _ = writeln!(
        buffer,
        "{label}: x {:.1}..{:.1} (center {:.1}, variance {:.1}), \
         y {:.1}..{:.1} (center {:.1}, variance {:.1})",
        d.x_range[0],
        d.x_range[1],
        d.x_center,
        d.x_variance,
        d.y_range[0],
        d.y_range[1],
        d.y_center,
        d.y_variance
    );
}
