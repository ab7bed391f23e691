//! Route, alternatives and distance command handlers.

use anyhow::{bail, Result};
use tracing::debug;

use floornav_lib::{FloorState, PathResult, RouteSummary};

use crate::output::{render_alternatives, render_route, to_json, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting room identifier.
    pub from: String,
    /// Destination room identifier.
    pub to: String,
    /// Algorithm name, resolved by the library.
    pub algorithm: String,
    /// Always run the Johnson reweighting pipeline.
    pub johnson: bool,
    /// Append turn-by-turn directions to text output.
    pub directions: bool,
}

/// Compute a route and print it.
///
/// JSON output always prints the boundary result, including failures; the
/// command still exits non-zero when no route was produced.
pub fn handle_route_command(
    state: &FloorState,
    format: OutputFormat,
    palette: &ColorPalette,
    args: &RouteCommandArgs,
) -> Result<()> {
    let finder = state.path_finder();
    let outcome = if args.johnson {
        finder.find_path_johnson(&args.from, &args.to)
    } else {
        finder.find_path_named(&args.from, &args.to, &args.algorithm)
    };

    match format {
        OutputFormat::Json => {
            let failure = outcome.as_ref().err().map(ToString::to_string);
            println!("{}", to_json(&PathResult::from(outcome))?);
            if let Some(message) = failure {
                bail!(message);
            }
        }
        OutputFormat::Text => {
            let route = outcome?;
            debug!(hops = route.hop_count(), distance = route.distance, "route planned");
            let summary = RouteSummary::from_route(&state.graph, &route)?;
            print!("{}", render_route(&summary, palette, args.directions));
        }
    }
    Ok(())
}

/// Enumerate alternative simple routes.
pub fn handle_alternatives_command(
    state: &FloorState,
    format: OutputFormat,
    from: &str,
    to: &str,
    max_results: usize,
    cutoff: usize,
) -> Result<()> {
    let results = state
        .path_finder()
        .find_all_paths(from, to, max_results, cutoff);

    match format {
        OutputFormat::Json => println!("{}", to_json(&results)?),
        OutputFormat::Text => print!("{}", render_alternatives(from, to, &results)),
    }
    Ok(())
}

/// Print the shortest weighted distance, `-1` when unreachable.
pub fn handle_distance_command(
    state: &FloorState,
    format: OutputFormat,
    from: &str,
    to: &str,
) -> Result<()> {
    let distance = state.path_finder().shortest_distance(from, to);
    match format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({ "from": from, "to": to, "distance": distance }))?
        ),
        OutputFormat::Text => println!("{distance:.2}"),
    }
    Ok(())
}
