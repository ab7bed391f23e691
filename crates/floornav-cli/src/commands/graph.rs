//! Graph inspection handlers: statistics and adjacency dump.

use anyhow::Result;

use floornav_lib::FloorState;

use crate::output::{render_stats, to_json, OutputFormat};

pub fn handle_stats_command(state: &FloorState, format: OutputFormat) -> Result<()> {
    let stats = state.graph.stats();
    match format {
        OutputFormat::Json => println!("{}", to_json(&stats)?),
        OutputFormat::Text => print!("{}", render_stats(&stats)),
    }
    Ok(())
}

pub fn handle_graph_command(state: &FloorState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut adjacency = serde_json::Map::new();
            let mut ids: Vec<&str> = state.graph.nodes().map(|node| node.id.as_str()).collect();
            ids.sort_unstable();
            for id in ids {
                adjacency.insert(id.to_string(), serde_json::json!(state.graph.neighbour_ids(id)));
            }
            println!("{}", to_json(&adjacency)?);
        }
        OutputFormat::Text => print!("{}", state.graph.render()),
    }
    Ok(())
}
