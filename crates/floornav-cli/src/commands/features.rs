//! Feature metrics handler.

use anyhow::{anyhow, Result};

use floornav_lib::FloorState;

use crate::output::{
    render_floor_features, render_path_features, render_room_features, to_json, OutputFormat,
};

/// What the features command should describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureTarget {
    Floor,
    Room(String),
    Path(Vec<String>),
}

pub fn handle_features_command(
    state: &FloorState,
    format: OutputFormat,
    target: &FeatureTarget,
) -> Result<()> {
    let analyzer = state.analyzer();

    let (json, text) = match target {
        FeatureTarget::Floor => {
            let floor = analyzer.floor_features();
            (to_json(&floor)?, render_floor_features(&floor))
        }
        FeatureTarget::Room(id) => {
            let room = analyzer
                .room_features(id)
                .ok_or_else(|| anyhow!("unknown room: {id}"))?;
            (to_json(&room)?, render_room_features(&room))
        }
        FeatureTarget::Path(path) => {
            let features = analyzer.path_features(path).ok_or_else(|| {
                anyhow!("path features need at least two known rooms, got: {}", path.join(","))
            })?;
            (to_json(&features)?, render_path_features(&features))
        }
    };

    match format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Text => print!("{text}"),
    }
    Ok(())
}
