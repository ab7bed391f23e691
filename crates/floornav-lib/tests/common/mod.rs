#![allow(dead_code)]

use std::path::PathBuf;

use floornav_lib::{Door, FloorPlan, Point, Room};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn sample_floor_path() -> PathBuf {
    fixtures_dir().join("sample_floor.json")
}

/// Explicit network with junctions and a one-way negative shortcut into the Gallery.
pub fn weighted_network_path() -> PathBuf {
    fixtures_dir().join("weighted_network.json")
}

pub fn room(id: &str, x: f64, y: f64) -> Room {
    Room {
        id: id.to_string(),
        name: None,
        center: Point::new(x, y),
        bounds: None,
    }
}

pub fn door(id: &str, a: &str, b: &str) -> Door {
    Door {
        id: id.to_string(),
        position: Point::new(0.0, 0.0),
        connects: vec![a.to_string(), b.to_string()],
    }
}

/// Rooms 101 and 102 joined by one door, 200 units apart, plus an isolated 103.
pub fn two_rooms_and_an_island() -> FloorPlan {
    FloorPlan {
        rooms: vec![
            room("101", 100.0, 100.0),
            room("102", 300.0, 100.0),
            room("103", 700.0, 500.0),
        ],
        doors: vec![door("d1", "101", "102")],
        ..FloorPlan::default()
    }
}
