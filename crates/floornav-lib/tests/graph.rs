mod common;

use floornav_lib::{
    build_graph, load_floor_plan, DoorWeight, EdgeKind, Error, FloorPlan, GraphBuildOptions,
};

use common::{door, room, sample_floor_path, two_rooms_and_an_island};

#[test]
fn door_edge_defaults_to_zero_weight() {
    let graph = build_graph(&two_rooms_and_an_island(), &GraphBuildOptions::default())
        .expect("graph builds");

    let edge = graph.edge("101", "102").expect("door edge");
    assert_eq!(edge.kind, EdgeKind::Door);
    assert_eq!(edge.weight, 0.0);
    assert_eq!(edge.door.as_ref().map(|d| d.id.as_str()), Some("d1"));
}

#[test]
fn center_distance_policy_weights_doors_geometrically() {
    let options = GraphBuildOptions {
        door_weight: DoorWeight::CenterDistance,
        ..GraphBuildOptions::default()
    };
    let graph = build_graph(&two_rooms_and_an_island(), &options).expect("graph builds");
    assert_eq!(graph.edge("101", "102").map(|e| e.weight), Some(200.0));
}

#[test]
fn close_rooms_get_penalised_corridor() {
    let floor = FloorPlan {
        rooms: vec![room("a", 0.0, 0.0), room("b", 30.0, 40.0), room("c", 500.0, 0.0)],
        ..FloorPlan::default()
    };
    let graph = build_graph(&floor, &GraphBuildOptions::default()).expect("graph builds");

    let corridor = graph.edge("a", "b").expect("corridor");
    assert_eq!(corridor.kind, EdgeKind::Corridor);
    assert!((corridor.weight - 60.0).abs() < 1e-9);
    assert!(corridor.door.is_none());
    assert!(!graph.has_edge("a", "c"));
}

#[test]
fn corridor_threshold_is_exclusive() {
    let floor = FloorPlan {
        rooms: vec![room("a", 0.0, 0.0), room("b", 200.0, 0.0)],
        ..FloorPlan::default()
    };
    let graph = build_graph(&floor, &GraphBuildOptions::default()).expect("graph builds");
    assert_eq!(graph.edge_count(), 0);

    let options = GraphBuildOptions {
        corridor_threshold: 200.5,
        ..GraphBuildOptions::default()
    };
    let graph = build_graph(&floor, &options).expect("graph builds");
    assert_eq!(graph.edge_kind("a", "b"), Some(EdgeKind::Corridor));
}

#[test]
fn malformed_doors_are_skipped() {
    let mut floor = two_rooms_and_an_island();
    floor.doors.push(door("self", "101", "101"));
    floor.doors.push(door("ghost", "101", "999"));
    floor.doors.push(door("again", "102", "101"));

    let graph = build_graph(&floor, &GraphBuildOptions::default()).expect("graph builds");
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.edge("101", "102").and_then(|e| e.door.as_ref()).map(|d| d.id.as_str()),
        Some("d1")
    );
}

#[test]
fn duplicate_room_aborts_build() {
    let mut floor = two_rooms_and_an_island();
    floor.rooms.push(room("102", 0.0, 0.0));
    let error = build_graph(&floor, &GraphBuildOptions::default()).expect_err("duplicate");
    assert!(matches!(error, Error::DuplicateNode { id } if id == "102"));
}

#[test]
fn two_connected_rooms_have_full_density() {
    let floor = FloorPlan {
        rooms: vec![room("101", 100.0, 100.0), room("102", 300.0, 100.0)],
        doors: vec![door("d1", "101", "102")],
        ..FloorPlan::default()
    };
    let stats = build_graph(&floor, &GraphBuildOptions::default())
        .expect("graph builds")
        .stats();

    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.edges, 1);
    assert!(stats.is_connected);
    assert_eq!(stats.density, 1.0);
    assert_eq!(stats.average_clustering, 0.0);
}

#[test]
fn island_breaks_connectivity() {
    let stats = build_graph(&two_rooms_and_an_island(), &GraphBuildOptions::default())
        .expect("graph builds")
        .stats();
    assert!(!stats.is_connected);
    assert!((stats.density - 1.0 / 3.0).abs() < 1e-12);

    let empty = build_graph(&FloorPlan::default(), &GraphBuildOptions::default())
        .expect("graph builds")
        .stats();
    assert!(!empty.is_connected);
    assert_eq!(empty.density, 0.0);
}

#[test]
fn sample_fixture_loads_and_builds() {
    let floor = load_floor_plan(&sample_floor_path()).expect("fixture loads");
    assert_eq!(floor.floor_id.as_deref(), Some("north-wing-1"));

    let graph = build_graph(&floor, &GraphBuildOptions::default()).expect("graph builds");
    assert_eq!(graph.node_count(), 6);
    // Three doors plus the Kitchen/Storage corridor; d4 and d5 are malformed.
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.edge_kind("105", "106"), Some(EdgeKind::Corridor));
    assert!(graph.neighbour_ids("103").is_empty());
}

#[test]
fn missing_fixture_reports_path() {
    let error = load_floor_plan(std::path::Path::new("/nonexistent/floor.json"))
        .expect_err("missing file");
    assert!(matches!(error, Error::FloorPlanRead { .. }));
    assert!(error.to_string().contains("/nonexistent/floor.json"));
}

#[test]
fn floor_written_to_disk_round_trips_through_loader() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let json = serde_json::to_string(&two_rooms_and_an_island()).expect("serialise floor");
    file.write_all(json.as_bytes()).expect("write floor");

    let floor = load_floor_plan(file.path()).expect("floor loads");
    assert_eq!(floor, two_rooms_and_an_island());

    let mut broken = tempfile::NamedTempFile::new().expect("temp file");
    broken.write_all(b"{\"rooms\": [").expect("write garbage");
    assert!(matches!(load_floor_plan(broken.path()), Err(Error::Json(_))));
}
