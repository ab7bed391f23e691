use criterion::{criterion_group, criterion_main, Criterion};
use floornav_lib::{
    build_graph, DoorWeight, Door, FloorPlan, Graph, GraphBuildOptions, PathFinder, Point,
    RouteAlgorithm, Room,
};
use once_cell::sync::Lazy;
use std::hint::black_box;

const SIDE: usize = 30;
const SPACING: f64 = 150.0;

fn room_id(x: usize, y: usize) -> String {
    format!("r{x:02}{y:02}")
}

/// Square grid of rooms: doors along rows, inferred corridors along columns.
fn grid_floor() -> FloorPlan {
    let mut rooms = Vec::with_capacity(SIDE * SIDE);
    let mut doors = Vec::new();
    for y in 0..SIDE {
        for x in 0..SIDE {
            rooms.push(Room {
                id: room_id(x, y),
                name: None,
                center: Point::new(x as f64 * SPACING, y as f64 * SPACING),
                bounds: None,
            });
            if x + 1 < SIDE {
                doors.push(Door {
                    id: format!("d{x:02}{y:02}"),
                    position: Point::new((x as f64 + 0.5) * SPACING, y as f64 * SPACING),
                    connects: vec![room_id(x, y), room_id(x + 1, y)],
                });
            }
        }
    }
    FloorPlan {
        rooms,
        doors,
        ..FloorPlan::default()
    }
}

static GRID: Lazy<Graph> = Lazy::new(|| {
    let options = GraphBuildOptions {
        door_weight: DoorWeight::CenterDistance,
        ..GraphBuildOptions::default()
    };
    build_graph(&grid_floor(), &options).expect("grid builds")
});

static START: Lazy<String> = Lazy::new(|| room_id(0, 0));
static GOAL: Lazy<String> = Lazy::new(|| room_id(SIDE - 1, SIDE - 1));

fn benchmark_pathfinding(c: &mut Criterion) {
    let finder = PathFinder::new(&GRID);

    for algorithm in [
        RouteAlgorithm::Bfs,
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::AStar,
    ] {
        c.bench_function(&format!("{algorithm}_grid_corner_to_corner"), |b| {
            b.iter(|| {
                let route = finder
                    .find_path(&START, &GOAL, algorithm)
                    .expect("route exists");
                black_box(route.hop_count())
            });
        });
    }

    c.bench_function("johnson_grid_corner_to_corner", |b| {
        b.iter(|| {
            let route = finder.find_path_johnson(&START, &GOAL).expect("route exists");
            black_box(route.distance)
        });
    });

    c.bench_function("alternatives_grid_short_hop", |b| {
        let goal = room_id(3, 3);
        b.iter(|| black_box(finder.find_all_paths(&START, &goal, 5, 8).len()));
    });

    c.bench_function("build_grid_floor", |b| {
        let floor = grid_floor();
        let options = GraphBuildOptions::default();
        b.iter(|| black_box(build_graph(&floor, &options).expect("grid builds").edge_count()));
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
