mod common;

use std::collections::HashMap;

use floornav_lib::{
    build_graph, load_floor_plan, reweight, EdgeKind, Error, Graph, GraphBuildOptions, Node,
    NodeKind, PathFinder, RouteAlgorithm,
};

use common::weighted_network_path;

fn directed(edges: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::new();
    for (a, b, _) in edges {
        for id in [*a, *b] {
            if !graph.contains(id) {
                graph.add_node(Node::junction(id, None)).unwrap();
            }
        }
    }
    for (a, b, weight) in edges {
        graph
            .add_one_way_edge(a, b, EdgeKind::Corridor, *weight, None)
            .unwrap();
    }
    graph
}

fn incentivised() -> Graph {
    directed(&[
        ("s", "a", 4.0),
        ("s", "b", 2.0),
        ("b", "a", -3.0),
        ("a", "t", 2.0),
        ("b", "t", 5.0),
    ])
}

#[test]
fn reweighted_arcs_are_non_negative_and_preserve_distances() {
    let graph = incentivised();
    let result = reweight(&graph).expect("no negative cycle");

    for (from, edge) in graph.arcs() {
        let lifted = result.graph().arc(from, &edge.target).expect("arc kept");
        assert!(lifted.weight >= 0.0, "{from}->{} is {}", edge.target, lifted.weight);
        let expected = edge.weight + result.potential(from) - result.potential(&edge.target);
        assert!((lifted.weight - expected).abs() < 1e-9);
    }

    // The synthetic source never shows up as a node.
    assert_eq!(result.graph().node_count(), graph.node_count());
    assert_eq!(result.potentials().len(), graph.node_count());
}

#[test]
fn true_distance_is_recovered() {
    let graph = incentivised();
    let finder = PathFinder::new(&graph);

    let route = finder.find_path_johnson("s", "t").expect("route");
    assert_eq!(route.steps, ["s", "b", "a", "t"]);
    assert!((route.distance - 1.0).abs() < 1e-9);

    for algorithm in [RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar] {
        let route = finder.find_path("s", "t", algorithm).expect("route");
        assert!((route.distance - 1.0).abs() < 1e-9);
    }
    assert!((finder.shortest_distance("s", "a") + 1.0).abs() < 1e-9);
}

#[test]
fn negative_cycle_leaves_graph_untouched() {
    let graph = directed(&[("a", "b", 1.0), ("b", "c", -4.0), ("c", "a", 2.0), ("c", "d", 1.0)]);
    let snapshot = graph.clone();

    assert!(matches!(reweight(&graph), Err(Error::NegativeCycle)));
    let error = PathFinder::new(&graph)
        .find_path("a", "d", RouteAlgorithm::Dijkstra)
        .expect_err("cycle");
    assert!(matches!(error, Error::NegativeCycle));
    assert_eq!(graph, snapshot);
}

#[test]
fn non_negative_graph_reweights_to_itself() {
    let graph = directed(&[("a", "b", 3.0), ("b", "c", 1.0), ("a", "c", 5.0)]);
    let result = reweight(&graph).expect("no cycle");
    assert_eq!(result.graph(), &graph);

    let route = PathFinder::new(&graph).find_path_johnson("a", "c").unwrap();
    assert_eq!(route.distance, 4.0);
}

#[test]
fn bfs_ignores_negative_weights() {
    let graph = incentivised();
    let route = PathFinder::new(&graph)
        .find_path("s", "t", RouteAlgorithm::Bfs)
        .expect("route");
    assert_eq!(route.hop_count(), 2);
}

/// Plain Bellman-Ford from a single source, `None` for unreachable nodes.
fn bellman_ford(graph: &Graph, source: &str) -> HashMap<String, Option<f64>> {
    let mut dist: HashMap<String, Option<f64>> =
        graph.nodes().map(|node| (node.id.clone(), None)).collect();
    dist.insert(source.to_string(), Some(0.0));

    for _ in 0..graph.node_count() {
        for (from, edge) in graph.arcs() {
            let Some(base) = dist[from] else { continue };
            let candidate = base + edge.weight;
            if dist[&edge.target].map_or(true, |current| candidate < current) {
                dist.insert(edge.target.clone(), Some(candidate));
            }
        }
    }
    dist
}

#[test]
fn every_reachable_pair_matches_bellman_ford() {
    let graph = directed(&[
        ("s", "a", 4.0),
        ("s", "b", 2.0),
        ("b", "a", -3.0),
        ("a", "t", 2.0),
        ("b", "t", 5.0),
        ("t", "c", -1.5),
        ("c", "s", 6.0),
        ("a", "c", 0.5),
        ("d", "b", -4.0),
    ]);
    let result = reweight(&graph).expect("no negative cycle");
    let lifted = PathFinder::new(result.graph());
    let ids: Vec<String> = graph.nodes().map(|node| node.id.clone()).collect();

    let mut checked = 0;
    for start in &ids {
        let expected = bellman_ford(&graph, start);
        for goal in &ids {
            match expected[goal] {
                Some(distance) => {
                    let route = lifted
                        .find_path(start, goal, RouteAlgorithm::Dijkstra)
                        .expect("reachable pair has a route");
                    let recovered = result.true_distance(start, goal, route.distance);
                    assert!(
                        (recovered - distance).abs() < 1e-9,
                        "{start}->{goal}: {recovered} != {distance}"
                    );
                    checked += 1;
                }
                None => assert!(matches!(
                    lifted.find_path(start, goal, RouteAlgorithm::Dijkstra),
                    Err(Error::NoPath { .. })
                )),
            }
        }
    }
    assert!(checked > ids.len());
}

#[test]
fn negative_shortcut_loaded_from_file_is_taken() {
    let floor = load_floor_plan(&weighted_network_path()).expect("fixture loads");
    let graph = build_graph(&floor, &GraphBuildOptions::default()).expect("graph builds");
    assert_eq!(graph.node("jn_f02_t02").map(|node| node.kind), Some(NodeKind::Junction));
    assert!(graph.has_negative_weights());

    let finder = PathFinder::new(&graph);
    let johnson = finder.find_path_johnson("rm_f02_201", "rm_f02_203").expect("route");
    assert_eq!(johnson.steps, ["rm_f02_201", "jn_f02_t02", "rm_f02_202", "rm_f02_203"]);
    assert!((johnson.distance - 5.0).abs() < 1e-9);

    for algorithm in [RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar] {
        let route = finder
            .find_path("rm_f02_201", "rm_f02_203", algorithm)
            .expect("route");
        assert_eq!(route.steps, johnson.steps);
        assert!((route.distance - 5.0).abs() < 1e-9);
    }

    // The shortcut is one-way, so the return trip goes round through t01.
    let back = finder
        .find_path("rm_f02_203", "rm_f02_201", RouteAlgorithm::Dijkstra)
        .expect("route");
    assert_eq!(back.steps, ["rm_f02_203", "rm_f02_202", "jn_f02_t01", "rm_f02_201"]);
    assert!((back.distance - 13.0).abs() < 1e-9);
}
