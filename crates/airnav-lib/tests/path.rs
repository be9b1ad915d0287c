mod common;

use std::collections::HashSet;

use airnav_lib::{
    build_graph, solve, solve_all, Connection, ConnectionType, Edge, EdgeFilter, Error, Graph,
    RouteMetrics, RouteOptions,
};

use common::{concourse_connections, triangle};

/// Cheapest simple path cost by exhaustive search, honouring `filter`.
fn brute_force(graph: &Graph, from: &str, to: &str, filter: &dyn EdgeFilter) -> Option<f64> {
    fn walk(
        graph: &Graph,
        current: &str,
        to: &str,
        filter: &dyn EdgeFilter,
        seen: &mut HashSet<String>,
        cost: f64,
        best: &mut Option<f64>,
    ) {
        if current == to {
            *best = Some(best.map_or(cost, |b: f64| b.min(cost)));
            return;
        }
        for edge in graph.neighbours(current) {
            if !filter.allows(current, edge) || seen.contains(&edge.target) {
                continue;
            }
            seen.insert(edge.target.clone());
            walk(graph, &edge.target, to, filter, seen, cost + edge.weight, best);
            seen.remove(&edge.target);
        }
    }

    let mut best = None;
    let mut seen = HashSet::from([from.to_string()]);
    walk(graph, from, to, filter, &mut seen, 0.0, &mut best);
    best
}

#[test]
fn worked_example_prefers_two_short_hops() {
    let graph = build_graph(&triangle());
    let result = solve(&graph, "A", "C", None).expect("nodes exist");

    assert!(result.found);
    assert_eq!(result.path, vec!["A", "B", "C"]);
    assert_eq!(result.total_weight, 10.0);
}

#[test]
fn start_equals_end() {
    let graph = build_graph(&triangle());
    let result = solve(&graph, "B", "B", None).expect("node exists");

    assert!(result.found);
    assert_eq!(result.path, vec!["B"]);
    assert_eq!(result.total_weight, 0.0);
    assert!(result.edge_indices.is_empty());
}

#[test]
fn unreachable_destination_is_not_an_error() {
    let graph = build_graph(&[Connection::new("A", "B", 1.0), Connection::new("C", "D", 1.0)]);
    let result = solve(&graph, "A", "D", None).expect("nodes exist");

    assert!(!result.found);
    assert!(result.path.is_empty());
    assert!(result.total_weight.is_infinite());
}

#[test]
fn edges_only_point_one_way() {
    let graph = build_graph(&triangle());
    let result = solve(&graph, "C", "A", None).expect("nodes exist");
    assert!(!result.found);
}

#[test]
fn unknown_endpoints_are_rejected() {
    let graph = build_graph(&triangle());

    let error = solve(&graph, "X", "A", None).expect_err("unknown start");
    assert!(matches!(error, Error::NodeNotFound { ref id } if id == "X"));

    let error = solve(&graph, "A", "Y", None).expect_err("unknown end");
    assert!(matches!(error, Error::NodeNotFound { ref id } if id == "Y"));
}

#[test]
fn avoiding_stairs_uses_the_elevator() {
    let graph = build_graph(&concourse_connections());
    let options = RouteOptions {
        avoid_stairs: true,
        ..RouteOptions::default()
    };

    let unrestricted = solve(&graph, "ENTRANCE", "GATE_10", None).expect("nodes exist");
    let restricted = solve(&graph, "ENTRANCE", "GATE_10", Some(&options)).expect("nodes exist");

    assert_eq!(unrestricted.total_weight, 65.0);
    assert_eq!(restricted.total_weight, 95.0);
    assert_eq!(restricted.path, unrestricted.path);

    for (_, edge) in restricted.traversed_edges(&graph) {
        assert_ne!(edge.connection.connection_type, ConnectionType::Stairs);
    }
}

#[test]
fn metrics_follow_the_edges_the_solver_took() {
    let graph = build_graph(&concourse_connections());
    let options = RouteOptions {
        accessible_only: true,
        ..RouteOptions::default()
    };
    let result = solve(&graph, "ENTRANCE", "GATE_10", Some(&options)).expect("nodes exist");

    let taken = RouteMetrics::from_path_result(&result, &graph);
    assert_eq!(taken.total_distance, 95);
    assert_eq!(taken.segments[1].connection_type, ConnectionType::Elevator);

    // First-match lookup picks the staircase listed before the elevator.
    let first_match = RouteMetrics::compute(&result.path, &graph);
    assert_eq!(first_match.total_distance, 65);
}

#[test]
fn closure_filters_are_honoured() {
    let graph = build_graph(&triangle());
    let no_b = |_: &str, edge: &Edge| edge.target != "B";

    let result = solve(&graph, "A", "C", Some(&no_b)).expect("nodes exist");
    assert_eq!(result.path, vec!["A", "C"]);
    assert_eq!(result.total_weight, 20.0);
}

#[test]
fn matches_exhaustive_search_on_every_pair() {
    let mut connections = concourse_connections();
    connections.extend([
        Connection::new("ENTRANCE", "GATE_10", 120.0),
        Connection::new("GATE_10", "CORR_1", 31.0).with_type(ConnectionType::MovingWalkway),
        Connection::new("CORR_2", "ENTRANCE", 90.0).with_accessible(false),
    ]);
    let graph = build_graph(&connections);
    let nodes: Vec<&str> = graph.nodes().collect();

    let filters: Vec<(RouteOptions, &str)> = vec![
        (RouteOptions::default(), "unrestricted"),
        (
            RouteOptions {
                avoid_stairs: true,
                accessible_only: false,
            },
            "avoid stairs",
        ),
        (
            RouteOptions {
                avoid_stairs: false,
                accessible_only: true,
            },
            "accessible only",
        ),
    ];

    for (options, label) in &filters {
        for from in &nodes {
            for to in &nodes {
                let result = solve(&graph, from, to, Some(options)).expect("nodes exist");
                let expected = brute_force(&graph, from, to, options);
                match expected {
                    Some(cost) => {
                        assert!(result.found, "{label}: {from}->{to} should be found");
                        assert!(
                            (result.total_weight - cost).abs() < 1e-9,
                            "{label}: {from}->{to} got {} expected {cost}",
                            result.total_weight
                        );
                        let walked: f64 = result
                            .traversed_edges(&graph)
                            .iter()
                            .map(|(_, edge)| edge.weight)
                            .sum();
                        assert!((walked - result.total_weight).abs() < 1e-9);
                    }
                    None => assert!(!result.found, "{label}: {from}->{to} should be unreachable"),
                }
            }
        }
    }
}

#[test]
fn reachability_lists_nearest_first() {
    let graph = build_graph(&concourse_connections());
    let reach = solve_all(&graph, "CORR_1").expect("node exists");

    let within = reach.within(30.0);
    let ids: Vec<&str> = within.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["CORR_2", "ENTRANCE"]);
    assert_eq!(reach.distance("GATE_10"), Some(35.0));
    assert_eq!(reach.distance("CORR_1"), Some(0.0));
    assert_eq!(
        reach.path_to("GATE_10"),
        Some(vec![
            "CORR_1".to_string(),
            "CORR_2".to_string(),
            "GATE_10".to_string()
        ])
    );
}

#[test]
fn reachability_rejects_unknown_start() {
    let graph = build_graph(&triangle());
    assert!(matches!(
        solve_all(&graph, "Q"),
        Err(Error::NodeNotFound { .. })
    ));
}
