mod common;

use airnav_lib::{build_graph, Connection, DEFAULT_EDGE_WEIGHT};

use common::{concourse_connections, triangle};

fn sorted_weights(graph: &airnav_lib::Graph, node: &str) -> Vec<f64> {
    let mut weights: Vec<f64> = graph.neighbours(node).iter().map(|e| e.weight).collect();
    weights.sort_by(f64::total_cmp);
    weights
}

#[test]
fn every_endpoint_becomes_a_node() {
    let graph = build_graph(&[Connection::new("A", "B", 5.0)]);

    assert!(graph.contains("A"));
    assert!(graph.contains("B"));
    assert!(graph.neighbours("B").is_empty());
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn parallel_edges_are_preserved_in_input_order() {
    let graph = build_graph(&[
        Connection::new("A", "B", 8.0),
        Connection::new("A", "B", 3.0),
    ]);

    let weights: Vec<f64> = graph.neighbours("A").iter().map(|e| e.weight).collect();
    assert_eq!(weights, vec![8.0, 3.0]);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn unusable_distances_fall_back_to_default_weight() {
    let mut missing = Connection::new("A", "B", 0.0);
    missing.distance_meters = None;

    let graph = build_graph(&[
        missing,
        Connection::new("A", "C", 0.0),
        Connection::new("A", "D", -4.0),
        Connection::new("A", "E", f64::NAN),
    ]);

    assert!(graph
        .neighbours("A")
        .iter()
        .all(|edge| edge.weight == DEFAULT_EDGE_WEIGHT));
}

#[test]
fn permuted_input_builds_equivalent_graph() {
    let connections = concourse_connections();
    let mut reversed = connections.clone();
    reversed.reverse();

    let forward = build_graph(&connections);
    let backward = build_graph(&reversed);

    let mut forward_nodes: Vec<&str> = forward.nodes().collect();
    let mut backward_nodes: Vec<&str> = backward.nodes().collect();
    forward_nodes.sort_unstable();
    backward_nodes.sort_unstable();
    assert_eq!(forward_nodes, backward_nodes);

    for node in forward_nodes {
        assert_eq!(
            sorted_weights(&forward, node),
            sorted_weights(&backward, node),
            "weights differ for {node}"
        );
    }
}

#[test]
fn stats_report_degrees() {
    let mut connections = triangle();
    connections.push(Connection::new("C", "A", 1.0));
    let stats = build_graph(&connections).stats(false);

    assert_eq!(stats.nodes, 3);
    assert_eq!(stats.edges, 4);
    assert_eq!(stats.max_degree, 2);
    assert_eq!(stats.min_degree, 1);
    assert!((stats.avg_degree - 1.33).abs() < f64::EPSILON);
    assert!(!stats.cached);
}

#[test]
fn empty_graph_stats_are_zero() {
    let stats = build_graph(&[]).stats(true);

    assert_eq!(stats.nodes, 0);
    assert_eq!(stats.edges, 0);
    assert_eq!(stats.avg_degree, 0.0);
    assert_eq!(stats.max_degree, 0);
    assert_eq!(stats.min_degree, 0);
}
