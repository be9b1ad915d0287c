use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Connection, WaypointId};

/// Weight used for connections without a usable distance.
///
/// Missing, zero, negative and non-finite distances all fall back to this
/// value, which keeps every edge weight strictly positive.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Edge within the waypoint graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: WaypointId,
    pub weight: f64,
    pub connection: Connection,
}

impl Edge {
    /// Walking time carried by the underlying connection, zero when unknown.
    pub fn walking_time_seconds(&self) -> f64 {
        self.connection.walking_time_seconds.unwrap_or(0.0)
    }
}

/// Adjacency-list graph of every waypoint that appears in a connection.
///
/// Graphs are built wholesale from a connection list and never mutated
/// afterwards; the cache replaces them on rebuild.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<WaypointId, Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Return the outgoing edges for a given waypoint, in input order.
    pub fn neighbours(&self, waypoint: &str) -> &[Edge] {
        self.adjacency
            .get(waypoint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the waypoint is a node of this graph.
    pub fn contains(&self, waypoint: &str) -> bool {
        self.adjacency.contains_key(waypoint)
    }

    /// Graph-owned key for a waypoint, letting solvers borrow ids from the graph.
    pub fn node_key(&self, waypoint: &str) -> Option<&str> {
        self.adjacency
            .get_key_value(waypoint)
            .map(|(key, _)| key.as_str())
    }

    /// Number of distinct waypoints appearing as a source or a target.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate over node identifiers in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Descriptive degree statistics over the graph.
    pub fn stats(&self, cached: bool) -> GraphStats {
        let nodes = self.node_count();
        let edges = self.edge_count();
        let mut max_degree = 0usize;
        let mut min_degree = usize::MAX;

        for outgoing in self.adjacency.values() {
            max_degree = max_degree.max(outgoing.len());
            min_degree = min_degree.min(outgoing.len());
        }

        if nodes == 0 {
            min_degree = 0;
        }

        let avg_degree = if nodes == 0 {
            0.0
        } else {
            (edges as f64 / nodes as f64 * 100.0).round() / 100.0
        };

        GraphStats {
            nodes,
            edges,
            avg_degree,
            max_degree,
            min_degree,
            cached,
        }
    }
}

/// Summary returned by [`Graph::stats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Average out-degree rounded to two decimals.
    pub avg_degree: f64,
    pub max_degree: usize,
    pub min_degree: usize,
    /// `true` when the graph was served from a warm cache without a rebuild.
    pub cached: bool,
}

/// Build the routing graph from a flat list of directed connection records.
///
/// Parallel edges are kept verbatim and each node's adjacency list follows
/// input order. Target-only waypoints become nodes with no outgoing edges.
pub fn build_graph(connections: &[Connection]) -> Graph {
    let mut adjacency: HashMap<WaypointId, Vec<Edge>> = HashMap::new();

    for connection in connections {
        adjacency
            .entry(connection.to_waypoint_id.clone())
            .or_default();
        adjacency
            .entry(connection.from_waypoint_id.clone())
            .or_default()
            .push(Edge {
                target: connection.to_waypoint_id.clone(),
                weight: edge_weight(connection.distance_meters),
                connection: connection.clone(),
            });
    }

    Graph {
        adjacency,
        edge_count: connections.len(),
    }
}

fn edge_weight(distance_meters: Option<f64>) -> f64 {
    match distance_meters {
        Some(distance) if distance.is_finite() && distance > 0.0 => distance,
        _ => DEFAULT_EDGE_WEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_zero_distance_defaults_weight() {
        assert_eq!(edge_weight(None), DEFAULT_EDGE_WEIGHT);
        assert_eq!(edge_weight(Some(0.0)), DEFAULT_EDGE_WEIGHT);
        assert_eq!(edge_weight(Some(-4.0)), DEFAULT_EDGE_WEIGHT);
        assert_eq!(edge_weight(Some(f64::NAN)), DEFAULT_EDGE_WEIGHT);
        assert_eq!(edge_weight(Some(12.5)), 12.5);
    }

    #[test]
    fn empty_graph_stats_are_zero() {
        let stats = Graph::default().stats(false);
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.edges, 0);
        assert_eq!(stats.avg_degree, 0.0);
        assert_eq!(stats.min_degree, 0);
        assert_eq!(stats.max_degree, 0);
    }

    #[test]
    fn unknown_waypoint_has_no_neighbours() {
        let graph = build_graph(&[Connection::new("A", "B", 3.0)]);
        assert!(graph.neighbours("Z").is_empty());
        assert!(!graph.contains("Z"));
    }
}
