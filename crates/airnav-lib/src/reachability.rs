//! All-destinations variant of the shortest-path solver.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::Result;
use crate::graph::Graph;
use crate::model::WaypointId;
use crate::path::{resolve_node, run_dijkstra};

/// Shortest distances from one waypoint to every node of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Reachability {
    pub start: WaypointId,
    /// Every node of the graph; unreachable nodes map to `f64::INFINITY`.
    pub distances: HashMap<WaypointId, f64>,
    /// Predecessor on the shortest path; `None` for the start and for
    /// unreachable nodes.
    pub predecessors: HashMap<WaypointId, Option<WaypointId>>,
}

impl Reachability {
    /// Shortest distance to `waypoint`, `None` when unknown or unreachable.
    pub fn distance(&self, waypoint: &str) -> Option<f64> {
        self.distances
            .get(waypoint)
            .copied()
            .filter(|distance| distance.is_finite())
    }

    /// Waypoints with `0 < distance <= max_distance`, nearest first.
    pub fn within(&self, max_distance: f64) -> Vec<(WaypointId, f64)> {
        let mut reachable: Vec<(WaypointId, f64)> = self
            .distances
            .iter()
            .filter(|(_, &distance)| {
                distance.is_finite() && distance > 0.0 && distance <= max_distance
            })
            .map(|(id, &distance)| (id.clone(), distance))
            .collect();

        reachable.sort_by(|a, b| compare_distance(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
        reachable
    }

    /// Walk the predecessor chain back to the start.
    pub fn path_to(&self, waypoint: &str) -> Option<Vec<WaypointId>> {
        self.distance(waypoint)?;

        let mut path = vec![waypoint.to_string()];
        let mut current = waypoint;
        while let Some(Some(parent)) = self.predecessors.get(current) {
            path.push(parent.clone());
            current = parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Run Dijkstra from `start` over the whole graph, without early termination
/// and without edge filtering.
pub fn solve_all(graph: &Graph, start: &str) -> Result<Reachability> {
    let start = resolve_node(graph, start)?;
    let state = run_dijkstra(graph, start, None, None);

    let mut distances = HashMap::with_capacity(graph.node_count());
    let mut predecessors = HashMap::with_capacity(graph.node_count());

    for node in graph.nodes() {
        let distance = state.distances.get(node).copied().unwrap_or(f64::INFINITY);
        distances.insert(node.to_string(), distance);
        let parent = state
            .parents
            .get(node)
            .map(|(parent, _)| parent.to_string());
        predecessors.insert(node.to_string(), parent);
    }

    Ok(Reachability {
        start: start.to_string(),
        distances,
        predecessors,
    })
}

fn compare_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Greater)
}
