use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph};
use crate::model::{ConnectionType, WaypointId};
use crate::queue::PriorityQueue;

/// Predicate deciding whether an edge may be traversed during one search.
///
/// Filters are applied per query, so a single cached graph serves every
/// combination of restrictions without being rebuilt.
pub trait EdgeFilter {
    fn allows(&self, from: &str, edge: &Edge) -> bool;
}

impl<F> EdgeFilter for F
where
    F: Fn(&str, &Edge) -> bool,
{
    fn allows(&self, from: &str, edge: &Edge) -> bool {
        self(from, edge)
    }
}

/// Restrictions requested by the traveller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    /// Skip stair connections (prefer elevators and escalators).
    pub avoid_stairs: bool,
    /// Only use connections flagged as wheelchair accessible.
    pub accessible_only: bool,
}

impl RouteOptions {
    /// Whether every edge is allowed under these options.
    pub fn is_unrestricted(&self) -> bool {
        !self.avoid_stairs && !self.accessible_only
    }
}

impl EdgeFilter for RouteOptions {
    fn allows(&self, _from: &str, edge: &Edge) -> bool {
        if self.avoid_stairs && edge.connection.connection_type == ConnectionType::Stairs {
            return false;
        }

        if self.accessible_only && !edge.connection.is_accessible {
            return false;
        }

        true
    }
}

/// Outcome of a single-destination search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Waypoints from start to end inclusive; empty when no route exists.
    pub path: Vec<WaypointId>,
    /// Sum of traversed edge weights, `f64::INFINITY` when no route exists.
    pub total_weight: f64,
    pub found: bool,
    /// Nodes finalized before the search stopped.
    pub visited: HashSet<WaypointId>,
    /// For each hop `path[i] -> path[i + 1]`, the index of the edge taken in
    /// `graph.neighbours(path[i])`.
    pub edge_indices: Vec<usize>,
}

impl PathResult {
    fn not_found(visited: HashSet<WaypointId>) -> Self {
        Self {
            path: Vec::new(),
            total_weight: f64::INFINITY,
            found: false,
            visited,
            edge_indices: Vec::new(),
        }
    }

    /// Number of hops in the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The edges the solver relaxed to produce `path`, in travel order.
    ///
    /// Only meaningful against the graph the result was computed on.
    pub fn traversed_edges<'g>(&self, graph: &'g Graph) -> Vec<(&str, &'g Edge)> {
        self.path
            .iter()
            .zip(&self.edge_indices)
            .filter_map(|(from, &index)| {
                graph
                    .neighbours(from)
                    .get(index)
                    .map(|edge| (from.as_str(), edge))
            })
            .collect()
    }
}

/// Intermediate state shared by the single-destination and all-destination
/// searches.
pub(crate) struct SearchState<'g> {
    pub(crate) distances: HashMap<&'g str, f64>,
    /// node -> (predecessor, index of the edge in the predecessor's adjacency)
    pub(crate) parents: HashMap<&'g str, (&'g str, usize)>,
    pub(crate) visited: HashSet<&'g str>,
}

/// Resolve a waypoint to the graph-owned key, failing when it is not a node.
pub(crate) fn resolve_node<'g>(graph: &'g Graph, waypoint: &str) -> Result<&'g str> {
    graph.node_key(waypoint).ok_or_else(|| Error::NodeNotFound {
        id: waypoint.to_string(),
    })
}

/// Dijkstra relaxation loop with lazy deletion.
///
/// Stops as soon as `goal` is finalized when one is given. Weights must be
/// non-negative for the first pop of a node to be final.
pub(crate) fn run_dijkstra<'g>(
    graph: &'g Graph,
    start: &'g str,
    goal: Option<&str>,
    filter: Option<&dyn EdgeFilter>,
) -> SearchState<'g> {
    let mut distances: HashMap<&'g str, f64> = HashMap::new();
    let mut parents: HashMap<&'g str, (&'g str, usize)> = HashMap::new();
    let mut visited: HashSet<&'g str> = HashSet::new();
    let mut queue = PriorityQueue::new();

    distances.insert(start, 0.0);
    queue.enqueue(start, 0.0);

    while let Some(current) = queue.dequeue() {
        if !visited.insert(current) {
            continue;
        }

        if goal == Some(current) {
            break;
        }

        let current_distance = distances.get(current).copied().unwrap_or(f64::INFINITY);

        for (index, edge) in graph.neighbours(current).iter().enumerate() {
            if let Some(filter) = filter {
                if !filter.allows(current, edge) {
                    continue;
                }
            }

            let next = edge.target.as_str();
            let next_cost = current_distance + edge.weight;
            if next_cost < distances.get(next).copied().unwrap_or(f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, (current, index));
                queue.enqueue(next, next_cost);
            }
        }
    }

    SearchState {
        distances,
        parents,
        visited,
    }
}

/// Run Dijkstra's algorithm from `start` to `end`, optionally skipping edges
/// rejected by `filter`.
///
/// Both endpoints must be nodes of `graph`, otherwise [`Error::NodeNotFound`]
/// is returned. An unreachable destination is not an error: the result has
/// `found == false`, an empty path and an infinite weight.
pub fn solve(
    graph: &Graph,
    start: &str,
    end: &str,
    filter: Option<&dyn EdgeFilter>,
) -> Result<PathResult> {
    let start = resolve_node(graph, start)?;
    let end = resolve_node(graph, end)?;

    let state = run_dijkstra(graph, start, Some(end), filter);
    let visited: HashSet<WaypointId> = state.visited.iter().map(|id| id.to_string()).collect();

    if start != end && !state.parents.contains_key(end) {
        return Ok(PathResult::not_found(visited));
    }

    let (path, edge_indices) = reconstruct_path(&state.parents, start, end);
    let total_weight = state.distances.get(end).copied().unwrap_or(f64::INFINITY);

    Ok(PathResult {
        path,
        total_weight,
        found: true,
        visited,
        edge_indices,
    })
}

pub(crate) fn reconstruct_path<'a>(
    parents: &HashMap<&'a str, (&'a str, usize)>,
    start: &str,
    goal: &'a str,
) -> (Vec<WaypointId>, Vec<usize>) {
    let mut path = vec![goal.to_string()];
    let mut edge_indices = Vec::new();
    let mut current = goal;

    while current != start {
        let Some(&(parent, index)) = parents.get(current) else {
            break;
        };
        path.push(parent.to_string());
        edge_indices.push(index);
        current = parent;
    }

    path.reverse();
    edge_indices.reverse();
    (path, edge_indices)
}
