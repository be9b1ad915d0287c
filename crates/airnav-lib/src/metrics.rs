use serde::Serialize;
use tracing::warn;

use crate::graph::{Edge, Graph};
use crate::model::{ConnectionType, WaypointId};
use crate::path::PathResult;

/// One hop of a resolved route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from: WaypointId,
    pub to: WaypointId,
    pub distance_meters: f64,
    pub time_seconds: f64,
    pub connection_type: ConnectionType,
}

/// Distance and time aggregated over a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub segments: Vec<RouteSegment>,
    /// Total distance rounded to the nearest meter.
    pub total_distance: u64,
    /// Total walking time in minutes, rounded.
    pub total_time: u64,
}

impl RouteMetrics {
    /// Sum distance and time along `path` using, for every consecutive pair,
    /// the first edge in the graph between them.
    ///
    /// Pairs with no connecting edge are logged and skipped, so the totals
    /// may undercount rather than fail.
    pub fn compute(path: &[WaypointId], graph: &Graph) -> Self {
        let mut hops = Vec::with_capacity(path.len().saturating_sub(1));

        for pair in path.windows(2) {
            let (from, to) = (pair[0].as_str(), pair[1].as_str());
            match graph.neighbours(from).iter().find(|edge| edge.target == to) {
                Some(edge) => hops.push((from, edge)),
                None => warn!(from, to, "no connection found between path waypoints"),
            }
        }

        Self::from_hops(hops)
    }

    /// Sum distance and time over the exact edges the solver relaxed.
    ///
    /// Unlike [`compute`](Self::compute) this never picks a different
    /// parallel edge, so `total_distance` always matches the rounded
    /// `total_weight` of the search.
    pub fn from_path_result(result: &PathResult, graph: &Graph) -> Self {
        let hops = result.traversed_edges(graph);
        if hops.len() != result.hop_count() {
            warn!(
                expected = result.hop_count(),
                resolved = hops.len(),
                "path result does not match graph; some segments were skipped"
            );
        }
        Self::from_hops(hops)
    }

    fn from_hops<'a>(hops: impl IntoIterator<Item = (&'a str, &'a Edge)>) -> Self {
        let mut total_distance = 0.0;
        let mut total_seconds = 0.0;
        let mut segments = Vec::new();

        for (from, edge) in hops {
            let distance = edge.weight;
            let time = edge.walking_time_seconds();
            total_distance += distance;
            total_seconds += time;

            segments.push(RouteSegment {
                from: from.to_string(),
                to: edge.target.clone(),
                distance_meters: distance,
                time_seconds: time,
                connection_type: edge.connection.connection_type.clone(),
            });
        }

        Self {
            segments,
            total_distance: round_non_negative(total_distance),
            total_time: round_non_negative(total_seconds / 60.0),
        }
    }
}

fn round_non_negative(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
