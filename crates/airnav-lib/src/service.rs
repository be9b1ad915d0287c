//! High-level pathfinding facade.
//!
//! [`PathfindingService`] owns the graph cache and talks to the waypoint
//! repository. It is the entry point used by the CLI and by embedders.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{Clock, GraphCache, SystemClock};
use crate::config::PathfindingConfig;
use crate::error::{Error, Result};
use crate::graph::GraphStats;
use crate::metrics::{RouteMetrics, RouteSegment};
use crate::model::{Waypoint, WaypointId};
use crate::path::{solve, EdgeFilter, RouteOptions};
use crate::reachability::solve_all;
use crate::repository::{bounded, WaypointRepository};

/// Radius used to snap a GPS fix onto the waypoint graph.
pub const DEFAULT_SNAP_DISTANCE_M: f64 = 100.0;

/// Shortest-path algorithm that produced a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    #[default]
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAlgorithm::Dijkstra => f.write_str("dijkstra"),
        }
    }
}

/// A resolved route between two waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: Vec<WaypointId>,
    /// Details for each path id the repository knows about, in path order.
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<RouteSegment>,
    /// Meters, rounded.
    pub total_distance: u64,
    /// Minutes, rounded.
    pub total_time: u64,
    pub algorithm: RouteAlgorithm,
}

impl Route {
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A waypoint within walking range of a start point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachableWaypoint {
    #[serde(flatten)]
    pub waypoint: Waypoint,
    /// Shortest graph distance from the start.
    pub distance: f64,
}

/// Routes travellers through the waypoint graph supplied by a repository.
pub struct PathfindingService {
    repository: Arc<dyn WaypointRepository>,
    cache: GraphCache,
    config: PathfindingConfig,
}

impl fmt::Debug for PathfindingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathfindingService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PathfindingService {
    /// Create a service with the default configuration.
    pub fn new(repository: Arc<dyn WaypointRepository>) -> Self {
        Self::with_config(repository, PathfindingConfig::default())
    }

    pub fn with_config(repository: Arc<dyn WaypointRepository>, config: PathfindingConfig) -> Self {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    /// Create a service whose cache reads time from `clock`.
    pub fn with_clock(
        repository: Arc<dyn WaypointRepository>,
        config: PathfindingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut cache = GraphCache::with_clock(Arc::clone(&repository), config.cache_ttl, clock);
        if let Some(timeout) = config.repository_timeout {
            cache = cache.with_fetch_timeout(timeout);
        }

        Self {
            repository,
            cache,
            config,
        }
    }

    fn repository_timeout(&self) -> Option<Duration> {
        self.config.repository_timeout
    }

    /// Find the shortest route from `start` to `end` honouring `options`.
    ///
    /// Returns `Ok(None)` when both waypoints exist in the graph but no
    /// allowed path connects them. Unknown waypoints yield
    /// [`Error::NodeNotFound`].
    pub async fn find_route(
        &self,
        start: &str,
        end: &str,
        options: RouteOptions,
    ) -> Result<Option<Route>> {
        let graph = self.cache.get().await?;

        let result = {
            let filter: Option<&dyn EdgeFilter> = if options.is_unrestricted() {
                None
            } else {
                Some(&options)
            };
            solve(&graph, start, end, filter)?
        };
        if !result.found {
            warn!(
                start,
                end,
                avoid_stairs = options.avoid_stairs,
                accessible_only = options.accessible_only,
                "no route found"
            );
            return Ok(None);
        }

        let metrics = RouteMetrics::from_path_result(&result, &graph);
        let waypoints = self.resolve_waypoints(&result.path).await?;

        info!(
            start,
            end,
            hops = result.hop_count(),
            distance_m = metrics.total_distance,
            time_min = metrics.total_time,
            "route found"
        );

        Ok(Some(Route {
            path: result.path,
            waypoints,
            segments: metrics.segments,
            total_distance: metrics.total_distance,
            total_time: metrics.total_time,
            algorithm: RouteAlgorithm::Dijkstra,
        }))
    }

    /// Snap `(lat, lon)` to the nearest waypoint within
    /// [`DEFAULT_SNAP_DISTANCE_M`] and route from there to `end`.
    pub async fn find_route_from_position(
        &self,
        lat: f64,
        lon: f64,
        end: &str,
        options: RouteOptions,
    ) -> Result<Option<Route>> {
        let start = self
            .find_nearest_waypoint(lat, lon, DEFAULT_SNAP_DISTANCE_M)
            .await?
            .ok_or(Error::NoNearbyWaypoint {
                lat,
                lon,
                max_distance_m: DEFAULT_SNAP_DISTANCE_M,
            })?;

        debug!(lat, lon, waypoint = %start.id, "resolved start from GPS position");
        self.find_route(&start.id, end, options).await
    }

    /// The waypoint with a GPS fix closest to `(lat, lon)`, if one lies
    /// within `max_distance_m` meters.
    pub async fn find_nearest_waypoint(
        &self,
        lat: f64,
        lon: f64,
        max_distance_m: f64,
    ) -> Result<Option<Waypoint>> {
        bounded(
            "find_nearest_by_gps",
            self.repository_timeout(),
            self.repository.find_nearest_by_gps(lat, lon, max_distance_m),
        )
        .await
    }

    /// Every waypoint within `max_distance` of `start`, nearest first.
    ///
    /// The start itself is excluded. Waypoints present in the graph but
    /// unknown to the repository are skipped.
    pub async fn find_reachable_waypoints(
        &self,
        start: &str,
        max_distance: f64,
    ) -> Result<Vec<ReachableWaypoint>> {
        let graph = self.cache.get().await?;
        let reachability = solve_all(&graph, start)?;

        let mut reachable = Vec::new();
        for (id, distance) in reachability.within(max_distance) {
            if let Some(waypoint) = self.fetch_waypoint(&id).await? {
                reachable.push(ReachableWaypoint { waypoint, distance });
            }
        }

        debug!(start, max_distance, count = reachable.len(), "reachable waypoints");
        Ok(reachable)
    }

    /// Size and degree statistics of the current graph.
    pub async fn graph_stats(&self) -> Result<GraphStats> {
        let lookup = self.cache.lookup().await?;
        Ok(lookup.graph.stats(lookup.hit))
    }

    /// Forget the cached graph. Call after waypoints or connections change.
    pub fn clear_cache(&self) {
        self.cache.invalidate();
    }

    async fn resolve_waypoints(&self, path: &[WaypointId]) -> Result<Vec<Waypoint>> {
        let mut waypoints = Vec::with_capacity(path.len());
        for id in path {
            match self.fetch_waypoint(id).await? {
                Some(waypoint) => waypoints.push(waypoint),
                None => warn!(waypoint = %id, "waypoint on route has no details"),
            }
        }
        Ok(waypoints)
    }

    async fn fetch_waypoint(&self, id: &str) -> Result<Option<Waypoint>> {
        bounded(
            "find_by_id",
            self.repository_timeout(),
            self.repository.find_by_id(id),
        )
        .await
    }
}
