//! Airport waypoint navigation library.
//!
//! This crate builds a directed waypoint graph from connection records,
//! caches it for a bounded time and answers shortest-route, reachability and
//! nearest-waypoint queries on top of it. Consumers (the CLI, embedders)
//! should go through [`PathfindingService`] rather than wiring the pieces by
//! hand.
//!

#![deny(warnings)]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod path;
pub mod queue;
pub mod reachability;
pub mod repository;
pub mod service;

pub use cache::{CacheLookup, Clock, GraphCache, ManualClock, SystemClock, DEFAULT_CACHE_TTL};
pub use config::PathfindingConfig;
pub use db::{default_database_path, SqliteWaypointRepository};
pub use error::{Error, RepositoryError, Result};
pub use graph::{build_graph, Edge, Graph, GraphStats, DEFAULT_EDGE_WEIGHT};
pub use metrics::{RouteMetrics, RouteSegment};
pub use model::{Connection, ConnectionType, Waypoint, WaypointId, WaypointType};
pub use path::{solve, EdgeFilter, PathResult, RouteOptions};
pub use queue::PriorityQueue;
pub use reachability::{solve_all, Reachability};
pub use repository::{InMemoryRepository, WaypointRepository};
pub use service::{
    PathfindingService, ReachableWaypoint, Route, RouteAlgorithm, DEFAULT_SNAP_DISTANCE_M,
};
