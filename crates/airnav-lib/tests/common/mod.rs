//! Common test utilities and fixture helpers.
//!
//! Integration tests share a small concourse graph and a repository wrapper
//! that counts how often the connection table is fetched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airnav_lib::{
    Connection, ConnectionType, InMemoryRepository, RepositoryError, Waypoint, WaypointRepository,
    WaypointType,
};
use async_trait::async_trait;

/// Directed edges of the worked example: A→B 5, B→C 5, A→C 20.
#[allow(dead_code)]
pub fn triangle() -> Vec<Connection> {
    vec![
        Connection::new("A", "B", 5.0),
        Connection::new("B", "C", 5.0),
        Connection::new("A", "C", 20.0),
    ]
}

/// A two-level concourse: the short way between floors is a staircase, the
/// long way an elevator.
///
/// ```text
///   ENTRANCE --30-- CORR_1 --10 stairs-- CORR_2 --25-- GATE_10
///                     \                   /
///                      --40 elevator------
/// ```
#[allow(dead_code)]
pub fn concourse_connections() -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut both = |from: &str, to: &str, meters: f64, kind: ConnectionType| {
        for (a, b) in [(from, to), (to, from)] {
            connections.push(
                Connection::new(a, b, meters)
                    .with_walking_time(meters * 1.2)
                    .with_type(kind.clone())
                    .with_accessible(kind != ConnectionType::Stairs),
            );
        }
    };

    both("ENTRANCE", "CORR_1", 30.0, ConnectionType::Walk);
    both("CORR_1", "CORR_2", 10.0, ConnectionType::Stairs);
    both("CORR_1", "CORR_2", 40.0, ConnectionType::Elevator);
    both("CORR_2", "GATE_10", 25.0, ConnectionType::Walk);
    connections
}

#[allow(dead_code)]
pub fn concourse_waypoints() -> Vec<Waypoint> {
    let mut entrance = Waypoint::new("ENTRANCE", "T1", WaypointType::Entrance);
    entrance.gps_lat = Some(37.4470);
    entrance.gps_lon = Some(126.4520);
    entrance.name_en = Some("Main Entrance".to_string());

    let corridor_1 = Waypoint::new("CORR_1", "T1", WaypointType::Corridor);
    let mut corridor_2 = Waypoint::new("CORR_2", "T1", WaypointType::Corridor);
    corridor_2.floor_number = 3;

    let mut gate = Waypoint::new("GATE_10", "T1", WaypointType::Gate);
    gate.floor_number = 3;
    gate.name_en = Some("Gate 10".to_string());
    gate.metadata = Some(serde_json::json!({ "gate_number": "10" }));

    vec![entrance, corridor_1, corridor_2, gate]
}

#[allow(dead_code)]
pub fn concourse_repository() -> InMemoryRepository {
    InMemoryRepository::new(concourse_waypoints(), concourse_connections())
}

/// Wraps a repository and counts `get_all_connections` calls.
#[allow(dead_code)]
pub struct CountingRepository<R> {
    inner: R,
    fetches: AtomicUsize,
    delay: Option<Duration>,
    lookup_delay: Option<Duration>,
}

#[allow(dead_code)]
impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fetches: AtomicUsize::new(0),
            delay: None,
            lookup_delay: None,
        })
    }

    /// Every call sleeps for `delay` before answering.
    pub fn slow(inner: R, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fetches: AtomicUsize::new(0),
            delay: Some(delay),
            lookup_delay: None,
        })
    }

    /// Only `find_by_id` sleeps for `delay`; the connection fetch is instant.
    pub fn slow_lookups(inner: R, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fetches: AtomicUsize::new(0),
            delay: None,
            lookup_delay: Some(delay),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl<R: WaypointRepository> WaypointRepository for CountingRepository<R> {
    async fn find_by_id(&self, id: &str) -> Result<Option<Waypoint>, RepositoryError> {
        self.pause().await;
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.find_by_id(id).await
    }

    async fn get_all_connections(&self) -> Result<Vec<Connection>, RepositoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.get_all_connections().await
    }

    async fn find_nearest_by_gps(
        &self,
        lat: f64,
        lon: f64,
        max_distance_m: f64,
    ) -> Result<Option<Waypoint>, RepositoryError> {
        self.pause().await;
        self.inner.find_nearest_by_gps(lat, lon, max_distance_m).await
    }
}
