//! Waypoint repository seam.
//!
//! The pathfinding core reads topology through [`WaypointRepository`] and
//! never writes. Persistence lives behind the trait: [`InMemoryRepository`]
//! for tests and embedding, [`crate::db::SqliteWaypointRepository`] for
//! on-disk datasets.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, RepositoryError};
use crate::geo::nearest_within;
use crate::model::{Connection, Waypoint, WaypointId};

/// Collaborator supplying waypoint details and the connection list.
#[async_trait]
pub trait WaypointRepository: Send + Sync {
    /// Look up a single waypoint by id.
    async fn find_by_id(&self, id: &str) -> std::result::Result<Option<Waypoint>, RepositoryError>;

    /// Return every directed connection. Called on each graph rebuild.
    async fn get_all_connections(&self) -> std::result::Result<Vec<Connection>, RepositoryError>;

    /// Closest waypoint with a GPS fix within `max_distance_m` meters.
    ///
    /// Repositories without positional data may keep the default, which
    /// never finds anything.
    async fn find_nearest_by_gps(
        &self,
        _lat: f64,
        _lon: f64,
        _max_distance_m: f64,
    ) -> std::result::Result<Option<Waypoint>, RepositoryError> {
        Ok(None)
    }
}

/// Await a repository call, failing with [`Error::RepositoryTimeout`] when it
/// does not complete within `timeout`.
pub(crate) async fn bounded<T>(
    operation: &'static str,
    timeout: Option<Duration>,
    call: impl Future<Output = std::result::Result<T, RepositoryError>>,
) -> crate::error::Result<T> {
    let Some(timeout) = timeout else {
        return Ok(call.await?);
    };

    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::RepositoryTimeout { operation, timeout }),
    }
}

/// Repository backed by in-process collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    waypoints: HashMap<WaypointId, Waypoint>,
    connections: Vec<Connection>,
}

impl InMemoryRepository {
    pub fn new(
        waypoints: impl IntoIterator<Item = Waypoint>,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Self {
        Self {
            waypoints: waypoints
                .into_iter()
                .map(|waypoint| (waypoint.id.clone(), waypoint))
                .collect(),
            connections: connections.into_iter().collect(),
        }
    }
}

#[async_trait]
impl WaypointRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &str) -> std::result::Result<Option<Waypoint>, RepositoryError> {
        Ok(self.waypoints.get(id).cloned())
    }

    async fn get_all_connections(&self) -> std::result::Result<Vec<Connection>, RepositoryError> {
        Ok(self.connections.clone())
    }

    async fn find_nearest_by_gps(
        &self,
        lat: f64,
        lon: f64,
        max_distance_m: f64,
    ) -> std::result::Result<Option<Waypoint>, RepositoryError> {
        let nearest = nearest_within(
            (lat, lon),
            max_distance_m,
            self.waypoints
                .values()
                .map(|waypoint| (waypoint, waypoint.gps_position())),
        );
        Ok(nearest.map(|(waypoint, _)| waypoint.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WaypointType;

    fn gate(id: &str, lat: f64, lon: f64) -> Waypoint {
        let mut waypoint = Waypoint::new(id, "T1", WaypointType::Gate);
        waypoint.gps_lat = Some(lat);
        waypoint.gps_lon = Some(lon);
        waypoint
    }

    #[tokio::test]
    async fn find_by_id_returns_clone() {
        let repo = InMemoryRepository::new([gate("G1", 37.0, 126.0)], Vec::<Connection>::new());
        let found = repo.find_by_id("G1").await.expect("lookup succeeds");
        assert_eq!(found.map(|w| w.id), Some("G1".to_string()));
        assert!(repo.find_by_id("G2").await.expect("lookup succeeds").is_none());
    }

    #[tokio::test]
    async fn nearest_by_gps_picks_closest() {
        let repo = InMemoryRepository::new(
            [gate("G1", 37.4600, 126.4400), gate("G2", 37.4610, 126.4400)],
            Vec::<Connection>::new(),
        );
        let nearest = repo
            .find_nearest_by_gps(37.4609, 126.4400, 100.0)
            .await
            .expect("lookup succeeds")
            .expect("waypoint within radius");
        assert_eq!(nearest.id, "G2");
    }
}
