//! SQLite-backed [`WaypointRepository`].
//!
//! The database holds two tables. `waypoints` has one row per navigable node
//! and `waypoint_connections` one row per *directed* edge. The graph is
//! rebuilt from the full connection table, so nothing here caches.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use directories::ProjectDirs;
use rusqlite::{params, Connection as Database, OptionalExtension, Row};
use tracing::debug;

use crate::error::{Error, RepositoryError, Result};
use crate::geo::nearest_within;
use crate::model::{Connection, ConnectionType, Waypoint, WaypointType};
use crate::repository::WaypointRepository;

/// Default filename for the waypoint database.
const DATABASE_FILENAME: &str = "waypoints.db";

/// How long SQLite waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS waypoints (
    id            TEXT PRIMARY KEY,
    terminal_id   TEXT    NOT NULL,
    floor_number  INTEGER NOT NULL DEFAULT 1,
    type          TEXT    NOT NULL,
    name_ko       TEXT,
    name_en       TEXT,
    map_x         REAL    NOT NULL DEFAULT 0,
    map_y         REAL    NOT NULL DEFAULT 0,
    gps_lat       REAL,
    gps_lon       REAL,
    metadata      TEXT,
    is_accessible INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS waypoint_connections (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    from_waypoint_id     TEXT    NOT NULL,
    to_waypoint_id       TEXT    NOT NULL,
    distance_meters      REAL,
    walking_time_seconds REAL,
    is_accessible        INTEGER NOT NULL DEFAULT 1,
    connection_type      TEXT    NOT NULL DEFAULT 'WALK'
);

CREATE INDEX IF NOT EXISTS idx_connections_from
    ON waypoint_connections (from_waypoint_id);
";

const WAYPOINT_COLUMNS: &str = "id, terminal_id, floor_number, type, name_ko, name_en, \
     map_x, map_y, gps_lat, gps_lon, metadata, is_accessible";

/// Resolve the default database location using platform-specific project directories.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "airnav", "airnav").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATABASE_FILENAME))
}

/// Waypoint repository reading from a SQLite database.
///
/// Queries run on tokio's blocking pool; the single connection is
/// serialized behind a mutex.
#[derive(Debug, Clone)]
pub struct SqliteWaypointRepository {
    database: Arc<Mutex<Database>>,
}

impl SqliteWaypointRepository {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> std::result::Result<Self, RepositoryError> {
        debug!(path = %path.display(), "opening waypoint database");
        Self::from_database(Database::open(path)?)
    }

    pub fn open_in_memory() -> std::result::Result<Self, RepositoryError> {
        Self::from_database(Database::open_in_memory()?)
    }

    fn from_database(database: Database) -> std::result::Result<Self, RepositoryError> {
        database.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            database: Arc::new(Mutex::new(database)),
        })
    }

    /// Create the `waypoints` and `waypoint_connections` tables when missing.
    pub fn init_schema(&self) -> std::result::Result<(), RepositoryError> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or replace a waypoint row.
    pub fn insert_waypoint(&self, waypoint: &Waypoint) -> std::result::Result<(), RepositoryError> {
        let metadata = waypoint
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|source| RepositoryError::Metadata {
                id: waypoint.id.clone(),
                source,
            })?;

        self.lock().execute(
            &format!("INSERT OR REPLACE INTO waypoints ({WAYPOINT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            params![
                waypoint.id,
                waypoint.terminal_id,
                waypoint.floor_number,
                waypoint.kind.as_str(),
                waypoint.name_ko,
                waypoint.name_en,
                waypoint.map_x,
                waypoint.map_y,
                waypoint.gps_lat,
                waypoint.gps_lon,
                metadata,
                waypoint.is_accessible,
            ],
        )?;
        Ok(())
    }

    /// Append a directed connection row.
    pub fn insert_connection(
        &self,
        connection: &Connection,
    ) -> std::result::Result<(), RepositoryError> {
        self.lock().execute(
            "INSERT INTO waypoint_connections (
                from_waypoint_id, to_waypoint_id, distance_meters,
                walking_time_seconds, is_accessible, connection_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                connection.from_waypoint_id,
                connection.to_waypoint_id,
                connection.distance_meters,
                connection.walking_time_seconds,
                connection.is_accessible,
                connection.connection_type.as_str(),
            ],
        )?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Database> {
        self.database.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `query` against the connection on the blocking pool.
    async fn with_database<T, F>(&self, query: F) -> std::result::Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> std::result::Result<T, RepositoryError> + Send + 'static,
    {
        let database = Arc::clone(&self.database);
        tokio::task::spawn_blocking(move || {
            let guard = database.lock().unwrap_or_else(PoisonError::into_inner);
            query(&guard)
        })
        .await?
    }
}

#[async_trait]
impl WaypointRepository for SqliteWaypointRepository {
    async fn find_by_id(&self, id: &str) -> std::result::Result<Option<Waypoint>, RepositoryError> {
        let id = id.to_string();
        self.with_database(move |database| {
            let row = database
                .query_row(
                    &format!("SELECT {WAYPOINT_COLUMNS} FROM waypoints WHERE id = ?1"),
                    [&id],
                    WaypointRow::from_row,
                )
                .optional()?;
            row.map(WaypointRow::into_waypoint).transpose()
        })
        .await
    }

    async fn get_all_connections(&self) -> std::result::Result<Vec<Connection>, RepositoryError> {
        self.with_database(|database| {
            let mut stmt = database.prepare(
                "SELECT from_waypoint_id, to_waypoint_id, distance_meters,
                        walking_time_seconds, is_accessible, connection_type
                 FROM waypoint_connections
                 ORDER BY from_waypoint_id, to_waypoint_id, id",
            )?;
            let rows = stmt.query_map([], row_to_connection)?;

            let mut connections = Vec::new();
            for row in rows {
                connections.push(row?);
            }
            debug!(count = connections.len(), "loaded waypoint connections");
            Ok(connections)
        })
        .await
    }

    async fn find_nearest_by_gps(
        &self,
        lat: f64,
        lon: f64,
        max_distance_m: f64,
    ) -> std::result::Result<Option<Waypoint>, RepositoryError> {
        self.with_database(move |database| {
            let mut stmt = database.prepare(&format!(
                "SELECT {WAYPOINT_COLUMNS} FROM waypoints
                 WHERE gps_lat IS NOT NULL AND gps_lon IS NOT NULL"
            ))?;
            let rows = stmt.query_map([], WaypointRow::from_row)?;

            let mut candidates = Vec::new();
            for row in rows {
                let row = row?;
                let position = row.gps_lat.zip(row.gps_lon);
                candidates.push((row, position));
            }

            nearest_within((lat, lon), max_distance_m, candidates)
                .map(|(row, _)| row.into_waypoint())
                .transpose()
        })
        .await
    }
}

/// Raw `waypoints` row before metadata decoding.
struct WaypointRow {
    id: String,
    terminal_id: String,
    floor_number: i32,
    kind: String,
    name_ko: Option<String>,
    name_en: Option<String>,
    map_x: f64,
    map_y: f64,
    gps_lat: Option<f64>,
    gps_lon: Option<f64>,
    metadata: Option<String>,
    is_accessible: bool,
}

impl WaypointRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            terminal_id: row.get(1)?,
            floor_number: row.get(2)?,
            kind: row.get(3)?,
            name_ko: row.get(4)?,
            name_en: row.get(5)?,
            map_x: row.get(6)?,
            map_y: row.get(7)?,
            gps_lat: row.get(8)?,
            gps_lon: row.get(9)?,
            metadata: row.get(10)?,
            is_accessible: row.get(11)?,
        })
    }

    fn into_waypoint(self) -> std::result::Result<Waypoint, RepositoryError> {
        if self.kind.trim().is_empty() {
            return Err(RepositoryError::InvalidValue {
                column: "waypoints.type",
                value: self.kind,
            });
        }

        let metadata = match self.metadata.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(serde_json::from_str(raw).map_err(|source| {
                RepositoryError::Metadata {
                    id: self.id.clone(),
                    source,
                }
            })?),
        };

        Ok(Waypoint {
            id: self.id,
            terminal_id: self.terminal_id,
            floor_number: self.floor_number,
            kind: WaypointType::from(self.kind),
            name_ko: self.name_ko,
            name_en: self.name_en,
            map_x: self.map_x,
            map_y: self.map_y,
            gps_lat: self.gps_lat,
            gps_lon: self.gps_lon,
            metadata,
            is_accessible: self.is_accessible,
        })
    }
}

fn row_to_connection(row: &Row<'_>) -> rusqlite::Result<Connection> {
    let connection_type: Option<String> = row.get(5)?;
    Ok(Connection {
        from_waypoint_id: row.get(0)?,
        to_waypoint_id: row.get(1)?,
        distance_meters: row.get(2)?,
        walking_time_seconds: row.get(3)?,
        is_accessible: row.get(4)?,
        connection_type: connection_type
            .map(ConnectionType::from)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteWaypointRepository {
        let repo = SqliteWaypointRepository::open_in_memory().expect("open in-memory db");
        repo.init_schema().expect("schema");

        let mut gate = Waypoint::new("GATE_10", "T1", WaypointType::Gate);
        gate.name_en = Some("Gate 10".to_string());
        gate.gps_lat = Some(37.4490);
        gate.gps_lon = Some(126.4510);
        gate.metadata = Some(serde_json::json!({ "gate_number": "10" }));
        repo.insert_waypoint(&gate).expect("insert gate");
        repo.insert_waypoint(&Waypoint::new("CORR_1", "T1", WaypointType::Corridor))
            .expect("insert corridor");

        repo.insert_connection(&Connection::new("CORR_1", "GATE_10", 42.0).with_walking_time(35.0))
            .expect("insert connection");
        repo.insert_connection(
            &Connection::new("GATE_10", "CORR_1", 42.0).with_type(ConnectionType::MovingWalkway),
        )
        .expect("insert connection");
        repo
    }

    #[tokio::test]
    async fn reads_back_waypoint_with_metadata() {
        let repo = seeded();
        let gate = repo
            .find_by_id("GATE_10")
            .await
            .expect("query succeeds")
            .expect("gate exists");

        assert_eq!(gate.kind, WaypointType::Gate);
        assert_eq!(gate.display_name(), "Gate 10");
        assert_eq!(
            gate.metadata.as_ref().and_then(|m| m.get("gate_number")),
            Some(&serde_json::json!("10"))
        );
        assert!(repo.find_by_id("NOPE").await.expect("query succeeds").is_none());
    }

    #[tokio::test]
    async fn connections_are_ordered_by_endpoints() {
        let repo = seeded();
        let connections = repo.get_all_connections().await.expect("query succeeds");

        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].from_waypoint_id, "CORR_1");
        assert_eq!(connections[0].walking_time_seconds, Some(35.0));
        assert_eq!(connections[1].connection_type, ConnectionType::MovingWalkway);
    }

    #[tokio::test]
    async fn invalid_metadata_is_reported() {
        let repo = seeded();
        repo.lock()
            .execute("UPDATE waypoints SET metadata = '{broken' WHERE id = 'GATE_10'", [])
            .expect("update");

        let error = repo.find_by_id("GATE_10").await.expect_err("bad metadata");
        assert!(matches!(error, RepositoryError::Metadata { ref id, .. } if id == "GATE_10"));
    }

    #[tokio::test]
    async fn nearest_skips_waypoints_without_gps() {
        let repo = seeded();
        let nearest = repo
            .find_nearest_by_gps(37.4491, 126.4510, 100.0)
            .await
            .expect("query succeeds");
        assert_eq!(nearest.map(|w| w.id), Some("GATE_10".to_string()));

        let none = repo
            .find_nearest_by_gps(37.5000, 126.4510, 100.0)
            .await
            .expect("query succeeds");
        assert!(none.is_none());
    }
}
