use std::time::Duration;

use thiserror::Error;

/// Convenient result alias for the airport navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An unreachable destination is not an error; the service reports it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a start or end waypoint is not a node of the current graph.
    #[error("waypoint '{id}' not found in graph")]
    NodeNotFound { id: String },

    /// Raised when a GPS position cannot be matched to any waypoint.
    #[error("no waypoint within {max_distance_m} m of ({lat}, {lon})")]
    NoNearbyWaypoint {
        lat: f64,
        lon: f64,
        max_distance_m: f64,
    },

    /// Raised when the waypoint repository call fails.
    #[error("waypoint repository failure: {0}")]
    Repository(#[from] RepositoryError),

    /// Raised when the waypoint repository does not answer within the bound.
    #[error("waypoint repository call {operation} timed out after {timeout:?}")]
    RepositoryTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Raised when the platform offers no per-user data directory.
    #[error("unable to determine a data directory for the default database")]
    ProjectDirsUnavailable,

    /// Raised when an environment override cannot be parsed.
    #[error("invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
}

/// Failures surfaced by [`crate::repository::WaypointRepository`] implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Raised when a waypoint's metadata column does not hold valid JSON.
    #[error("invalid metadata for waypoint {id}: {source}")]
    Metadata {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a blocking repository task panicked or was cancelled.
    #[error("repository task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Raised when a stored value cannot be represented in the data model.
    #[error("invalid stored value in {column}: {value}")]
    InvalidValue { column: &'static str, value: String },
}
