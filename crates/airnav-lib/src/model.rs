//! Waypoint and connection records as supplied by the waypoint repository.
//!
//! Both types mirror the `waypoints` and `waypoint_connections` tables. The
//! core never mutates them; identity of a waypoint is its `id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a navigable node (gate, counter, corridor junction, ...).
pub type WaypointId = String;

/// Classification of a waypoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WaypointType {
    Gate,
    Counter,
    Corridor,
    Facility,
    Elevator,
    Escalator,
    Stairs,
    Entrance,
    /// Any type label not known to this crate, preserved verbatim.
    Other(String),
}

impl WaypointType {
    pub fn as_str(&self) -> &str {
        match self {
            WaypointType::Gate => "GATE",
            WaypointType::Counter => "COUNTER",
            WaypointType::Corridor => "CORRIDOR",
            WaypointType::Facility => "FACILITY",
            WaypointType::Elevator => "ELEVATOR",
            WaypointType::Escalator => "ESCALATOR",
            WaypointType::Stairs => "STAIRS",
            WaypointType::Entrance => "ENTRANCE",
            WaypointType::Other(label) => label,
        }
    }
}

impl From<String> for WaypointType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "GATE" => WaypointType::Gate,
            "COUNTER" => WaypointType::Counter,
            "CORRIDOR" => WaypointType::Corridor,
            "FACILITY" => WaypointType::Facility,
            "ELEVATOR" => WaypointType::Elevator,
            "ESCALATOR" => WaypointType::Escalator,
            "STAIRS" => WaypointType::Stairs,
            "ENTRANCE" => WaypointType::Entrance,
            _ => WaypointType::Other(value),
        }
    }
}

impl From<WaypointType> for String {
    fn from(value: WaypointType) -> Self {
        match value {
            WaypointType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WaypointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a connection is traversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    #[default]
    Walk,
    Stairs,
    Elevator,
    Escalator,
    MovingWalkway,
    /// Any connection label not known to this crate, preserved verbatim.
    Other(String),
}

impl ConnectionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionType::Walk => "WALK",
            ConnectionType::Stairs => "STAIRS",
            ConnectionType::Elevator => "ELEVATOR",
            ConnectionType::Escalator => "ESCALATOR",
            ConnectionType::MovingWalkway => "MOVING_WALKWAY",
            ConnectionType::Other(label) => label,
        }
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "WALK" => ConnectionType::Walk,
            "STAIRS" => ConnectionType::Stairs,
            "ELEVATOR" => ConnectionType::Elevator,
            "ESCALATOR" => ConnectionType::Escalator,
            "MOVING_WALKWAY" => ConnectionType::MovingWalkway,
            _ => ConnectionType::Other(value),
        }
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        match value {
            ConnectionType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigable node in the airport topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub terminal_id: String,
    pub floor_number: i32,
    #[serde(rename = "type")]
    pub kind: WaypointType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub map_x: f64,
    pub map_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_lon: Option<f64>,
    /// Free-form attributes such as gate number or counter zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub is_accessible: bool,
}

impl Waypoint {
    /// Create an accessible waypoint at the map origin with no names or GPS fix.
    pub fn new(id: impl Into<WaypointId>, terminal_id: impl Into<String>, kind: WaypointType) -> Self {
        Self {
            id: id.into(),
            terminal_id: terminal_id.into(),
            floor_number: 1,
            kind,
            name_ko: None,
            name_en: None,
            map_x: 0.0,
            map_y: 0.0,
            gps_lat: None,
            gps_lon: None,
            metadata: None,
            is_accessible: true,
        }
    }

    /// Latitude/longitude pair when both halves are present.
    pub fn gps_position(&self) -> Option<(f64, f64)> {
        self.gps_lat.zip(self.gps_lon)
    }

    /// Preferred label for display: English name, Korean name, then the id.
    pub fn display_name(&self) -> &str {
        self.name_en
            .as_deref()
            .or(self.name_ko.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A directed, weighted traversal option between two waypoints.
///
/// Bidirectional movement requires two records; the data source owns that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_waypoint_id: WaypointId,
    pub to_waypoint_id: WaypointId,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub walking_time_seconds: Option<f64>,
    #[serde(default)]
    pub connection_type: ConnectionType,
    pub is_accessible: bool,
}

impl Connection {
    /// Accessible walking connection with the given distance.
    pub fn new(
        from: impl Into<WaypointId>,
        to: impl Into<WaypointId>,
        distance_meters: f64,
    ) -> Self {
        Self {
            from_waypoint_id: from.into(),
            to_waypoint_id: to.into(),
            distance_meters: Some(distance_meters),
            walking_time_seconds: None,
            connection_type: ConnectionType::Walk,
            is_accessible: true,
        }
    }

    pub fn with_walking_time(mut self, seconds: f64) -> Self {
        self.walking_time_seconds = Some(seconds);
        self
    }

    pub fn with_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    pub fn with_accessible(mut self, is_accessible: bool) -> Self {
        self.is_accessible = is_accessible;
        self
    }
}
