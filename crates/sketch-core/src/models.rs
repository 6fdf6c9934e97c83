//! Fleet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Fleet-wide unique drone identity, assigned at registration and never
/// reused while the drone is registered.
pub type DroneId = u32;

/// 3-D vector for tracked drone position and velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the 2-D show plane.
    pub fn plane(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DroneStatus {
    /// Registered but never heard from
    #[default]
    Unknown,
    /// Ready for assignment
    Available,
    /// Out of service (fault or telemetry loss)
    Unavailable,
    /// Holds a committed path, not yet airborne
    Assigned,
    /// Flying its assigned path
    InFlight,
}

/// Telemetry report received from a drone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    pub drone_id: DroneId,
    pub battery_pct: f64,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    pub timestamp: DateTime<Utc>,
}

/// Current state of a registered fleet member.
///
/// Two independent writers share this record: the planner owns status and
/// path, telemetry ingestion owns battery, position and velocity. The path
/// is non-empty only while the drone is assigned or in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneState {
    pub drone_id: DroneId,
    pub status: DroneStatus,
    pub battery_pct: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub last_update: DateTime<Utc>,
    pub path: Vec<Point>,
}

impl DroneState {
    /// Create a freshly registered drone with no telemetry yet.
    pub fn new(drone_id: DroneId) -> Self {
        Self {
            drone_id,
            status: DroneStatus::Unknown,
            battery_pct: 0.0,
            position: Vec3::default(),
            velocity: Vec3::default(),
            last_update: Utc::now(),
            path: Vec::new(),
        }
    }

    /// Apply a telemetry report.
    ///
    /// Touches only the telemetry-owned fields; the first report promotes an
    /// Unknown drone to Available.
    pub fn apply_telemetry(&mut self, telemetry: &Telemetry) {
        self.battery_pct = telemetry.battery_pct.clamp(0.0, 100.0);
        self.position = telemetry.position;
        self.velocity = telemetry.velocity;
        self.last_update = telemetry.timestamp;
        if self.status == DroneStatus::Unknown {
            self.status = DroneStatus::Available;
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == DroneStatus::Available
    }

    /// Commit a planned path: Available -> Assigned.
    pub fn assign(&mut self, path: Vec<Point>) {
        self.status = DroneStatus::Assigned;
        self.path = path;
    }

    /// Leave the assigned/in-flight states, clearing the path with the
    /// status in one step.
    pub fn clear_assignment(&mut self, status: DroneStatus) {
        self.status = status;
        self.path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(drone_id: DroneId, battery_pct: f64) -> Telemetry {
        Telemetry {
            drone_id,
            battery_pct,
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::new(0.1, 0.0, -0.1),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn first_telemetry_promotes_unknown_to_available() {
        let mut drone = DroneState::new(1);
        assert_eq!(drone.status, DroneStatus::Unknown);

        drone.apply_telemetry(&telemetry(1, 80.0));
        assert_eq!(drone.status, DroneStatus::Available);
        assert_eq!(drone.battery_pct, 80.0);
        assert_eq!(drone.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn telemetry_never_touches_status_or_path() {
        let mut drone = DroneState::new(2);
        drone.apply_telemetry(&telemetry(2, 90.0));
        drone.assign(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);

        drone.apply_telemetry(&telemetry(2, 85.0));
        assert_eq!(drone.status, DroneStatus::Assigned);
        assert_eq!(drone.path.len(), 2);
    }

    #[test]
    fn battery_is_clamped() {
        let mut drone = DroneState::new(3);
        drone.apply_telemetry(&telemetry(3, 140.0));
        assert_eq!(drone.battery_pct, 100.0);
        drone.apply_telemetry(&telemetry(3, -5.0));
        assert_eq!(drone.battery_pct, 0.0);
    }

    #[test]
    fn clearing_assignment_clears_path() {
        let mut drone = DroneState::new(4);
        drone.apply_telemetry(&telemetry(4, 70.0));
        drone.assign(vec![Point::new(0.0, 0.0)]);

        drone.clear_assignment(DroneStatus::Available);
        assert_eq!(drone.status, DroneStatus::Available);
        assert!(drone.path.is_empty());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&DroneStatus::InFlight).unwrap();
        assert_eq!(json, "\"in-flight\"");
    }
}
