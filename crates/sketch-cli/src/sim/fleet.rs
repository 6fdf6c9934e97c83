//! Simulated fleet members.

use chrono::Utc;
use rand::Rng;
use std::f64::consts::PI;

use sketch_core::{DroneId, Telemetry, Vec3};

/// Per-tick battery drain in percent.
const BATTERY_DRAIN_PCT: f64 = 0.05;
/// Hover jitter amplitude in show-plane units.
const JITTER: f64 = 0.02;

/// Evenly space `count` holding positions on a vertical-plane circle
/// around `center`.
pub fn circle_positions(count: usize, center: Vec3, radius: f64) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / count as f64;
            Vec3::new(
                center.x,
                center.y + radius * angle.cos(),
                center.z + radius * angle.sin(),
            )
        })
        .collect()
}

/// One simulated drone hovering at its holding position.
pub struct SimDrone {
    pub drone_id: DroneId,
    pub home: Vec3,
    pub battery_pct: f64,
}

impl SimDrone {
    pub fn new(drone_id: DroneId, home: Vec3) -> Self {
        Self {
            drone_id,
            home,
            battery_pct: 100.0,
        }
    }

    /// Produce the next telemetry report: hover jitter around the holding
    /// position plus steady battery drain.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Telemetry {
        self.battery_pct = (self.battery_pct - BATTERY_DRAIN_PCT).max(0.0);

        let position = Vec3::new(
            self.home.x + rng.random_range(-JITTER..JITTER),
            self.home.y + rng.random_range(-JITTER..JITTER),
            self.home.z + rng.random_range(-JITTER..JITTER),
        );
        let velocity = Vec3::new(
            rng.random_range(-JITTER..JITTER),
            rng.random_range(-JITTER..JITTER),
            rng.random_range(-JITTER..JITTER),
        );

        Telemetry {
            drone_id: self.drone_id,
            battery_pct: self.battery_pct,
            position,
            velocity,
            timestamp: Utc::now(),
        }
    }
}
