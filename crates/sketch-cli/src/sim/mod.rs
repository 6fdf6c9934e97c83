//! Simulation module for fleet telemetry.

mod client;
mod fleet;

pub use client::FleetClient;
pub use fleet::{circle_positions, SimDrone};
