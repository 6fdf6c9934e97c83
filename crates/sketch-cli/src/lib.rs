//! Fleet simulation tools for the formation show server.
//!
//! Provides a dummy fleet that registers drones and streams plausible
//! telemetry, for exercising the server without hardware.

pub mod sim;

pub use sim::{circle_positions, FleetClient, SimDrone};
