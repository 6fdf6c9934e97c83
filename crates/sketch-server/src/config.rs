//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Step density used when a planning request does not supply one.
    pub default_steps: u32,
    /// Seconds of telemetry silence before a drone is marked unavailable.
    pub drone_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SKETCH_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            default_steps: env::var("SKETCH_DEFAULT_STEPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8),
            drone_timeout_secs: env::var("SKETCH_DRONE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_steps: 8,
            drone_timeout_secs: 10,
        }
    }
}
