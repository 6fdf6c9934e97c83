//! HTTP client for the formation show server.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;

use sketch_core::{DroneId, Telemetry};

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    drone_id: DroneId,
}

/// Client for registering drones and streaming telemetry.
pub struct FleetClient {
    client: reqwest::Client,
    base_url: String,
}

impl FleetClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Register a drone, letting the server allocate an id when none is
    /// given. Returns the registered id.
    pub async fn register(&self, drone_id: Option<DroneId>) -> Result<DroneId> {
        let url = format!("{}/v1/drones/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "drone_id": drone_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("registration failed with status {status}"));
        }
        let body: RegisterResponse = response.json().await?;
        Ok(body.drone_id)
    }

    /// Send one telemetry report.
    pub async fn send_telemetry(&self, telemetry: &Telemetry) -> Result<()> {
        let url = format!("{}/v1/telemetry", self.base_url);
        let response = self.client.post(&url).json(telemetry).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "telemetry for drone {} rejected with status {status}",
                telemetry.drone_id
            ));
        }
        Ok(())
    }

    /// Report a fault, taking the drone out of service.
    pub async fn report_fault(&self, drone_id: DroneId) -> Result<()> {
        let url = format!("{}/v1/drones/{drone_id}/fault", self.base_url);
        let response = self.client.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("fault report rejected with status {status}"));
        }
        Ok(())
    }
}
