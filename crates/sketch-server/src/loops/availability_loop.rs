//! Continuous availability monitoring loop.
//!
//! Runs in the background and marks drones unavailable once their
//! telemetry has been silent longer than the configured timeout, clearing
//! any assigned path in the same step.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::state::AppState;

/// Start the availability loop.
pub async fn run_availability_loop(state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        let expired = state.store.expire_stale(Utc::now());
        if expired.is_empty() {
            continue;
        }

        tracing::warn!(
            "Marked {} drone(s) unavailable after telemetry timeout",
            expired.len()
        );
        for drone_id in expired {
            tracing::warn!("  drone {} lost telemetry", drone_id);
        }
    }
}
