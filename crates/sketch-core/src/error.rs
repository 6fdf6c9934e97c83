//! Error taxonomy for the planning core.
//!
//! Every variant is a recoverable, caller-facing decision. Degenerate
//! geometry (coincident points, zero-length segments) is defined behavior
//! and never surfaces here.

use thiserror::Error;

use crate::collision::CollisionReport;
use crate::models::DroneId;

#[derive(Debug, Clone, Error)]
pub enum PlanError {
    /// Malformed planning input: zero step density, empty shape, or an
    /// unusable candidate set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Fewer available drones than the shape has strokes. Surfaced before
    /// any trajectory is built.
    #[error("insufficient fleet: shape needs {required} drone(s), {available} available")]
    InsufficientFleet { required: usize, available: usize },

    /// Verification found conflicting segment pairs. Carries the full
    /// report; no drone state was mutated.
    #[error("collision detected: {} conflicting segment pair(s)", .0.conflicts.len())]
    CollisionDetected(CollisionReport),

    /// The availability snapshot used for assignment was invalidated before
    /// commit. The transaction aborted without mutating any drone.
    #[error("stale availability: drone {drone_id} changed state before commit")]
    StaleAvailability { drone_id: DroneId },
}
