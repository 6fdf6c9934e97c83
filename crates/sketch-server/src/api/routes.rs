//! REST API routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::state::{AppState, RegisterOutcome, StoreError};
use sketch_core::planner::AssignmentStrategy;
use sketch_core::{DroneId, DroneState, PlanError, Telemetry};

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/drones/register", post(register_drone))
        .route("/v1/drones", get(list_drones))
        .route("/v1/drones/:drone_id", get(get_drone))
        .route("/v1/drones/:drone_id/launch", post(launch_drone))
        .route("/v1/drones/:drone_id/complete", post(complete_mission))
        .route("/v1/drones/:drone_id/release", post(release_drone))
        .route("/v1/drones/:drone_id/fault", post(report_fault))
        .route("/v1/telemetry", post(receive_telemetry))
        .route("/v1/shapes", get(list_shapes))
        .route("/v1/plan", post(plan_show))
}

// === Request/Response types ===

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub drone_id: Option<DroneId>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub shape: String,
    pub drone_ids: Vec<DroneId>,
    /// Sub-segments per control-point pair; defaults to the server config.
    pub steps: Option<u32>,
    #[serde(default)]
    pub strategy: AssignmentStrategy,
}

#[derive(Debug, Serialize)]
pub struct ShapeSummary {
    pub name: String,
    pub strokes: usize,
    pub control_points: usize,
}

// === Handlers ===

async fn register_drone(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.register_drone(req.drone_id) {
        RegisterOutcome::Registered(drone_id) => {
            tracing::info!("Registered drone {}", drone_id);
            (
                StatusCode::CREATED,
                Json(json!({ "drone_id": drone_id })),
            )
        }
        RegisterOutcome::AlreadyRegistered(drone_id) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Drone already registered",
                "hint": "Use a different drone_id or omit it for auto-assignment",
                "drone_id": drone_id,
            })),
        ),
    }
}

async fn list_drones(State(state): State<Arc<AppState>>) -> Json<Vec<DroneState>> {
    Json(state.store.get_all_drones())
}

async fn get_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<DroneId>,
) -> Result<Json<DroneState>, StatusCode> {
    state
        .store
        .get_drone(drone_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn receive_telemetry(
    State(state): State<Arc<AppState>>,
    Json(telemetry): Json<Telemetry>,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Err(reason) = validate_telemetry(&telemetry) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": reason })),
        );
    }
    if !state.store.update_telemetry(&telemetry) {
        tracing::warn!(
            "Discarding telemetry for unregistered drone {}",
            telemetry.drone_id
        );
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Unknown drone",
                "drone_id": telemetry.drone_id,
            })),
        );
    }
    (StatusCode::ACCEPTED, Json(json!({})))
}

fn validate_telemetry(telemetry: &Telemetry) -> Result<(), String> {
    if !telemetry.battery_pct.is_finite()
        || telemetry.battery_pct < 0.0
        || telemetry.battery_pct > 100.0
    {
        return Err(format!(
            "battery_pct out of range: {}",
            telemetry.battery_pct
        ));
    }
    let components = [
        telemetry.position.x,
        telemetry.position.y,
        telemetry.position.z,
        telemetry.velocity.x,
        telemetry.velocity.y,
        telemetry.velocity.z,
    ];
    if components.iter().any(|c| !c.is_finite()) {
        return Err("position/velocity must be finite".to_string());
    }
    if telemetry.timestamp > Utc::now() + chrono::Duration::minutes(5) {
        return Err("timestamp is in the future".to_string());
    }
    Ok(())
}

async fn list_shapes(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let shapes: Vec<ShapeSummary> = state
        .catalog
        .shapes()
        .iter()
        .map(|s| ShapeSummary {
            name: s.name.clone(),
            strokes: s.stroke_count(),
            control_points: s.points.len(),
        })
        .collect();
    Json(json!({
        "shapes": shapes,
        "groups": state.catalog.groups(),
    }))
}

async fn plan_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(shape) = state.catalog.get(&req.shape) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Unknown shape",
                "shape": req.shape,
            })),
        );
    };

    let steps = req.steps.unwrap_or(state.store.config().default_steps);
    match state
        .store
        .plan_formation(shape, &req.drone_ids, steps, req.strategy)
    {
        Ok(committed) => {
            let body = match serde_json::to_value(&committed) {
                Ok(body) => body,
                Err(err) => {
                    tracing::error!("Failed to serialize plan: {}", err);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "Failed to serialize plan" })),
                    );
                }
            };
            (StatusCode::CREATED, Json(body))
        }
        Err(err) => plan_error_response(err),
    }
}

fn plan_error_response(err: PlanError) -> (StatusCode, Json<serde_json::Value>) {
    match err {
        PlanError::InvalidArgument(reason) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": reason })),
        ),
        PlanError::InsufficientFleet {
            required,
            available,
        } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Insufficient fleet",
                "hint": "Free up drones or pick a shape with fewer strokes",
                "required": required,
                "available": available,
            })),
        ),
        PlanError::CollisionDetected(report) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Collision detected",
                "hint": "Adjust step density or reassign drones",
                "conflicts": report.conflicts,
            })),
        ),
        PlanError::StaleAvailability { drone_id } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Stale availability",
                "hint": "Retry the planning request",
                "drone_id": drone_id,
            })),
        ),
    }
}

async fn launch_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<DroneId>,
) -> (StatusCode, Json<serde_json::Value>) {
    transition_response(state.store.mark_in_flight(drone_id))
}

async fn complete_mission(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<DroneId>,
) -> (StatusCode, Json<serde_json::Value>) {
    transition_response(state.store.complete_mission(drone_id))
}

async fn release_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<DroneId>,
) -> (StatusCode, Json<serde_json::Value>) {
    transition_response(state.store.release(drone_id))
}

async fn report_fault(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<DroneId>,
) -> (StatusCode, Json<serde_json::Value>) {
    transition_response(state.store.mark_unavailable(drone_id))
}

fn transition_response(
    result: Result<DroneState, StoreError>,
) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(drone) => {
            let body = serde_json::to_value(&drone).unwrap_or_else(|_| json!({}));
            (StatusCode::OK, Json(body))
        }
        Err(StoreError::UnknownDrone(drone_id)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Unknown drone",
                "drone_id": drone_id,
            })),
        ),
        Err(err @ StoreError::IllegalTransition { .. }) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}
