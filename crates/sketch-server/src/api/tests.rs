use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn setup_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default()));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn telemetry_body(drone_id: u32, x: f64, y: f64) -> Value {
    json!({
        "drone_id": drone_id,
        "battery_pct": 88.0,
        "position": { "x": x, "y": y, "z": 1.3 },
        "velocity": { "x": 0.0, "y": 0.0, "z": 0.0 },
        "timestamp": Utc::now().to_rfc3339(),
    })
}

#[tokio::test]
async fn register_and_send_telemetry() {
    let (app, _state) = setup_app();

    let register_res = app
        .clone()
        .oneshot(post_json("/v1/drones/register", json!({})))
        .await
        .unwrap();
    assert_eq!(register_res.status(), StatusCode::CREATED);
    let register_body = read_json(register_res).await;
    let drone_id = register_body["drone_id"].as_u64().expect("drone id") as u32;

    let telemetry_res = app
        .clone()
        .oneshot(post_json("/v1/telemetry", telemetry_body(drone_id, 0.5, 1.0)))
        .await
        .unwrap();
    assert_eq!(telemetry_res.status(), StatusCode::ACCEPTED);

    let list_res = app.clone().oneshot(get("/v1/drones")).await.unwrap();
    assert_eq!(list_res.status(), StatusCode::OK);
    let drones = read_json(list_res).await;
    let drone = drones
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["drone_id"].as_u64() == Some(u64::from(drone_id)))
        .expect("registered drone listed");
    assert_eq!(drone["status"], "available");
    assert_eq!(drone["battery_pct"], 88.0);
}

#[tokio::test]
async fn telemetry_for_unknown_drone_is_discarded() {
    let (app, state) = setup_app();

    let res = app
        .oneshot(post_json("/v1/telemetry", telemetry_body(999, 0.0, 0.0)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.store.drone_count(), 0);
}

#[tokio::test]
async fn out_of_range_telemetry_is_rejected() {
    let (app, _state) = setup_app();

    app.clone()
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 1 })))
        .await
        .unwrap();

    let mut body = telemetry_body(1, 0.0, 0.0);
    body["battery_pct"] = json!(140.0);
    let res = app
        .oneshot(post_json("/v1/telemetry", body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let (app, _state) = setup_app();

    let first = app
        .clone()
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 4 })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 4 })))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_shapes_includes_groups() {
    let (app, _state) = setup_app();

    let res = app.oneshot(get("/v1/shapes")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["shapes"].as_array().unwrap().len(), 7);
    assert_eq!(body["groups"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn plan_commits_single_stroke_shape() {
    let (app, state) = setup_app();

    app.clone()
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 1 })))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/v1/telemetry", telemetry_body(1, 0.0, 1.25)))
        .await
        .unwrap();

    let res = app
        .clone()
        .oneshot(post_json(
            "/v1/plan",
            json!({ "shape": "Line", "drone_ids": [1], "steps": 4 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["shape"], "Line");
    assert_eq!(body["assignments"].as_array().unwrap().len(), 1);

    // 5 control points in one stroke at density 4: (5 - 1) * 4 + 1 waypoints
    let drone = state.store.get_drone(1).unwrap();
    assert_eq!(drone.status, sketch_core::DroneStatus::Assigned);
    assert_eq!(drone.path.len(), 17);
}

#[tokio::test]
async fn plan_with_insufficient_fleet_is_rejected() {
    let (app, state) = setup_app();

    app.clone()
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 1 })))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/v1/telemetry", telemetry_body(1, 0.0, 0.0)))
        .await
        .unwrap();

    // The circle outline splits into four strokes
    let res = app
        .clone()
        .oneshot(post_json(
            "/v1/plan",
            json!({ "shape": "Circle", "drone_ids": [1] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = read_json(res).await;
    assert_eq!(body["required"], 4);
    assert_eq!(body["available"], 1);

    let drone = state.store.get_drone(1).unwrap();
    assert_eq!(drone.status, sketch_core::DroneStatus::Available);
    assert!(drone.path.is_empty());
}

#[tokio::test]
async fn plan_with_unknown_shape_is_not_found() {
    let (app, _state) = setup_app();

    let res = app
        .oneshot(post_json(
            "/v1/plan",
            json!({ "shape": "Pentagon", "drone_ids": [1] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mission_lifecycle_transitions() {
    let (app, state) = setup_app();

    app.clone()
        .oneshot(post_json("/v1/drones/register", json!({ "drone_id": 1 })))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/v1/telemetry", telemetry_body(1, 0.0, 1.25)))
        .await
        .unwrap();

    // Launch before assignment is illegal
    let premature = app
        .clone()
        .oneshot(post_json("/v1/drones/1/launch", json!({})))
        .await
        .unwrap();
    assert_eq!(premature.status(), StatusCode::CONFLICT);

    app.clone()
        .oneshot(post_json(
            "/v1/plan",
            json!({ "shape": "Line", "drone_ids": [1] }),
        ))
        .await
        .unwrap();

    let launch = app
        .clone()
        .oneshot(post_json("/v1/drones/1/launch", json!({})))
        .await
        .unwrap();
    assert_eq!(launch.status(), StatusCode::OK);
    assert_eq!(
        state.store.get_drone(1).unwrap().status,
        sketch_core::DroneStatus::InFlight
    );

    let complete = app
        .clone()
        .oneshot(post_json("/v1/drones/1/complete", json!({})))
        .await
        .unwrap();
    assert_eq!(complete.status(), StatusCode::OK);
    let drone = state.store.get_drone(1).unwrap();
    assert_eq!(drone.status, sketch_core::DroneStatus::Available);
    assert!(drone.path.is_empty());
}
