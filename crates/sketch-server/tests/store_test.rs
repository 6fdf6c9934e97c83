//! Fleet store transaction tests.
//!
//! Exercises the planning transaction end-to-end against the in-memory
//! store: commit, rejection without mutation, serialization of concurrent
//! planning attempts, and telemetry-timeout expiry.

use chrono::{Duration, Utc};
use std::sync::Arc;
use std::thread;

use sketch_core::planner::AssignmentStrategy;
use sketch_core::{ControlPoint, DroneStatus, PlanError, ShapeTemplate, Telemetry, Vec3};
use sketch_server::config::Config;
use sketch_server::state::FleetStore;

fn two_stroke_shape() -> ShapeTemplate {
    ShapeTemplate::new(
        "bars",
        vec![
            ControlPoint::draw(0.0, 0.0),
            ControlPoint::lift(0.0, 5.0),
            ControlPoint::draw(10.0, 0.0),
            ControlPoint::draw(10.0, 5.0),
        ],
    )
}

fn crossing_shape() -> ShapeTemplate {
    ShapeTemplate::new(
        "cross",
        vec![
            ControlPoint::draw(0.0, 0.0),
            ControlPoint::lift(10.0, 0.0),
            ControlPoint::draw(5.0, -5.0),
            ControlPoint::draw(5.0, 5.0),
        ],
    )
}

fn store_with_available_drones(ids: &[u32]) -> FleetStore {
    let store = FleetStore::new(Config::default());
    for &drone_id in ids {
        store.register_drone(Some(drone_id));
        store.update_telemetry(&Telemetry {
            drone_id,
            battery_pct: 95.0,
            position: Vec3::new(f64::from(drone_id), 0.0, 1.3),
            velocity: Vec3::default(),
            timestamp: Utc::now(),
        });
    }
    store
}

#[test]
fn plan_commits_both_drones() {
    let store = store_with_available_drones(&[1, 2]);
    let committed = store
        .plan_formation(&two_stroke_shape(), &[1, 2], 4, AssignmentStrategy::ById)
        .expect("clean plan commits");

    assert_eq!(committed.plan.assignments.len(), 2);
    for drone_id in [1, 2] {
        let drone = store.get_drone(drone_id).unwrap();
        assert_eq!(drone.status, DroneStatus::Assigned);
        // Two control points per stroke at density 4
        assert_eq!(drone.path.len(), 5);
    }
}

#[test]
fn rejected_plan_leaves_fleet_untouched() {
    let store = store_with_available_drones(&[1, 2]);
    let err = store
        .plan_formation(&crossing_shape(), &[1, 2], 1, AssignmentStrategy::ById)
        .unwrap_err();

    let PlanError::CollisionDetected(report) = err else {
        panic!("expected collision, got {err:?}");
    };
    assert_eq!(report.conflicts.len(), 1);

    for drone_id in [1, 2] {
        let drone = store.get_drone(drone_id).unwrap();
        assert_eq!(drone.status, DroneStatus::Available);
        assert!(drone.path.is_empty());
    }
}

#[test]
fn concurrent_plans_never_double_assign() {
    let store = Arc::new(store_with_available_drones(&[1, 2]));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                store.plan_formation(
                    &two_stroke_shape(),
                    &[1, 2],
                    4,
                    AssignmentStrategy::ById,
                )
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("planner thread"))
        .collect();

    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1, "exactly one transaction may commit");

    // The losing transaction saw the winner's commit and assigned nothing
    for drone_id in [1, 2] {
        assert_eq!(
            store.get_drone(drone_id).unwrap().status,
            DroneStatus::Assigned
        );
    }
}

#[test]
fn telemetry_timeout_expires_assignment() {
    let store = store_with_available_drones(&[1]);
    let shape = ShapeTemplate::new(
        "segment",
        vec![ControlPoint::draw(0.0, 0.0), ControlPoint::draw(0.0, 5.0)],
    );
    store
        .plan_formation(&shape, &[1], 2, AssignmentStrategy::ById)
        .expect("plan commits");
    assert_eq!(store.get_drone(1).unwrap().status, DroneStatus::Assigned);

    // Nothing expires while telemetry is fresh
    assert!(store.expire_stale(Utc::now()).is_empty());

    let timeout = Config::default().drone_timeout_secs as i64;
    let expired = store.expire_stale(Utc::now() + Duration::seconds(timeout + 1));
    assert_eq!(expired, vec![1]);

    let drone = store.get_drone(1).unwrap();
    assert_eq!(drone.status, DroneStatus::Unavailable);
    assert!(drone.path.is_empty());
}

#[test]
fn release_returns_drone_to_available() {
    let store = store_with_available_drones(&[1]);
    let shape = ShapeTemplate::new(
        "segment",
        vec![ControlPoint::draw(0.0, 0.0), ControlPoint::draw(0.0, 5.0)],
    );
    store
        .plan_formation(&shape, &[1], 2, AssignmentStrategy::ById)
        .expect("plan commits");

    let drone = store.release(1).expect("release assigned drone");
    assert_eq!(drone.status, DroneStatus::Available);
    assert!(drone.path.is_empty());

    // A released drone can be planned again
    store
        .plan_formation(&shape, &[1], 2, AssignmentStrategy::ById)
        .expect("replan after release");
}

#[test]
fn unregistered_candidate_is_invalid() {
    let store = store_with_available_drones(&[1]);
    let err = store
        .plan_formation(&two_stroke_shape(), &[1, 99], 2, AssignmentStrategy::ById)
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidArgument(_)));
    assert_eq!(store.get_drone(1).unwrap().status, DroneStatus::Available);
}
