//! Core logic for drone formation shows: geometry, trajectory generation,
//! collision verification and formation planning.

pub mod collision;
pub mod error;
pub mod geometry;
pub mod models;
pub mod planner;
pub mod shapes;
pub mod trajectory;

pub use collision::{CollisionReport, CollisionVerifier, SegmentConflict};
pub use error::PlanError;
pub use geometry::{interpolate, segments_intersect, Point};
pub use models::{DroneId, DroneState, DroneStatus, Telemetry, Vec3};
pub use planner::{plan_formation, Assignment, AssignmentStrategy, ShowPlan};
pub use shapes::{ControlPoint, ShapeTemplate};
pub use trajectory::{PathSegment, Trajectory};
