//! Formation planning: map available drones to shape strokes, build their
//! trajectories and verify the combined plan.
//!
//! This is the pure half of the coordinator. It operates on a snapshot of
//! drone states and mutates nothing; committing a plan against live fleet
//! state is the owning store's job.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::collision::CollisionVerifier;
use crate::error::PlanError;
use crate::models::{DroneId, DroneState};
use crate::shapes::ShapeTemplate;
use crate::trajectory::Trajectory;

/// Drone-to-stroke mapping policy. Every strategy is deterministic for
/// identical input, keeping planning reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Ascending drone id order
    #[default]
    ById,
    /// Candidate order as given
    RoundRobin,
    /// Greedy: each stroke takes the closest unassigned drone, ties broken
    /// by lower id
    Nearest,
}

/// One drone's share of a planned show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub drone_id: DroneId,
    pub stroke_index: usize,
    pub trajectory: Trajectory,
}

/// A verified, collision-free formation plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowPlan {
    pub shape: String,
    pub steps: u32,
    pub assignments: Vec<Assignment>,
}

/// Plan a formation for `shape` over the candidate drones.
///
/// Only candidates with status Available are considered. Each stroke goes
/// to exactly one drone per the strategy; trajectories are densified at
/// `steps` sub-segments per control-point pair and the whole set is
/// collision-verified before the plan is returned. Nothing is mutated.
pub fn plan_formation(
    shape: &ShapeTemplate,
    candidates: &[DroneState],
    steps: u32,
    strategy: AssignmentStrategy,
) -> Result<ShowPlan, PlanError> {
    if steps == 0 {
        return Err(PlanError::InvalidArgument(
            "step density must be positive".to_string(),
        ));
    }

    let strokes = shape.strokes();
    if strokes.is_empty() {
        return Err(PlanError::InvalidArgument(format!(
            "shape '{}' has no strokes",
            shape.name
        )));
    }

    let available: Vec<&DroneState> = candidates.iter().filter(|d| d.is_available()).collect();
    if available.is_empty() {
        return Err(PlanError::InvalidArgument(format!(
            "no available drones among {} candidate(s)",
            candidates.len()
        )));
    }
    if available.len() < strokes.len() {
        return Err(PlanError::InsufficientFleet {
            required: strokes.len(),
            available: available.len(),
        });
    }

    let order = assignment_order(&strokes, &available, strategy);

    let mut assignments = Vec::with_capacity(strokes.len());
    for (stroke_index, drone_id) in order {
        let trajectory =
            Trajectory::build(drone_id, std::slice::from_ref(&strokes[stroke_index]), steps)?;
        assignments.push(Assignment {
            drone_id,
            stroke_index,
            trajectory,
        });
    }

    let trajectories: Vec<Trajectory> = assignments
        .iter()
        .map(|a| a.trajectory.clone())
        .collect();
    let report = CollisionVerifier::default().verify(&trajectories);
    if !report.is_clear() {
        return Err(PlanError::CollisionDetected(report));
    }

    Ok(ShowPlan {
        shape: shape.name.clone(),
        steps,
        assignments,
    })
}

/// Resolve the drone for each stroke index.
fn assignment_order(
    strokes: &[Vec<crate::geometry::Point>],
    available: &[&DroneState],
    strategy: AssignmentStrategy,
) -> Vec<(usize, DroneId)> {
    match strategy {
        AssignmentStrategy::ById => {
            let mut ordered: Vec<&DroneState> = available.to_vec();
            ordered.sort_by_key(|d| d.drone_id);
            (0..strokes.len())
                .map(|i| (i, ordered[i].drone_id))
                .collect()
        }
        AssignmentStrategy::RoundRobin => (0..strokes.len())
            .map(|i| (i, available[i % available.len()].drone_id))
            .collect(),
        AssignmentStrategy::Nearest => {
            let mut remaining: Vec<&DroneState> = available.to_vec();
            let mut order = Vec::with_capacity(strokes.len());
            for (i, stroke) in strokes.iter().enumerate() {
                let anchor = stroke.first().copied().unwrap_or_default();
                let best = remaining
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| {
                        let da = a.position.plane().distance(anchor);
                        let db = b.position.plane().distance(anchor);
                        da.partial_cmp(&db)
                            .unwrap_or(Ordering::Equal)
                            .then(a.drone_id.cmp(&b.drone_id))
                    })
                    .map(|(idx, _)| idx);
                if let Some(idx) = best {
                    order.push((i, remaining.swap_remove(idx).drone_id));
                }
            }
            order
        }
    }
}
