//! In-memory fleet store using DashMap.
//!
//! Two write paths share the drone records. Telemetry ingestion goes
//! through per-entry locking and only touches the telemetry-owned fields.
//! Every status/path writer serializes on the planning mutex, so a planning
//! transaction's availability snapshot can only be invalidated by another
//! status writer, which the versioned commit detects.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

use sketch_core::planner::{plan_formation, AssignmentStrategy, ShowPlan};
use sketch_core::{DroneId, DroneState, DroneStatus, PlanError, ShapeTemplate, Telemetry};

use crate::config::Config;

#[derive(Debug, Clone)]
struct DroneRecord {
    state: DroneState,
    /// Bumped on every status/path write; lets a commit detect that its
    /// availability snapshot went stale.
    version: u64,
}

/// A committed, dispatchable plan.
#[derive(Debug, Clone, Serialize)]
pub struct CommittedPlan {
    pub plan_id: String,
    pub committed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: ShowPlan,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown drone {0}")]
    UnknownDrone(DroneId),
    #[error("illegal transition for drone {drone_id}: {from:?} -> {to:?}")]
    IllegalTransition {
        drone_id: DroneId,
        from: DroneStatus,
        to: DroneStatus,
    },
}

pub enum RegisterOutcome {
    Registered(DroneId),
    AlreadyRegistered(DroneId),
}

/// Thread-safe store for the registered fleet.
pub struct FleetStore {
    drones: DashMap<DroneId, DroneRecord>,
    planning: Mutex<()>,
    drone_counter: AtomicU32,
    config: Config,
}

impl FleetStore {
    pub fn new(config: Config) -> Self {
        Self {
            drones: DashMap::new(),
            planning: Mutex::new(()),
            drone_counter: AtomicU32::new(1),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a drone, auto-allocating an id when none is requested.
    pub fn register_drone(&self, requested: Option<DroneId>) -> RegisterOutcome {
        let drone_id = requested.unwrap_or_else(|| self.next_drone_id());
        if self.drones.contains_key(&drone_id) {
            return RegisterOutcome::AlreadyRegistered(drone_id);
        }
        self.drones.insert(
            drone_id,
            DroneRecord {
                state: DroneState::new(drone_id),
                version: 0,
            },
        );
        RegisterOutcome::Registered(drone_id)
    }

    fn next_drone_id(&self) -> DroneId {
        loop {
            let candidate = self.drone_counter.fetch_add(1, Ordering::SeqCst);
            if !self.drones.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Apply a telemetry report. Returns false for an unregistered id so
    /// the API layer can discard and log it.
    pub fn update_telemetry(&self, telemetry: &Telemetry) -> bool {
        match self.drones.get_mut(&telemetry.drone_id) {
            Some(mut record) => {
                record.state.apply_telemetry(telemetry);
                true
            }
            None => false,
        }
    }

    pub fn get_drone(&self, drone_id: DroneId) -> Option<DroneState> {
        self.drones.get(&drone_id).map(|r| r.state.clone())
    }

    /// All drone states, id-ordered.
    pub fn get_all_drones(&self) -> Vec<DroneState> {
        let mut drones: Vec<DroneState> =
            self.drones.iter().map(|r| r.state.clone()).collect();
        drones.sort_by_key(|d| d.drone_id);
        drones
    }

    pub fn drone_count(&self) -> usize {
        self.drones.len()
    }

    /// Run one planning transaction: snapshot, plan, verify, commit.
    ///
    /// Holds the planning mutex for the whole transaction. Nothing is
    /// mutated until the commit phase, and the commit re-validates every
    /// assigned drone against the snapshot versions first, so a failed
    /// transaction leaves the fleet untouched.
    pub fn plan_formation(
        &self,
        shape: &ShapeTemplate,
        candidate_ids: &[DroneId],
        steps: u32,
        strategy: AssignmentStrategy,
    ) -> Result<CommittedPlan, PlanError> {
        let _guard = self
            .planning
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Availability snapshot
        let mut snapshot = Vec::with_capacity(candidate_ids.len());
        let mut versions = Vec::with_capacity(candidate_ids.len());
        for drone_id in candidate_ids {
            let Some(record) = self.drones.get(drone_id) else {
                return Err(PlanError::InvalidArgument(format!(
                    "unknown drone {drone_id}"
                )));
            };
            snapshot.push(record.state.clone());
            versions.push((*drone_id, record.version));
        }

        let plan = plan_formation(shape, &snapshot, steps, strategy)?;

        // Commit, phase 1: every assigned drone must still match the snapshot
        for assignment in &plan.assignments {
            let stale = match self.drones.get(&assignment.drone_id) {
                Some(record) => {
                    let snapshot_version = versions
                        .iter()
                        .find(|(id, _)| *id == assignment.drone_id)
                        .map(|(_, v)| *v);
                    !record.state.is_available() || Some(record.version) != snapshot_version
                }
                None => true,
            };
            if stale {
                return Err(PlanError::StaleAvailability {
                    drone_id: assignment.drone_id,
                });
            }
        }

        // Commit, phase 2: all-or-nothing write
        for assignment in &plan.assignments {
            if let Some(mut record) = self.drones.get_mut(&assignment.drone_id) {
                record.state.assign(assignment.trajectory.flatten());
                record.version += 1;
            }
        }

        let committed = CommittedPlan {
            plan_id: uuid::Uuid::new_v4().to_string(),
            committed_at: Utc::now(),
            plan,
        };
        tracing::info!(
            "Committed plan {} for shape '{}' across {} drone(s)",
            committed.plan_id,
            committed.plan.shape,
            committed.plan.assignments.len()
        );
        Ok(committed)
    }

    /// Assigned -> InFlight.
    pub fn mark_in_flight(&self, drone_id: DroneId) -> Result<DroneState, StoreError> {
        self.transition(drone_id, DroneStatus::InFlight, &[DroneStatus::Assigned], false)
    }

    /// Assigned/InFlight -> Available on mission complete; clears the path.
    pub fn complete_mission(&self, drone_id: DroneId) -> Result<DroneState, StoreError> {
        self.transition(
            drone_id,
            DroneStatus::Available,
            &[DroneStatus::Assigned, DroneStatus::InFlight],
            true,
        )
    }

    /// Assigned -> Available without flying; clears the path.
    pub fn release(&self, drone_id: DroneId) -> Result<DroneState, StoreError> {
        self.transition(
            drone_id,
            DroneStatus::Available,
            &[DroneStatus::Assigned],
            true,
        )
    }

    /// Any state -> Unavailable on fault; clears the path.
    pub fn mark_unavailable(&self, drone_id: DroneId) -> Result<DroneState, StoreError> {
        self.transition(drone_id, DroneStatus::Unavailable, &[], true)
    }

    fn transition(
        &self,
        drone_id: DroneId,
        to: DroneStatus,
        allowed_from: &[DroneStatus],
        clears_path: bool,
    ) -> Result<DroneState, StoreError> {
        let _guard = self
            .planning
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut record = self
            .drones
            .get_mut(&drone_id)
            .ok_or(StoreError::UnknownDrone(drone_id))?;

        let from = record.state.status;
        if !allowed_from.is_empty() && !allowed_from.contains(&from) {
            return Err(StoreError::IllegalTransition { drone_id, from, to });
        }

        if clears_path {
            record.state.clear_assignment(to);
        } else {
            record.state.status = to;
        }
        record.version += 1;
        Ok(record.state.clone())
    }

    /// Mark drones unavailable when telemetry has been silent longer than
    /// the configured timeout. Returns the affected ids.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Vec<DroneId> {
        let timeout = Duration::from_secs(self.config.drone_timeout_secs);
        let _guard = self
            .planning
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut expired = Vec::new();
        for mut record in self.drones.iter_mut() {
            let state = &record.state;
            if matches!(state.status, DroneStatus::Unknown | DroneStatus::Unavailable) {
                continue;
            }
            let silent = now
                .signed_duration_since(state.last_update)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if silent > timeout {
                let drone_id = state.drone_id;
                record.state.clear_assignment(DroneStatus::Unavailable);
                record.version += 1;
                expired.push(drone_id);
            }
        }
        expired.sort_unstable();
        expired
    }
}
