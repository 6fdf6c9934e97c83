//! Collision verification across planned trajectories.
//!
//! A pure decision function over input trajectories; never mutates drone
//! state. Segments are only compared when their step indices fall within
//! the verifier's window, reflecting the assumption that drones advance on
//! a common step clock.

use serde::{Deserialize, Serialize};

use crate::geometry::{segments_intersect, Point};
use crate::models::DroneId;
use crate::trajectory::Trajectory;

/// One conflicting segment pair found during verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConflict {
    pub drone_a: DroneId,
    pub drone_b: DroneId,
    /// Step index near which the paths cross.
    pub step: usize,
    pub segment_a: (Point, Point),
    pub segment_b: (Point, Point),
}

/// Result of a verification pass. An empty conflict set means the combined
/// plan is clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionReport {
    pub conflicts: Vec<SegmentConflict>,
}

impl CollisionReport {
    pub fn is_clear(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Pairwise geometric verifier over dense trajectories.
pub struct CollisionVerifier {
    /// Maximum step-index difference between compared segments. Window 1
    /// keeps the scan near-linear in trajectory length and matches the
    /// synchronized step clock.
    pub step_window: usize,
}

impl Default for CollisionVerifier {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CollisionVerifier {
    pub fn new(step_window: usize) -> Self {
        Self { step_window }
    }

    /// Check every unordered trajectory pair for crossing segments in the
    /// same or adjacent step windows.
    pub fn verify(&self, trajectories: &[Trajectory]) -> CollisionReport {
        let mut report = CollisionReport::default();

        for i in 0..trajectories.len() {
            for j in (i + 1)..trajectories.len() {
                self.verify_pair(&trajectories[i], &trajectories[j], &mut report);
            }
        }
        report
    }

    fn verify_pair(&self, a: &Trajectory, b: &Trajectory, report: &mut CollisionReport) {
        let segments_a = a.segments();
        let segments_b = b.segments();

        // Both segment lists are step-ordered, so track a sliding window
        // start instead of scanning every pair.
        let mut window_start = 0;
        for sa in &segments_a {
            while window_start < segments_b.len()
                && segments_b[window_start].step.saturating_add(self.step_window) < sa.step
            {
                window_start += 1;
            }
            for sb in &segments_b[window_start..] {
                if sb.step > sa.step.saturating_add(self.step_window) {
                    break;
                }
                if segments_intersect(sa.start, sa.end, sb.start, sb.end) {
                    report.conflicts.push(SegmentConflict {
                        drone_a: a.drone_id,
                        drone_b: b.drone_id,
                        step: sa.step.min(sb.step),
                        segment_a: (sa.start, sa.end),
                        segment_b: (sb.start, sb.end),
                    });
                }
            }
        }
    }
}
