//! Trajectory builder: expands sparse strokes into dense waypoint runs.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::geometry::{interpolate, Point};
use crate::models::DroneId;

/// Dense, step-indexed flight path for one drone.
///
/// Derived data: rebuilt wholesale whenever the assignment or step density
/// changes, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub drone_id: DroneId,
    /// One dense waypoint run per stroke. Strokes are never connected by a
    /// segment.
    pub strokes: Vec<Vec<Point>>,
}

/// A consecutive-waypoint segment with its position on the shared step clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub step: usize,
    pub start: Point,
    pub end: Point,
}

impl Trajectory {
    /// Densify the given strokes with `steps` sub-segments per control-point
    /// pair. Original control points are preserved in order; the kernel's
    /// interior points are inserted between them.
    pub fn build(
        drone_id: DroneId,
        strokes: &[Vec<Point>],
        steps: u32,
    ) -> Result<Self, PlanError> {
        if steps == 0 {
            return Err(PlanError::InvalidArgument(
                "step density must be positive".to_string(),
            ));
        }

        let mut dense = Vec::with_capacity(strokes.len());
        for stroke in strokes {
            dense.push(densify(stroke, steps)?);
        }
        Ok(Self {
            drone_id,
            strokes: dense,
        })
    }

    /// All consecutive-waypoint segments, step-indexed on the shared clock.
    ///
    /// Step indices are flattened waypoint positions, so a pen lift consumes
    /// one step without contributing a segment.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        let mut step = 0;
        for stroke in &self.strokes {
            for pair in stroke.windows(2) {
                segments.push(PathSegment {
                    step,
                    start: pair[0],
                    end: pair[1],
                });
                step += 1;
            }
            // Skip the lift slot between strokes
            step += 1;
        }
        segments
    }

    pub fn waypoint_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// All waypoints in flight order, strokes concatenated.
    pub fn flatten(&self) -> Vec<Point> {
        self.strokes.iter().flatten().copied().collect()
    }
}

fn densify(stroke: &[Point], steps: u32) -> Result<Vec<Point>, PlanError> {
    let mut waypoints = Vec::new();
    for pair in stroke.windows(2) {
        waypoints.push(pair[0]);
        waypoints.extend(interpolate(pair[0], pair[1], steps)?);
    }
    if let Some(last) = stroke.last() {
        waypoints.push(*last);
    }
    Ok(waypoints)
}
