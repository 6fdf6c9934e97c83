//! Planar geometry kernel for path generation and collision checks.

use serde::{Deserialize, Serialize};
use std::ops::Sub;

use crate::error::PlanError;

/// A point in the 2-D show plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

fn cross(v: Point, w: Point) -> f64 {
    v.x * w.y - v.y * w.x
}

/// Generate the `steps - 1` strictly interior points evenly spaced between
/// `start` and `end`, exclusive of both endpoints.
///
/// A degenerate span (`start == end`) yields `steps - 1` copies of the point.
pub fn interpolate(start: Point, end: Point, steps: u32) -> Result<Vec<Point>, PlanError> {
    if steps == 0 {
        return Err(PlanError::InvalidArgument(
            "step density must be positive".to_string(),
        ));
    }

    let steps_f = f64::from(steps);
    let mut points = Vec::with_capacity(steps as usize - 1);
    for i in 1..steps {
        let t = f64::from(i) / steps_f;
        points.push(Point::new(
            start.x + (end.x - start.x) * t,
            start.y + (end.y - start.y) * t,
        ));
    }
    Ok(points)
}

/// Check whether segment (a1, a2) crosses segment (b1, b2) at a point
/// strictly interior to both.
///
/// Shared endpoints and touching segments do not count as intersections.
/// Parallel segments never intersect here, even when they overlap
/// collinearly.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let delta = b1 - a1;

    let denominator = cross(d1, d2);
    if denominator == 0.0 {
        // Parallel or collinear
        return false;
    }

    let t = cross(delta, d2) / denominator;
    let u = cross(delta, d1) / denominator;

    t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0
}
