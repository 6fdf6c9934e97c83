//! Shape templates: named control-point polylines with pen-lift markers.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One control point of a shape outline.
///
/// A pen-lift point terminates the current stroke: it is drawn as the last
/// point of its stroke and no segment connects it to the successor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub point: Point,
    #[serde(default)]
    pub pen_lift: bool,
}

impl ControlPoint {
    /// A regular, connected control point.
    pub fn draw(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            pen_lift: false,
        }
    }

    /// A stroke-terminating control point.
    pub fn lift(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            pen_lift: true,
        }
    }
}

/// A named figure as an ordered control-point sequence, already converted
/// to Cartesian show-plane coordinates by the catalog loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub name: String,
    pub points: Vec<ControlPoint>,
}

impl ShapeTemplate {
    pub fn new(name: impl Into<String>, points: Vec<ControlPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Split the outline at pen-lift markers into disjoint strokes.
    ///
    /// Each stroke is a maximal run of points drawn as one continuous path;
    /// a pen-lift point is kept as the terminal point of its stroke. Empty
    /// runs (e.g. a trailing marker) are dropped.
    pub fn strokes(&self) -> Vec<Vec<Point>> {
        let mut strokes = Vec::new();
        let mut current = Vec::new();

        for cp in &self.points {
            current.push(cp.point);
            if cp.pen_lift {
                strokes.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            strokes.push(current);
        }
        strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes().len()
    }
}
