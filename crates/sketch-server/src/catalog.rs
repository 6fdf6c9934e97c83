//! Built-in shape catalog.
//!
//! The show assets encode each outline as `[angle_index, offset, magnitude]`
//! triples. The encoding predates this service and is only partially
//! documented; the loader applies the renderer's working conversion
//! (x from offset, y from magnitude) and treats a non-positive magnitude as
//! a pen lift that ends the current stroke. The angle index is carried by
//! the assets but unused here.

use serde::Serialize;
use sketch_core::{ControlPoint, Point, ShapeTemplate};

/// A named set of shapes playable together in one round.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeGroup {
    pub name: String,
    pub shapes: Vec<String>,
}

/// Read-only shape reference data, loaded once at process start.
pub struct ShapeCatalog {
    shapes: Vec<ShapeTemplate>,
    groups: Vec<ShapeGroup>,
}

const LINE: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, -1.0, 1.5],
    [0.0, 0.0, 1.5],
    [0.0, 1.0, 1.5],
    [0.0, 0.0, 1.25],
];

const TRIANGLE: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, -0.5, 1.0],
    [0.0, 0.0, 1.8],
    [0.0, 0.5, 1.0],
    [0.0, -0.5, 1.0],
    [0.0, 0.0, 1.25],
];

const CIRCLE: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, 0.0, 2.0],
    [0.0, 0.71, 1.71],
    [0.0, 1.0, 1.0],
    [0.0, 0.71, 0.39],
    [0.0, 0.0, -1.0],
    [0.0, -0.71, -0.71],
    [0.0, -1.0, 0.0],
    [0.0, -0.71, 0.71],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.25],
];

const SQUARE: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, -0.85, 1.875],
    [0.0, -0.85, 0.625],
    [1.0, 0.85, 0.625],
    [1.0, 0.85, 1.875],
    [0.0, 0.0, 1.25],
];

const HEART: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, 0.0, 0.31],
    [0.0, -0.85, 0.94],
    [0.0, -1.275, 1.56],
    [0.0, -0.85, 1.875],
    [0.0, 0.0, 1.56],
    [0.0, 0.85, 1.875],
    [0.0, 1.275, 1.56],
    [0.0, 0.85, 0.94],
    [0.0, 0.0, 0.31],
    [0.0, 0.0, 1.25],
];

const DROPLET: &[[f64; 3]] = &[
    [0.0, 0.0, 0.625],
    [0.0, -0.45, 0.31],
    [0.0, -0.85, 0.31],
    [0.0, -1.275, 0.94],
    [0.0, -1.275, 1.56],
    [0.0, -0.45, 1.875],
    [0.0, 0.0, 1.56],
    [0.0, 0.45, 1.875],
    [0.0, 1.275, 1.56],
    [0.0, 1.275, 0.94],
    [0.0, 0.85, 0.31],
    [0.0, 0.45, 0.31],
    [0.0, 0.0, 0.625],
];

const MOON: &[[f64; 3]] = &[
    [0.0, 0.0, 1.25],
    [0.0, 0.0, 0.31],
    [0.0, -0.85, 0.625],
    [0.0, 0.0, 0.94],
    [0.0, 0.45, 1.25],
    [0.0, 0.0, 1.56],
    [0.0, -0.85, 1.875],
    [0.0, 0.0, 2.19],
    [0.0, 0.85, 1.875],
    [0.0, 1.275, 1.56],
    [0.0, 1.275, 0.94],
    [0.0, 0.85, 0.31],
    [0.0, 0.0, 0.31],
    [0.0, 0.0, 1.25],
];

fn decode(name: &str, raw: &[[f64; 3]]) -> ShapeTemplate {
    let points = raw
        .iter()
        .map(|triple| {
            let magnitude = triple[2];
            ControlPoint {
                point: Point::new(triple[1], magnitude),
                pen_lift: magnitude <= 0.0,
            }
        })
        .collect();
    ShapeTemplate::new(name, points)
}

impl ShapeCatalog {
    /// Decode the built-in assets.
    pub fn builtin() -> Self {
        let shapes = vec![
            decode("Line", LINE),
            decode("Triangle", TRIANGLE),
            decode("Circle", CIRCLE),
            decode("Square", SQUARE),
            decode("Heart", HEART),
            decode("Droplet", DROPLET),
            decode("Moon", MOON),
        ];
        let groups = vec![
            ShapeGroup {
                name: "Group 1".to_string(),
                shapes: vec![
                    "Triangle".to_string(),
                    "Line".to_string(),
                    "Circle".to_string(),
                    "Square".to_string(),
                ],
            },
            ShapeGroup {
                name: "Group 2".to_string(),
                shapes: vec![
                    "Triangle".to_string(),
                    "Droplet".to_string(),
                    "Heart".to_string(),
                    "Moon".to_string(),
                ],
            },
        ];
        Self { shapes, groups }
    }

    pub fn get(&self, name: &str) -> Option<&ShapeTemplate> {
        self.shapes.iter().find(|s| s.name == name)
    }

    pub fn shapes(&self) -> &[ShapeTemplate] {
        &self.shapes
    }

    pub fn groups(&self) -> &[ShapeGroup] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shapes_decode() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.shapes().len(), 7);
        for shape in catalog.shapes() {
            assert!(shape.stroke_count() >= 1, "{} has no strokes", shape.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        let catalog = ShapeCatalog::builtin();
        assert!(catalog.get("Heart").is_some());
        assert!(catalog.get("Pentagon").is_none());
    }

    #[test]
    fn negative_magnitude_is_a_pen_lift() {
        let catalog = ShapeCatalog::builtin();
        let circle = catalog.get("Circle").unwrap();
        // The circle outline carries three non-positive magnitudes, splitting
        // it into four strokes
        assert_eq!(circle.stroke_count(), 4);
    }

    #[test]
    fn heart_is_one_continuous_stroke() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.get("Heart").unwrap().stroke_count(), 1);
    }

    #[test]
    fn groups_reference_known_shapes() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.groups().len(), 2);
        for group in catalog.groups() {
            for name in &group.shapes {
                assert!(catalog.get(name).is_some(), "{name} missing from catalog");
            }
        }
    }
}
