//! Point loads on elements

use serde::{Deserialize, Serialize};

/// Direction of an element load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoadDirection {
    /// Along the element's local x axis (axial)
    LocalX,
    /// Along the element's local y axis (transverse)
    LocalY,
    /// Along global X
    GlobalX,
    /// Along global Y
    GlobalY,
}

impl LoadDirection {
    /// Components of a unit load in this direction along local (x, y)
    ///
    /// `cos`/`sin` describe the element orientation measured from global X.
    pub fn local_components(&self, cos: f64, sin: f64) -> (f64, f64) {
        match self {
            LoadDirection::LocalX => (1.0, 0.0),
            LoadDirection::LocalY => (0.0, 1.0),
            LoadDirection::GlobalX => (cos, -sin),
            LoadDirection::GlobalY => (sin, cos),
        }
    }
}

/// A concentrated load on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Target element name
    pub element: String,
    /// Load direction
    pub direction: LoadDirection,
    /// Distance from i-node (m)
    pub distance: f64,
    /// Load magnitude (kN)
    pub magnitude: f64,
    /// Load case
    pub case: String,
}

impl PointLoad {
    /// Create a new point load
    pub fn new(element: &str, direction: LoadDirection, distance: f64, magnitude: f64, case: &str) -> Self {
        Self {
            element: element.to_string(),
            direction,
            distance,
            magnitude,
            case: case.to_string(),
        }
    }

    /// Create a downward (negative global Y) point load
    pub fn downward(element: &str, distance: f64, magnitude: f64, case: &str) -> Self {
        Self::new(element, LoadDirection::GlobalY, distance, -magnitude.abs(), case)
    }

    /// Create an axial load (in local x direction)
    pub fn axial(element: &str, distance: f64, magnitude: f64, case: &str) -> Self {
        Self::new(element, LoadDirection::LocalX, distance, magnitude, case)
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            ..self.clone()
        }
    }
}
