//! Distributed loads on elements

use serde::{Deserialize, Serialize};

use super::point_load::LoadDirection;

/// A linearly varying (trapezoidal) line load on part or all of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Target element name
    pub element: String,
    /// Load direction
    pub direction: LoadDirection,
    /// Start intensity (kN/m)
    pub w1: f64,
    /// End intensity (kN/m)
    pub w2: f64,
    /// Start position (distance from i-node, m)
    #[serde(default)]
    pub x1: f64,
    /// End position (distance from i-node, m); infinity means "to the j-node"
    #[serde(default = "to_j_node", skip_serializing_if = "is_to_j_node")]
    pub x2: f64,
    /// Load case
    pub case: String,
}

fn to_j_node() -> f64 {
    f64::INFINITY
}

fn is_to_j_node(x2: &f64) -> bool {
    x2.is_infinite()
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(
        element: &str,
        direction: LoadDirection,
        w1: f64,
        w2: f64,
        x1: f64,
        x2: f64,
        case: &str,
    ) -> Self {
        Self {
            element: element.to_string(),
            direction,
            w1,
            w2,
            x1,
            x2,
            case: case.to_string(),
        }
    }

    /// Create a uniform distributed load over the full element length
    pub fn uniform(element: &str, direction: LoadDirection, w: f64, case: &str) -> Self {
        Self::new(element, direction, w, w, 0.0, f64::INFINITY, case)
    }

    /// Create a uniform downward load (negative global Y) over the full length
    pub fn uniform_downward(element: &str, w: f64, case: &str) -> Self {
        Self::uniform(element, LoadDirection::GlobalY, -w.abs(), case)
    }

    /// Create a triangular load (zero at `x1`, `w_max` at `x2`)
    pub fn triangular(
        element: &str,
        direction: LoadDirection,
        w_max: f64,
        x1: f64,
        x2: f64,
        case: &str,
    ) -> Self {
        Self::new(element, direction, 0.0, w_max, x1, x2, case)
    }

    /// Loaded span `(x1, x2)` on an element of the given length
    pub fn span(&self, length: f64) -> (f64, f64) {
        (self.x1, self.x2.min(length))
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            w1: self.w1 * factor,
            w2: self.w2 * factor,
            ..self.clone()
        }
    }
}
