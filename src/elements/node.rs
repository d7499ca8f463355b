//! Node element - a point in the 2D frame plane

use serde::{Deserialize, Serialize};

use super::Support;

/// A 2D node in the frame model
///
/// Each node owns three DOFs: translation X, translation Y and rotation Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name
    pub name: String,
    /// X coordinate (m)
    pub x: f64,
    /// Y coordinate (m)
    pub y: f64,
    /// Support condition
    #[serde(default)]
    pub support: Support,
}

impl Node {
    /// Create a new unsupported node at the given coordinates
    pub fn new(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            support: Support::Free,
        }
    }

    /// Set the support condition
    pub fn with_support(mut self, support: Support) -> Self {
        self.support = support;
        self
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
