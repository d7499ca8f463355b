//! Element - 2D beam-column (Euler-Bernoulli)

use serde::{Deserialize, Serialize};

use crate::units;

/// A 2D frame element between two nodes
///
/// Length and orientation are derived from the end nodes at analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique element name
    pub name: String,
    /// Name of the i-node (start)
    pub i_node: String,
    /// Name of the j-node (end)
    pub j_node: String,
    /// Young's modulus (GPa)
    pub e: f64,
    /// Second moment of area (m⁴)
    pub i: f64,
    /// Cross-sectional area (m²)
    pub a: f64,
}

impl Element {
    /// Create a new element
    pub fn new(name: &str, i_node: &str, j_node: &str, e: f64, i: f64, a: f64) -> Self {
        Self {
            name: name.to_string(),
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            e,
            i,
            a,
        }
    }

    /// Create an element with a solid rectangular section
    ///
    /// `depth` is measured along the local y axis.
    pub fn rectangular(name: &str, i_node: &str, j_node: &str, e: f64, width: f64, depth: f64) -> Self {
        Self::new(
            name,
            i_node,
            j_node,
            e,
            width * depth.powi(3) / 12.0,
            width * depth,
        )
    }

    /// Young's modulus in Pa
    pub fn e_pa(&self) -> f64 {
        units::gpa_to_pa(self.e)
    }

    /// Flexural rigidity EI in N·m²
    pub fn flexural_rigidity(&self) -> f64 {
        self.e_pa() * self.i
    }

    /// Reason the section is unusable, if any
    pub(crate) fn section_defect(&self) -> Option<String> {
        let props = [("E", self.e), ("I", self.i), ("A", self.a)];
        props
            .iter()
            .find(|(_, v)| *v <= 0.0 || !v.is_finite())
            .map(|(name, v)| format!("{} must be positive and finite, got {}", name, v))
    }
}
