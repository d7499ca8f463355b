//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

/// A load applied directly to a node, in global axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Target node name
    pub node: String,
    /// Force in X direction (kN)
    #[serde(default)]
    pub fx: f64,
    /// Force in Y direction (kN)
    #[serde(default)]
    pub fy: f64,
    /// Moment about Z axis (kNm)
    #[serde(default)]
    pub mz: f64,
    /// Load case this load belongs to
    pub case: String,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(node: &str, fx: f64, fy: f64, mz: f64, case: &str) -> Self {
        Self {
            node: node.to_string(),
            fx,
            fy,
            mz,
            case: case.to_string(),
        }
    }

    /// Create a force-only node load
    pub fn force(node: &str, fx: f64, fy: f64, case: &str) -> Self {
        Self::new(node, fx, fy, 0.0, case)
    }

    /// Create a moment-only node load
    pub fn moment(node: &str, mz: f64, case: &str) -> Self {
        Self::new(node, 0.0, 0.0, mz, case)
    }

    /// Create a load in X direction
    pub fn fx(node: &str, value: f64, case: &str) -> Self {
        Self::force(node, value, 0.0, case)
    }

    /// Create a load in Y direction
    pub fn fy(node: &str, value: f64, case: &str) -> Self {
        Self::force(node, 0.0, value, case)
    }

    /// Get the load as an array [FX, FY, MZ]
    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.mz]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            fx: self.fx * factor,
            fy: self.fy * factor,
            mz: self.mz * factor,
            ..self.clone()
        }
    }
}
