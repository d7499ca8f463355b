//! Analysis pipeline and options
//!
//! One linear static solve runs through these stages in order:
//! [`stiffness`] → [`assembly`] → [`boundary`] → [`solver`] → [`diagram`].

pub mod assembly;
pub mod boundary;
pub mod diagram;
pub mod solver;
pub mod stiffness;

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_GEOMETRY_TOLERANCE;

pub use assembly::{assemble, build_case_loads, Assembly, CaseLoads, MemberLoad};
pub use boundary::{DofPartition, ReducedSystem};
pub use diagram::DIAGRAM_STATIONS;
pub use solver::Solution;
pub use stiffness::ElementStiffness;

/// Options for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Relative LU pivot threshold: a pivot at or below
    /// `pivot_tolerance * max|Kff|` marks the structure as unstable
    pub pivot_tolerance: f64,
    /// Coincident-node / zero-length threshold and load-position slack (m)
    pub geometry_tolerance: f64,
    /// Check static equilibrium after each solve
    pub check_statics: bool,
    /// Relative imbalance allowed by the statics check
    pub statics_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-9,
            geometry_tolerance: DEFAULT_GEOMETRY_TOLERANCE,
            check_statics: true,
            statics_tolerance: 1e-6,
        }
    }
}

impl AnalysisOptions {
    /// Set the relative pivot tolerance
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Set the geometry tolerance
    pub fn with_geometry_tolerance(mut self, tol: f64) -> Self {
        self.geometry_tolerance = tol;
        self
    }

    /// Disable the post-solve statics check
    pub fn without_statics_check(mut self) -> Self {
        self.check_statics = false;
        self
    }

    /// Set the relative imbalance allowed by the statics check
    pub fn with_statics_tolerance(mut self, tol: f64) -> Self {
        self.statics_tolerance = tol;
        self
    }
}
