//! Frame2D Solver - linear-elastic 2D frame analysis by the direct stiffness method
//!
//! This library analyses plane frames made of Euler-Bernoulli beam-columns:
//! - Nodes with free, fixed, pinned and roller supports
//! - Nodal loads, point loads and partial trapezoidal loads on elements
//! - Load cases solved independently, load combinations by superposition
//! - Sampled axial/shear/moment/deflection diagrams per element
//!
//! ## Example
//! ```rust
//! use frame2d_solver::prelude::*;
//!
//! let mut model = ModelSnapshot::new();
//!
//! // Add nodes
//! model.add_node(Node::new("N1", 0.0, 0.0).with_support(Support::Pinned)).unwrap();
//! model.add_node(Node::new("N2", 6.0, 0.0).with_support(Support::RollerX)).unwrap();
//!
//! // Add element (E in GPa, I in m⁴, A in m²)
//! model.add_element(Element::new("B1", "N1", "N2", 200.0, 8.0e-5, 5.0e-3)).unwrap();
//!
//! // Add loads (kN)
//! model.add_load_case(LoadCase::dead()).unwrap();
//! model.add_point_load(PointLoad::downward("B1", 3.0, 20.0, "Dead")).unwrap();
//!
//! // Analyze
//! let mut manager = AnalysisManager::new(model);
//! manager.run_analysis().unwrap();
//!
//! // Get results
//! let beam = manager.result("Dead").unwrap().element("B1").unwrap();
//! assert!((beam.max_moment - 30.0).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod manager;
pub mod math;
pub mod model;
pub mod results;
pub mod units;

#[cfg(feature = "server")]
pub mod service;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, DIAGRAM_STATIONS};
    pub use crate::elements::{Element, Node, Support};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{
        DistributedLoad, Load, LoadCase, LoadCombination, LoadDirection, NodeLoad, PointLoad,
    };
    pub use crate::manager::{AnalysisManager, CancelToken, CaseStatus};
    pub use crate::model::ModelSnapshot;
    pub use crate::results::{
        AnalysisResult, AnalysisStatus, AnalysisSummary, DiagramPoint, ElementResult, MemberForces,
        NodeDisplacement, NodeResult, Reactions, ResultsCache,
    };
}
