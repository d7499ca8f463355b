//! Result types for frame analysis
//!
//! All values are in boundary units: displacements in mm, rotations in rad,
//! forces in kN, moments in kNm.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction (mm)
    pub dx: f64,
    /// Displacement in Y direction (mm)
    pub dy: f64,
    /// Rotation about Z axis (rad)
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, RZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            rz: arr[2],
        }
    }

    /// Get translation magnitude (mm)
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }

    fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.dx += factor * other.dx;
        self.dy += factor * other.dy;
        self.rz += factor * other.rz;
    }
}

/// Reaction forces at a supported node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force in X direction (kN)
    pub fx: f64,
    /// Reaction force in Y direction (kN)
    pub fy: f64,
    /// Reaction moment about Z axis (kNm)
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, MZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            mz: arr[2],
        }
    }

    /// Get total force magnitude (kN)
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2)).sqrt()
    }

    fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.fx += factor * other.fx;
        self.fy += factor * other.fy;
        self.mz += factor * other.mz;
    }
}

/// Displacement and reactions of one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub displacement: NodeDisplacement,
    /// `None` for unsupported nodes; restrained components only otherwise
    pub reactions: Option<Reactions>,
}

impl NodeResult {
    fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.displacement.add_scaled(&other.displacement, factor);
        if let Some(theirs) = &other.reactions {
            self.reactions
                .get_or_insert_with(Reactions::default)
                .add_scaled(theirs, factor);
        }
    }
}

/// Internal forces at one end of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force (kN, positive = tension)
    pub axial: f64,
    /// Shear force in local y direction (kN)
    pub shear: f64,
    /// Bending moment (kNm, positive = sagging)
    pub moment: f64,
}

impl MemberForces {
    /// Internal forces at the i-node from the local end-force vector
    pub fn from_i_node_forces(forces: &[f64; 6]) -> Self {
        Self {
            axial: -forces[0],
            shear: forces[1],
            moment: -forces[2],
        }
    }

    /// Internal forces at the j-node from the local end-force vector
    pub fn from_j_node_forces(forces: &[f64; 6]) -> Self {
        Self {
            axial: forces[3],
            shear: -forces[4],
            moment: forces[5],
        }
    }

    fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.axial += factor * other.axial;
        self.shear += factor * other.shear;
        self.moment += factor * other.moment;
    }
}

/// One diagram sample along an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramPoint {
    /// Position as a fraction of the element length
    pub t: f64,
    /// Bending moment (kNm)
    pub moment: f64,
    /// Shear force (kN)
    pub shear: f64,
    /// Axial force (kN)
    pub axial: f64,
    /// Transverse deflection in local y (mm)
    pub deflection: f64,
}

/// Maxima, end forces and sampled diagram of one element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    /// Largest |moment| over the diagram stations (kNm)
    pub max_moment: f64,
    /// Largest |shear| over the diagram stations (kN)
    pub max_shear: f64,
    /// Largest |axial| over the diagram stations (kN)
    pub max_axial: f64,
    /// Internal forces at the i-node
    pub forces_i: MemberForces,
    /// Internal forces at the j-node
    pub forces_j: MemberForces,
    pub diagram: Vec<DiagramPoint>,
}

impl ElementResult {
    /// Recompute the maxima from the diagram samples
    pub fn refresh_maxima(&mut self) {
        let max_abs = |f: fn(&DiagramPoint) -> f64| self.diagram.iter().map(|p| f(p).abs()).fold(0.0, f64::max);
        self.max_moment = max_abs(|p| p.moment);
        self.max_shear = max_abs(|p| p.shear);
        self.max_axial = max_abs(|p| p.axial);
    }

    fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.forces_i.add_scaled(&other.forces_i, factor);
        self.forces_j.add_scaled(&other.forces_j, factor);
        for (mine, theirs) in self.diagram.iter_mut().zip(&other.diagram) {
            mine.moment += factor * theirs.moment;
            mine.shear += factor * theirs.shear;
            mine.axial += factor * theirs.axial;
            mine.deflection += factor * theirs.deflection;
        }
    }
}

/// Results of one load case or combination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub nodes: BTreeMap<String, NodeResult>,
    pub elements: BTreeMap<String, ElementResult>,
    /// Outcome of the equilibrium check; `None` when it was not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statics_balanced: Option<bool>,
}

impl AnalysisResult {
    /// Node result by name
    pub fn node(&self, name: &str) -> Option<&NodeResult> {
        self.nodes.get(name)
    }

    /// Element result by name
    pub fn element(&self, name: &str) -> Option<&ElementResult> {
        self.elements.get(name)
    }

    /// Factor-weighted sum of case results
    ///
    /// Maxima are taken from the superposed diagrams, not summed.
    pub fn superpose<'a>(terms: impl IntoIterator<Item = (f64, &'a AnalysisResult)>) -> Self {
        let mut combined = AnalysisResult {
            statics_balanced: Some(true),
            ..Default::default()
        };

        for (factor, result) in terms {
            // A combination is balanced only if every checked case is
            combined.statics_balanced = match (combined.statics_balanced, result.statics_balanced) {
                (Some(a), Some(b)) => Some(a && b),
                _ => None,
            };
            for (name, node) in &result.nodes {
                combined
                    .nodes
                    .entry(name.clone())
                    .or_default()
                    .add_scaled(node, factor);
            }
            for (name, element) in &result.elements {
                let entry = combined.elements.entry(name.clone()).or_insert_with(|| ElementResult {
                    diagram: element
                        .diagram
                        .iter()
                        .map(|p| DiagramPoint { t: p.t, ..Default::default() })
                        .collect(),
                    ..Default::default()
                });
                entry.add_scaled(element, factor);
            }
        }

        for element in combined.elements.values_mut() {
            element.refresh_maxima();
        }
        combined
    }

    /// Controlling values over the whole model
    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            total_dofs: self.nodes.len() * 3,
            ..Default::default()
        };

        for (name, node) in &self.nodes {
            let disp = node.displacement.translation_magnitude();
            if disp > summary.max_displacement {
                summary.max_displacement = disp;
                summary.max_disp_node = name.clone();
            }
            if let Some(reactions) = &node.reactions {
                let reaction = reactions.force_magnitude();
                if reaction > summary.max_reaction {
                    summary.max_reaction = reaction;
                    summary.max_reaction_node = name.clone();
                }
            }
        }

        for (name, element) in &self.elements {
            if element.max_axial > summary.max_axial {
                summary.max_axial = element.max_axial;
                summary.max_axial_element = name.clone();
            }
            if element.max_moment > summary.max_moment {
                summary.max_moment = element.max_moment;
                summary.max_moment_element = name.clone();
            }
        }

        summary
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation (mm)
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: String,
    /// Maximum reaction force (kN)
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: String,
    /// Maximum element axial force (kN)
    pub max_axial: f64,
    /// Element with maximum axial
    pub max_axial_element: String,
    /// Maximum element moment (kNm)
    pub max_moment: f64,
    /// Element with maximum moment
    pub max_moment_element: String,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
}

/// Success counters of the last batch run
///
/// Case counts include cases a combination solved on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatus {
    pub successful_cases: usize,
    pub total_cases: usize,
    pub successful_combinations: usize,
    pub total_combinations: usize,
    /// The batch stopped early on request
    pub cancelled: bool,
}

/// Cached results keyed by case and combination name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsCache {
    pub case_results: BTreeMap<String, AnalysisResult>,
    pub combination_results: BTreeMap<String, AnalysisResult>,
    pub status: AnalysisStatus,
}

impl ResultsCache {
    pub fn case(&self, name: &str) -> Option<&AnalysisResult> {
        self.case_results.get(name)
    }

    pub fn combination(&self, name: &str) -> Option<&AnalysisResult> {
        self.combination_results.get(name)
    }

    /// Result by name, load cases first
    pub fn get(&self, name: &str) -> Option<&AnalysisResult> {
        self.case(name).or_else(|| self.combination(name))
    }

    pub fn is_empty(&self) -> bool {
        self.case_results.is_empty() && self.combination_results.is_empty()
    }

    /// Drop every result and reset the counters
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
