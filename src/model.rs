//! Model snapshot - the immutable input to an analysis run
//!
//! A snapshot is built once by the model layer (through the `add_*` methods,
//! or deserialized and then checked with [`ModelSnapshot::validate`]) and then
//! handed by value to the [`AnalysisManager`](crate::manager::AnalysisManager).
//! Node order fixes the global DOF numbering: node `n` owns DOFs
//! `3n` (X), `3n + 1` (Y) and `3n + 2` (rotation Z).

use serde::{Deserialize, Serialize};

use crate::elements::{Element, Node};
use crate::error::{FrameError, FrameResult};
use crate::loads::{DistributedLoad, Load, LoadCase, LoadCombination, NodeLoad, PointLoad};

/// Distance below which two points are considered coincident (m)
pub const DEFAULT_GEOMETRY_TOLERANCE: f64 = 1e-9;

/// DOFs per node: translation X, translation Y, rotation Z
pub const DOFS_PER_NODE: usize = 3;

/// Nodes, elements, supports and loads for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSnapshot {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    load_cases: Vec<LoadCase>,
    load_combos: Vec<LoadCombination>,
    loads: Vec<Load>,
}

impl ModelSnapshot {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, node: Node) -> FrameResult<()> {
        if self.node(&node.name).is_some() {
            return Err(FrameError::DuplicateName(node.name));
        }
        if let Some(other) = self
            .nodes
            .iter()
            .find(|n| n.distance_to(&node) <= DEFAULT_GEOMETRY_TOLERANCE)
        {
            return Err(FrameError::DuplicateNodePosition(other.name.clone(), node.name));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add an element to the model
    pub fn add_element(&mut self, element: Element) -> FrameResult<()> {
        if self.element(&element.name).is_some() {
            return Err(FrameError::DuplicateName(element.name));
        }
        self.check_element(&element, DEFAULT_GEOMETRY_TOLERANCE)?;
        self.elements.push(element);
        Ok(())
    }

    /// Add a load case
    pub fn add_load_case(&mut self, case: LoadCase) -> FrameResult<()> {
        if self.load_case(&case.name).is_some() {
            return Err(FrameError::DuplicateName(case.name));
        }
        self.load_cases.push(case);
        Ok(())
    }

    /// Add a load combination
    ///
    /// Referenced cases are resolved when the combination is run.
    pub fn add_load_combo(&mut self, combo: LoadCombination) -> FrameResult<()> {
        if self.load_combo(&combo.name).is_some() {
            return Err(FrameError::DuplicateName(combo.name));
        }
        self.load_combos.push(combo);
        Ok(())
    }

    /// Add any load; its case and target must already exist
    pub fn add_load(&mut self, load: impl Into<Load>) -> FrameResult<()> {
        let load = load.into();
        self.check_load(&load, DEFAULT_GEOMETRY_TOLERANCE)?;
        self.loads.push(load);
        Ok(())
    }

    /// Add a node load
    pub fn add_node_load(&mut self, load: NodeLoad) -> FrameResult<()> {
        self.add_load(load)
    }

    /// Add a distributed load to an element
    pub fn add_dist_load(&mut self, load: DistributedLoad) -> FrameResult<()> {
        self.add_load(load)
    }

    /// Add a point load to an element
    pub fn add_point_load(&mut self, load: PointLoad) -> FrameResult<()> {
        self.add_load(load)
    }

    // ========================
    // Accessors
    // ========================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    pub fn load_combos(&self) -> &[LoadCombination] {
        &self.load_combos
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Position of a node in the DOF numbering
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    pub fn load_case(&self, name: &str) -> Option<&LoadCase> {
        self.load_cases.iter().find(|c| c.name == name)
    }

    pub fn load_combo(&self, name: &str) -> Option<&LoadCombination> {
        self.load_combos.iter().find(|c| c.name == name)
    }

    /// All loads belonging to a load case, in insertion order
    pub fn loads_for_case<'a>(&'a self, case: &'a str) -> impl Iterator<Item = &'a Load> + 'a {
        self.loads.iter().filter(move |l| l.case() == case)
    }

    /// Total number of DOFs
    pub fn num_dofs(&self) -> usize {
        self.nodes.len() * DOFS_PER_NODE
    }

    /// Element length from its end nodes
    pub fn element_length(&self, element: &Element) -> FrameResult<f64> {
        let i_node = self
            .node(&element.i_node)
            .ok_or_else(|| FrameError::NodeNotFound(element.i_node.clone()))?;
        let j_node = self
            .node(&element.j_node)
            .ok_or_else(|| FrameError::NodeNotFound(element.j_node.clone()))?;
        Ok(i_node.distance_to(j_node))
    }

    /// True when nodes, supports and elements are identical
    pub fn same_structure(&self, other: &ModelSnapshot) -> bool {
        self.nodes == other.nodes && self.elements == other.elements
    }

    // ========================
    // Validation
    // ========================

    /// Check every model invariant
    ///
    /// Snapshots built through the `add_*` methods already satisfy these; this
    /// is for snapshots that arrive deserialized.
    pub fn validate(&self, tolerance: f64) -> FrameResult<()> {
        for (idx, node) in self.nodes.iter().enumerate() {
            for other in &self.nodes[idx + 1..] {
                if node.name == other.name {
                    return Err(FrameError::DuplicateName(node.name.clone()));
                }
                if node.distance_to(other) <= tolerance {
                    return Err(FrameError::DuplicateNodePosition(
                        node.name.clone(),
                        other.name.clone(),
                    ));
                }
            }
        }

        for (idx, element) in self.elements.iter().enumerate() {
            if self.elements[idx + 1..].iter().any(|e| e.name == element.name) {
                return Err(FrameError::DuplicateName(element.name.clone()));
            }
            self.check_element(element, tolerance)?;
        }

        for (idx, case) in self.load_cases.iter().enumerate() {
            if self.load_cases[idx + 1..].iter().any(|c| c.name == case.name) {
                return Err(FrameError::DuplicateName(case.name.clone()));
            }
        }

        for (idx, combo) in self.load_combos.iter().enumerate() {
            if self.load_combos[idx + 1..].iter().any(|c| c.name == combo.name) {
                return Err(FrameError::DuplicateName(combo.name.clone()));
            }
        }

        for load in &self.loads {
            self.check_load(load, tolerance)?;
        }

        Ok(())
    }

    fn check_element(&self, element: &Element, tolerance: f64) -> FrameResult<()> {
        if element.i_node == element.j_node {
            return Err(FrameError::DegenerateElement {
                element: element.name.clone(),
                reason: format!("both ends reference node '{}'", element.i_node),
            });
        }
        let length = self.element_length(element)?;
        if length <= tolerance {
            return Err(FrameError::DegenerateElement {
                element: element.name.clone(),
                reason: format!("zero length between '{}' and '{}'", element.i_node, element.j_node),
            });
        }
        if let Some(reason) = element.section_defect() {
            return Err(FrameError::DegenerateElement {
                element: element.name.clone(),
                reason,
            });
        }
        Ok(())
    }

    fn check_load(&self, load: &Load, tolerance: f64) -> FrameResult<()> {
        let case = load.case();
        if self.load_case(case).is_none() {
            return Err(FrameError::LoadCaseNotFound(case.to_string()));
        }
        let invalid = |reason: String| FrameError::InvalidLoad {
            case: case.to_string(),
            reason,
        };

        match load {
            Load::Nodal(l) => {
                if self.node(&l.node).is_none() {
                    return Err(FrameError::NodeNotFound(l.node.clone()));
                }
                if l.as_array().iter().any(|v| !v.is_finite()) {
                    return Err(invalid(format!("non-finite nodal load on '{}'", l.node)));
                }
            }
            Load::Distributed(l) => {
                let element = self
                    .element(&l.element)
                    .ok_or_else(|| FrameError::ElementNotFound(l.element.clone()))?;
                let length = self.element_length(element)?;
                if !l.w1.is_finite() || !l.w2.is_finite() {
                    return Err(invalid(format!("non-finite intensity on '{}'", l.element)));
                }
                // x2 is either a position or +inf for "to the j-node"
                if l.x2.is_nan() || l.x2 == f64::NEG_INFINITY {
                    return Err(invalid(format!(
                        "distributed load on '{}' has invalid end position {}",
                        l.element, l.x2
                    )));
                }
                if !l.x1.is_finite() || l.x1 < -tolerance || l.x1 > length + tolerance || l.x1 > l.x2 {
                    return Err(invalid(format!(
                        "distributed load on '{}' needs 0 <= x1 <= x2 <= {}, got x1={} x2={}",
                        l.element, length, l.x1, l.x2
                    )));
                }
                if l.x2.is_finite() && l.x2 > length + tolerance {
                    return Err(invalid(format!(
                        "distributed load on '{}' ends at {} beyond length {}",
                        l.element, l.x2, length
                    )));
                }
            }
            Load::ElementPoint(l) => {
                let element = self
                    .element(&l.element)
                    .ok_or_else(|| FrameError::ElementNotFound(l.element.clone()))?;
                let length = self.element_length(element)?;
                if !l.magnitude.is_finite() {
                    return Err(invalid(format!("non-finite point load on '{}'", l.element)));
                }
                if !l.distance.is_finite() || l.distance < -tolerance || l.distance > length + tolerance {
                    return Err(invalid(format!(
                        "point load on '{}' at {} is outside [0, {}]",
                        l.element, l.distance, length
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Support;
    use crate::loads::LoadDirection;

    fn two_node_model() -> ModelSnapshot {
        let mut model = ModelSnapshot::new();
        model.add_node(Node::new("N1", 0.0, 0.0).with_support(Support::Fixed)).unwrap();
        model.add_node(Node::new("N2", 5.0, 0.0)).unwrap();
        model.add_element(Element::new("M1", "N1", "N2", 200.0, 1e-4, 0.01)).unwrap();
        model.add_load_case(LoadCase::dead()).unwrap();
        model
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut model = two_node_model();
        assert_eq!(
            model.add_node(Node::new("N1", 9.0, 9.0)),
            Err(FrameError::DuplicateName("N1".to_string()))
        );
        assert!(matches!(
            model.add_element(Element::new("M1", "N2", "N1", 200.0, 1e-4, 0.01)),
            Err(FrameError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let mut model = two_node_model();
        assert_eq!(
            model.add_node(Node::new("N3", 5.0, 0.0)),
            Err(FrameError::DuplicateNodePosition("N2".to_string(), "N3".to_string()))
        );
    }

    #[test]
    fn test_element_validation() {
        let mut model = two_node_model();
        assert!(matches!(
            model.add_element(Element::new("M2", "N1", "N9", 200.0, 1e-4, 0.01)),
            Err(FrameError::NodeNotFound(_))
        ));
        assert!(matches!(
            model.add_element(Element::new("M2", "N1", "N1", 200.0, 1e-4, 0.01)),
            Err(FrameError::DegenerateElement { .. })
        ));
        assert!(matches!(
            model.add_element(Element::new("M2", "N2", "N1", 200.0, 1e-4, -0.01)),
            Err(FrameError::DegenerateElement { .. })
        ));
    }

    #[test]
    fn test_load_validation() {
        let mut model = two_node_model();
        assert_eq!(
            model.add_node_load(NodeLoad::fy("N2", -10.0, "Live")),
            Err(FrameError::LoadCaseNotFound("Live".to_string()))
        );
        assert!(matches!(
            model.add_point_load(PointLoad::downward("M1", 6.0, 10.0, "Dead")),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert!(matches!(
            model.add_dist_load(DistributedLoad::new("M1", LoadDirection::LocalY, 1.0, 1.0, 3.0, 2.0, "Dead")),
            Err(FrameError::InvalidLoad { .. })
        ));
        model.add_point_load(PointLoad::downward("M1", 5.0, 10.0, "Dead")).unwrap();
        model.add_dist_load(DistributedLoad::uniform_downward("M1", 2.0, "Dead")).unwrap();
        assert_eq!(model.loads_for_case("Dead").count(), 2);
    }

    #[test]
    fn test_distributed_span_must_lie_on_element() {
        let mut model = two_node_model();
        let partial = |x1: f64, x2: f64| DistributedLoad::new("M1", LoadDirection::GlobalY, -10.0, -10.0, x1, x2, "Dead");

        // Start beyond the j-node with the default open end
        assert!(matches!(
            model.add_dist_load(partial(7.0, f64::INFINITY)),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert!(matches!(
            model.add_dist_load(partial(1.0, f64::NAN)),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert!(matches!(
            model.add_dist_load(partial(f64::NAN, 3.0)),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert!(matches!(
            model.add_dist_load(partial(0.0, f64::NEG_INFINITY)),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert!(matches!(
            model.add_dist_load(partial(1.0, 5.5)),
            Err(FrameError::InvalidLoad { .. })
        ));
        assert_eq!(model.loads().len(), 0);

        model.add_dist_load(partial(5.0, f64::INFINITY)).unwrap();
        model.add_dist_load(partial(1.0, 5.0)).unwrap();
        assert_eq!(model.loads().len(), 2);
    }

    #[test]
    fn test_deserialized_snapshot_is_validated() {
        let model = two_node_model();
        let mut json = serde_json::to_value(&model).unwrap();
        json["nodes"][1]["x"] = serde_json::json!(0.0);
        let broken: ModelSnapshot = serde_json::from_value(json).unwrap();
        assert!(matches!(
            broken.validate(DEFAULT_GEOMETRY_TOLERANCE),
            Err(FrameError::DuplicateNodePosition(..))
        ));
        assert!(model.validate(DEFAULT_GEOMETRY_TOLERANCE).is_ok());
    }

    #[test]
    fn test_dof_numbering_follows_node_order() {
        let model = two_node_model();
        assert_eq!(model.node_index("N2"), Some(1));
        assert_eq!(model.num_dofs(), 6);
    }
}
