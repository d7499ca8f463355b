//! Element stiffness builder

use crate::elements::{Element, Node};
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat6, Vec6};

/// Geometry and stiffness of one element, in SI units
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStiffness {
    /// Element length (m)
    pub length: f64,
    /// Orientation of local x from global X (radians)
    pub angle: f64,
    /// Local stiffness matrix
    pub k_local: Mat6,
    /// Transformation matrix, `d_local = T * d_global`
    pub transform: Mat6,
    /// Global stiffness matrix, `Tᵀ * k_local * T`
    pub k_global: Mat6,
}

impl ElementStiffness {
    /// Build the stiffness of `element` spanning `i_node` → `j_node`
    ///
    /// Fails with `DegenerateElement` for coincident ends or a non-positive
    /// section property.
    pub fn build(element: &Element, i_node: &Node, j_node: &Node, tolerance: f64) -> FrameResult<Self> {
        let length = i_node.distance_to(j_node);
        if length <= tolerance {
            return Err(FrameError::DegenerateElement {
                element: element.name.clone(),
                reason: format!("zero length between '{}' and '{}'", i_node.name, j_node.name),
            });
        }
        if let Some(reason) = element.section_defect() {
            return Err(FrameError::DegenerateElement {
                element: element.name.clone(),
                reason,
            });
        }

        let angle = math::element_angle(&i_node.coords(), &j_node.coords());
        let k_local = math::element_local_stiffness(element.e_pa(), element.a, element.i, length);
        let transform = math::element_transformation_matrix(angle);
        let k_global = transform.transpose() * k_local * transform;

        Ok(Self {
            length,
            angle,
            k_local,
            transform,
            k_global,
        })
    }

    /// `(cos θ, sin θ)` of the element axis
    pub fn direction_cosines(&self) -> (f64, f64) {
        (self.angle.cos(), self.angle.sin())
    }

    /// Rotate a global end vector into local axes
    pub fn to_local(&self, global: &Vec6) -> Vec6 {
        self.transform * global
    }

    /// Rotate a local end vector into global axes
    pub fn to_global(&self, local: &Vec6) -> Vec6 {
        self.transform.transpose() * local
    }
}
