//! Global assembler
//!
//! Builds the global stiffness matrix once per model snapshot and one load
//! vector per load case. Element loads become fixed end forces, which are
//! negated into the load vector as equivalent nodal loads and kept (in
//! local axes, not negated) for the diagram post-processor.

use log::debug;

use super::stiffness::ElementStiffness;
use super::AnalysisOptions;
use crate::error::{FrameError, FrameResult};
use crate::loads::Load;
use crate::math::{self, Mat, Vec as FEVec, Vec6};
use crate::model::{ModelSnapshot, DOFS_PER_NODE};
use crate::units::kn_to_n;

/// Global stiffness matrix and per-element stiffness for one snapshot
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Global stiffness matrix (3N x 3N), N/m, N and N·m units
    pub k: Mat,
    /// Element stiffness, in model element order
    pub elements: Vec<ElementStiffness>,
    /// Global DOF indices of each element's end DOFs
    pub element_dofs: Vec<[usize; 6]>,
}

impl Assembly {
    /// Total number of DOFs
    pub fn num_dofs(&self) -> usize {
        self.k.nrows()
    }
}

/// Global DOF indices `[X, Y, RZ]` of a node
pub fn node_dofs(node_index: usize) -> [usize; 3] {
    let base = node_index * DOFS_PER_NODE;
    [base, base + 1, base + 2]
}

/// Build every element stiffness and scatter it into the global matrix
pub fn assemble(model: &ModelSnapshot, options: &AnalysisOptions) -> FrameResult<Assembly> {
    let n_dofs = model.num_dofs();
    let mut k = Mat::zeros(n_dofs, n_dofs);
    let mut elements = Vec::with_capacity(model.elements().len());
    let mut element_dofs = Vec::with_capacity(model.elements().len());

    for element in model.elements() {
        let i_idx = model
            .node_index(&element.i_node)
            .ok_or_else(|| FrameError::NodeNotFound(element.i_node.clone()))?;
        let j_idx = model
            .node_index(&element.j_node)
            .ok_or_else(|| FrameError::NodeNotFound(element.j_node.clone()))?;

        let stiffness = ElementStiffness::build(
            element,
            &model.nodes()[i_idx],
            &model.nodes()[j_idx],
            options.geometry_tolerance,
        )?;

        let [i0, i1, i2] = node_dofs(i_idx);
        let [j0, j1, j2] = node_dofs(j_idx);
        let dofs = [i0, i1, i2, j0, j1, j2];

        for a in 0..6 {
            for b in 0..6 {
                k[(dofs[a], dofs[b])] += stiffness.k_global[(a, b)];
            }
        }

        debug!(
            "element '{}': L={:.4} m, angle={:.4} rad, dofs={:?}",
            element.name, stiffness.length, stiffness.angle, dofs
        );

        elements.push(stiffness);
        element_dofs.push(dofs);
    }

    debug!("assembled {} elements into {}x{} stiffness", elements.len(), n_dofs, n_dofs);

    Ok(Assembly {
        k,
        elements,
        element_dofs,
    })
}

/// A load on an element, resolved into local components and SI units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberLoad {
    /// Concentrated load at `a` from the i-node (N)
    Point { a: f64, px: f64, py: f64 },
    /// Linearly varying load on `[x1, x2]` (N/m)
    Distributed {
        x1: f64,
        x2: f64,
        qx1: f64,
        qx2: f64,
        qy1: f64,
        qy2: f64,
    },
}

impl MemberLoad {
    /// Local fixed end forces of this load on an element of the given length
    pub fn fixed_end_forces(&self, length: f64) -> Vec6 {
        match *self {
            MemberLoad::Point { a, px, py } => {
                math::fer_point_load(px, a, length, 0) + math::fer_point_load(py, a, length, 1)
            }
            MemberLoad::Distributed {
                x1,
                x2,
                qx1,
                qx2,
                qy1,
                qy2,
            } => {
                math::fer_linear_load(qx1, qx2, x1, x2, length, 0)
                    + math::fer_linear_load(qy1, qy2, x1, x2, length, 1)
            }
        }
    }
}

/// Load vector and element load data for one load case
#[derive(Debug, Clone)]
pub struct CaseLoads {
    /// Load case name
    pub case: String,
    /// Global load vector including equivalent nodal loads (N, N·m)
    pub f: FEVec,
    /// Local fixed end forces per element (not negated)
    pub fixed_end: Vec<Vec6>,
    /// Resolved element loads per element
    pub member_loads: Vec<Vec<MemberLoad>>,
}

/// Build the global load vector of one load case
pub fn build_case_loads(model: &ModelSnapshot, assembly: &Assembly, case: &str) -> FrameResult<CaseLoads> {
    if model.load_case(case).is_none() {
        return Err(FrameError::LoadCaseNotFound(case.to_string()));
    }

    let n_elements = assembly.elements.len();
    let mut f = FEVec::zeros(assembly.num_dofs());
    let mut fixed_end = vec![Vec6::zeros(); n_elements];
    let mut member_loads: Vec<Vec<MemberLoad>> = vec![Vec::new(); n_elements];

    for load in model.loads_for_case(case) {
        let (e_idx, member_load) = match load {
            Load::Nodal(l) => {
                let idx = model
                    .node_index(&l.node)
                    .ok_or_else(|| FrameError::NodeNotFound(l.node.clone()))?;
                for (dof, value) in node_dofs(idx).iter().zip(l.as_array()) {
                    f[*dof] += kn_to_n(value);
                }
                continue;
            }
            Load::Distributed(l) => {
                let e_idx = model
                    .element_index(&l.element)
                    .ok_or_else(|| FrameError::ElementNotFound(l.element.clone()))?;
                let stiffness = &assembly.elements[e_idx];
                let (c, s) = stiffness.direction_cosines();
                let (ux, uy) = l.direction.local_components(c, s);
                let (x1, x2) = l.span(stiffness.length);
                let x1 = x1.clamp(0.0, stiffness.length);
                let x2 = x2.clamp(x1, stiffness.length);
                let (w1, w2) = (kn_to_n(l.w1), kn_to_n(l.w2));
                (
                    e_idx,
                    MemberLoad::Distributed {
                        x1,
                        x2,
                        qx1: w1 * ux,
                        qx2: w2 * ux,
                        qy1: w1 * uy,
                        qy2: w2 * uy,
                    },
                )
            }
            Load::ElementPoint(l) => {
                let e_idx = model
                    .element_index(&l.element)
                    .ok_or_else(|| FrameError::ElementNotFound(l.element.clone()))?;
                let stiffness = &assembly.elements[e_idx];
                let (c, s) = stiffness.direction_cosines();
                let (ux, uy) = l.direction.local_components(c, s);
                let p = kn_to_n(l.magnitude);
                (
                    e_idx,
                    MemberLoad::Point {
                        a: l.distance.clamp(0.0, stiffness.length),
                        px: p * ux,
                        py: p * uy,
                    },
                )
            }
        };

        fixed_end[e_idx] += member_load.fixed_end_forces(assembly.elements[e_idx].length);
        member_loads[e_idx].push(member_load);
    }

    // Equivalent nodal loads are the negated fixed end forces
    for (e_idx, fer) in fixed_end.iter().enumerate() {
        if fer.iter().all(|v| *v == 0.0) {
            continue;
        }
        let fer_global = assembly.elements[e_idx].to_global(fer);
        for (a, &dof) in assembly.element_dofs[e_idx].iter().enumerate() {
            f[dof] -= fer_global[a];
        }
    }

    debug!(
        "case '{}': {} element loads, |F| = {:.3e}",
        case,
        member_loads.iter().map(Vec::len).sum::<usize>(),
        f.norm()
    );

    Ok(CaseLoads {
        case: case.to_string(),
        f,
        fixed_end,
        member_loads,
    })
}
