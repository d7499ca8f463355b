//! Boundary condition enforcement
//!
//! Splits the global DOFs into free and constrained sets from each node's
//! support kind and partitions `K` and `F` accordingly. Constrained DOFs are
//! held at zero displacement.

use log::debug;

use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, Vec as FEVec};
use crate::model::{ModelSnapshot, DOFS_PER_NODE};

/// Free and constrained global DOF indices, both ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofPartition {
    pub free: Vec<usize>,
    pub constrained: Vec<usize>,
}

impl DofPartition {
    /// Partition the model's DOFs by support restraints
    ///
    /// Fails with `UnderconstrainedModel` when the supports cannot remove the
    /// three rigid-body motions of the plane (no X restraint, no Y restraint,
    /// or fewer than three restrained DOFs in total). Mechanisms that pass
    /// this count are caught by the pivot check in the solver.
    pub fn from_model(model: &ModelSnapshot) -> FrameResult<Self> {
        let mut free = Vec::new();
        let mut constrained = Vec::new();
        let mut restrained_per_axis = [0usize; DOFS_PER_NODE];

        for (idx, node) in model.nodes().iter().enumerate() {
            let base = idx * DOFS_PER_NODE;
            for local in node.support.restrained_dofs() {
                constrained.push(base + local);
                restrained_per_axis[local] += 1;
            }
            free.extend(node.support.free_dofs().into_iter().map(|local| base + local));
        }

        if restrained_per_axis[0] == 0 {
            return Err(FrameError::UnderconstrainedModel(
                "no support restrains translation in X".to_string(),
            ));
        }
        if restrained_per_axis[1] == 0 {
            return Err(FrameError::UnderconstrainedModel(
                "no support restrains translation in Y".to_string(),
            ));
        }
        if constrained.len() < 3 {
            return Err(FrameError::UnderconstrainedModel(format!(
                "only {} restrained DOFs, rigid-body rotation is free",
                constrained.len()
            )));
        }

        debug!("{} free DOFs, {} constrained DOFs", free.len(), constrained.len());

        Ok(Self { free, constrained })
    }
}

/// Partitioned stiffness matrix and load vector
#[derive(Debug, Clone)]
pub struct ReducedSystem {
    pub k_ff: Mat,
    pub k_fc: Mat,
    pub k_cf: Mat,
    pub k_cc: Mat,
    pub f_f: FEVec,
    pub f_c: FEVec,
}

impl ReducedSystem {
    /// Partition `K` and `F` into free/constrained blocks
    pub fn partition(k: &Mat, f: &FEVec, dofs: &DofPartition) -> Self {
        let block = |rows: &[usize], cols: &[usize]| {
            Mat::from_fn(rows.len(), cols.len(), |r, c| k[(rows[r], cols[c])])
        };
        let (free, constrained) = (&dofs.free, &dofs.constrained);

        Self {
            k_ff: block(free, free),
            k_fc: block(free, constrained),
            k_cf: block(constrained, free),
            k_cc: block(constrained, constrained),
            f_f: FEVec::from_fn(free.len(), |r, _| f[free[r]]),
            f_c: FEVec::from_fn(constrained.len(), |r, _| f[constrained[r]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Node, Support};

    fn beam(left: Support, right: Support) -> ModelSnapshot {
        let mut model = ModelSnapshot::new();
        model.add_node(Node::new("A", 0.0, 0.0).with_support(left)).unwrap();
        model.add_node(Node::new("B", 5.0, 0.0).with_support(right)).unwrap();
        model.add_element(Element::new("M1", "A", "B", 200.0, 1e-4, 0.01)).unwrap();
        model
    }

    #[test]
    fn test_simply_supported_partition() {
        let dofs = DofPartition::from_model(&beam(Support::Pinned, Support::RollerX)).unwrap();
        assert_eq!(dofs.constrained, vec![0, 1, 4]);
        assert_eq!(dofs.free, vec![2, 3, 5]);
    }

    #[test]
    fn test_underconstrained_supports() {
        assert!(matches!(
            DofPartition::from_model(&beam(Support::RollerX, Support::RollerX)),
            Err(FrameError::UnderconstrainedModel(_))
        ));
        assert!(matches!(
            DofPartition::from_model(&beam(Support::Pinned, Support::Free)),
            Err(FrameError::UnderconstrainedModel(_))
        ));
        assert!(matches!(
            DofPartition::from_model(&beam(Support::RollerY, Support::RollerY)),
            Err(FrameError::UnderconstrainedModel(_))
        ));
    }

    #[test]
    fn test_partition_blocks() {
        let k = Mat::from_fn(6, 6, |r, c| (r * 6 + c) as f64);
        let f = FEVec::from_fn(6, |r, _| r as f64);
        let dofs = DofPartition {
            free: vec![2, 3, 5],
            constrained: vec![0, 1, 4],
        };
        let reduced = ReducedSystem::partition(&k, &f, &dofs);
        assert_eq!(reduced.k_ff[(0, 1)], k[(2, 3)]);
        assert_eq!(reduced.k_fc[(2, 2)], k[(5, 4)]);
        assert_eq!(reduced.k_cf[(1, 0)], k[(1, 2)]);
        assert_eq!(reduced.k_cc[(2, 0)], k[(4, 0)]);
        assert_eq!(reduced.f_f.as_slice(), &[2.0, 3.0, 5.0]);
        assert_eq!(reduced.f_c.as_slice(), &[0.0, 1.0, 4.0]);
    }
}
