//! Linear solver
//!
//! Dense LU with partial pivoting on the free-DOF block, then reactions
//! from the constrained rows.

use log::{debug, warn};

use super::boundary::{DofPartition, ReducedSystem};
use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, Vec as FEVec};
use crate::model::DOFS_PER_NODE;

/// Displacements and reactions over the full DOF set, SI units
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Displacements (m, rad), zero at constrained DOFs
    pub displacements: FEVec,
    /// Reactions (N, N·m), zero at free DOFs
    pub reactions: FEVec,
}

/// Solve `Kff * Uf = Ff` and recover `Rc = Kcf * Uf - Fc`
///
/// A pivot with `|pivot| <= pivot_tolerance * max|Kff|` fails with
/// `SingularMatrix`, naming the free DOF whose column lost rank.
pub fn solve(
    reduced: &ReducedSystem,
    dofs: &DofPartition,
    n_dofs: usize,
    pivot_tolerance: f64,
) -> FrameResult<Solution> {
    let n_free = dofs.free.len();
    let mut displacements = FEVec::zeros(n_dofs);
    let mut reactions = FEVec::zeros(n_dofs);

    let u_f = if n_free == 0 {
        FEVec::zeros(0)
    } else {
        solve_free(&reduced.k_ff, &reduced.f_f, &dofs.free, pivot_tolerance)?
    };

    for (r, &dof) in dofs.free.iter().enumerate() {
        displacements[dof] = u_f[r];
    }

    let r_c = &reduced.k_cf * &u_f - &reduced.f_c;
    for (r, &dof) in dofs.constrained.iter().enumerate() {
        reactions[dof] = r_c[r];
    }

    Ok(Solution {
        displacements,
        reactions,
    })
}

fn solve_free(k_ff: &Mat, f_f: &FEVec, free: &[usize], pivot_tolerance: f64) -> FrameResult<FEVec> {
    let norm = k_ff.amax();
    let threshold = pivot_tolerance * norm;

    let lu = k_ff.clone().lu();
    let u = lu.u();
    for (i, &dof) in free.iter().enumerate() {
        let pivot = u[(i, i)];
        if norm == 0.0 || !pivot.is_finite() || pivot.abs() <= threshold {
            debug!("pivot {} at free DOF {} below threshold {:.3e}", pivot, dof, threshold);
            return Err(FrameError::SingularMatrix { dof, pivot });
        }
    }

    lu.solve(f_f).ok_or(FrameError::SingularMatrix {
        dof: free[0],
        pivot: 0.0,
    })
}

impl Solution {
    /// Out-of-balance `[ΣFx, ΣFy, ΣMz]` of applied loads plus reactions
    ///
    /// `f` is the global load vector (equivalent nodal loads included) and
    /// moments are taken about the global origin.
    pub fn statics_residual(&self, f: &FEVec, coords: &[[f64; 2]]) -> [f64; 3] {
        let mut residual = [0.0; 3];
        for (idx, [x, y]) in coords.iter().enumerate() {
            let base = idx * DOFS_PER_NODE;
            let fx = f[base] + self.reactions[base];
            let fy = f[base + 1] + self.reactions[base + 1];
            let mz = f[base + 2] + self.reactions[base + 2];
            residual[0] += fx;
            residual[1] += fy;
            residual[2] += x * fy - y * fx + mz;
        }
        residual
    }

    /// Check global equilibrium, warning when it is violated
    pub fn check_statics(&self, case: &str, f: &FEVec, coords: &[[f64; 2]], tolerance: f64) -> bool {
        let residual = self.statics_residual(f, coords);
        let force_scale = f.amax().max(self.reactions.amax());
        let length_scale = coords
            .iter()
            .flat_map(|c| c.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));

        let limits = [
            tolerance * force_scale,
            tolerance * force_scale,
            tolerance * force_scale * length_scale,
        ];
        let balanced = residual.iter().zip(limits).all(|(r, limit)| r.abs() <= limit);

        if !balanced {
            warn!(
                "case '{}' out of balance: ΣFx={:.3e} N, ΣFy={:.3e} N, ΣMz={:.3e} N·m",
                case, residual[0], residual[1], residual[2]
            );
        }
        balanced
    }
}
