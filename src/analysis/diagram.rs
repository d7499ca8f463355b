//! Diagram post-processor
//!
//! Rebuilds axial, shear, moment and deflection along an element from its
//! local end forces `k_local * d_local + fer` and the loads applied on it.
//! Conventions: axial tension positive, shear positive when the net
//! transverse force left of the cut acts in +y, moment sagging positive,
//! deflection positive in local +y.

use super::assembly::MemberLoad;
use super::stiffness::ElementStiffness;
use crate::math::{self, Vec6};
use crate::results::{DiagramPoint, ElementResult, MemberForces};
use crate::units::{m_to_mm, n_to_kn};

/// Number of equally spaced samples per element, ends included
pub const DIAGRAM_STATIONS: usize = 11;

/// Internal force functions of one solved element, SI units
#[derive(Debug, Clone)]
pub struct MemberDiagram<'a> {
    length: f64,
    ei: f64,
    d_local: Vec6,
    f_local: Vec6,
    fixed_end: Vec6,
    loads: &'a [MemberLoad],
}

impl<'a> MemberDiagram<'a> {
    /// # Arguments
    /// * `d_global` - Global end displacements `[u_i, v_i, θ_i, u_j, v_j, θ_j]`
    /// * `fixed_end` - Local fixed end forces of the element loads
    /// * `ei` - Flexural rigidity (N·m²)
    pub fn new(
        stiffness: &ElementStiffness,
        d_global: &Vec6,
        fixed_end: &Vec6,
        loads: &'a [MemberLoad],
        ei: f64,
    ) -> Self {
        let d_local = stiffness.to_local(d_global);
        let f_local = stiffness.k_local * d_local + fixed_end;
        Self {
            length: stiffness.length,
            ei,
            d_local,
            f_local,
            fixed_end: *fixed_end,
            loads,
        }
    }

    /// Local end forces acting on the element
    pub fn end_forces(&self) -> &Vec6 {
        &self.f_local
    }

    /// Axial force at `x` (N)
    pub fn axial(&self, x: f64) -> f64 {
        let applied: f64 = self
            .loads
            .iter()
            .map(|load| match *load {
                MemberLoad::Point { a, px, .. } if x > a => px,
                MemberLoad::Point { .. } => 0.0,
                MemberLoad::Distributed { x1, x2, qx1, qx2, .. } => macaulay(x1, x2, qx1, qx2, x, 0),
            })
            .sum();
        -self.f_local[0] - applied
    }

    /// Shear force at `x` (N)
    pub fn shear(&self, x: f64) -> f64 {
        self.f_local[1] + self.transverse_load_integral(x, 0)
    }

    /// Bending moment at `x` (N·m)
    pub fn moment(&self, x: f64) -> f64 {
        -self.f_local[2] + self.f_local[1] * x + self.transverse_load_integral(x, 1)
    }

    /// Transverse deflection at `x` (m)
    ///
    /// Hermite interpolation of the end displacements plus the deflection of
    /// the same element loads on a fixed-fixed span.
    pub fn deflection(&self, x: f64) -> f64 {
        let n = math::hermite_shape_functions(x, self.length);
        let d = &self.d_local;
        let homogeneous = n[0] * d[1] + n[1] * d[2] + n[2] * d[4] + n[3] * d[5];

        let fer = &self.fixed_end;
        let particular = (-fer[2] * x * x / 2.0
            + fer[1] * x.powi(3) / 6.0
            + self.transverse_load_integral(x, 3))
            / self.ei;

        homogeneous + particular
    }

    /// `∫ q(s) (x - s)^n / n! ds` over transverse loads left of `x`
    fn transverse_load_integral(&self, x: f64, n: i32) -> f64 {
        self.loads
            .iter()
            .map(|load| match *load {
                MemberLoad::Point { a, py, .. } if x > a => py * (x - a).powi(n) / factorial(n),
                MemberLoad::Point { .. } => 0.0,
                MemberLoad::Distributed { x1, x2, qy1, qy2, .. } => macaulay(x1, x2, qy1, qy2, x, n),
            })
            .sum()
    }

    /// Sample the diagram and collect maxima and end forces (kN, kNm, mm)
    pub fn to_result(&self) -> ElementResult {
        let diagram = (0..DIAGRAM_STATIONS)
            .map(|i| {
                let t = i as f64 / (DIAGRAM_STATIONS - 1) as f64;
                let x = t * self.length;
                DiagramPoint {
                    t,
                    moment: n_to_kn(self.moment(x)),
                    shear: n_to_kn(self.shear(x)),
                    axial: n_to_kn(self.axial(x)),
                    deflection: m_to_mm(self.deflection(x)),
                }
            })
            .collect();

        let forces: [f64; 6] = std::array::from_fn(|k| n_to_kn(self.f_local[k]));

        let mut result = ElementResult {
            forces_i: MemberForces::from_i_node_forces(&forces),
            forces_j: MemberForces::from_j_node_forces(&forces),
            diagram,
            ..Default::default()
        };
        result.refresh_maxima();
        result
    }
}

/// `∫ q(s) (x - s)^n / n! ds` for a linear load `q1 → q2` on `[x1, x2]`,
/// truncated at `x`
fn macaulay(x1: f64, x2: f64, q1: f64, q2: f64, x: f64, n: i32) -> f64 {
    let span = x2 - x1;
    if x <= x1 || span <= 0.0 {
        return 0.0;
    }

    let slope = (q2 - q1) / span;
    let u1 = x - x1;
    let u2 = (x - x2).max(0.0);
    let at_x = q1 + slope * u1;

    at_x * (u1.powi(n + 1) - u2.powi(n + 1)) / factorial(n + 1)
        - slope * (n + 1) as f64 * (u1.powi(n + 2) - u2.powi(n + 2)) / factorial(n + 2)
}

fn factorial(n: i32) -> f64 {
    (1..=n).map(f64::from).product()
}
