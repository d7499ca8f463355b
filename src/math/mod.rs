//! Mathematical utilities for 2D frame calculations
//!
//! Element DOF order everywhere is `[u_i, v_i, θ_i, u_j, v_j, θ_j]`.

use nalgebra::{DMatrix, DVector, Matrix6, Vector6};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec6 = Vector6<f64>;

/// 3-point Gauss-Legendre rule on [-1, 1] as (abscissa, weight)
const GAUSS_3: [(f64, f64); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// Orientation angle θ = atan2(Δy, Δx) of an element
pub fn element_angle(i_node: &[f64; 2], j_node: &[f64; 2]) -> f64 {
    (j_node[1] - i_node[1]).atan2(j_node[0] - i_node[0])
}

/// Compute the transformation matrix for a 2D frame element
///
/// # Arguments
/// * `angle` - Orientation of the local x-axis from global X (radians)
///
/// # Returns
/// 6x6 matrix `T` with `d_local = T * d_global`
pub fn element_transformation_matrix(angle: f64) -> Mat6 {
    let (s, c) = angle.sin_cos();

    #[rustfmt::skip]
    let data = [
        c,   s,   0.0, 0.0, 0.0, 0.0,
        -s,  c,   0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, c,   s,   0.0,
        0.0, 0.0, 0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the local stiffness matrix for a 2D beam-column element
///
/// # Arguments
/// * `e` - Modulus of elasticity (Pa)
/// * `a` - Cross-sectional area (m²)
/// * `i` - Second moment of area (m⁴)
/// * `length` - Element length (m)
pub fn element_local_stiffness(e: f64, a: f64, i: f64, length: f64) -> Mat6 {
    let l = length;
    let ea_l = e * a / l;
    let ei_l3 = e * i / (l * l * l);
    let ei_l2 = e * i / (l * l);
    let ei_l = e * i / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,  0.0,          0.0,         -ea_l, 0.0,          0.0,
        // Row 1: shear at i
        0.0,   12.0*ei_l3,   6.0*ei_l2,   0.0,   -12.0*ei_l3,  6.0*ei_l2,
        // Row 2: moment at i
        0.0,   6.0*ei_l2,    4.0*ei_l,    0.0,   -6.0*ei_l2,   2.0*ei_l,
        // Row 3: axial at j
        -ea_l, 0.0,          0.0,         ea_l,  0.0,          0.0,
        // Row 4: shear at j
        0.0,   -12.0*ei_l3,  -6.0*ei_l2,  0.0,   12.0*ei_l3,   -6.0*ei_l2,
        // Row 5: moment at j
        0.0,   6.0*ei_l2,    2.0*ei_l,    0.0,   -6.0*ei_l2,   4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute fixed end forces for a point load
///
/// Fixed end forces act on the element at its ends when both ends are
/// fully fixed.
///
/// # Arguments
/// * `p` - Load magnitude
/// * `a` - Distance from i-node to load
/// * `length` - Element length
/// * `direction` - Load direction index (0=x, 1=y in local coords)
pub fn fer_point_load(p: f64, a: f64, length: f64, direction: usize) -> Vec6 {
    let l = length;
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;

    let mut fer = Vec6::zeros();

    match direction {
        0 => {
            fer[0] = -p * b / l;
            fer[3] = -p * a / l;
        }
        1 => {
            fer[1] = -p * b * b * (3.0 * a + b) / l3;
            fer[2] = -p * a * b * b / l2;
            fer[4] = -p * a * a * (a + 3.0 * b) / l3;
            fer[5] = p * a * a * b / l2;
        }
        _ => {}
    }

    fer
}

/// Compute fixed end forces for a linearly varying load on `[x1, x2]`
///
/// Integrates [`fer_point_load`] over the loaded span. The integrand is a
/// quartic in the load position, so the 3-point Gauss rule is exact.
///
/// # Arguments
/// * `w1`, `w2` - Intensities at `x1` and `x2`
/// * `x1`, `x2` - Loaded span, measured from the i-node
/// * `length` - Element length
/// * `direction` - Load direction index (0=x, 1=y in local coords)
pub fn fer_linear_load(w1: f64, w2: f64, x1: f64, x2: f64, length: f64, direction: usize) -> Vec6 {
    let span = x2 - x1;
    if span <= 0.0 {
        return Vec6::zeros();
    }

    let half = span / 2.0;
    let mid = x1 + half;

    GAUSS_3.iter().fold(Vec6::zeros(), |acc, &(xi, weight)| {
        let s = mid + half * xi;
        let w = w1 + (w2 - w1) * (s - x1) / span;
        acc + fer_point_load(w, s, length, direction) * (weight * half)
    })
}

/// Cubic Hermite shape functions for transverse displacement
///
/// Returns weights for `[v_i, θ_i, v_j, θ_j]` at distance `x` from the i-node.
pub fn hermite_shape_functions(x: f64, length: f64) -> [f64; 4] {
    let xi = x / length;
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;
    [
        1.0 - 3.0 * xi2 + 2.0 * xi3,
        length * (xi - 2.0 * xi2 + xi3),
        3.0 * xi2 - 2.0 * xi3,
        length * (xi3 - xi2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let angle = element_angle(&[0.0, 0.0], &[10.0, 0.0]);
        let t = element_transformation_matrix(angle);
        assert_relative_eq!(t, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let angle = element_angle(&[0.0, 0.0], &[0.0, 4.0]);
        let t = element_transformation_matrix(angle);

        // local x = global Y, local y = -global X
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_is_orthogonal() {
        let t = element_transformation_matrix(0.7);
        assert_relative_eq!(t.transpose() * t, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = element_local_stiffness(200e9, 0.01, 1e-4, 5.0);
        assert_relative_eq!(k, k.transpose(), epsilon = 1e-6);
        assert_relative_eq!(k[(0, 0)], 200e9 * 0.01 / 5.0, max_relative = 1e-12);
        assert_relative_eq!(k[(2, 2)], 4.0 * 200e9 * 1e-4 / 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_local_stiffness_rigid_body_modes() {
        let k = element_local_stiffness(200e9, 0.01, 1e-4, 5.0);
        // Rigid rotation about the i-node: v = x * φ, θ = φ
        let rotation = Vec6::from_row_slice(&[0.0, 0.0, 1.0, 0.0, 5.0, 1.0]);
        assert_relative_eq!((k * rotation).norm(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fer_point_load_midspan() {
        let (p, l) = (-10.0, 6.0);
        let fer = fer_point_load(p, 3.0, l, 1);
        assert_relative_eq!(fer[1], 5.0, epsilon = 1e-12);
        assert_relative_eq!(fer[4], 5.0, epsilon = 1e-12);
        assert_relative_eq!(fer[2], -p * l / 8.0, epsilon = 1e-12);
        assert_relative_eq!(fer[5], p * l / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fer_uniform_load_full_length() {
        let (w, l) = (-4.0, 6.0);
        let fer = fer_linear_load(w, w, 0.0, l, l, 1);
        assert_relative_eq!(fer[1], -w * l / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[4], -w * l / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[2], -w * l * l / 12.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5], w * l * l / 12.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fer_triangular_load_full_length() {
        let (w, l) = (-9.0, 5.0);
        let fer = fer_linear_load(0.0, w, 0.0, l, l, 1);
        assert_relative_eq!(fer[1], -3.0 * w * l / 20.0, epsilon = 1e-10);
        assert_relative_eq!(fer[4], -7.0 * w * l / 20.0, epsilon = 1e-10);
        assert_relative_eq!(fer[2], -w * l * l / 30.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5], w * l * l / 20.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fer_axial_uniform_load() {
        let fer = fer_linear_load(2.0, 2.0, 0.0, 4.0, 4.0, 0);
        assert_relative_eq!(fer[0], -4.0, epsilon = 1e-12);
        assert_relative_eq!(fer[3], -4.0, epsilon = 1e-12);
        assert_eq!(fer[1], 0.0);
    }

    #[test]
    fn test_fer_empty_span() {
        assert_eq!(fer_linear_load(1.0, 1.0, 2.0, 2.0, 4.0, 1), Vec6::zeros());
    }

    #[test]
    fn test_hermite_end_values() {
        let l = 3.0;
        assert_eq!(hermite_shape_functions(0.0, l), [1.0, 0.0, 0.0, 0.0]);
        let at_j = hermite_shape_functions(l, l);
        assert_relative_eq!(at_j[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(at_j[0], 0.0, epsilon = 1e-12);
        let mid = hermite_shape_functions(1.5, l);
        assert_relative_eq!(mid[0] + mid[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(mid[1], l / 8.0, epsilon = 1e-12);
        assert_relative_eq!(mid[3], -l / 8.0, epsilon = 1e-12);
    }
}
