//! Unit conversions between the model boundary and the solver internals
//!
//! The boundary speaks engineering units (kN, kNm, kN/m, GPa, mm), while
//! assembly and the linear solve run in SI base units (N, N·m, Pa, m).

/// kN -> N
pub const KN_TO_N: f64 = 1.0e3;

/// GPa -> Pa
pub const GPA_TO_PA: f64 = 1.0e9;

/// m -> mm
pub const M_TO_MM: f64 = 1.0e3;

/// Convert a force (kN) or moment (kNm) to N / N·m
#[inline]
pub fn kn_to_n(value: f64) -> f64 {
    value * KN_TO_N
}

/// Convert a force (N) or moment (N·m) back to kN / kNm
#[inline]
pub fn n_to_kn(value: f64) -> f64 {
    value / KN_TO_N
}

/// Convert a Young's modulus from GPa to Pa
#[inline]
pub fn gpa_to_pa(value: f64) -> f64 {
    value * GPA_TO_PA
}

/// Convert a length from m to mm
#[inline]
pub fn m_to_mm(value: f64) -> f64 {
    value * M_TO_MM
}
