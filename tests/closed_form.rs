use approx::assert_relative_eq;
use frame2d_solver::prelude::*;

// Steel section: E = 200 GPa, I = 8e-5 m⁴, A = 5e-3 m²
const E: f64 = 200.0;
const I: f64 = 8.0e-5;
const A: f64 = 5.0e-3;
const EI: f64 = 200.0e9 * 8.0e-5;

fn beam(length: f64, left: Support, right: Support) -> ModelSnapshot {
    let mut model = ModelSnapshot::new();
    model.add_node(Node::new("A", 0.0, 0.0).with_support(left)).unwrap();
    model.add_node(Node::new("B", length, 0.0).with_support(right)).unwrap();
    model.add_element(Element::new("M1", "A", "B", E, I, A)).unwrap();
    model.add_load_case(LoadCase::dead()).unwrap();
    model
}

fn solve(model: ModelSnapshot) -> AnalysisResult {
    let mut manager = AnalysisManager::new(model);
    manager.run_case("Dead").unwrap().clone()
}

#[test]
fn simply_supported_central_point_load() {
    let (l, p) = (6.0, 20.0);
    let mut model = beam(l, Support::Pinned, Support::RollerX);
    model.add_point_load(PointLoad::downward("M1", l / 2.0, p, "Dead")).unwrap();
    let result = solve(model);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.max_moment, p * l / 4.0, max_relative = 1e-3);
    assert_relative_eq!(m1.max_shear, p / 2.0, max_relative = 1e-3);

    // Station 5 sits at midspan
    let mid = m1.diagram[5];
    assert_relative_eq!(mid.t, 0.5);
    assert_relative_eq!(mid.moment, p * l / 4.0, max_relative = 1e-3);
    let expected_mm = -(p * 1e3) * l.powi(3) / (48.0 * EI) * 1e3;
    assert_relative_eq!(mid.deflection, expected_mm, max_relative = 1e-3);

    let ra = result.node("A").unwrap().reactions.unwrap();
    let rb = result.node("B").unwrap().reactions.unwrap();
    assert_relative_eq!(ra.fy, p / 2.0, max_relative = 1e-9);
    assert_relative_eq!(rb.fy, p / 2.0, max_relative = 1e-9);
    assert_relative_eq!(ra.fx, 0.0, epsilon = 1e-9);

    // Supports do not deflect; end moments vanish
    assert_relative_eq!(m1.diagram[0].deflection, 0.0, epsilon = 1e-9);
    assert_relative_eq!(m1.diagram[10].deflection, 0.0, epsilon = 1e-9);
    assert_relative_eq!(m1.diagram[0].moment, 0.0, epsilon = 1e-6);
    assert_relative_eq!(m1.diagram[10].moment, 0.0, epsilon = 1e-6);
}

#[test]
fn cantilever_tip_load() {
    let (l, p) = (4.0, 10.0);
    let mut model = beam(l, Support::Fixed, Support::Free);
    model.add_node_load(NodeLoad::fy("B", -p, "Dead")).unwrap();
    let result = solve(model);

    let tip = result.node("B").unwrap();
    let p_n = p * 1e3;
    assert_relative_eq!(tip.displacement.dy, -p_n * l.powi(3) / (3.0 * EI) * 1e3, max_relative = 1e-6);
    assert_relative_eq!(tip.displacement.rz, -p_n * l * l / (2.0 * EI), max_relative = 1e-6);
    assert!(tip.reactions.is_none());

    let base = result.node("A").unwrap().reactions.unwrap();
    assert_relative_eq!(base.fy, p, max_relative = 1e-9);
    assert_relative_eq!(base.mz, p * l, max_relative = 1e-9);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.max_moment, p * l, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[0].moment, -p * l, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[10].deflection, tip.displacement.dy, max_relative = 1e-9);
}

#[test]
fn fixed_fixed_uniform_load_without_free_dofs() {
    let (l, w) = (5.0, 12.0);
    let mut model = beam(l, Support::Fixed, Support::Fixed);
    model.add_dist_load(DistributedLoad::uniform_downward("M1", w, "Dead")).unwrap();
    let result = solve(model);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.diagram[0].moment, -w * l * l / 12.0, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[5].moment, w * l * l / 24.0, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[10].moment, -w * l * l / 12.0, max_relative = 1e-9);
    assert_relative_eq!(
        m1.diagram[5].deflection,
        -(w * 1e3) * l.powi(4) / (384.0 * EI) * 1e3,
        max_relative = 1e-9
    );

    let ra = result.node("A").unwrap().reactions.unwrap();
    let rb = result.node("B").unwrap().reactions.unwrap();
    assert_relative_eq!(ra.fy, w * l / 2.0, max_relative = 1e-9);
    assert_relative_eq!(rb.fy, w * l / 2.0, max_relative = 1e-9);
    assert_relative_eq!(ra.mz, w * l * l / 12.0, max_relative = 1e-9);
    assert_relative_eq!(rb.mz, -w * l * l / 12.0, max_relative = 1e-9);
}

#[test]
fn inclined_cantilever() {
    // 3-4-5 member, fixed at the base, 10 kN down at the tip
    let mut model = ModelSnapshot::new();
    model.add_node(Node::new("A", 0.0, 0.0).with_support(Support::Fixed)).unwrap();
    model.add_node(Node::new("B", 3.0, 4.0)).unwrap();
    model.add_element(Element::new("M1", "A", "B", E, I, A)).unwrap();
    model.add_load_case(LoadCase::dead()).unwrap();
    model.add_node_load(NodeLoad::fy("B", -10.0, "Dead")).unwrap();
    let result = solve(model);

    // Local components: 8 kN axial compression, 6 kN transverse
    let u = -8_000.0 * 5.0 / (200.0e9 * A);
    let v = -6_000.0 * 125.0 / (3.0 * EI);
    let tip = result.node("B").unwrap().displacement;
    assert_relative_eq!(tip.dx, (0.6 * u - 0.8 * v) * 1e3, max_relative = 1e-6);
    assert_relative_eq!(tip.dy, (0.8 * u + 0.6 * v) * 1e3, max_relative = 1e-6);

    let base = result.node("A").unwrap().reactions.unwrap();
    assert_relative_eq!(base.fy, 10.0, max_relative = 1e-9);
    assert_relative_eq!(base.mz, 30.0, max_relative = 1e-9);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.max_axial, 8.0, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[3].axial, -8.0, max_relative = 1e-9);
    assert_relative_eq!(m1.max_moment, 30.0, max_relative = 1e-9);
}

#[test]
fn simply_supported_triangular_load() {
    // 0 → 9 kN/m over 6 m: 27 kN resultant at 4 m
    let l = 6.0;
    let mut model = beam(l, Support::Pinned, Support::RollerX);
    model
        .add_dist_load(DistributedLoad::triangular("M1", LoadDirection::GlobalY, -9.0, 0.0, l, "Dead"))
        .unwrap();
    let result = solve(model);

    assert_relative_eq!(result.node("A").unwrap().reactions.unwrap().fy, 9.0, max_relative = 1e-9);
    assert_relative_eq!(result.node("B").unwrap().reactions.unwrap().fy, 18.0, max_relative = 1e-9);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.diagram[0].shear, 9.0, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[10].shear, -18.0, max_relative = 1e-9);
    // M(x) = 9x - x³/4 at x = 3
    assert_relative_eq!(m1.diagram[5].moment, 27.0 - 6.75, max_relative = 1e-9);
}

#[test]
fn cantilever_partial_uniform_load() {
    // 5 kN/m on [1, 3] of a 4 m cantilever
    let mut model = beam(4.0, Support::Fixed, Support::Free);
    model
        .add_dist_load(DistributedLoad::new("M1", LoadDirection::GlobalY, -5.0, -5.0, 1.0, 3.0, "Dead"))
        .unwrap();
    let result = solve(model);

    let base = result.node("A").unwrap().reactions.unwrap();
    assert_relative_eq!(base.fy, 10.0, max_relative = 1e-9);
    assert_relative_eq!(base.mz, 20.0, max_relative = 1e-9);

    let m1 = result.element("M1").unwrap();
    assert_relative_eq!(m1.diagram[0].moment, -20.0, max_relative = 1e-9);
    // x = 2.0: half the load is left of the cut
    assert_relative_eq!(m1.diagram[5].shear, 5.0, max_relative = 1e-9);
    assert_relative_eq!(m1.diagram[10].shear, 0.0, epsilon = 1e-9);
    assert_relative_eq!(m1.diagram[10].moment, 0.0, epsilon = 1e-9);
}
