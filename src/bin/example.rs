//! Frame Solver Example - Simple Portal Frame

use frame2d_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Portal Frame ===\n");

    // Create a new model
    let mut model = ModelSnapshot::new();

    // Create a simple portal frame
    //
    //     N2 -------- N3
    //     |          |
    //     |          |
    //     |          |
    //     N1        N4
    //     ^          ^
    //   Fixed     Pinned
    //

    // Add nodes (in meters)
    let height = 4.0; // 4m column height
    let span = 6.0; // 6m beam span

    model.add_node(Node::new("N1", 0.0, 0.0).with_support(Support::Fixed))?;
    model.add_node(Node::new("N2", 0.0, height))?;
    model.add_node(Node::new("N3", span, height))?;
    model.add_node(Node::new("N4", span, 0.0).with_support(Support::Pinned))?;

    // Add elements: steel (200 GPa), I and A of a medium universal beam
    let (e, i, a) = (200.0, 8.49e-5, 4.94e-3);
    model.add_element(Element::new("Col1", "N1", "N2", e, i, a))?;
    model.add_element(Element::new("Beam", "N2", "N3", e, i, a))?;
    model.add_element(Element::new("Col2", "N4", "N3", e, i, a))?;

    // Dead load case: 20 kN/m on beam (negative Y = downward)
    model.add_load_case(LoadCase::with_description("Dead", "Self weight and finishes"))?;
    model.add_dist_load(DistributedLoad::uniform_downward("Beam", 20.0, "Dead"))?;

    // Wind load case: 10 kN at roof level plus 2 kN/m on the windward column
    model.add_load_case(LoadCase::wind())?;
    model.add_node_load(NodeLoad::fx("N2", 10.0, "Wind"))?;
    model.add_dist_load(DistributedLoad::uniform("Col1", LoadDirection::GlobalX, 2.0, "Wind"))?;

    // Add load combinations
    model.add_load_combo(LoadCombination::lrfd_dead_only())?;
    model.add_load_combo(
        LoadCombination::new("1.2D + 1.0W")
            .with_case("Dead", 1.2)
            .with_case("Wind", 1.0)
            .with_description("Strength: dead plus wind"),
    )?;

    // Run analysis
    println!("Running linear analysis...\n");
    let mut manager = AnalysisManager::new(model);
    let status = manager.run_analysis()?;
    println!(
        "Solved {}/{} load cases, {}/{} combinations\n",
        status.successful_cases, status.total_cases, status.successful_combinations, status.total_combinations
    );

    // Print results for each load case and combination
    let names: Vec<String> = manager
        .model()
        .load_cases()
        .iter()
        .map(|c| c.name.clone())
        .chain(manager.model().load_combos().iter().map(|c| c.name.clone()))
        .collect();

    for name in &names {
        let Some(result) = manager.result(name) else {
            println!("=== {}: no results available ===\n", name);
            continue;
        };
        println!("=== Results for {} ===\n", name);

        // Node displacements
        println!("Node Displacements:");
        for (node_name, node) in &result.nodes {
            let disp = node.displacement;
            println!(
                "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
                node_name, disp.dx, disp.dy, disp.rz
            );
        }

        // Reactions
        println!("\nSupport Reactions:");
        for (node_name, node) in &result.nodes {
            if let Some(rxn) = node.reactions {
                println!(
                    "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
                    node_name, rxn.fx, rxn.fy, rxn.mz
                );
            }
        }

        // Element forces
        println!("\nElement Forces:");
        for (element_name, element) in &result.elements {
            println!(
                "  {}: P={:.2}kN, Vmax={:.2}kN, Mmax={:.2}kN·m",
                element_name, element.forces_i.axial, element.max_shear, element.max_moment
            );
        }

        // Summary
        let summary = result.summary();
        println!("\nSummary:");
        println!("  Max displacement: {:.4}mm at {}", summary.max_displacement, summary.max_disp_node);
        println!("  Max reaction: {:.2}kN at {}", summary.max_reaction, summary.max_reaction_node);
        println!("  Max axial: {:.2}kN in {}", summary.max_axial, summary.max_axial_element);
        println!("  Max moment: {:.2}kN·m in {}", summary.max_moment, summary.max_moment_element);
        println!();
    }

    // Moment diagram of the beam under the governing combination
    if let Some(beam) = manager.result("1.2D + 1.0W").and_then(|r| r.element("Beam")) {
        println!("=== Beam diagram (1.2D + 1.0W) ===\n");
        println!("  {:>5} {:>10} {:>10} {:>10} {:>10}", "t", "M kN·m", "V kN", "N kN", "v mm");
        for p in &beam.diagram {
            println!(
                "  {:>5.2} {:>10.2} {:>10.2} {:>10.2} {:>10.3}",
                p.t, p.moment, p.shear, p.axial, p.deflection
            );
        }
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
