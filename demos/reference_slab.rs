use ptslab::{design_strands, DesignConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The reference slab: 8 m x 12 m x 0.40 m with tendons at 1 m centres
    let config = DesignConfig::default();

    // Run precheck, optimization and rounding in one go
    let design = design_strands(&config)?;

    // Print the strand count of every tendon
    for (x, strands) in design.tendon_layout() {
        println!("tendon at x = {x:.2} m: {strands} strands");
    }

    // Compare against every tendon stressed to its cap
    let takeoff = &design.takeoff;
    println!(
        "total {} strands ({:.1} kg), fully stressed {} strands ({:.1} kg)",
        takeoff.optimized_strands, takeoff.optimized_mass, takeoff.full_strands, takeoff.full_mass
    );

    if let Some(warning) = design.warning() {
        println!("warning: {warning}");
    }

    // All done
    Ok(())
}
