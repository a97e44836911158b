use ptslab::{design_strands, DesignConfig, OptimizationError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A coarser grid keeps the sweep quick
    let mut base = DesignConfig::default();
    base.grid.target_points = 2_500;

    // Each run gets its own configuration, nothing is shared between them
    for max_strands in 1..=12 {
        let config = base.with_max_strands(max_strands);
        match design_strands(&config) {
            Ok(design) => println!(
                "cap {max_strands:>2}: {:>3} strands, LP bound {:.2}, {:.1}% steel saved",
                design.rounded.total(),
                design.continuous.objective,
                100.0 * design.takeoff.reduction()
            ),
            Err(OptimizationError::ModelingInfeasible {
                violations,
                control_points,
                ..
            }) => println!("cap {max_strands:>2}: infeasible at {violations} of {control_points} points"),
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}
