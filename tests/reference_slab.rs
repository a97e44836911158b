#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use ptslab::{
    design_peak_stress, design_strands, grid_dimensions, stress_per_strand, tendon_positions,
    DesignConfig, OptimizationError,
};

fn reference_config() -> DesignConfig {
    DesignConfig::default()
}

#[test]
fn reference_inputs_match_hand_calculation() {
    let config = reference_config();

    // (25 * 0.4 + 5) * 12² / 8 = 270 kN·m; 270 / (0.4² / 6) = 10125 kPa
    assert_relative_eq!(design_peak_stress(&config), 10.125, epsilon = 1e-9);
    // 150 mm² * 1860 MPa * 0.7 / (0.4 m * 1 m)
    assert_relative_eq!(
        stress_per_strand(&config.slab, &config.tendons),
        0.48825,
        epsilon = 1e-9
    );

    let tendons = tendon_positions(&config.slab, &config.tendons);
    assert_eq!(tendons.len(), 8);
    assert_relative_eq!(tendons[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(tendons[7], 7.5, epsilon = 1e-12);
}

#[test]
fn reference_grid_has_odd_dimensions() {
    let config = reference_config();
    let dims = grid_dimensions(config.grid.target_points, config.slab.aspect_ratio());

    assert_eq!(dims.ny, 123);
    assert_eq!(dims.nx, 81);
    assert_eq!(dims.len(), 9_963);
}

#[test]
fn reference_design_saves_steel() {
    let config = reference_config();
    let design = design_strands(&config).expect("reference slab is feasible at ten strands");

    assert!(design.precheck.check.is_satisfied());
    assert_eq!(design.grid.len(), 9_963);
    assert!(design.continuous.objective < 8.0 * 10.0);
    assert!(design.warning().is_none());
    assert!(design.rounded.check.is_satisfied());

    let strands = design.strands();
    assert_eq!(strands.len(), 8);
    assert!(strands.iter().all(|&count| (1..=10).contains(&count)));
    // the outer tendons see neighbours on one side only
    assert!(strands[0] >= strands[3]);
    assert!(strands[7] >= strands[4]);

    assert_eq!(design.takeoff.full_strands, 80);
    assert_relative_eq!(design.takeoff.full_mass, 1130.4, epsilon = 1e-6);
    assert!(design.takeoff.reduction() > 0.0);
}

#[test]
fn one_strand_per_tendon_is_infeasible() {
    let config = reference_config().with_max_strands(1);

    match design_strands(&config) {
        Err(OptimizationError::ModelingInfeasible {
            violations,
            control_points,
            worst_deficit,
        }) => {
            assert_eq!(control_points, 9_963);
            assert!(violations > 0);
            assert!(worst_deficit > 0.0);
        }
        other => panic!("expected modeling infeasibility, got {other:?}"),
    }
}
