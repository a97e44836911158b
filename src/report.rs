use ptslab::{strand_force, DesignConfig, OptimizationError, StrandDesign};
use std::fmt;

/// Text rendering of a completed strand design.
struct DesignReport<'a> {
    /// Configuration the design was computed from.
    config: &'a DesignConfig,
    /// Result of the run.
    design: &'a StrandDesign,
}

impl fmt::Display for DesignReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        let design = self.design;
        let slab = &config.slab;

        writeln!(
            f,
            "Post-tensioned slab {:.2} m x {:.2} m x {:.3} m, {} tendons at {:.2} m",
            slab.width,
            slab.height,
            slab.thickness,
            design.tendon_positions.len(),
            config.tendons.spacing
        )?;
        writeln!(
            f,
            "Loads: dead {:.2} kPa, total {:.2} kPa, midspan moment {:.2} kN·m/m",
            design.loads.dead_load, design.loads.total_load, design.loads.midspan_moment
        )?;
        writeln!(
            f,
            "Target peak stress {:.3} MPa; one strand carries {:.1} kN ({:.5} MPa)",
            design.peak_stress,
            strand_force(&config.tendons),
            design.stress_per_strand
        )?;
        let dims = design.grid.dimensions();
        writeln!(
            f,
            "Control grid: {} x {} = {} points",
            dims.nx,
            dims.ny,
            dims.len()
        )?;

        let margin = design
            .precheck
            .induced
            .iter()
            .zip(design.target.values())
            .map(|(have, need)| have - need)
            .fold(f64::INFINITY, f64::min);
        writeln!(
            f,
            "Precheck passed with {} strands per tendon (smallest margin {:.3} MPa)",
            design.precheck.max_strands, margin
        )?;
        writeln!(
            f,
            "Linear program optimal after {} pivots, continuous total {:.3} strands",
            design.continuous.iterations, design.continuous.objective
        )?;
        match design.warning() {
            Some(warning) => writeln!(f, "WARNING: {warning}")?,
            None => writeln!(
                f,
                "All {} constraints satisfied after rounding",
                design.rounded.check.control_points
            )?,
        }

        writeln!(f, "Tendon layout:")?;
        writeln!(f, "  {:>8}  {:>10}  {:>7}", "x [m]", "continuous", "strands")?;
        for ((x, strands), continuous) in design
            .tendon_layout()
            .zip(design.continuous.strands.iter())
        {
            writeln!(f, "  {x:>8.2}  {continuous:>10.3}  {strands:>7}")?;
        }

        let takeoff = &design.takeoff;
        writeln!(
            f,
            "Steel: {} strands ({:.1} kg) against {} at full capacity ({:.1} kg), {:.1}% saved",
            takeoff.optimized_strands,
            takeoff.optimized_mass,
            takeoff.full_strands,
            takeoff.full_mass,
            100.0 * takeoff.reduction()
        )?;
        let (low, high) = design.stress_fields().range();
        write!(f, "Stress field range: {low:.3} to {high:.3} MPa")
    }
}

/// Render the gate messages, tendon table and steel takeoff of a design.
#[must_use]
pub fn render_design(config: &DesignConfig, design: &StrandDesign) -> String {
    DesignReport { config, design }.to_string()
}

/// Render a fatal error with a hint on how to proceed.
#[must_use]
pub fn render_failure(error: &OptimizationError) -> String {
    let hint = match error {
        OptimizationError::ModelingInfeasible { .. } => {
            "raise the strand cap, thicken the slab or increase the eccentricity"
        }
        OptimizationError::SolverFailure { .. } if error.is_timeout() => {
            "raise the time limit or coarsen the control grid"
        }
        OptimizationError::SolverFailure { .. } => "inspect the solver limits and tolerance",
        OptimizationError::InvalidConfiguration(_) | OptimizationError::InvalidProblem(_) => {
            "fix the configuration and retry"
        }
    };
    format!("Design failed: {error}\nHint: {hint}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptslab::{design_strands, SolverStatus};

    fn coarse_design() -> (DesignConfig, StrandDesign) {
        let mut config = DesignConfig::default();
        config.grid.target_points = 441;
        let design = design_strands(&config).expect("feasible");
        (config, design)
    }

    #[test]
    fn report_lists_every_gate() {
        let (config, design) = coarse_design();
        let report = render_design(&config, &design);
        assert!(report.contains("Post-tensioned slab 8.00 m x 12.00 m x 0.400 m, 8 tendons"));
        assert!(report.contains("Control grid: 17 x 25 = 425 points"));
        assert!(report.contains("Precheck passed with 10 strands per tendon"));
        assert!(report.contains("Linear program optimal"));
        assert!(report.contains("All 425 constraints satisfied after rounding"));
        assert!(report.contains("195.3 kN"));
        assert!(report.contains("(1130.4 kg)"));
    }

    #[test]
    fn report_has_one_row_per_tendon() {
        let (config, design) = coarse_design();
        let report = render_design(&config, &design);
        let rows = report
            .lines()
            .skip_while(|line| !line.starts_with("Tendon layout"))
            .skip(2)
            .take_while(|line| !line.starts_with("Steel"))
            .count();
        assert_eq!(rows, 8);
    }

    #[test]
    fn failure_carries_a_hint() {
        let timeout = OptimizationError::SolverFailure {
            status: SolverStatus::TimeLimit,
        };
        let text = render_failure(&timeout);
        assert!(text.contains("time limit reached"));
        assert!(text.contains("raise the time limit"));

        let infeasible = OptimizationError::ModelingInfeasible {
            violations: 3,
            control_points: 9,
            worst_deficit: 0.5,
        };
        assert!(render_failure(&infeasible).contains("raise the strand cap"));
    }
}
