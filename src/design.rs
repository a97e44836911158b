//! End-to-end strand design: grid, influence, targets, precheck, optimization and
//! rounding.

use ndarray::Array1;

use crate::config::DesignConfig;
use crate::errors::{OptimizationError, RoundingInconsistency};
use crate::geometry::{tendon_positions, ControlGrid};
use crate::influence::{InfluenceMatrix, InfluenceModel};
use crate::lp::LinProgError;
use crate::loads::{design_peak_stress, peak_stress, stress_per_strand, LoadSummary};
use crate::optimizer::{optimize_strands, StrandSolution};
use crate::precheck::{precheck, PrecheckReport};
use crate::rounding::{round_strands, RoundedStrands};
use crate::takeoff::SteelTakeoff;
use crate::target::TargetField;

/// Everything produced by a successful design run.
#[derive(Clone, Debug, PartialEq)]
pub struct StrandDesign {
    /// Tendon X positions in metres.
    pub tendon_positions: Vec<f64>,
    /// Control lattice.
    pub grid: ControlGrid,
    /// Beam estimate of the service loads.
    pub loads: LoadSummary,
    /// Peak target stress actually used in MPa.
    pub peak_stress: f64,
    /// Stress added by one strand in MPa.
    pub stress_per_strand: f64,
    /// Target stress field.
    pub target: TargetField,
    /// Fully stressed baseline.
    pub precheck: PrecheckReport,
    /// Continuous optimum.
    pub continuous: StrandSolution,
    /// Integer layout and its verification.
    pub rounded: RoundedStrands,
    /// Steel quantities.
    pub takeoff: SteelTakeoff,
}

/// Per-point stress fields with their coordinates, ready for plotting.
#[derive(Clone, Debug, PartialEq)]
pub struct StressFields {
    /// X coordinate of every control point.
    pub x: Vec<f64>,
    /// Y coordinate of every control point.
    pub y: Vec<f64>,
    /// Service stress to offset.
    pub target: Array1<f64>,
    /// Stress induced by the rounded layout.
    pub induced: Array1<f64>,
    /// Target minus induced.
    pub residual: Array1<f64>,
}

impl StressFields {
    /// Smallest and largest value over all three fields, for a shared colour scale.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.target
            .iter()
            .chain(self.induced.iter())
            .chain(self.residual.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &value| {
                (low.min(value), high.max(value))
            })
    }
}

impl StrandDesign {
    /// Integer strand count per tendon.
    #[must_use]
    pub fn strands(&self) -> &[u32] {
        &self.rounded.strands
    }

    /// Rounding warning, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&RoundingInconsistency> {
        self.rounded.warning.as_ref()
    }

    /// Tendon positions paired with their strand counts.
    pub fn tendon_layout(&self) -> impl Iterator<Item = (f64, u32)> + '_ {
        self.tendon_positions
            .iter()
            .copied()
            .zip(self.rounded.strands.iter().copied())
    }

    /// Target, induced and residual stresses with point coordinates.
    #[must_use]
    pub fn stress_fields(&self) -> StressFields {
        StressFields {
            x: self.grid.x_coordinates(),
            y: self.grid.y_coordinates(),
            target: self.target.values().clone(),
            induced: self.rounded.induced.clone(),
            residual: self.rounded.residual.clone(),
        }
    }
}

/// Run the full pipeline with the closed-form target field and influence model.
///
/// # Errors
///
/// Returns [`OptimizationError::InvalidConfiguration`] when `config` fails validation,
/// [`OptimizationError::ModelingInfeasible`] when the fully stressed layout cannot
/// meet the targets and [`OptimizationError::SolverFailure`] when the linear program
/// does not end optimal. A rounding inconsistency does not fail the run; it is
/// available through [`StrandDesign::warning`].
///
/// # Examples
/// ```
/// use ptslab::{design_strands, DesignConfig};
///
/// let mut config = DesignConfig::default();
/// config.grid.target_points = 400;
/// let design = design_strands(&config).expect("reference slab is feasible");
/// assert_eq!(design.strands().len(), 8);
/// assert!(design.warning().is_none());
/// ```
pub fn design_strands(config: &DesignConfig) -> Result<StrandDesign, OptimizationError> {
    config.validate()?;
    let grid = ControlGrid::new(&config.slab, config.grid.target_points, config.grid.margin);
    let tendons = tendon_positions(&config.slab, &config.tendons);
    let model = InfluenceModel::from_config(config);
    let matrix = InfluenceMatrix::build(&model, &grid, &tendons);
    let target = TargetField::parabolic(&grid, design_peak_stress(config), config.slab.height);
    design_strands_with(config, grid, &matrix, target)
}

/// Run precheck, optimization and rounding on fields supplied by the caller, for
/// example an influence matrix and a stress field exported from a plate analysis.
///
/// `matrix` must have one row per point of `grid` and one column per tendon of the
/// configured layout.
///
/// # Errors
///
/// As for [`design_strands`], plus [`OptimizationError::InvalidProblem`] when the
/// matrix does not match the tendon layout.
pub fn design_strands_with(
    config: &DesignConfig,
    grid: ControlGrid,
    matrix: &InfluenceMatrix,
    target: TargetField,
) -> Result<StrandDesign, OptimizationError> {
    config.validate()?;
    let tendon_positions = tendon_positions(&config.slab, &config.tendons);
    let max_strands = config.tendons.max_strands;
    let tolerance = config.solver.tolerance;
    let strand_stress = stress_per_strand(&config.slab, &config.tendons);

    ensure_shapes(&grid, matrix, &target, tendon_positions.len())?;

    let precheck = precheck(matrix, &target, max_strands, strand_stress, tolerance)?;
    let continuous = optimize_strands(matrix, &target, max_strands, strand_stress, &config.solver)?;
    let rounded = round_strands(matrix, &target, &continuous, strand_stress, tolerance);
    let takeoff = SteelTakeoff::new(
        &rounded.strands,
        max_strands,
        config.tendons.strand_area,
        config.slab.height,
    );

    Ok(StrandDesign {
        tendon_positions,
        grid,
        loads: peak_stress(&config.slab, &config.loads),
        peak_stress: target.peak(),
        stress_per_strand: strand_stress,
        target,
        precheck,
        continuous,
        rounded,
        takeoff,
    })
}

/// Check that grid, matrix, target and tendon layout describe one problem.
fn ensure_shapes(
    grid: &ControlGrid,
    matrix: &InfluenceMatrix,
    target: &TargetField,
    tendons: usize,
) -> Result<(), OptimizationError> {
    for (what, actual) in [
        ("influence matrix rows", matrix.control_points()),
        ("target field", target.values().len()),
    ] {
        if actual != grid.len() {
            return Err(LinProgError::DimensionMismatch {
                what,
                expected: grid.len(),
                actual,
            }
            .into());
        }
    }
    if matrix.tendons() != tendons {
        return Err(LinProgError::DimensionMismatch {
            what: "influence matrix columns",
            expected: tendons,
            actual: matrix.tendons(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::ConfigError;

    fn coarse_config() -> DesignConfig {
        let mut config = DesignConfig::default();
        config.grid.target_points = 441;
        config
    }

    #[test]
    fn coarse_reference_design_is_feasible() {
        let design = design_strands(&coarse_config()).expect("feasible");
        assert!(design.precheck.check.is_satisfied());
        assert!(design.rounded.check.is_satisfied());
        assert!(design.continuous.objective < 80.0);
        assert!(design.strands().iter().all(|&count| count <= 10));
        assert_eq!(design.tendon_layout().count(), 8);
    }

    #[test]
    fn rounded_total_covers_continuous_objective() {
        let design = design_strands(&coarse_config()).expect("feasible");
        let total = f64::from(design.rounded.total());
        assert!(total >= design.continuous.objective - 1e-8);
        assert!(total < design.continuous.objective + 8.0);
        for (&count, &value) in design.strands().iter().zip(&design.continuous.strands) {
            // counts within the tolerance of a whole number snap down to it
            assert!(f64::from(count) >= value - 1e-9);
            assert!(f64::from(count) - value < 1.0);
        }
        assert_eq!(design.takeoff.optimized_strands, design.rounded.total());
    }

    #[test]
    fn external_matrix_with_wrong_tendon_count_is_rejected() {
        let config = coarse_config();
        let grid = ControlGrid::new(&config.slab, config.grid.target_points, config.grid.margin);
        let matrix = InfluenceMatrix::from_array(ndarray::Array2::ones((grid.len(), 3)), grid.len())
            .expect("rows match");
        let target = TargetField::parabolic(&grid, 1.0, config.slab.height);
        let error = design_strands_with(&config, grid, &matrix, target).expect_err("columns");
        assert!(matches!(error, OptimizationError::InvalidProblem(_)));
    }

    #[test]
    fn stress_fields_share_storage_order() {
        let design = design_strands(&coarse_config()).expect("feasible");
        let fields = design.stress_fields();
        assert_eq!(fields.x.len(), design.grid.len());
        assert_eq!(fields.target.len(), design.grid.len());
        for idx in 0..fields.target.len() {
            assert_relative_eq!(
                fields.residual[idx],
                fields.target[idx] - fields.induced[idx],
                epsilon = 1e-12
            );
        }
        let (low, high) = fields.range();
        assert!(low <= high);
        assert!(high >= design.peak_stress);
    }

    #[test]
    fn invalid_configuration_stops_before_computation() {
        let config = DesignConfig::default().with_max_strands(0);
        assert_eq!(
            design_strands(&config),
            Err(OptimizationError::InvalidConfiguration(
                ConfigError::ZeroStrandCap
            ))
        );
    }
}
