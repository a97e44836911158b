//! Continuous strand-count optimization.

use ndarray::Array1;

use crate::config::SolverOptions;
use crate::errors::{OptimizationError, SolverStatus};
use crate::influence::InfluenceMatrix;
use crate::lp::{linprog, CoveringProgram};
use crate::target::TargetField;

/// Optimal continuous strand counts.
#[derive(Clone, Debug, PartialEq)]
pub struct StrandSolution {
    /// Strand count per tendon, within `[0, max_strands]`.
    pub strands: Array1<f64>,
    /// Total strand count, the minimised objective.
    pub objective: f64,
    /// Simplex pivots used.
    pub iterations: usize,
}

/// Minimise the total strand count while every control point reaches its target.
///
/// The strand counts are relaxed to real numbers; integer counts come from
/// [`round_strands`](crate::round_strands).
///
/// # Errors
///
/// Returns [`OptimizationError::SolverFailure`] with the solver's terminal status when
/// it is anything but optimal, and [`OptimizationError::InvalidProblem`] when the
/// matrix and target field disagree in size.
pub fn optimize_strands(
    matrix: &InfluenceMatrix,
    target: &TargetField,
    max_strands: u32,
    stress_per_strand: f64,
    options: &SolverOptions,
) -> Result<StrandSolution, OptimizationError> {
    let tendons = matrix.tendons();
    let coverage = matrix.coefficients().mapv(|value| value * stress_per_strand);
    let cost = Array1::ones(tendons);
    let upper = Array1::from_elem(tendons, f64::from(max_strands));
    let program = CoveringProgram {
        cost: cost.view(),
        coverage: coverage.view(),
        demand: target.values().view(),
        upper: upper.view(),
    };
    let result = linprog(&program, options)?;
    if result.status != SolverStatus::Optimal {
        return Err(OptimizationError::SolverFailure {
            status: result.status,
        });
    }
    Ok(StrandSolution {
        strands: result.x,
        objective: result.fun,
        iterations: result.nit,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;
    use crate::config::SlabGeometry;
    use crate::geometry::ControlGrid;

    /// Three control points, two tendons.
    fn small_problem(targets: Array1<f64>) -> (InfluenceMatrix, TargetField) {
        let grid = ControlGrid::new(&SlabGeometry::default(), 3, 0.5);
        assert_eq!(grid.len(), 3);
        let matrix =
            InfluenceMatrix::from_array(array![[1.0, 0.2], [0.5, 0.5], [0.2, 1.0]], grid.len())
                .expect("shape ok");
        let target = TargetField::from_values(targets, &grid).expect("length ok");
        (matrix, target)
    }

    #[test]
    fn symmetric_problem_splits_evenly() {
        let (matrix, target) = small_problem(array![2.0, 2.0, 2.0]);
        let solution =
            optimize_strands(&matrix, &target, 10, 1.0, &SolverOptions::default()).expect("solves");
        // the middle row needs x0 + x1 >= 4 and the outer rows are slack there
        assert_relative_eq!(solution.objective, 4.0, epsilon = 1e-9);
        assert_relative_eq!(solution.strands.sum(), 4.0, epsilon = 1e-9);
        let induced = matrix.induced_stress(solution.strands.view(), 1.0);
        for (have, need) in induced.iter().zip(target.values()) {
            assert!(*have >= need - 1e-9);
        }
    }

    #[test]
    fn stress_per_strand_scales_the_solution() {
        let (matrix, target) = small_problem(array![2.0, 2.0, 2.0]);
        let solution =
            optimize_strands(&matrix, &target, 10, 2.0, &SolverOptions::default()).expect("solves");
        assert_relative_eq!(solution.objective, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn tight_cap_is_a_solver_failure() {
        let (matrix, target) = small_problem(array![2.0, 2.0, 2.0]);
        let error =
            optimize_strands(&matrix, &target, 1, 1.0, &SolverOptions::default()).expect_err("cap");
        assert_eq!(
            error,
            OptimizationError::SolverFailure {
                status: SolverStatus::Infeasible
            }
        );
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let (_, target) = small_problem(array![1.0, 1.0, 1.0]);
        let matrix = InfluenceMatrix::from_array(array![[1.0], [1.0]], 2).expect("shape ok");
        let error =
            optimize_strands(&matrix, &target, 5, 1.0, &SolverOptions::default()).expect_err("size");
        assert!(matches!(error, OptimizationError::InvalidProblem(_)));
    }
}
