//! Feasibility gate evaluated with every tendon at its strand cap.

use ndarray::{Array1, ArrayView1};

use crate::errors::OptimizationError;
use crate::influence::InfluenceMatrix;
use crate::target::TargetField;

/// Comparison of an induced stress field against the target field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StressCheck {
    /// Control points where induced stress falls below target.
    pub violations: usize,
    /// Number of control points compared.
    pub control_points: usize,
    /// Largest shortfall in MPa, zero when every point is satisfied.
    pub worst_deficit: f64,
}

impl StressCheck {
    /// Compare `induced` with `target` point by point.
    ///
    /// A point is violated when its induced stress is below target by more than
    /// `tolerance`; the slack only absorbs floating-point noise from the solver.
    ///
    /// # Panics
    ///
    /// Panics when the two fields differ in length.
    #[must_use]
    pub fn compare(induced: ArrayView1<'_, f64>, target: ArrayView1<'_, f64>, tolerance: f64) -> Self {
        assert_eq!(induced.len(), target.len(), "stress fields differ in length");
        let mut violations = 0;
        let mut worst_deficit = 0.0_f64;
        for (&have, &need) in induced.iter().zip(target.iter()) {
            let deficit = need - have;
            if deficit > tolerance {
                violations += 1;
                worst_deficit = worst_deficit.max(deficit);
            }
        }
        Self {
            violations,
            control_points: target.len(),
            worst_deficit,
        }
    }

    /// Return `true` when no control point is violated.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.violations == 0
    }
}

/// Outcome of a passed precheck.
#[derive(Clone, Debug, PartialEq)]
pub struct PrecheckReport {
    /// Strand cap applied to every tendon.
    pub max_strands: u32,
    /// Induced stress with every tendon at the cap.
    pub induced: Array1<f64>,
    /// Comparison against the target field.
    pub check: StressCheck,
}

/// Verify that the fully stressed layout meets `target` everywhere.
///
/// # Errors
///
/// Returns [`OptimizationError::ModelingInfeasible`] when any control point stays below
/// its target with every tendon at `max_strands`.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use ptslab::{precheck, ControlGrid, InfluenceMatrix, OptimizationError, SlabGeometry, TargetField};
///
/// let grid = ControlGrid::new(&SlabGeometry::default(), 1, 0.5);
/// let matrix = InfluenceMatrix::from_array(array![[1.0, 1.0]], grid.len()).unwrap();
/// let target = TargetField::from_values(array![3.0], &grid).unwrap();
///
/// assert!(precheck(&matrix, &target, 2, 1.0, 1e-9).is_ok());
/// assert!(matches!(
///     precheck(&matrix, &target, 1, 1.0, 1e-9),
///     Err(OptimizationError::ModelingInfeasible { violations: 1, .. })
/// ));
/// ```
pub fn precheck(
    matrix: &InfluenceMatrix,
    target: &TargetField,
    max_strands: u32,
    stress_per_strand: f64,
    tolerance: f64,
) -> Result<PrecheckReport, OptimizationError> {
    let full = Array1::from_elem(matrix.tendons(), f64::from(max_strands));
    let induced = matrix.induced_stress(full.view(), stress_per_strand);
    let check = StressCheck::compare(induced.view(), target.values().view(), tolerance);
    if !check.is_satisfied() {
        return Err(OptimizationError::ModelingInfeasible {
            violations: check.violations,
            control_points: check.control_points,
            worst_deficit: check.worst_deficit,
        });
    }
    Ok(PrecheckReport {
        max_strands,
        induced,
        check,
    })
}
