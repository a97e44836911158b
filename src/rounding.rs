//! Integer strand counts and their re-verification.

use ndarray::Array1;

use crate::errors::RoundingInconsistency;
use crate::influence::InfluenceMatrix;
use crate::optimizer::StrandSolution;
use crate::precheck::StressCheck;
use crate::target::TargetField;

/// Integer strand counts with the stress fields they produce.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundedStrands {
    /// Strand count per tendon.
    pub strands: Vec<u32>,
    /// Induced stress of the rounded layout at every control point.
    pub induced: Array1<f64>,
    /// Target minus induced stress; negative values are net compression.
    pub residual: Array1<f64>,
    /// Comparison of the rounded layout against the target.
    pub check: StressCheck,
    /// Set when rounding left any control point under target.
    pub warning: Option<RoundingInconsistency>,
}

impl RoundedStrands {
    /// Total number of strands.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.strands.iter().sum()
    }

    /// Strand counts as floating-point values.
    #[must_use]
    pub fn as_array(&self) -> Array1<f64> {
        self.strands.iter().map(|&count| f64::from(count)).collect()
    }
}

/// Round every tendon up to a whole number of strands and re-check the targets.
///
/// Each tendon is rounded independently. Counts within `tolerance` above a whole
/// number are snapped down to it first, so solver round-off on an integral optimum
/// does not cost an extra strand. Rounding up never lowers induced stress when the
/// influence coefficients are non-negative, so a returned warning points at an
/// inconsistency upstream rather than at a physical shortfall.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use ptslab::{round_strands, ControlGrid, InfluenceMatrix, SlabGeometry, StrandSolution, TargetField};
///
/// let grid = ControlGrid::new(&SlabGeometry::default(), 1, 0.5);
/// let matrix = InfluenceMatrix::from_array(array![[1.0, 1.0]], 1).unwrap();
/// let target = TargetField::from_values(array![2.5], &grid).unwrap();
/// let solution = StrandSolution { strands: array![1.2, 1.3], objective: 2.5, iterations: 1 };
///
/// let rounded = round_strands(&matrix, &target, &solution, 1.0, 1e-9);
/// assert_eq!(rounded.strands, vec![2, 2]);
/// assert!(rounded.warning.is_none());
/// ```
#[must_use]
pub fn round_strands(
    matrix: &InfluenceMatrix,
    target: &TargetField,
    solution: &StrandSolution,
    stress_per_strand: f64,
    tolerance: f64,
) -> RoundedStrands {
    let strands: Vec<u32> = solution
        .strands
        .iter()
        .map(|&count| (count - tolerance).max(0.0).ceil() as u32)
        .collect();
    let counts: Array1<f64> = strands.iter().map(|&count| f64::from(count)).collect();
    let induced = matrix.induced_stress(counts.view(), stress_per_strand);
    let residual = target.values() - &induced;
    let check = StressCheck::compare(induced.view(), target.values().view(), tolerance);
    let warning = (!check.is_satisfied()).then(|| RoundingInconsistency {
        violations: check.violations,
        worst_deficit: check.worst_deficit,
    });
    RoundedStrands {
        strands,
        induced,
        residual,
        check,
        warning,
    }
}
