//! Induced stress per strand at each control point from each tendon.
//!
//! The surrogate combines a Gaussian lateral spreading kernel with the parabolic drape
//! of the tendon along the span. It is not calibrated against a plate solution; an
//! influence matrix from an external analysis can be supplied through
//! [`InfluenceMatrix::from_array`] instead.

use ndarray::{Array1, Array2, ArrayView1};

use crate::config::DesignConfig;
use crate::errors::ConfigError;
use crate::geometry::{ControlGrid, ControlPoint};

/// Gaussian decay of a tendon's effect with lateral distance `dx`.
#[must_use]
pub fn lateral_kernel(dx: f64, spread: f64) -> f64 {
    (-(dx * dx) / (2.0 * spread * spread)).exp()
}

/// Parabolic tendon eccentricity at `y` along a span `span`: zero at both supports
/// and `eccentricity` at midspan.
///
/// # Examples
/// ```
/// use ptslab::eccentricity_profile;
///
/// assert_eq!(eccentricity_profile(0.0, 12.0, 0.15), 0.0);
/// assert_eq!(eccentricity_profile(6.0, 12.0, 0.15), 0.15);
/// ```
#[must_use]
pub fn eccentricity_profile(y: f64, span: f64, eccentricity: f64) -> f64 {
    let ratio = y / span;
    4.0 * eccentricity * ratio * (1.0 - ratio)
}

/// Parameters of the closed-form influence function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfluenceModel {
    /// Lateral spreading width in metres.
    pub spread: f64,
    /// Midspan eccentricity of the drape in metres.
    pub design_eccentricity: f64,
    /// Half of the slab thickness in metres.
    pub half_thickness: f64,
    /// Tendon span in metres.
    pub span: f64,
}

impl InfluenceModel {
    /// Derive the model from a configuration.
    ///
    /// The design eccentricity is the usable lever arm `thickness / 2 - cover`
    /// scaled by the configured utilization.
    #[must_use]
    pub fn from_config(config: &DesignConfig) -> Self {
        let half_thickness = config.slab.half_thickness();
        let usable = half_thickness - config.tendons.cover;
        Self {
            spread: config.influence.spread,
            design_eccentricity: config.tendons.eccentricity_utilization * usable,
            half_thickness,
            span: config.slab.height,
        }
    }

    /// Stress per unit strand count at `point` from a tendon at `tendon_x`.
    #[must_use]
    pub fn influence(&self, tendon_x: f64, point: ControlPoint) -> f64 {
        let base = lateral_kernel((point.x - tendon_x).abs(), self.spread);
        let eccentricity = eccentricity_profile(point.y, self.span, self.design_eccentricity);
        base * (1.0 + eccentricity / self.half_thickness)
    }
}

/// Dense influence coefficients, one row per control point and one column per tendon.
#[derive(Clone, Debug, PartialEq)]
pub struct InfluenceMatrix {
    /// Coefficients in MPa per unit strand stress.
    coefficients: Array2<f64>,
}

impl InfluenceMatrix {
    /// Evaluate `model` for every (control point, tendon) pair.
    #[must_use]
    pub fn build(model: &InfluenceModel, grid: &ControlGrid, tendons: &[f64]) -> Self {
        let points: Vec<ControlPoint> = grid.points().collect();
        let coefficients = Array2::from_shape_fn((points.len(), tendons.len()), |(row, col)| {
            model.influence(tendons[col], points[row])
        });
        Self { coefficients }
    }

    /// Wrap coefficients produced elsewhere, for example by influence load cases in
    /// an external analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FieldLengthMismatch`] when the row count differs from the
    /// number of control points and [`ConfigError::NonFiniteValue`] when a coefficient
    /// is NaN or infinite.
    pub fn from_array(coefficients: Array2<f64>, control_points: usize) -> Result<Self, ConfigError> {
        if coefficients.nrows() != control_points {
            return Err(ConfigError::FieldLengthMismatch {
                expected: control_points,
                actual: coefficients.nrows(),
            });
        }
        if let Some(index) = coefficients.iter().position(|value| !value.is_finite()) {
            return Err(ConfigError::NonFiniteValue {
                field: "influence matrix",
                index,
            });
        }
        Ok(Self { coefficients })
    }

    /// Borrow the raw coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &Array2<f64> {
        &self.coefficients
    }

    /// Number of control points.
    #[must_use]
    pub fn control_points(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Number of tendons.
    #[must_use]
    pub fn tendons(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Return `true` when no coefficient is negative.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.coefficients.iter().all(|&value| value >= 0.0)
    }

    /// Induced stress at every control point for the given per-tendon strand counts.
    ///
    /// # Panics
    ///
    /// Panics when `strands` does not hold one entry per tendon.
    #[must_use]
    pub fn induced_stress(&self, strands: ArrayView1<'_, f64>, stress_per_strand: f64) -> Array1<f64> {
        let forces = strands.mapv(|count| count * stress_per_strand);
        self.coefficients.dot(&forces)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;
    use crate::geometry::tendon_positions;

    fn reference_model() -> InfluenceModel {
        InfluenceModel::from_config(&DesignConfig::default())
    }

    #[test]
    fn design_eccentricity_uses_cover_and_utilization() {
        let model = reference_model();
        assert_relative_eq!(model.design_eccentricity, 0.15, epsilon = 1e-12);
        let mut config = DesignConfig::default();
        config.tendons.eccentricity_utilization = 0.5;
        let model = InfluenceModel::from_config(&config);
        assert_relative_eq!(model.design_eccentricity, 0.075, epsilon = 1e-12);
    }

    #[test]
    fn eccentricity_vanishes_at_supports_and_peaks_at_midspan() {
        for span in [0.5, 3.0, 12.0, 40.0] {
            assert_relative_eq!(eccentricity_profile(0.0, span, 0.2), 0.0);
            assert_relative_eq!(eccentricity_profile(span, span, 0.2), 0.0, epsilon = 1e-15);
            assert_relative_eq!(eccentricity_profile(span / 2.0, span, 0.2), 0.2, epsilon = 1e-15);
        }
    }

    #[test]
    fn kernel_is_one_on_the_tendon() {
        assert_relative_eq!(lateral_kernel(0.0, 0.75), 1.0);
        assert_relative_eq!(lateral_kernel(0.75, 0.75), (-0.5_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn influence_decays_with_lateral_distance() {
        let model = reference_model();
        for y in [0.5, 3.0, 6.0, 11.5] {
            let mut previous = f64::INFINITY;
            for step in 0..40 {
                let dx = f64::from(step) * 0.2;
                let value = model.influence(0.0, ControlPoint::new(dx, y));
                assert!(value >= 0.0);
                assert!(value <= previous, "increase at dx = {dx}, y = {y}");
                previous = value;
            }
        }
    }

    #[test]
    fn midspan_amplifies_influence() {
        let model = reference_model();
        let support = model.influence(4.0, ControlPoint::new(4.0, 0.0));
        let midspan = model.influence(4.0, ControlPoint::new(4.0, 6.0));
        assert_relative_eq!(support, 1.0);
        assert_relative_eq!(midspan, 1.75, epsilon = 1e-12);
    }

    #[test]
    fn matrix_is_non_negative_with_expected_shape() {
        let config = DesignConfig::default();
        let grid = ControlGrid::new(&config.slab, 400, config.grid.margin);
        let tendons = tendon_positions(&config.slab, &config.tendons);
        let matrix = InfluenceMatrix::build(&reference_model(), &grid, &tendons);
        assert_eq!(matrix.control_points(), grid.len());
        assert_eq!(matrix.tendons(), tendons.len());
        assert!(matrix.is_non_negative());
    }

    #[test]
    fn induced_stress_is_linear_in_strands() {
        let matrix =
            InfluenceMatrix::from_array(array![[1.0, 0.5], [0.25, 2.0]], 2).expect("shape ok");
        let stress = matrix.induced_stress(array![2.0, 4.0].view(), 0.5);
        assert_relative_eq!(stress[0], 2.0);
        assert_relative_eq!(stress[1], 4.25);
    }

    #[test]
    fn external_matrix_must_match_grid() {
        let error = InfluenceMatrix::from_array(Array2::zeros((3, 2)), 4).expect_err("mismatch");
        assert_eq!(
            error,
            ConfigError::FieldLengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn external_matrix_must_be_finite() {
        let error = InfluenceMatrix::from_array(array![[1.0, 0.5], [f64::NAN, 2.0]], 2)
            .expect_err("nan rejected");
        assert_eq!(
            error,
            ConfigError::NonFiniteValue {
                field: "influence matrix",
                index: 2
            }
        );
        assert!(InfluenceMatrix::from_array(array![[f64::NEG_INFINITY]], 1).is_err());
    }
}
