//! Service stress that the prestress has to offset at each control point.

use ndarray::Array1;

use crate::errors::ConfigError;
use crate::geometry::ControlGrid;

/// Target stress in MPa, one value per control point in grid storage order.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetField {
    /// Stress values.
    values: Array1<f64>,
}

impl TargetField {
    /// Parabolic field peaking at `peak_stress` on the midspan line and vanishing at
    /// both supports of a span `span`. The X coordinate does not enter.
    ///
    /// # Examples
    /// ```
    /// use ptslab::{ControlGrid, SlabGeometry, TargetField};
    ///
    /// let slab = SlabGeometry::default();
    /// let grid = ControlGrid::new(&slab, 100, 0.0);
    /// let field = TargetField::parabolic(&grid, 10.0, slab.height);
    /// assert_eq!(field.values()[0], 0.0);
    /// ```
    #[must_use]
    pub fn parabolic(grid: &ControlGrid, peak_stress: f64, span: f64) -> Self {
        let values = grid
            .points()
            .map(|point| parabolic_stress(point.y, peak_stress, span))
            .collect();
        Self { values }
    }

    /// Use a field computed elsewhere, for example stresses exported from a plate model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FieldLengthMismatch`] when `values` does not hold one
    /// entry per control point and [`ConfigError::NonFiniteValue`] when any entry is
    /// NaN or infinite.
    pub fn from_values(values: Array1<f64>, grid: &ControlGrid) -> Result<Self, ConfigError> {
        if values.len() != grid.len() {
            return Err(ConfigError::FieldLengthMismatch {
                expected: grid.len(),
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(ConfigError::NonFiniteValue {
                field: "target stress",
                index,
            });
        }
        Ok(Self { values })
    }

    /// Borrow the stress values.
    #[must_use]
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Largest target value, or zero for an empty field.
    #[must_use]
    pub fn peak(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// `peak · (1 − ((y − L/2) / (L/2))²)`.
#[must_use]
pub fn parabolic_stress(y: f64, peak_stress: f64, span: f64) -> f64 {
    let half = span / 2.0;
    let offset = (y - half) / half;
    peak_stress * (1.0 - offset * offset)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array1;

    use super::*;
    use crate::config::SlabGeometry;

    #[test]
    fn profile_is_zero_at_supports() {
        assert_relative_eq!(parabolic_stress(0.0, 10.0, 12.0), 0.0);
        assert_relative_eq!(parabolic_stress(12.0, 10.0, 12.0), 0.0);
        assert_relative_eq!(parabolic_stress(6.0, 10.0, 12.0), 10.0);
        assert_relative_eq!(parabolic_stress(3.0, 10.0, 12.0), 7.5);
    }

    #[test]
    fn field_is_uniform_across_width() {
        let slab = SlabGeometry::default();
        let grid = ControlGrid::new(&slab, 225, 0.5);
        let field = TargetField::parabolic(&grid, 10.125, slab.height);
        let ny = grid.dimensions().ny;
        for (index, value) in field.values().iter().enumerate() {
            let same_row_first_column = field.values()[index % ny];
            assert_relative_eq!(*value, same_row_first_column);
        }
        assert_relative_eq!(field.peak(), 10.125, epsilon = 1e-12);
    }

    #[test]
    fn external_field_length_is_checked() {
        let grid = ControlGrid::new(&SlabGeometry::default(), 25, 0.5);
        let error =
            TargetField::from_values(Array1::zeros(grid.len() + 1), &grid).expect_err("mismatch");
        assert!(matches!(error, ConfigError::FieldLengthMismatch { .. }));
        let field = TargetField::from_values(Array1::ones(grid.len()), &grid).expect("matches");
        assert_relative_eq!(field.peak(), 1.0);
    }

    #[test]
    fn external_field_must_be_finite() {
        let grid = ControlGrid::new(&SlabGeometry::default(), 25, 0.5);
        let mut values = Array1::ones(grid.len());
        values[4] = f64::NAN;
        assert_eq!(
            TargetField::from_values(values.clone(), &grid),
            Err(ConfigError::NonFiniteValue {
                field: "target stress",
                index: 4
            })
        );
        values[4] = f64::INFINITY;
        assert!(TargetField::from_values(values, &grid).is_err());
    }

    #[test]
    fn peak_of_compressive_field_is_negative() {
        let grid = ControlGrid::new(&SlabGeometry::default(), 25, 0.5);
        let values = Array1::from_shape_fn(grid.len(), |idx| -1.0 - idx as f64);
        let field = TargetField::from_values(values, &grid).expect("matches");
        assert_relative_eq!(field.peak(), -1.0);
    }
}
