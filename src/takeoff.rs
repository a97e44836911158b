//! Prestressing steel quantities for the optimized and the fully stressed layouts.

use uom::si::area::square_millimeter;
use uom::si::f64::{Area, Length, Mass, MassDensity};
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::mass_density::kilogram_per_cubic_meter;

/// Density of prestressing steel in kg/m³.
pub const STEEL_DENSITY: f64 = 7850.0;

/// Strand totals and steel masses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteelTakeoff {
    /// Mass of one strand running the full tendon length in kg.
    pub mass_per_strand: f64,
    /// Strands with every tendon at its cap.
    pub full_strands: u32,
    /// Steel mass of the fully stressed layout in kg.
    pub full_mass: f64,
    /// Strands in the optimized layout.
    pub optimized_strands: u32,
    /// Steel mass of the optimized layout in kg.
    pub optimized_mass: f64,
}

impl SteelTakeoff {
    /// Quantities for `strands` against `tendon_count` tendons capped at `max_strands`.
    ///
    /// Each strand runs the full `tendon_length` with a cross-section of
    /// `strand_area` mm².
    ///
    /// # Examples
    /// ```
    /// use ptslab::SteelTakeoff;
    ///
    /// let takeoff = SteelTakeoff::new(&[4, 6], 10, 150.0, 12.0);
    /// assert_eq!(takeoff.full_strands, 20);
    /// assert_eq!(takeoff.optimized_strands, 10);
    /// assert!((takeoff.reduction() - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new(strands: &[u32], max_strands: u32, strand_area: f64, tendon_length: f64) -> Self {
        let density = MassDensity::new::<kilogram_per_cubic_meter>(STEEL_DENSITY);
        let area = Area::new::<square_millimeter>(strand_area);
        let length = Length::new::<meter>(tendon_length);
        let per_strand: Mass = density * area * length;
        let mass_per_strand = per_strand.get::<kilogram>();

        let tendons = u32::try_from(strands.len()).unwrap_or(u32::MAX);
        let full_strands = tendons.saturating_mul(max_strands);
        let optimized_strands = strands.iter().sum();
        Self {
            mass_per_strand,
            full_strands,
            full_mass: f64::from(full_strands) * mass_per_strand,
            optimized_strands,
            optimized_mass: f64::from(optimized_strands) * mass_per_strand,
        }
    }

    /// Fraction of steel saved relative to the fully stressed layout.
    #[must_use]
    pub fn reduction(&self) -> f64 {
        if self.full_mass > 0.0 {
            1.0 - self.optimized_mass / self.full_mass
        } else {
            0.0
        }
    }
}
