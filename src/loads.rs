//! Conversion of service loads and strand properties into the stresses used by the
//! optimizer.
//!
//! The slab is treated as a simply supported one-metre strip spanning along Y, see
//! <https://en.wikipedia.org/wiki/Bending#Quasi-static_bending_of_beams>. All
//! arithmetic runs on `uom` quantities and the results leave this module in MPa.

use uom::si::area::square_millimeter;
use uom::si::energy::kilojoule;
use uom::si::f64::{Area, Energy, Force, Length, Pressure, Volume};
use uom::si::force::kilonewton;
use uom::si::length::meter;
use uom::si::pressure::{kilopascal, megapascal};

use crate::config::{DesignConfig, LoadParameters, SlabGeometry, TendonLayout};

/// Width of the design strip in metres.
const STRIP_WIDTH: f64 = 1.0;

/// Intermediate values of the load derivation, kept for reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadSummary {
    /// Self-weight of the slab in kPa.
    pub dead_load: f64,
    /// Dead plus live load in kPa.
    pub total_load: f64,
    /// Midspan moment of the design strip in kN·m.
    pub midspan_moment: f64,
    /// Extreme-fibre stress at midspan in MPa.
    pub peak_stress: f64,
}

/// Derive the peak midspan stress from the slab self-weight and the live load.
///
/// # Examples
/// ```
/// use ptslab::{peak_stress, LoadParameters, SlabGeometry};
///
/// let summary = peak_stress(&SlabGeometry::default(), &LoadParameters::default());
/// assert!((summary.peak_stress - 10.125).abs() < 1e-9);
/// ```
#[must_use]
pub fn peak_stress(slab: &SlabGeometry, loads: &LoadParameters) -> LoadSummary {
    let thickness = Length::new::<meter>(slab.thickness);
    let span = Length::new::<meter>(slab.height);
    let strip = Length::new::<meter>(STRIP_WIDTH);

    let dead = Pressure::new::<kilopascal>(loads.unit_weight * slab.thickness);
    let total = dead + Pressure::new::<kilopascal>(loads.live_load);

    let moment: Energy = total * strip * span * span / 8.0;
    let section_modulus: Volume = strip * thickness * thickness / 6.0;
    let stress: Pressure = moment / section_modulus;

    LoadSummary {
        dead_load: dead.get::<kilopascal>(),
        total_load: total.get::<kilopascal>(),
        // kJ and kN·m share a dimension
        midspan_moment: moment.get::<kilojoule>(),
        peak_stress: stress.get::<megapascal>(),
    }
}

/// The peak stress used to build the target field: the configured override when
/// present, otherwise the beam estimate of [`peak_stress`].
#[must_use]
pub fn design_peak_stress(config: &DesignConfig) -> f64 {
    config
        .loads
        .peak_stress_override
        .unwrap_or_else(|| peak_stress(&config.slab, &config.loads).peak_stress)
}

/// Jacking force of one strand in kN.
#[must_use]
pub fn strand_force(layout: &TendonLayout) -> f64 {
    jacking_force(layout).get::<kilonewton>()
}

/// Compressive stress in MPa that one fully stressed strand adds over the section
/// of a one-metre strip.
///
/// # Examples
/// ```
/// use ptslab::{stress_per_strand, SlabGeometry, TendonLayout};
///
/// let s = stress_per_strand(&SlabGeometry::default(), &TendonLayout::default());
/// assert!((s - 0.48825).abs() < 1e-9);
/// ```
#[must_use]
pub fn stress_per_strand(slab: &SlabGeometry, layout: &TendonLayout) -> f64 {
    let influence_area: Area =
        Length::new::<meter>(slab.thickness) * Length::new::<meter>(STRIP_WIDTH);
    let stress: Pressure = jacking_force(layout) / influence_area;
    stress.get::<megapascal>()
}

/// Strand area times the utilised ultimate strength.
fn jacking_force(layout: &TendonLayout) -> Force {
    let area = Area::new::<square_millimeter>(layout.strand_area);
    let strength = Pressure::new::<megapascal>(layout.ultimate_strength);
    area * strength * layout.prestress_ratio
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn reference_loads_match_hand_calculation() {
        let summary = peak_stress(&SlabGeometry::default(), &LoadParameters::default());
        // 25 kN/m³ * 0.40 m
        assert_relative_eq!(summary.dead_load, 10.0, epsilon = 1e-9);
        assert_relative_eq!(summary.total_load, 15.0, epsilon = 1e-9);
        // 15 * 12² / 8
        assert_relative_eq!(summary.midspan_moment, 270.0, epsilon = 1e-9);
        // M * (t/2) / I with I = t³/12
        assert_relative_eq!(summary.peak_stress, 10.125, epsilon = 1e-9);
    }

    #[test]
    fn strand_force_matches_hand_calculation() {
        let layout = TendonLayout::default();
        assert_relative_eq!(strand_force(&layout), 195.3, epsilon = 1e-9);
        assert_relative_eq!(
            stress_per_strand(&SlabGeometry::default(), &layout),
            0.48825,
            epsilon = 1e-12
        );
    }

    #[test]
    fn override_replaces_beam_estimate() {
        let mut config = DesignConfig::default();
        config.loads.peak_stress_override = Some(4.0);
        assert_relative_eq!(design_peak_stress(&config), 4.0);
        config.loads.peak_stress_override = None;
        assert_relative_eq!(design_peak_stress(&config), 10.125, epsilon = 1e-9);
    }

    #[test]
    fn thicker_slab_lowers_stress_per_strand() {
        let layout = TendonLayout::default();
        let thin = stress_per_strand(&SlabGeometry::default(), &layout);
        let thick = stress_per_strand(
            &SlabGeometry {
                thickness: 0.8,
                ..SlabGeometry::default()
            },
            &layout,
        );
        assert_relative_eq!(thick * 2.0, thin, epsilon = 1e-12);
    }
}
