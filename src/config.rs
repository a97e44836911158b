//! Immutable design configuration passed through every stage of a run.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::geometry::tendon_positions;

/// Plan dimensions and thickness of the slab in metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabGeometry {
    /// Extent along the global X axis (across the tendons).
    pub width: f64,
    /// Extent along the global Y axis (the tendon span).
    pub height: f64,
    /// Slab thickness.
    pub thickness: f64,
}

impl Default for SlabGeometry {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 12.0,
            thickness: 0.40,
        }
    }
}

impl SlabGeometry {
    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Half of the slab thickness, the lever arm of a centred tendon.
    #[must_use]
    pub fn half_thickness(&self) -> f64 {
        self.thickness / 2.0
    }
}

/// Service loads used to derive the peak target stress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadParameters {
    /// Concrete unit weight in kN/m³.
    pub unit_weight: f64,
    /// Uniform live load in kN/m².
    pub live_load: f64,
    /// Peak stress in MPa that overrides the simple beam estimate when present.
    pub peak_stress_override: Option<f64>,
}

impl Default for LoadParameters {
    fn default() -> Self {
        Self {
            unit_weight: 25.0,
            live_load: 5.0,
            peak_stress_override: None,
        }
    }
}

/// Tendon layout and strand properties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendonLayout {
    /// Centre-to-centre tendon spacing in metres.
    pub spacing: f64,
    /// Distance from each slab edge to the outermost tendons in metres.
    pub edge_offset: f64,
    /// Cross-sectional area of one strand in mm².
    pub strand_area: f64,
    /// Ultimate tensile strength of the strand in MPa.
    pub ultimate_strength: f64,
    /// Fraction of the ultimate strength used as prestress.
    pub prestress_ratio: f64,
    /// Upper bound on the strand count of every tendon.
    pub max_strands: u32,
    /// Concrete cover to the tendon centroid in metres.
    pub cover: f64,
    /// Fraction of the usable eccentricity exploited by the drape.
    pub eccentricity_utilization: f64,
}

impl Default for TendonLayout {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            edge_offset: 0.5,
            strand_area: 150.0,
            ultimate_strength: 1860.0,
            prestress_ratio: 0.7,
            max_strands: 10,
            cover: 0.05,
            eccentricity_utilization: 1.0,
        }
    }
}

/// Control grid resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParameters {
    /// Requested number of control points; the grid rounds it to odd dimensions.
    pub target_points: usize,
    /// Inset from every slab edge in metres.
    pub margin: f64,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self {
            target_points: 10_000,
            margin: 0.5,
        }
    }
}

/// Parameters of the surrogate influence kernel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceParameters {
    /// Lateral load-spreading width (standard deviation of the Gaussian) in metres.
    pub spread: f64,
}

impl Default for InfluenceParameters {
    fn default() -> Self {
        Self { spread: 0.75 }
    }
}

/// Limits and tolerances for the linear-program solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Maximum number of simplex pivots.
    pub max_iter: usize,
    /// Wall-clock limit in seconds; `None` disables it.
    pub time_limit_secs: Option<f64>,
    /// Tolerance for reduced costs, pivots and stress comparisons.
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            time_limit_secs: None,
            tolerance: 1e-9,
        }
    }
}

impl SolverOptions {
    /// The configured time limit as a [`Duration`].
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }
}

/// Every parameter of one optimization run.
///
/// The value is immutable once validated and is shared by reference, so independent
/// runs (for example a parameter sweep) never observe each other's settings.
///
/// # Examples
/// ```
/// use ptslab::DesignConfig;
///
/// let config = DesignConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tendons.max_strands, 10);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Slab dimensions.
    pub slab: SlabGeometry,
    /// Service loads.
    pub loads: LoadParameters,
    /// Tendon layout and strand properties.
    pub tendons: TendonLayout,
    /// Control grid resolution.
    pub grid: GridParameters,
    /// Influence kernel parameters.
    pub influence: InfluenceParameters,
    /// Solver limits.
    pub solver: SolverOptions,
}

impl DesignConfig {
    /// Parse a configuration from JSON. Missing sections fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the text is not valid JSON for this schema.
    ///
    /// # Examples
    /// ```
    /// use ptslab::DesignConfig;
    ///
    /// let config = DesignConfig::from_json_str(r#"{ "tendons": { "max_strands": 12 } }"#)
    ///     .expect("valid json");
    /// assert_eq!(config.tendons.max_strands, 12);
    /// assert_eq!(config.slab.width, 8.0);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|error| ConfigError::Load(error.to_string()))
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|error| ConfigError::Load(format!("{}: {error}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|error| ConfigError::Load(error.to_string()))
    }

    /// Return a copy with a different strand cap.
    #[must_use]
    pub fn with_max_strands(&self, max_strands: u32) -> Self {
        let mut config = self.clone();
        config.tendons.max_strands = max_strands;
        config
    }

    /// Check the data-model invariants of every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let slab = &self.slab;
        for (axis, value) in [("x", slab.width), ("y", slab.height)] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveSpan { axis, value });
            }
        }
        let min_span = slab.width.min(slab.height);
        if !(slab.thickness > 0.0) || slab.thickness >= min_span {
            return Err(ConfigError::InvalidThickness {
                thickness: slab.thickness,
                min_span,
            });
        }

        let loads = &self.loads;
        if loads.unit_weight < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "unit weight",
                value: loads.unit_weight,
            });
        }
        if loads.live_load < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "live load",
                value: loads.live_load,
            });
        }

        let tendons = &self.tendons;
        positive("tendon spacing", tendons.spacing)?;
        positive("strand area", tendons.strand_area)?;
        positive("ultimate strength", tendons.ultimate_strength)?;
        if !(tendons.prestress_ratio > 0.0 && tendons.prestress_ratio <= 1.0) {
            return Err(ConfigError::RatioOutOfRange {
                name: "prestress ratio",
                interval: "(0, 1]",
                value: tendons.prestress_ratio,
            });
        }
        if tendons.max_strands == 0 {
            return Err(ConfigError::ZeroStrandCap);
        }
        let half_thickness = slab.half_thickness();
        if !(tendons.cover >= 0.0) || tendons.cover >= half_thickness {
            return Err(ConfigError::InvalidCover {
                cover: tendons.cover,
                half_thickness,
            });
        }
        if !(0.0..=1.0).contains(&tendons.eccentricity_utilization) {
            return Err(ConfigError::RatioOutOfRange {
                name: "eccentricity utilization",
                interval: "[0, 1]",
                value: tendons.eccentricity_utilization,
            });
        }
        if tendons.edge_offset <= 0.0 || tendon_positions(slab, tendons).is_empty() {
            return Err(ConfigError::EmptyTendonLayout {
                spacing: tendons.spacing,
                edge_offset: tendons.edge_offset,
                width: slab.width,
            });
        }

        if self.grid.target_points == 0 {
            return Err(ConfigError::NonPositive {
                name: "target point count",
                value: 0.0,
            });
        }
        let margin = self.grid.margin;
        for (axis, span) in [("x", slab.width), ("y", slab.height)] {
            if !(margin >= 0.0) || margin >= span / 2.0 {
                return Err(ConfigError::InvalidMargin { margin, axis });
            }
        }

        positive("influence spread", self.influence.spread)?;
        positive("solver tolerance", self.solver.tolerance)?;
        Ok(())
    }
}

/// Reject zero, negative and NaN values.
fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
