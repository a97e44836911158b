//! Error types produced while configuring or running a strand design.

use std::fmt;

use thiserror::Error;

use crate::lp::LinProgError;

/// Error returned when a [`DesignConfig`](crate::DesignConfig) breaks a modelling invariant.
///
/// The variants carry the rejected value so callers can present actionable feedback
/// before any matrix is built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Returned when a slab span is zero or negative.
    #[error("slab {axis} span must be positive (received {value})")]
    NonPositiveSpan {
        /// Either `"x"` or `"y"`.
        axis: &'static str,
        /// Rejected span in metres.
        value: f64,
    },
    /// Returned when the slab thickness is zero, negative or not smaller than both spans.
    #[error("slab thickness {thickness} must be positive and smaller than the shortest span {min_span}")]
    InvalidThickness {
        /// Rejected thickness in metres.
        thickness: f64,
        /// Shortest of the two spans in metres.
        min_span: f64,
    },
    /// Returned when the tendon layout produces no tendon strictly inside the slab.
    #[error("tendon layout (spacing {spacing}, edge offset {edge_offset}) places no tendon inside a {width} m slab")]
    EmptyTendonLayout {
        /// Tendon spacing in metres.
        spacing: f64,
        /// Distance from the slab edge to the first tendon in metres.
        edge_offset: f64,
        /// Slab width in metres.
        width: f64,
    },
    /// Returned when the concrete cover leaves no usable eccentricity.
    #[error("cover {cover} must be non-negative and smaller than half the thickness {half_thickness}")]
    InvalidCover {
        /// Rejected cover in metres.
        cover: f64,
        /// Half of the slab thickness in metres.
        half_thickness: f64,
    },
    /// Returned when a ratio that must lie in a unit interval does not.
    #[error("{name} must lie in {interval} (received {value})")]
    RatioOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human readable interval, e.g. `"[0, 1]"`.
        interval: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a physical quantity that must be strictly positive is not.
    #[error("{name} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a tendon may not carry any strand at all.
    #[error("maximum strands per tendon must be at least one")]
    ZeroStrandCap,
    /// Returned when the control grid margin swallows a whole span.
    #[error("grid margin {margin} must be non-negative and smaller than half the {axis} span")]
    InvalidMargin {
        /// Rejected margin in metres.
        margin: f64,
        /// Either `"x"` or `"y"`.
        axis: &'static str,
    },
    /// Returned when an externally supplied field does not match the control grid.
    #[error("stress field has {actual} values but the control grid has {expected} points")]
    FieldLengthMismatch {
        /// Number of control points.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
    /// Returned when an externally supplied field holds a NaN or infinite entry.
    #[error("{field} holds a non-finite value at index {index}")]
    NonFiniteValue {
        /// Which field was rejected.
        field: &'static str,
        /// Flat index of the first offending entry.
        index: usize,
    },
    /// Returned when a configuration file cannot be read or parsed.
    #[error("could not load configuration: {0}")]
    Load(String),
}

/// Terminal state reported by the linear-program solver.
///
/// Anything other than [`SolverStatus::Optimal`] aborts a design run and is surfaced
/// verbatim through [`OptimizationError::SolverFailure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// An optimal vertex was found.
    Optimal,
    /// The constraints admit no solution within the variable bounds.
    Infeasible,
    /// The iteration limit was hit before optimality was proven.
    IterationLimit,
    /// The wall-clock limit was hit before optimality was proven.
    TimeLimit,
    /// The tableau lost precision (non-finite entries or a returned point that breaks
    /// its own constraints).
    NumericalFailure,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::IterationLimit => "iteration limit reached",
            Self::TimeLimit => "time limit reached",
            Self::NumericalFailure => "numerical failure",
        };
        f.write_str(label)
    }
}

/// Fatal error returned by a design run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OptimizationError {
    /// Returned when the configuration is rejected before any computation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// Returned when the influence matrix and target field do not describe one problem.
    #[error("inconsistent optimization problem: {0}")]
    InvalidProblem(#[from] LinProgError),
    /// Returned when every tendon at its strand cap still leaves control points under
    /// their target stress. More strands, a thicker slab or a larger eccentricity are
    /// needed before retrying.
    #[error(
        "infeasible even at full capacity: {violations} of {control_points} control points \
         fall short (worst deficit {worst_deficit:.3} MPa)"
    )]
    ModelingInfeasible {
        /// Number of control points with induced stress below target.
        violations: usize,
        /// Total number of control points checked.
        control_points: usize,
        /// Largest shortfall of induced stress against target in MPa.
        worst_deficit: f64,
    },
    /// Returned when the linear program ends in a non-optimal state.
    #[error("strand optimization failed with solver status: {status}")]
    SolverFailure {
        /// Raw terminal status of the solver.
        status: SolverStatus,
    },
}

impl OptimizationError {
    /// Return `true` when the failure came from the solver's time limit.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::SolverFailure {
                status: SolverStatus::TimeLimit
            }
        )
    }
}

/// Warning attached to a completed design when integer rounding left control points
/// under target.
///
/// Ceiling rounding cannot lower induced stress while the influence matrix and the
/// strand capacity are non-negative, so this signals a precheck or solver
/// inconsistency rather than a physical shortfall.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "{violations} stress constraints violated after rounding \
     (worst deficit {worst_deficit:.3e} MPa)"
)]
pub struct RoundingInconsistency {
    /// Number of control points with induced stress below target after rounding.
    pub violations: usize,
    /// Largest shortfall of induced stress against target in MPa.
    pub worst_deficit: f64,
}
