#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod config;
mod design;
mod errors;
mod geometry;
mod influence;
mod loads;
mod lp;
mod optimizer;
mod precheck;
mod rounding;
mod takeoff;
mod target;

pub use config::{
    DesignConfig, GridParameters, InfluenceParameters, LoadParameters, SlabGeometry,
    SolverOptions, TendonLayout,
};
pub use design::{design_strands, design_strands_with, StrandDesign, StressFields};
pub use errors::{ConfigError, OptimizationError, RoundingInconsistency, SolverStatus};
pub use geometry::{
    grid_dimensions, linspace, tendon_positions, ControlGrid, ControlPoint, GridDimensions,
};
pub use influence::{eccentricity_profile, lateral_kernel, InfluenceMatrix, InfluenceModel};
pub use loads::{design_peak_stress, peak_stress, strand_force, stress_per_strand, LoadSummary};
pub use lp::{linprog, CoveringProgram, LinProgError, LinProgResult};
pub use optimizer::{optimize_strands, StrandSolution};
pub use precheck::{precheck, PrecheckReport, StressCheck};
pub use rounding::{round_strands, RoundedStrands};
pub use takeoff::{SteelTakeoff, STEEL_DENSITY};
pub use target::{parabolic_stress, TargetField};
