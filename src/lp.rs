//! Dense simplex for covering linear programs.
//!
//! Solves
//!
//! ```text
//! minimize   c^T x
//! subject to G x >= b
//!            0 <= x <= u
//! ```
//!
//! with `c >= 0`. The problem is solved through its dual
//!
//! ```text
//! maximize   b^T y - u^T w
//! subject to G^T y - w <= c,   y, w >= 0
//! ```
//!
//! whose slack basis is feasible at the origin because the costs are non-negative, so
//! no artificial variables are needed. The dual tableau has one row per primal
//! variable, which keeps it small when there are many constraints and few variables.
//! The primal solution is read back from the reduced costs of the dual slacks, see
//! <https://en.wikipedia.org/wiki/Dual_linear_program>.

use std::time::Instant;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use thiserror::Error;

use crate::config::SolverOptions;
use crate::errors::SolverStatus;

/// Consecutive degenerate pivots tolerated before switching to Bland's rule.
const DEGENERATE_STREAK_LIMIT: usize = 50;

/// Error returned when a problem is malformed before any pivot is made.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinProgError {
    /// Returned when vector and matrix sizes disagree.
    #[error("{what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        /// Which input is inconsistent.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Returned when an objective coefficient is negative or not finite.
    #[error("cost of variable {index} must be finite and non-negative (received {value})")]
    InvalidCost {
        /// Variable index.
        index: usize,
        /// Rejected coefficient.
        value: f64,
    },
    /// Returned when an upper bound is negative or NaN.
    #[error("upper bound of variable {index} must be non-negative (received {value})")]
    InvalidUpperBound {
        /// Variable index.
        index: usize,
        /// Rejected bound.
        value: f64,
    },
}

/// Borrowed description of a covering linear program.
#[derive(Clone, Copy, Debug)]
pub struct CoveringProgram<'a> {
    /// Objective coefficients `c`, one per variable.
    pub cost: ArrayView1<'a, f64>,
    /// Constraint matrix `G`, one row per constraint.
    pub coverage: ArrayView2<'a, f64>,
    /// Right-hand side `b`.
    pub demand: ArrayView1<'a, f64>,
    /// Upper bounds `u`; use `f64::INFINITY` for an unbounded variable.
    pub upper: ArrayView1<'a, f64>,
}

/// Result of a simplex run.
#[derive(Clone, Debug, PartialEq)]
pub struct LinProgResult {
    /// Terminal status.
    pub status: SolverStatus,
    /// Primal solution; meaningful only when `status` is optimal.
    pub x: Array1<f64>,
    /// Objective value `c^T x`.
    pub fun: f64,
    /// Number of pivots performed.
    pub nit: usize,
}

impl LinProgResult {
    /// Result carrying a non-optimal status.
    fn failed(status: SolverStatus, variables: usize, nit: usize) -> Self {
        Self {
            status,
            x: Array1::zeros(variables),
            fun: f64::INFINITY,
            nit,
        }
    }

    /// Return `true` when the solver proved optimality.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolverStatus::Optimal
    }
}

/// Solve a covering program with the dual simplex tableau.
///
/// # Errors
///
/// Returns [`LinProgError`] when the inputs are inconsistent. Solver outcomes, including
/// infeasibility and limits, are reported through [`LinProgResult::status`].
///
/// # Examples
/// ```
/// use ndarray::array;
/// use ptslab::{linprog, CoveringProgram, SolverOptions, SolverStatus};
///
/// // minimize x + y subject to x + 2y >= 4, 3x + y >= 3, 0 <= x, y <= 10
/// let cost = array![1.0, 1.0];
/// let coverage = array![[1.0, 2.0], [3.0, 1.0]];
/// let demand = array![4.0, 3.0];
/// let upper = array![10.0, 10.0];
/// let program = CoveringProgram {
///     cost: cost.view(),
///     coverage: coverage.view(),
///     demand: demand.view(),
///     upper: upper.view(),
/// };
/// let result = linprog(&program, &SolverOptions::default()).unwrap();
/// assert_eq!(result.status, SolverStatus::Optimal);
/// assert!((result.fun - 2.2).abs() < 1e-9);
/// ```
pub fn linprog(
    program: &CoveringProgram<'_>,
    options: &SolverOptions,
) -> Result<LinProgResult, LinProgError> {
    validate(program)?;
    let mut tableau = DualTableau::new(program);
    let started = Instant::now();
    let time_limit = options.time_limit();
    let variables = program.cost.len();
    let tol = options.tolerance;

    let mut nit = 0;
    let mut degenerate_streak = 0;
    loop {
        if tableau.has_non_finite() {
            return Ok(LinProgResult::failed(SolverStatus::NumericalFailure, variables, nit));
        }
        let bland = degenerate_streak >= DEGENERATE_STREAK_LIMIT;
        let Some(col) = tableau.entering(tol, bland) else {
            break;
        };
        if nit >= options.max_iter {
            return Ok(LinProgResult::failed(SolverStatus::IterationLimit, variables, nit));
        }
        if time_limit.map_or(false, |limit| started.elapsed() >= limit) {
            return Ok(LinProgResult::failed(SolverStatus::TimeLimit, variables, nit));
        }
        // An improving dual ray means the primal constraints cannot be met.
        let Some(row) = tableau.leaving(col, tol) else {
            return Ok(LinProgResult::failed(SolverStatus::Infeasible, variables, nit));
        };
        if tableau.rhs(row).abs() <= tol {
            degenerate_streak += 1;
        } else {
            degenerate_streak = 0;
        }
        tableau.pivot(row, col);
        nit += 1;
    }

    let x = tableau.primal_solution(program.upper);
    let achieved = program.coverage.dot(&x);
    let scale = program
        .demand
        .iter()
        .fold(1.0_f64, |acc, value| acc.max(value.abs()));
    let consistent = achieved
        .iter()
        .zip(program.demand.iter())
        .all(|(have, need)| have - need >= -1e3 * tol * scale);
    if !consistent {
        return Ok(LinProgResult::failed(SolverStatus::NumericalFailure, variables, nit));
    }
    let fun = program.cost.dot(&x);
    Ok(LinProgResult {
        status: SolverStatus::Optimal,
        x,
        fun,
        nit,
    })
}

/// Check sizes and signs of the inputs.
fn validate(program: &CoveringProgram<'_>) -> Result<(), LinProgError> {
    let variables = program.cost.len();
    let (rows, cols) = program.coverage.dim();
    if cols != variables {
        return Err(LinProgError::DimensionMismatch {
            what: "constraint row",
            expected: variables,
            actual: cols,
        });
    }
    if program.demand.len() != rows {
        return Err(LinProgError::DimensionMismatch {
            what: "right-hand side",
            expected: rows,
            actual: program.demand.len(),
        });
    }
    if program.upper.len() != variables {
        return Err(LinProgError::DimensionMismatch {
            what: "upper bounds",
            expected: variables,
            actual: program.upper.len(),
        });
    }
    for (index, &value) in program.cost.iter().enumerate() {
        if !(value.is_finite() && value >= 0.0) {
            return Err(LinProgError::InvalidCost { index, value });
        }
    }
    for (index, &value) in program.upper.iter().enumerate() {
        if !(value >= 0.0) {
            return Err(LinProgError::InvalidUpperBound { index, value });
        }
    }
    Ok(())
}

/// Simplex tableau of the dual problem in minimisation form.
///
/// Columns are laid out as `[y (one per constraint) | w (one per finite bound) |
/// slack (one per primal variable) | rhs]`; the last row holds the reduced costs and
/// the negated objective.
struct DualTableau {
    /// Constraint rows followed by the objective row.
    cells: Array2<f64>,
    /// Basic column of every constraint row.
    basis: Vec<usize>,
    /// Number of constraint rows, equal to the number of primal variables.
    rows: usize,
    /// Index of the first slack column.
    slack_start: usize,
    /// Index of the rhs column.
    rhs_col: usize,
}

impl DualTableau {
    /// Lay out the dual of `program` with the slack basis.
    fn new(program: &CoveringProgram<'_>) -> Self {
        let rows = program.cost.len();
        let constraints = program.demand.len();
        let bounded: Vec<usize> = (0..rows)
            .filter(|&var| program.upper[var].is_finite())
            .collect();
        let slack_start = constraints + bounded.len();
        let rhs_col = slack_start + rows;
        let mut cells = Array2::zeros((rows + 1, rhs_col + 1));

        for var in 0..rows {
            for con in 0..constraints {
                cells[[var, con]] = program.coverage[[con, var]];
            }
            cells[[var, slack_start + var]] = 1.0;
            cells[[var, rhs_col]] = program.cost[var];
        }
        for (offset, &var) in bounded.iter().enumerate() {
            cells[[var, constraints + offset]] = -1.0;
            cells[[rows, constraints + offset]] = program.upper[var];
        }
        for con in 0..constraints {
            cells[[rows, con]] = -program.demand[con];
        }

        Self {
            cells,
            basis: (slack_start..rhs_col).collect(),
            rows,
            slack_start,
            rhs_col,
        }
    }

    /// Return `true` if any cell is NaN or infinite.
    fn has_non_finite(&self) -> bool {
        self.cells.iter().any(|value| !value.is_finite())
    }

    /// Right-hand side of a constraint row.
    fn rhs(&self, row: usize) -> f64 {
        self.cells[[row, self.rhs_col]]
    }

    /// Pick an improving column: the most negative reduced cost, or the first negative
    /// one under Bland's rule.
    fn entering(&self, tol: f64, bland: bool) -> Option<usize> {
        let reduced = self.cells.row(self.rows);
        let mut candidates = (0..self.rhs_col).filter(|&col| reduced[col] < -tol);
        if bland {
            return candidates.next();
        }
        candidates.min_by(|&a, &b| reduced[a].total_cmp(&reduced[b]))
    }

    /// Minimum-ratio row for `col`, ties broken by the lowest basic index.
    fn leaving(&self, col: usize, tol: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..self.rows {
            let coefficient = self.cells[[row, col]];
            if coefficient <= tol {
                continue;
            }
            let ratio = self.rhs(row) / coefficient;
            best = match best {
                None => Some((row, ratio)),
                Some((current, current_ratio)) => {
                    let tie = (ratio - current_ratio).abs() <= tol;
                    if ratio < current_ratio - tol
                        || (tie && self.basis[row] < self.basis[current])
                    {
                        Some((row, ratio))
                    } else {
                        Some((current, current_ratio))
                    }
                }
            };
        }
        best.map(|(row, _)| row)
    }

    /// Gauss-Jordan pivot on `(row, col)`.
    fn pivot(&mut self, row: usize, col: usize) {
        let pivot = self.cells[[row, col]];
        self.cells.row_mut(row).mapv_inplace(|value| value / pivot);
        let pivot_row = self.cells.row(row).to_owned();
        for other in 0..=self.rows {
            if other == row {
                continue;
            }
            let factor = self.cells[[other, col]];
            if factor != 0.0 {
                self.cells.row_mut(other).scaled_add(-factor, &pivot_row);
            }
        }
        self.basis[row] = col;
    }

    /// Primal values are the reduced costs of the dual slacks, clamped to the bounds.
    fn primal_solution(&self, upper: ArrayView1<'_, f64>) -> Array1<f64> {
        let reduced = self.cells.row(self.rows);
        Array1::from_shape_fn(self.rows, |var| {
            reduced[self.slack_start + var].max(0.0).min(upper[var])
        })
    }
}
