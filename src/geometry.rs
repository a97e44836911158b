//! Control-point lattice and tendon layout in slab plan coordinates.

use crate::config::{SlabGeometry, TendonLayout};

/// Slack added to the last tendon position so round-off does not drop it.
const LAYOUT_SLACK: f64 = 1e-6;

/// Position in the slab plane measured in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl ControlPoint {
    /// Create a [`ControlPoint`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Odd dimensions of a control lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    /// Number of points across the width.
    pub nx: usize,
    /// Number of points along the span.
    pub ny: usize,
}

impl GridDimensions {
    /// Total number of points in the lattice.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Return `true` when the lattice holds no point.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Choose odd lattice dimensions close to `target_points` for a slab of the given
/// width-to-height `aspect_ratio`.
///
/// Both counts are forced odd so a point always sits on each centreline. The caller
/// guarantees positive arguments.
///
/// # Examples
/// ```
/// use ptslab::grid_dimensions;
///
/// let dims = grid_dimensions(10_000, 8.0 / 12.0);
/// assert_eq!((dims.nx, dims.ny), (81, 123));
/// ```
#[must_use]
pub fn grid_dimensions(target_points: usize, aspect_ratio: f64) -> GridDimensions {
    let target = target_points as f64;
    let ny = force_odd((target / aspect_ratio).sqrt().floor() as usize);
    let nx = force_odd(target_points / ny);
    GridDimensions { nx, ny }
}

/// Bump an even count to the next odd one.
fn force_odd(count: usize) -> usize {
    if count % 2 == 0 {
        count + 1
    } else {
        count
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|idx| {
                    if idx == count - 1 {
                        end
                    } else {
                        start + step * idx as f64
                    }
                })
                .collect()
        }
    }
}

/// Lattice of control points covering the slab interior.
///
/// Points are stored flattened with the outer loop over X and the inner loop over Y,
/// so index `ix * ny + iy` addresses column `ix`, row `iy`.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlGrid {
    /// Lattice dimensions.
    dims: GridDimensions,
    /// Distinct X coordinates, ascending.
    xs: Vec<f64>,
    /// Distinct Y coordinates, ascending.
    ys: Vec<f64>,
}

impl ControlGrid {
    /// Build the lattice for `slab` with roughly `target_points` points inset by
    /// `margin` from every edge.
    ///
    /// # Examples
    /// ```
    /// use ptslab::{ControlGrid, SlabGeometry};
    ///
    /// let grid = ControlGrid::new(&SlabGeometry::default(), 10_000, 0.5);
    /// assert_eq!(grid.len(), 81 * 123);
    /// assert_eq!(grid.point(0).x, 0.5);
    /// ```
    #[must_use]
    pub fn new(slab: &SlabGeometry, target_points: usize, margin: f64) -> Self {
        let dims = grid_dimensions(target_points, slab.aspect_ratio());
        Self {
            dims,
            xs: linspace(margin, slab.width - margin, dims.nx),
            ys: linspace(margin, slab.height - margin, dims.ny),
        }
    }

    /// Lattice dimensions.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// Number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Return `true` when the grid holds no point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Distinct X coordinates.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Distinct Y coordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// The control point at flattened `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> ControlPoint {
        let ny = self.dims.ny;
        ControlPoint::new(self.xs[index / ny], self.ys[index % ny])
    }

    /// Iterate over all control points in storage order.
    pub fn points(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.xs
            .iter()
            .flat_map(move |&x| self.ys.iter().map(move |&y| ControlPoint::new(x, y)))
    }

    /// Flattened X coordinates in storage order, parallel to [`ControlGrid::y_coordinates`].
    #[must_use]
    pub fn x_coordinates(&self) -> Vec<f64> {
        self.points().map(|point| point.x).collect()
    }

    /// Flattened Y coordinates in storage order.
    #[must_use]
    pub fn y_coordinates(&self) -> Vec<f64> {
        self.points().map(|point| point.y).collect()
    }
}

/// Uniformly spaced tendon X positions from `edge_offset` to `width - edge_offset`.
///
/// Positions that would fall on or outside the slab edges are dropped.
///
/// # Examples
/// ```
/// use ptslab::{tendon_positions, SlabGeometry, TendonLayout};
///
/// let positions = tendon_positions(&SlabGeometry::default(), &TendonLayout::default());
/// assert_eq!(positions.len(), 8);
/// assert_eq!(positions[0], 0.5);
/// assert_eq!(positions[7], 7.5);
/// ```
#[must_use]
pub fn tendon_positions(slab: &SlabGeometry, layout: &TendonLayout) -> Vec<f64> {
    if !(layout.spacing > 0.0) {
        return Vec::new();
    }
    let end = slab.width - layout.edge_offset + LAYOUT_SLACK;
    let mut positions = Vec::new();
    let mut index = 0_u32;
    loop {
        let x = layout.edge_offset + f64::from(index) * layout.spacing;
        if x >= end {
            break;
        }
        if x > 0.0 && x < slab.width {
            positions.push(x);
        }
        index += 1;
    }
    positions
}
