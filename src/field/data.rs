use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};

use crate::foundation::core::Rect;
use crate::foundation::error::{VizError, VizResult};

/// Rectilinear coordinate grid in meshgrid layout (`x[j][i]`, `y[j][i]`, shape `ny × nx`).
///
/// Every row of `x` must be identical and every column of `y` must be identical, with strictly
/// increasing axes. The per-axis vectors are extracted once so pixel lookups are `O(log n)`.
#[derive(Clone, Debug)]
pub struct CoordinateGrid {
    x: Array2<f64>,
    y: Array2<f64>,
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
}

impl CoordinateGrid {
    /// Validate and wrap a pair of meshgrid arrays.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> VizResult<Self> {
        if x.dim() != y.dim() {
            return Err(VizError::shape(format!(
                "coordinate grids disagree: x is {:?}, y is {:?}",
                x.dim(),
                y.dim()
            )));
        }
        let (ny, nx) = x.dim();
        if nx < 2 || ny < 2 {
            return Err(VizError::validation(format!(
                "coordinate grid must be at least 2x2, got {ny}x{nx}"
            )));
        }

        let x_axis: Vec<f64> = x.row(0).to_vec();
        let y_axis: Vec<f64> = y.column(0).to_vec();
        check_axis("x", &x_axis)?;
        check_axis("y", &y_axis)?;

        for ((j, i), &v) in x.indexed_iter() {
            if !close(v, x_axis[i]) {
                return Err(VizError::validation(format!(
                    "coordinate grid is not rectilinear: x[{j}][{i}] = {v} differs from x[0][{i}] = {}",
                    x_axis[i]
                )));
            }
        }
        for ((j, i), &v) in y.indexed_iter() {
            if !close(v, y_axis[j]) {
                return Err(VizError::validation(format!(
                    "coordinate grid is not rectilinear: y[{j}][{i}] = {v} differs from y[{j}][0] = {}",
                    y_axis[j]
                )));
            }
        }

        Ok(Self {
            x,
            y,
            x_axis,
            y_axis,
        })
    }

    /// Build the meshgrid of two 1-D axes (`numpy.meshgrid(xs, ys)`).
    pub fn from_axes(xs: &[f64], ys: &[f64]) -> VizResult<Self> {
        let (nx, ny) = (xs.len(), ys.len());
        let x = Array2::from_shape_fn((ny, nx), |(_, i)| xs[i]);
        let y = Array2::from_shape_fn((ny, nx), |(j, _)| ys[j]);
        Self::new(x, y)
    }

    /// `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// X coordinates, shape `ny × nx`.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Y coordinates, shape `ny × nx`.
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// Strictly increasing x positions of the grid columns.
    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    /// Strictly increasing y positions of the grid rows.
    pub fn y_axis(&self) -> &[f64] {
        &self.y_axis
    }

    /// Data-space bounding box `(x_min, y_min) .. (x_max, y_max)`.
    pub fn extent(&self) -> Rect {
        Rect::new(
            self.x_axis[0],
            self.y_axis[0],
            self.x_axis[self.x_axis.len() - 1],
            self.y_axis[self.y_axis.len() - 1],
        )
    }
}

fn check_axis(name: &str, axis: &[f64]) -> VizResult<()> {
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(VizError::validation(format!(
            "{name} coordinates must be finite"
        )));
    }
    if axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(VizError::validation(format!(
            "{name} coordinates must be strictly increasing"
        )));
    }
    Ok(())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Shape-validated bundle of coordinate grid, time vector and solution tensor.
///
/// The tensor has shape `(nt, ny, nx)`; its last two dimensions match the grid and its first
/// dimension matches the time vector. Construction is the only place this is checked, so every
/// downstream stage can index without re-validating.
#[derive(Clone, Debug)]
pub struct FieldData {
    grid: CoordinateGrid,
    times: Array1<f64>,
    values: Array3<f64>,
}

impl FieldData {
    /// Validate shapes and build the bundle.
    pub fn new(grid: CoordinateGrid, times: Array1<f64>, values: Array3<f64>) -> VizResult<Self> {
        let (nt, ny, nx) = values.dim();
        let (gy, gx) = grid.shape();
        if (ny, nx) != (gy, gx) || nt != times.len() {
            return Err(VizError::shape(format!(
                "solution tensor has shape ({nt}, {ny}, {nx}) but the grid is ({gy}, {gx}) and the \
                 time vector has {} entries; expected ({}, {gy}, {gx})",
                times.len(),
                times.len()
            )));
        }
        if nt == 0 {
            return Err(VizError::validation("time vector must not be empty"));
        }
        Ok(Self {
            grid,
            times,
            values,
        })
    }

    /// Coordinate grid.
    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    /// Time vector.
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Full solution tensor.
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    /// Number of time steps.
    pub fn nt(&self) -> usize {
        self.times.len()
    }

    /// Time value of step `t`.
    pub fn time(&self, t: usize) -> f64 {
        self.times[t]
    }

    /// 2-D field of step `t`.
    pub fn slice(&self, t: usize) -> ArrayView2<'_, f64> {
        self.values.index_axis(Axis(0), t)
    }

    /// Resolve a possibly negative time index (`-1` is the last step).
    ///
    /// Valid inputs are `-nt ..= nt - 1`.
    pub fn resolve_index(&self, index: isize) -> VizResult<usize> {
        let nt = self.nt() as isize;
        let resolved = if index < 0 { nt + index } else { index };
        if !(0..nt).contains(&resolved) {
            return Err(VizError::validation(format!(
                "time index {index} is out of range for {nt} time steps (valid: {}..={})",
                -nt,
                nt - 1
            )));
        }
        Ok(resolved as usize)
    }

    /// Finite `(min, max)` over the whole tensor, `None` when no sample is finite.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.values.iter().copied())
    }
}

/// Finite `(min, max)` of `values`, ignoring NaN and infinities.
pub(crate) fn finite_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
#[path = "../../tests/unit/field/data.rs"]
mod tests;
