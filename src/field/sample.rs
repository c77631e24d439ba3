use std::f64::consts::PI;

use ndarray::{Array1, Array3};

use crate::field::data::{CoordinateGrid, FieldData};
use crate::foundation::error::{VizError, VizResult};

/// Generate an evolving wave pattern for demos and smoke tests.
///
/// `x, y ∈ [0, 2π]`, `t ∈ [0, 2]` and
/// `u = sin(x + t)·cos(y + t/2)·e^(−t/10) + 0.3·sin(2x − t)·sin(y + t)`.
pub fn generate(nx: usize, ny: usize, nt: usize) -> VizResult<FieldData> {
    if nt == 0 {
        return Err(VizError::validation("sample data needs at least one time step"));
    }

    let xs = Array1::linspace(0.0, 2.0 * PI, nx);
    let ys = Array1::linspace(0.0, 2.0 * PI, ny);
    let times = Array1::linspace(0.0, 2.0, nt);
    let grid = CoordinateGrid::from_axes(
        xs.as_slice().unwrap_or_default(),
        ys.as_slice().unwrap_or_default(),
    )?;

    let values = Array3::from_shape_fn((nt, ny, nx), |(k, j, i)| {
        let (x, y, t) = (xs[i], ys[j], times[k]);
        (x + t).sin() * (y + 0.5 * t).cos() * (-0.1 * t).exp()
            + 0.3 * (2.0 * x - t).sin() * (y + t).sin()
    });

    FieldData::new(grid, times, values)
}

#[cfg(test)]
#[path = "../../tests/unit/field/sample.rs"]
mod tests;
