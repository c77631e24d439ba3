use crate::field::data::{FieldData, finite_range};
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::linspace;

/// Relative half-width used to widen a zero-range level set.
pub const DEGENERATE_REL_EPS: f64 = 1e-6;
/// Absolute floor for the half-width (covers a constant field of exactly zero).
pub const DEGENERATE_ABS_EPS: f64 = 1e-9;

/// Ascending contour thresholds splitting `[min, max]` into equal bands.
///
/// For animations the set is built once from the whole tensor ([`LevelSet::from_field`]) and
/// reused for every frame, which keeps the value-to-color mapping identical across time.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSet {
    boundaries: Vec<f64>,
    expanded: bool,
}

impl LevelSet {
    /// Split `[min, max]` into `bands` equal bands.
    ///
    /// When the range is too narrow to split into strictly ascending boundaries (`min == max`, or
    /// a few ulps apart) it is widened by `max(|center|·1e-6, 1e-9)` on both sides of its center;
    /// [`LevelSet::is_expanded`] reports this.
    pub fn new(min: f64, max: f64, bands: usize) -> VizResult<Self> {
        if bands == 0 {
            return Err(VizError::validation("contour level count must be >= 1"));
        }
        if !(min.is_finite() && max.is_finite()) {
            return Err(VizError::validation(format!(
                "contour range must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(VizError::validation(format!(
                "contour range is inverted: [{min}, {max}]"
            )));
        }

        let mut boundaries = linspace(min, max, bands + 1);
        let mut expanded = false;
        if !strictly_ascending(&boundaries) {
            let center = min * 0.5 + max * 0.5;
            let eps = (center.abs() * DEGENERATE_REL_EPS).max(DEGENERATE_ABS_EPS);
            boundaries = linspace(center - eps, center + eps, bands + 1);
            expanded = true;
        }
        if !strictly_ascending(&boundaries) {
            return Err(VizError::validation(format!(
                "cannot split [{min}, {max}] into {bands} ascending contour bands"
            )));
        }

        Ok(Self {
            boundaries,
            expanded,
        })
    }

    /// Global level set over every finite sample of the tensor.
    pub fn from_field(data: &FieldData, bands: usize) -> VizResult<Self> {
        let (lo, hi) = data
            .value_range()
            .ok_or_else(|| VizError::validation("solution tensor has no finite values"))?;
        Self::new(lo, hi, bands)
    }

    /// Level set over an arbitrary collection of samples.
    pub fn from_values(values: impl IntoIterator<Item = f64>, bands: usize) -> VizResult<Self> {
        let (lo, hi) = finite_range(values)
            .ok_or_else(|| VizError::validation("field has no finite values"))?;
        Self::new(lo, hi, bands)
    }

    /// Ascending thresholds, `bands + 1` entries.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of color bands.
    pub fn bands(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Lowest threshold.
    pub fn min(&self) -> f64 {
        self.boundaries[0]
    }

    /// Highest threshold.
    pub fn max(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// `true` when the input range had zero width and was widened.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Band index of `v`; values outside the range clamp to the outer bands.
    ///
    /// Returns `None` for non-finite values.
    pub fn band_of(&self, v: f64) -> Option<usize> {
        if !v.is_finite() {
            return None;
        }
        let n = self.bands();
        // Halved operands keep the difference finite for ranges near f64::MAX.
        let (lo, hi) = (self.min() * 0.5, self.max() * 0.5);
        let frac = (v * 0.5 - lo) / (hi - lo);
        let idx = (frac * n as f64).floor();
        Some(if idx < 0.0 {
            0
        } else {
            (idx as usize).min(n - 1)
        })
    }

    /// Normalized colormap position of band `i` (its midpoint).
    pub fn band_position(&self, i: usize) -> f64 {
        (i as f64 + 0.5) / self.bands() as f64
    }
}

fn strictly_ascending(boundaries: &[f64]) -> bool {
    boundaries.iter().all(|b| b.is_finite()) && boundaries.windows(2).all(|w| w[1] > w[0])
}

#[cfg(test)]
#[path = "../../tests/unit/style/levels.rs"]
mod tests;
