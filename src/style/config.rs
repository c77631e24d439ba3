use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::FigureSize;
use crate::foundation::error::{VizError, VizResult};
use crate::style::colormap::{Colormap, ColormapSpec};

/// Resolved drawing options shared by every frame of one visualization.
#[derive(Clone, Debug)]
pub struct RenderStyle {
    /// Canvas size in inches.
    pub figure: FigureSize,
    /// Pixels per inch.
    pub dpi: u32,
    /// Number of contour bands.
    pub levels: usize,
    /// Band colors are sampled from this map.
    pub colormap: Colormap,
    /// Draw a colorbar next to the plot.
    pub colorbar: bool,
    /// Overlay white iso-lines on band edges.
    pub contour_lines: bool,
    /// Keep one data unit equally long on both axes.
    pub equal_aspect: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            figure: FigureSize::default(),
            dpi: 100,
            levels: 20,
            colormap: Colormap::default(),
            colorbar: true,
            contour_lines: true,
            equal_aspect: true,
        }
    }
}

impl RenderStyle {
    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.figure.pixels(self.dpi)
    }

    /// Reject sizes and counts that cannot produce an image.
    pub fn validate(&self) -> VizResult<()> {
        self.figure.validate()?;
        if self.dpi == 0 {
            return Err(VizError::validation("dpi must be non-zero"));
        }
        if self.levels == 0 {
            return Err(VizError::validation("contour level count must be >= 1"));
        }
        let (w, h) = self.canvas_size();
        const MAX_DIM: u32 = 16_384;
        if w > MAX_DIM || h > MAX_DIM {
            return Err(VizError::validation(format!(
                "canvas size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        Ok(())
    }
}

/// User-facing configuration, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VizConfig {
    /// Figure size in inches.
    pub figure: FigureSize,
    /// Pixels per inch.
    pub dpi: u32,
    /// Number of contour bands.
    pub levels: usize,
    /// Colormap name or ordered color list.
    pub colormap: ColormapSpec,
    /// Display duration of one animation frame in milliseconds.
    pub interval_ms: u32,
    /// Draw a colorbar.
    pub colorbar: bool,
    /// Overlay iso-lines.
    pub contour_lines: bool,
    /// Equal data aspect ratio.
    pub equal_aspect: bool,
    /// Animation title; each frame appends `(t = ...)`.
    pub title: String,
    /// Title above a snapshot grid.
    pub snapshot_title: String,
    /// Skip the preferred animation encoder and go straight to the fallback.
    pub force_fallback: bool,
    /// Time indices for snapshot grids (negative counts from the end). `None` picks four evenly
    /// spaced steps.
    pub snapshot_indices: Option<Vec<isize>>,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            figure: FigureSize::default(),
            dpi: 100,
            levels: 20,
            colormap: ColormapSpec::default(),
            interval_ms: 200,
            colorbar: true,
            contour_lines: true,
            equal_aspect: true,
            title: "Dynamic PDE Evolution".to_owned(),
            snapshot_title: "PDE Solution Snapshots".to_owned(),
            force_fallback: false,
            snapshot_indices: None,
        }
    }
}

impl VizConfig {
    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> VizResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON config string.
    pub fn from_json_str(text: &str) -> VizResult<Self> {
        serde_json::from_str(text).map_err(|e| VizError::serde(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> VizResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VizError::serde(e.to_string()))
    }

    /// Check every option without rendering anything.
    pub fn validate(&self) -> VizResult<()> {
        if self.interval_ms == 0 {
            return Err(VizError::validation("animation interval must be non-zero"));
        }
        if let Some(indices) = &self.snapshot_indices
            && indices.is_empty()
        {
            return Err(VizError::validation(
                "snapshot_indices must not be empty when set",
            ));
        }
        self.render_style()?.validate()
    }

    /// Resolve the colormap and build the drawing options.
    pub fn render_style(&self) -> VizResult<RenderStyle> {
        Ok(RenderStyle {
            figure: self.figure,
            dpi: self.dpi,
            levels: self.levels,
            colormap: Colormap::from_spec(&self.colormap)?,
            colorbar: self.colorbar,
            contour_lines: self.contour_lines,
            equal_aspect: self.equal_aspect,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/config.rs"]
mod tests;
