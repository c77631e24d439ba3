//! Snapshot grids: several time steps side by side with one shared colorbar.

use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;
use rayon::prelude::*;

use crate::field::data::FieldData;
use crate::foundation::error::{VizError, VizResult};
use crate::render::canvas::Canvas;
use crate::render::frame::FrameRenderer;
use crate::render::layout::{LABEL_PT, PixelRect, SUPTITLE_PT, points_to_px};
use crate::render::text::{Anchor, Label, TextEngine};
use crate::style::config::RenderStyle;
use crate::style::levels::LevelSet;

const MAX_COLS: usize = 2;

/// Placement and identity of one panel in a [`SnapshotGrid`].
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotPanel {
    /// Resolved (non-negative) time index.
    pub time_index: usize,
    /// Time value at that index.
    pub time: f64,
    /// Panel title.
    pub title: String,
    /// Panel cell in the grid image.
    pub rect: PixelRect,
    /// Filled contour area in the grid image.
    pub plot_area: PixelRect,
}

/// A composed multi-panel image.
#[derive(Clone, Debug)]
pub struct SnapshotGrid {
    image: RgbaImage,
    panels: Vec<SnapshotPanel>,
    rows: usize,
    cols: usize,
}

impl SnapshotGrid {
    /// The composed image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Panels in the order they were requested.
    pub fn panels(&self) -> &[SnapshotPanel] {
        &self.panels
    }

    /// Grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Write the grid as a PNG, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> VizResult<()> {
        let path = path.as_ref();
        crate::encode::pipeline::ensure_parent_dir(path)?;
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// `[0, nt/3, 2nt/3, nt-1]`, deduplicated for short time axes.
pub fn default_snapshot_indices(nt: usize) -> Vec<isize> {
    if nt == 0 {
        return Vec::new();
    }
    let mut out: Vec<isize> = [0, nt / 3, 2 * nt / 3, nt - 1]
        .into_iter()
        .map(|t| t as isize)
        .collect();
    out.dedup();
    out
}

/// Panel title for time value `time`.
pub fn panel_title(time: f64) -> String {
    format!("t = {time:.3}")
}

/// Compose the time steps `indices` into one grid image.
///
/// Negative indices count from the end. Every index is resolved before anything is drawn, so a
/// bad index fails without partial work. All panels share one level set spanning the whole
/// tensor.
#[tracing::instrument(skip(data, style), fields(nt = data.nt(), panels = indices.len()))]
pub fn compose_grid(
    data: &FieldData,
    indices: &[isize],
    style: &RenderStyle,
    title: &str,
) -> VizResult<SnapshotGrid> {
    if indices.is_empty() {
        return Err(VizError::validation("snapshot index list is empty"));
    }
    let resolved = indices
        .iter()
        .map(|&i| data.resolve_index(i))
        .collect::<VizResult<Vec<_>>>()?;

    style.validate()?;
    let levels = LevelSet::from_field(data, style.levels)?;
    let panel_style = RenderStyle {
        figure: style.figure.scaled(0.5),
        colorbar: false,
        ..style.clone()
    };
    let renderer = FrameRenderer::new(levels, panel_style, TextEngine::shared())?;

    let n = resolved.len();
    let cols = n.min(MAX_COLS);
    let rows = n.div_ceil(cols);

    let panels = resolved
        .par_iter()
        .map(|&t| -> VizResult<_> {
            let mut canvas = renderer.new_canvas()?;
            let time = data.time(t);
            let title = panel_title(time);
            let plot = renderer.draw(&mut canvas, data.grid(), data.slice(t), &title)?;
            tracing::debug!(time_index = t, time, "rendered panel");
            Ok((t, time, title, plot, canvas.into_image()))
        })
        .collect::<VizResult<Vec<_>>>()?;

    let (pw, ph) = renderer.style().canvas_size();
    let dpi = style.dpi;
    let label_px = points_to_px(LABEL_PT, dpi);
    let suptitle_px = points_to_px(SUPTITLE_PT, dpi);
    let header = (suptitle_px * 2.2).round() as u32;
    let grid_w = pw * cols as u32;
    let grid_h = ph * rows as u32;

    let bar_gap = label_px * 1.5;
    let bar_width = (label_px * 1.2).max(f64::from(grid_w) * 0.02);
    let strip = if style.colorbar {
        (bar_gap + bar_width + label_px * 7.0).ceil() as u32
    } else {
        0
    };

    let mut canvas = Canvas::new(grid_w + strip, header + grid_h)?;
    let mut out_panels = Vec::with_capacity(n);
    for (k, (t, time, title, plot, img)) in panels.into_iter().enumerate() {
        let (r, c) = (k / cols, k % cols);
        let rect = PixelRect::new(c as u32 * pw, header + r as u32 * ph, pw, ph);
        canvas.blit(&img, rect.x, rect.y);
        out_panels.push(SnapshotPanel {
            time_index: t,
            time,
            title,
            rect,
            plot_area: PixelRect::new(rect.x + plot.x, rect.y + plot.y, plot.width, plot.height),
        });
    }

    let mut labels = Vec::new();
    if style.colorbar {
        let gh = f64::from(grid_h);
        let bar = PixelRect::new(
            (f64::from(grid_w) + bar_gap).round() as u32,
            (f64::from(header) + gh * 0.1).round() as u32,
            bar_width.round().max(1.0) as u32,
            (gh * 0.8).round().max(1.0) as u32,
        );
        renderer.draw_colorbar(&mut canvas, bar, label_px, &mut labels);
    }
    if !title.is_empty() {
        labels.push(Label::new(
            title,
            f64::from(canvas.width()) / 2.0,
            f64::from(header) / 2.0,
            suptitle_px,
            Anchor::Middle,
        ));
    }
    renderer.text().draw(&mut canvas, &labels)?;

    Ok(SnapshotGrid {
        image: canvas.into_image(),
        panels: out_panels,
        rows,
        cols,
    })
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
