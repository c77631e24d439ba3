use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use image::RgbaImage;
use ndarray::ArrayView2;

use crate::field::data::CoordinateGrid;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::{format_tick, linspace};
use crate::render::canvas::Canvas;
use crate::render::layout::{LayoutRequest, PixelRect, PlotLayout};
use crate::render::text::{Anchor, Label, TextEngine};
use crate::style::config::RenderStyle;
use crate::style::levels::LevelSet;

const ISO_LINE: Rgba8 = Rgba8::WHITE.with_alpha(77);
const AXIS_TICKS: usize = 5;
const MAX_COLORBAR_TICKS: usize = 6;

/// One rendered time step.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    /// Index into the time vector.
    pub time_index: usize,
    /// Time value of that step.
    pub time: f64,
    /// Title drawn above the plot.
    pub title: String,
    /// Where the filled contour landed on the canvas.
    pub plot_area: PixelRect,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Opaque RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl RenderedFrame {
    /// Color at `(x, y)`; `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some(Rgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> VizResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| VizError::render("frame.data size mismatch with width*height*4"))
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> VizResult<()> {
        let path = path.as_ref();
        crate::encode::pipeline::ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Draws one time slice as a filled contour plot.
///
/// The band palette is sampled from the colormap once, at construction. Every frame drawn by the
/// same renderer therefore maps a given value to the same color.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    levels: LevelSet,
    style: RenderStyle,
    palette: Vec<Rgba8>,
    text: Arc<TextEngine>,
}

impl FrameRenderer {
    /// Build a renderer for a fixed level set and style.
    pub fn new(levels: LevelSet, style: RenderStyle, text: Arc<TextEngine>) -> VizResult<Self> {
        style.validate()?;
        let palette = (0..levels.bands())
            .map(|i| style.colormap.sample(levels.band_position(i)))
            .collect();
        Ok(Self {
            levels,
            style,
            palette,
            text,
        })
    }

    /// Level set used for every frame.
    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    /// Drawing options.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Fill color of `v`, `None` for non-finite values.
    pub fn color_for(&self, v: f64) -> Option<Rgba8> {
        self.levels.band_of(v).map(|b| self.palette[b])
    }

    /// A fresh canvas sized for this renderer's style.
    pub fn new_canvas(&self) -> VizResult<Canvas> {
        let (w, h) = self.style.canvas_size();
        Canvas::new(w, h)
    }

    /// Draw `values` on `canvas` and snapshot the result.
    ///
    /// The canvas is not cleared here; sequences clear it before each frame.
    pub fn render_frame(
        &self,
        canvas: &mut Canvas,
        grid: &CoordinateGrid,
        values: ArrayView2<'_, f64>,
        time_index: usize,
        time: f64,
        title: &str,
    ) -> VizResult<RenderedFrame> {
        let plot_area = self.draw(canvas, grid, values, title)?;
        Ok(RenderedFrame {
            time_index,
            time,
            title: title.to_owned(),
            plot_area,
            width: canvas.width(),
            height: canvas.height(),
            data: canvas.image().as_raw().clone(),
        })
    }

    pub(crate) fn draw(
        &self,
        canvas: &mut Canvas,
        grid: &CoordinateGrid,
        values: ArrayView2<'_, f64>,
        title: &str,
    ) -> VizResult<PixelRect> {
        if values.dim() != grid.shape() {
            return Err(VizError::shape(format!(
                "field slice is {:?} but the grid is {:?}",
                values.dim(),
                grid.shape()
            )));
        }
        let expected = self.style.canvas_size();
        if (canvas.width(), canvas.height()) != expected {
            return Err(VizError::render(format!(
                "canvas is {}x{}, style expects {}x{}",
                canvas.width(),
                canvas.height(),
                expected.0,
                expected.1
            )));
        }

        let layout = PlotLayout::compute(LayoutRequest {
            width: canvas.width(),
            height: canvas.height(),
            dpi: self.style.dpi,
            extent: grid.extent(),
            colorbar: self.style.colorbar,
            equal_aspect: self.style.equal_aspect,
        })?;

        self.fill_contours(canvas, grid, values, layout.plot);
        canvas.stroke_outside(layout.plot, Rgba8::BLACK);

        let mut labels = Vec::new();
        self.axis_ticks(canvas, grid, &layout, &mut labels);
        if let Some(bar) = layout.colorbar {
            self.draw_colorbar(canvas, bar, layout.label_px, &mut labels);
        }
        if !title.is_empty() {
            labels.push(Label::new(
                title,
                layout.title_at.x,
                layout.title_at.y,
                layout.title_px,
                Anchor::Middle,
            ));
        }
        self.text.draw(canvas, &labels)?;

        Ok(layout.plot)
    }

    fn fill_contours(
        &self,
        canvas: &mut Canvas,
        grid: &CoordinateGrid,
        values: ArrayView2<'_, f64>,
        plot: PixelRect,
    ) {
        let extent = grid.extent();
        let (pw, ph) = (plot.width as usize, plot.height as usize);
        if pw == 0 || ph == 0 {
            return;
        }

        let cols: Vec<(usize, f64)> = (0..pw)
            .map(|px| {
                let x = extent.x0 + (px as f64 + 0.5) / pw as f64 * extent.width();
                axis_position(grid.x_axis(), x)
            })
            .collect();
        // Pixel rows run top-down while y grows upward.
        let rows: Vec<(usize, f64)> = (0..ph)
            .map(|py| {
                let y = extent.y1 - (py as f64 + 0.5) / ph as f64 * extent.height();
                axis_position(grid.y_axis(), y)
            })
            .collect();

        let mut bands = vec![None::<usize>; pw * ph];
        for (py, &(j, ty)) in rows.iter().enumerate() {
            for (px, &(i, tx)) in cols.iter().enumerate() {
                // Corners are halved so differences stay finite near f64::MAX.
                let v00 = values[[j, i]] * 0.5;
                let v10 = values[[j, i + 1]] * 0.5;
                let v01 = values[[j + 1, i]] * 0.5;
                let v11 = values[[j + 1, i + 1]] * 0.5;
                // Difference form keeps constant cells exactly constant.
                let v = 2.0
                    * (v00
                        + tx * (v10 - v00)
                        + ty * (v01 - v00)
                        + tx * ty * (v11 - v10 - v01 + v00));
                bands[py * pw + px] = self.levels.band_of(v);
            }
        }

        for py in 0..ph {
            for px in 0..pw {
                let Some(band) = bands[py * pw + px] else {
                    continue;
                };
                let (x, y) = (plot.x + px as u32, plot.y + py as u32);
                canvas.blend(x, y, self.palette[band]);

                if self.style.contour_lines {
                    let right = (px + 1 < pw).then(|| bands[py * pw + px + 1]).flatten();
                    let below = (py + 1 < ph).then(|| bands[(py + 1) * pw + px]).flatten();
                    let edge = right.is_some_and(|b| b != band) || below.is_some_and(|b| b != band);
                    if edge {
                        canvas.blend(x, y, ISO_LINE);
                    }
                }
            }
        }
    }

    fn axis_ticks(
        &self,
        canvas: &mut Canvas,
        grid: &CoordinateGrid,
        layout: &PlotLayout,
        labels: &mut Vec<Label>,
    ) {
        let plot = layout.plot;
        let extent = grid.extent();
        let tick_len = (layout.label_px * 0.4).max(2.0);
        let label_px = layout.label_px;
        let left = i64::from(plot.x);
        let bottom = i64::from(plot.bottom());

        for (k, xv) in linspace(extent.x0, extent.x1, AXIS_TICKS).into_iter().enumerate() {
            let frac = k as f64 / (AXIS_TICKS - 1) as f64;
            let px = f64::from(plot.x) + frac * f64::from(plot.width.saturating_sub(1));
            canvas.vline(px as i64, bottom + 1, bottom + 1 + tick_len as i64, Rgba8::BLACK);
            labels.push(Label::new(
                format_tick(xv),
                px,
                f64::from(plot.bottom()) + tick_len + label_px,
                label_px,
                Anchor::Middle,
            ));
        }
        for (k, yv) in linspace(extent.y0, extent.y1, AXIS_TICKS).into_iter().enumerate() {
            let frac = k as f64 / (AXIS_TICKS - 1) as f64;
            let py = f64::from(plot.bottom().saturating_sub(1))
                - frac * f64::from(plot.height.saturating_sub(1));
            canvas.hline(left - 1 - tick_len as i64, left - 1, py as i64, Rgba8::BLACK);
            labels.push(Label::new(
                format_tick(yv),
                f64::from(plot.x) - tick_len - label_px * 0.4,
                py,
                label_px,
                Anchor::End,
            ));
        }

        labels.push(Label::new(
            "X",
            plot.center().x,
            f64::from(plot.bottom()) + tick_len + label_px * 2.4,
            label_px,
            Anchor::Middle,
        ));
        labels.push(
            Label::new(
                "Y",
                (f64::from(plot.x) - label_px * 4.2).max(label_px * 0.6),
                plot.center().y,
                label_px,
                Anchor::Middle,
            )
            .rotated(-90.0),
        );
    }

    /// Draw the band strip, its tick marks and labels into `bar`.
    pub(crate) fn draw_colorbar(
        &self,
        canvas: &mut Canvas,
        bar: PixelRect,
        label_px: f64,
        labels: &mut Vec<Label>,
    ) {
        let n = self.levels.bands();
        let h = f64::from(bar.height);
        for (i, color) in self.palette.iter().enumerate() {
            // Band 0 sits at the bottom.
            let y1 = f64::from(bar.bottom()) - h * i as f64 / n as f64;
            let y0 = f64::from(bar.bottom()) - h * (i + 1) as f64 / n as f64;
            let band = PixelRect::new(
                bar.x,
                y0.round() as u32,
                bar.width,
                (y1.round() - y0.round()).max(0.0) as u32,
            );
            canvas.fill_rect(band, *color);
        }
        canvas.stroke_outside(bar, Rgba8::BLACK);

        let bounds = self.levels.boundaries();
        let step = bounds.len().div_ceil(MAX_COLORBAR_TICKS).max(1);
        let right = i64::from(bar.right());
        let tick_len = (label_px * 0.4).max(2.0);
        for (k, v) in bounds.iter().enumerate() {
            if k % step != 0 && k + 1 != bounds.len() {
                continue;
            }
            let y = f64::from(bar.bottom()) - h * k as f64 / n as f64;
            canvas.hline(right + 1, right + 1 + tick_len as i64, y as i64, Rgba8::BLACK);
            labels.push(Label::new(
                format_tick(*v),
                f64::from(bar.right()) + tick_len + label_px * 0.4,
                y,
                label_px,
                Anchor::Start,
            ));
        }

        labels.push(
            Label::new(
                "Solution Value",
                f64::from(bar.right()) + tick_len + label_px * 5.0,
                bar.center().y,
                label_px * 1.2,
                Anchor::Middle,
            )
            .rotated(-90.0),
        );
    }

    pub(crate) fn text(&self) -> &TextEngine {
        &self.text
    }
}

/// Locate `v` on a strictly increasing axis as `(cell, fraction)` with `cell + 1 < axis.len()`.
fn axis_position(axis: &[f64], v: f64) -> (usize, f64) {
    let last_cell = axis.len() - 2;
    let cell = axis.partition_point(|&a| a <= v).saturating_sub(1).min(last_cell);
    let (a0, a1) = (axis[cell], axis[cell + 1]);
    (cell, ((v - a0) / (a1 - a0)).clamp(0.0, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
