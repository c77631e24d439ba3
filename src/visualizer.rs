//! High-level entry points driven by a [`VizConfig`].

use std::path::Path;

use crate::compose::{SnapshotGrid, compose_grid, default_snapshot_indices};
use crate::encode::encoder::AnimationFormat;
use crate::encode::pipeline::{ExportArtifact, ExportOpts, ExportPipeline};
use crate::field::data::FieldData;
use crate::foundation::error::VizResult;
use crate::render::frame::{FrameRenderer, RenderedFrame};
use crate::render::text::TextEngine;
use crate::sequence::generate_sequence;
use crate::style::config::{RenderStyle, VizConfig};
use crate::style::levels::LevelSet;

/// Renders static plots, animations and snapshot grids with one configuration.
#[derive(Debug)]
pub struct Visualizer {
    config: VizConfig,
    style: RenderStyle,
    pipeline: ExportPipeline,
}

impl Visualizer {
    /// Validate `config` and set up the standard GIF → MP4 export chain.
    pub fn new(config: VizConfig) -> VizResult<Self> {
        config.validate()?;
        let style = config.render_style()?;
        Ok(Self {
            config,
            style,
            pipeline: ExportPipeline::standard(),
        })
    }

    /// Replace the export chain.
    pub fn with_pipeline(mut self, pipeline: ExportPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Resolved drawing options.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render one time step to a PNG at `path`.
    ///
    /// Levels span only this slice, so a single snapshot uses its full color range.
    #[tracing::instrument(skip(self, data, path), fields(path = %path.as_ref().display()))]
    pub fn render_static(
        &self,
        data: &FieldData,
        time_index: isize,
        title: &str,
        path: impl AsRef<Path>,
    ) -> VizResult<RenderedFrame> {
        let t = data.resolve_index(time_index)?;
        let slice = data.slice(t);
        let levels = LevelSet::from_values(slice.iter().copied(), self.style.levels)?;
        let renderer = FrameRenderer::new(levels, self.style.clone(), TextEngine::shared())?;
        let mut canvas = renderer.new_canvas()?;
        let frame = renderer.render_frame(
            &mut canvas,
            data.grid(),
            slice,
            t,
            data.time(t),
            &format!("{title} (t = {t})"),
        )?;
        frame.save_png(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), time_index = t, "static plot written");
        Ok(frame)
    }

    /// Animate every time step into `path`.
    ///
    /// The preferred container comes from the extension of `path` (`.mp4`, otherwise GIF). When
    /// that encoder fails, the next one writes next to it with its own extension.
    pub fn animate(&self, data: &FieldData, path: impl AsRef<Path>) -> VizResult<ExportArtifact> {
        let path = path.as_ref();
        let frames = generate_sequence(data, &self.style, &self.config.title)?;
        let opts = ExportOpts {
            path: path.to_path_buf(),
            format: AnimationFormat::from_path(path).unwrap_or(AnimationFormat::Gif),
            interval_ms: self.config.interval_ms,
            force_fallback: self.config.force_fallback,
        };
        self.pipeline.export(frames, &opts)
    }

    /// Compose the configured snapshot selection into a PNG grid at `path`.
    pub fn snapshots(&self, data: &FieldData, path: impl AsRef<Path>) -> VizResult<SnapshotGrid> {
        let indices = match &self.config.snapshot_indices {
            Some(indices) => indices.clone(),
            None => default_snapshot_indices(data.nt()),
        };
        let grid = compose_grid(data, &indices, &self.style, &self.config.snapshot_title)?;
        grid.save(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            panels = grid.panels().len(),
            "snapshot grid written"
        );
        Ok(grid)
    }
}

#[cfg(test)]
#[path = "../tests/unit/visualizer.rs"]
mod tests;
