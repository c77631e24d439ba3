//! Lazy, single-pass frame sequences over the time axis.

use crate::field::data::FieldData;
use crate::foundation::error::{VizError, VizResult};
use crate::render::canvas::Canvas;
use crate::render::frame::{FrameRenderer, RenderedFrame};
use crate::render::text::TextEngine;
use crate::style::config::RenderStyle;
use crate::style::levels::LevelSet;

/// Animation frame title for time value `time`.
pub fn frame_title(title: &str, time: f64) -> String {
    format!("{title} (t = {time:.3})")
}

/// Build a sequence over every time step with a global level set.
///
/// The level set spans the whole tensor, so colors stay comparable across frames.
#[tracing::instrument(skip(data, style), fields(nt = data.nt()))]
pub fn generate_sequence<'a>(
    data: &'a FieldData,
    style: &RenderStyle,
    title: &str,
) -> VizResult<FrameSequence<'a>> {
    let levels = LevelSet::from_field(data, style.levels)?;
    if levels.is_expanded() {
        tracing::debug!(value = levels.min(), "near-constant tensor, widened contour range");
    }
    let renderer = FrameRenderer::new(levels, style.clone(), TextEngine::shared())?;
    FrameSequence::new(data, renderer, title)
}

/// Iterator of rendered frames in ascending time order.
///
/// The sequence owns its canvas; it is cleared before every frame and never shared with another
/// sequence. Iteration is single-pass and stops after the first error.
pub struct FrameSequence<'a> {
    data: &'a FieldData,
    renderer: FrameRenderer,
    canvas: Canvas,
    title: String,
    indices: std::vec::IntoIter<usize>,
    failed: bool,
}

impl<'a> FrameSequence<'a> {
    /// Sequence over all `nt` time steps.
    pub fn new(data: &'a FieldData, renderer: FrameRenderer, title: &str) -> VizResult<Self> {
        let canvas = renderer.new_canvas()?;
        Ok(Self {
            data,
            renderer,
            canvas,
            title: title.to_owned(),
            indices: (0..data.nt()).collect::<Vec<_>>().into_iter(),
            failed: false,
        })
    }

    /// Restrict the sequence to `indices`, which must be strictly ascending and in range.
    pub fn with_indices(mut self, indices: Vec<usize>) -> VizResult<Self> {
        let nt = self.data.nt();
        if let Some(&bad) = indices.iter().find(|&&t| t >= nt) {
            return Err(VizError::validation(format!(
                "time index {bad} is out of range for {nt} time steps"
            )));
        }
        if indices.windows(2).any(|w| w[1] <= w[0]) {
            return Err(VizError::validation(
                "sequence indices must be strictly ascending",
            ));
        }
        self.indices = indices.into_iter();
        Ok(self)
    }

    /// Renderer shared by every frame.
    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// How many times the canvas has been cleared.
    pub fn canvas_clears(&self) -> u64 {
        self.canvas.clear_count()
    }

    /// Frames not yet produced.
    pub fn remaining(&self) -> usize {
        if self.failed { 0 } else { self.indices.len() }
    }
}

impl Iterator for FrameSequence<'_> {
    type Item = VizResult<RenderedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let t = self.indices.next()?;

        self.canvas.clear();
        let time = self.data.time(t);
        let result = self.renderer.render_frame(
            &mut self.canvas,
            self.data.grid(),
            self.data.slice(t),
            t,
            time,
            &frame_title(&self.title, time),
        );
        match &result {
            Ok(_) => tracing::debug!(time_index = t, time, "rendered frame"),
            Err(e) => {
                tracing::debug!(time_index = t, error = %e, "frame render failed");
                self.failed = true;
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/sequence.rs"]
mod tests;
