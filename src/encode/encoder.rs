use std::path::Path;

use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::RenderedFrame;

/// Animation container formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationFormat {
    /// Animated GIF, looping forever.
    Gif,
    /// H.264 in an MP4 container.
    Mp4,
}

impl AnimationFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
        }
    }

    /// Guess the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gif" => Some(Self::Gif),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnimationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Per-export encoding options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOpts {
    /// Display duration of each frame in milliseconds.
    pub interval_ms: u32,
}

impl EncodeOpts {
    /// Reject a zero interval.
    pub fn validate(&self) -> VizResult<()> {
        if self.interval_ms == 0 {
            return Err(VizError::validation("frame interval must be non-zero"));
        }
        Ok(())
    }
}

/// Turns an ordered frame slice into one animation file.
///
/// Encoders write exactly to `out`; the pipeline owns temp-file handling and cleanup, so an
/// encoder may leave a partial file behind when it fails.
pub trait AnimationEncoder: Send + Sync {
    /// Short identifier used in logs and error reports.
    fn name(&self) -> &str;
    /// Container produced by this encoder.
    fn format(&self) -> AnimationFormat;
    /// Encode `frames` (already in time order) into `out`.
    fn encode(&self, frames: &[RenderedFrame], out: &Path, opts: &EncodeOpts) -> VizResult<()>;
}

/// Check that every frame shares the first frame's size and return it.
pub(crate) fn uniform_frame_size(frames: &[RenderedFrame]) -> VizResult<(u32, u32)> {
    let first = frames
        .first()
        .ok_or_else(|| VizError::validation("cannot encode an empty frame sequence"))?;
    let size = (first.width, first.height);
    for f in frames {
        if (f.width, f.height) != size {
            return Err(VizError::validation(format!(
                "frame size mismatch: frame {} is {}x{}, expected {}x{}",
                f.time_index, f.width, f.height, size.0, size.1
            )));
        }
        if f.data.len() != (f.width as usize) * (f.height as usize) * 4 {
            return Err(VizError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
    }
    Ok(size)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
