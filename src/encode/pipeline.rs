use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::encoder::{AnimationEncoder, AnimationFormat, EncodeOpts};
use crate::encode::ffmpeg::FfmpegMp4Encoder;
use crate::encode::gif::GifAnimationEncoder;
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::RenderedFrame;

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> VizResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Options for [`ExportPipeline::export`].
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Requested output path. Its extension is swapped when a fallback encoder produces the file.
    pub path: PathBuf,
    /// Preferred container; encoders of this format are tried first.
    pub format: AnimationFormat,
    /// Display duration of each frame in milliseconds.
    pub interval_ms: u32,
    /// Skip the preferred encoder and go straight to the next one.
    pub force_fallback: bool,
}

impl ExportOpts {
    /// Options for `path`, taking the preferred format from its extension (GIF when unknown).
    pub fn for_path(path: impl Into<PathBuf>, interval_ms: u32) -> Self {
        let path = path.into();
        let format = AnimationFormat::from_path(&path).unwrap_or(AnimationFormat::Gif);
        Self {
            path,
            format,
            interval_ms,
            force_fallback: false,
        }
    }
}

/// Outcome of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File that was written.
    pub path: PathBuf,
    /// Container of that file.
    pub format: AnimationFormat,
    /// Name of the encoder that produced it.
    pub encoder: String,
    /// `true` when an encoder other than the first in line produced the file.
    pub fallback: bool,
    /// Number of frames encoded.
    pub frames: usize,
    /// `"<encoder>: <error>"` for each attempt that failed before this one.
    pub failed_attempts: Vec<String>,
}

/// Ordered chain of animation encoders.
///
/// Frames are rendered once and handed to each encoder in turn until one succeeds.
pub struct ExportPipeline {
    encoders: Vec<Box<dyn AnimationEncoder>>,
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field(
                "encoders",
                &self.encoders.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExportPipeline {
    /// Chain with the given encoders in registration order.
    pub fn new(encoders: Vec<Box<dyn AnimationEncoder>>) -> Self {
        Self { encoders }
    }

    /// GIF via `image`, then MP4 via the system `ffmpeg`.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(GifAnimationEncoder::default()),
            Box::new(FfmpegMp4Encoder::default()),
        ])
    }

    /// Registered encoders, in registration order.
    pub fn encoders(&self) -> impl Iterator<Item = &dyn AnimationEncoder> {
        self.encoders.iter().map(|e| e.as_ref())
    }

    /// Attempt order for `opts`: encoders of the preferred format first, then the rest in
    /// registration order, minus the head when `force_fallback` is set.
    pub fn encoder_order(&self, opts: &ExportOpts) -> Vec<&dyn AnimationEncoder> {
        let (mut order, rest): (Vec<&dyn AnimationEncoder>, Vec<&dyn AnimationEncoder>) = self
            .encoders()
            .partition(|e| e.format() == opts.format);
        order.extend(rest);
        if opts.force_fallback && !order.is_empty() {
            order.remove(0);
        }
        order
    }

    /// Collect `frames` and export them. The first frame error aborts before any encoding.
    #[tracing::instrument(skip(self, frames), fields(path = %opts.path.display(), format = %opts.format))]
    pub fn export<I>(&self, frames: I, opts: &ExportOpts) -> VizResult<ExportArtifact>
    where
        I: IntoIterator<Item = VizResult<RenderedFrame>>,
    {
        let frames = frames.into_iter().collect::<VizResult<Vec<_>>>()?;
        self.export_frames(&frames, opts)
    }

    /// Export already rendered frames.
    pub fn export_frames(
        &self,
        frames: &[RenderedFrame],
        opts: &ExportOpts,
    ) -> VizResult<ExportArtifact> {
        let enc_opts = EncodeOpts {
            interval_ms: opts.interval_ms,
        };
        enc_opts.validate()?;
        if frames.is_empty() {
            return Err(VizError::validation("cannot export an empty frame sequence"));
        }

        let mut attempts = Vec::new();
        for (i, encoder) in self.encoder_order(opts).into_iter().enumerate() {
            let out = opts.path.with_extension(encoder.format().extension());
            match encode_atomically(encoder, frames, &out, &enc_opts) {
                Ok(()) => {
                    let fallback = i > 0 || opts.force_fallback;
                    tracing::info!(
                        encoder = encoder.name(),
                        path = %out.display(),
                        frames = frames.len(),
                        fallback,
                        "animation written"
                    );
                    return Ok(ExportArtifact {
                        path: out,
                        format: encoder.format(),
                        encoder: encoder.name().to_owned(),
                        fallback,
                        frames: frames.len(),
                        failed_attempts: attempts,
                    });
                }
                Err(e) => {
                    tracing::warn!(encoder = encoder.name(), error = %e, "encoder failed");
                    attempts.push(format!("{}: {e}", encoder.name()));
                }
            }
        }
        Err(VizError::NoBackend { attempts })
    }
}

fn encode_atomically(
    encoder: &dyn AnimationEncoder,
    frames: &[RenderedFrame],
    out: &Path,
    opts: &EncodeOpts,
) -> VizResult<()> {
    ensure_parent_dir(out)?;
    let tmp = partial_path(out);
    let mut guard = TempFileGuard(Some(tmp.clone()));
    encoder.encode(frames, &tmp, opts)?;
    let len = std::fs::metadata(&tmp)
        .with_context(|| format!("encoder '{}' produced no output", encoder.name()))?
        .len();
    if len == 0 {
        return Err(VizError::encode(format!(
            "encoder '{}' produced an empty file",
            encoder.name()
        )));
    }
    std::fs::rename(&tmp, out).with_context(|| {
        format!(
            "failed to move '{}' to '{}'",
            tmp.display(),
            out.display()
        )
    })?;
    guard.0 = None;
    Ok(())
}

pub(crate) fn partial_path(out: &Path) -> PathBuf {
    let mut name = out.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    out.with_file_name(name)
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pipeline.rs"]
mod tests;
