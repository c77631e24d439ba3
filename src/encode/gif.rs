use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::encoder::{AnimationEncoder, AnimationFormat, EncodeOpts, uniform_frame_size};
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::RenderedFrame;

/// Animated GIF encoder built on `image::codecs::gif`.
#[derive(Clone, Copy, Debug)]
pub struct GifAnimationEncoder {
    speed: i32,
}

impl Default for GifAnimationEncoder {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl GifAnimationEncoder {
    /// Palette quantization speed, `1` (best) to `30` (fastest).
    pub fn with_speed(speed: i32) -> VizResult<Self> {
        if !(1..=30).contains(&speed) {
            return Err(VizError::validation(format!(
                "gif speed must be in 1..=30, got {speed}"
            )));
        }
        Ok(Self { speed })
    }
}

impl AnimationEncoder for GifAnimationEncoder {
    fn name(&self) -> &str {
        "gif"
    }

    fn format(&self) -> AnimationFormat {
        AnimationFormat::Gif
    }

    fn encode(&self, frames: &[RenderedFrame], out: &Path, opts: &EncodeOpts) -> VizResult<()> {
        opts.validate()?;
        let (width, height) = uniform_frame_size(frames)?;

        let file =
            File::create(out).with_context(|| format!("create gif '{}'", out.display()))?;
        let mut writer = BufWriter::new(file);
        {
            let mut encoder = GifEncoder::new_with_speed(&mut writer, self.speed);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| VizError::encode(format!("gif: failed to set loop mode: {e}")))?;

            let delay_ms = centisecond_delay_ms(opts.interval_ms);
            if delay_ms != opts.interval_ms {
                tracing::warn!(
                    interval_ms = opts.interval_ms,
                    delay_ms,
                    "gif delays are stored in centiseconds, rounding the frame interval up"
                );
            }
            let delay = Delay::from_numer_denom_ms(delay_ms, 1);
            for f in frames {
                let img = RgbaImage::from_raw(width, height, f.data.clone()).ok_or_else(|| {
                    VizError::encode("gif: frame.data size mismatch with width*height*4")
                })?;
                encoder
                    .encode_frame(Frame::from_parts(img, 0, 0, delay))
                    .map_err(|e| {
                        VizError::encode(format!(
                            "gif: failed to encode frame {}: {e}",
                            f.time_index
                        ))
                    })?;
            }
            // Dropping the encoder writes the GIF trailer.
        }
        writer
            .flush()
            .with_context(|| format!("flush gif '{}'", out.display()))?;
        Ok(())
    }
}

/// Round `interval_ms` up to the next whole centisecond, the GIF delay unit.
pub(crate) fn centisecond_delay_ms(interval_ms: u32) -> u32 {
    interval_ms.div_ceil(10).saturating_mul(10)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
