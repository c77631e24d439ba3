use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::encoder::{AnimationEncoder, AnimationFormat, EncodeOpts, uniform_frame_size};
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::RenderedFrame;

/// MP4 (H.264, yuv420p) encoder that streams raw frames into the system `ffmpeg`.
///
/// Odd frame sizes are padded by one pixel, since yuv420p needs even dimensions.
#[derive(Clone, Debug)]
pub struct FfmpegMp4Encoder {
    program: PathBuf,
}

impl Default for FfmpegMp4Encoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegMp4Encoder {
    /// Use a specific `ffmpeg` executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this encoder invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Return `true` when the configured executable answers `-version`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl AnimationEncoder for FfmpegMp4Encoder {
    fn name(&self) -> &str {
        "ffmpeg-mp4"
    }

    fn format(&self) -> AnimationFormat {
        AnimationFormat::Mp4
    }

    fn encode(&self, frames: &[RenderedFrame], out: &Path, opts: &EncodeOpts) -> VizResult<()> {
        opts.validate()?;
        let (width, height) = uniform_frame_size(frames)?;

        if !self.is_available() {
            return Err(VizError::encode(format!(
                "'{}' is required for MP4 encoding, but could not be run",
                self.program.display()
            )));
        }

        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        // Input: opaque RGBA8 frames at 1000/interval fps.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &format!("1000/{}", opts.interval_ms),
            "-i",
            "pipe:0",
        ]);
        // Output: h264 + yuv420p for broad compatibility. The container is named explicitly
        // because the pipeline writes to a temp path without an `.mp4` extension.
        cmd.args([
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ])
        .arg(out);

        let mut child = cmd.spawn().map_err(|e| {
            VizError::encode(format!(
                "failed to spawn '{}': {e}",
                self.program.display()
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| VizError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VizError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });

        let mut write_err = None;
        for f in frames {
            if let Err(e) = stdin.write_all(&f.data) {
                write_err = Some(format!(
                    "failed to write frame {} to ffmpeg stdin: {e}",
                    f.time_index
                ));
                break;
            }
        }
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| VizError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| VizError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| VizError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(VizError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        if let Some(msg) = write_err {
            return Err(VizError::encode(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
