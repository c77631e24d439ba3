//! Animation encoders and the export pipeline that chains them.

/// Encoder contract and container formats.
pub(crate) mod encoder;
/// MP4 output via the system `ffmpeg`.
pub(crate) mod ffmpeg;
/// Animated GIF output via the `image` crate.
pub(crate) mod gif;
/// Ordered encoder chain with fallback.
pub(crate) mod pipeline;
