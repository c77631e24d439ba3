//! fieldviz renders 2D spatial-temporal scalar fields `u(x, y, t)`.
//!
//! Three outputs are supported, all driven by one [`VizConfig`]:
//!
//! - a static filled-contour PNG of one time step ([`Visualizer::render_static`])
//! - an animation over every time step, GIF first with an MP4 fallback ([`Visualizer::animate`])
//! - a grid of selected time steps sharing one colorbar ([`Visualizer::snapshots`])
//!
//! Lower-level pieces ([`generate_sequence`], [`ExportPipeline`], [`compose_grid`]) are exported
//! for callers that want to stream frames or plug in their own encoders.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Snapshot grid composition.
pub mod compose;
/// Animation encoders and the fallback export pipeline.
pub mod encode;
/// Field containers and sample data.
pub mod field;
pub(crate) mod render;
/// Frame sequences over the time axis.
pub mod sequence;
pub(crate) mod style;
/// Config-driven entry points.
pub mod visualizer;

pub use crate::foundation::core::{FigureSize, Point, Rect, Rgba8};
pub use crate::foundation::error::{VizError, VizResult};

pub use crate::compose::{SnapshotGrid, SnapshotPanel, compose_grid, default_snapshot_indices};
pub use crate::encode::encoder::{AnimationEncoder, AnimationFormat, EncodeOpts};
pub use crate::encode::ffmpeg::FfmpegMp4Encoder;
pub use crate::encode::gif::GifAnimationEncoder;
pub use crate::encode::pipeline::{ExportArtifact, ExportOpts, ExportPipeline, ensure_parent_dir};
pub use crate::field::data::{CoordinateGrid, FieldData};
pub use crate::render::canvas::Canvas;
pub use crate::render::frame::{FrameRenderer, RenderedFrame};
pub use crate::render::layout::PixelRect;
pub use crate::render::text::{Anchor, Label, TextEngine};
pub use crate::sequence::{FrameSequence, frame_title, generate_sequence};
pub use crate::style::colormap::{Colormap, ColormapSpec};
pub use crate::style::config::{RenderStyle, VizConfig};
pub use crate::style::levels::{DEGENERATE_ABS_EPS, DEGENERATE_REL_EPS, LevelSet};
pub use crate::visualizer::Visualizer;
