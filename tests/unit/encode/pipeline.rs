use super::*;
use crate::render::layout::PixelRect;

struct Mock {
    name: &'static str,
    format: AnimationFormat,
    fail: bool,
}

impl AnimationEncoder for Mock {
    fn name(&self) -> &str {
        self.name
    }

    fn format(&self) -> AnimationFormat {
        self.format
    }

    fn encode(&self, frames: &[RenderedFrame], out: &Path, _opts: &EncodeOpts) -> VizResult<()> {
        // Leave garbage behind on failure, like a half-finished encoder would.
        std::fs::write(out, format!("{}:{}", self.name, frames.len())).unwrap();
        if self.fail {
            return Err(VizError::encode(format!("{} broke", self.name)));
        }
        Ok(())
    }
}

fn mock(name: &'static str, format: AnimationFormat, fail: bool) -> Box<dyn AnimationEncoder> {
    Box::new(Mock { name, format, fail })
}

fn frames(n: usize) -> Vec<RenderedFrame> {
    (0..n)
        .map(|i| RenderedFrame {
            time_index: i,
            time: i as f64,
            title: String::new(),
            plot_area: PixelRect::default(),
            width: 2,
            height: 2,
            data: vec![255; 16],
        })
        .collect()
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pipeline").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn primary_encoder_wins() {
    let dir = scratch("primary");
    let p = ExportPipeline::new(vec![
        mock("a", AnimationFormat::Gif, false),
        mock("b", AnimationFormat::Mp4, false),
    ]);
    let art = p
        .export_frames(&frames(3), &ExportOpts::for_path(dir.join("out.gif"), 100))
        .unwrap();
    assert_eq!(art.encoder, "a");
    assert_eq!(art.path, dir.join("out.gif"));
    assert!(!art.fallback);
    assert_eq!(art.frames, 3);
    assert_eq!(std::fs::read_to_string(&art.path).unwrap(), "a:3");
    assert!(!dir.join("out.mp4").exists());
}

#[test]
fn failed_primary_falls_back_and_cleans_up() {
    let dir = scratch("fallback");
    let p = ExportPipeline::new(vec![
        mock("a", AnimationFormat::Gif, true),
        mock("b", AnimationFormat::Mp4, false),
    ]);
    let art = p
        .export_frames(&frames(2), &ExportOpts::for_path(dir.join("out.gif"), 100))
        .unwrap();
    assert_eq!(art.encoder, "b");
    assert_eq!(art.format, AnimationFormat::Mp4);
    assert_eq!(art.path, dir.join("out.mp4"));
    assert!(art.fallback);
    assert_eq!(art.failed_attempts.len(), 1);
    assert!(art.failed_attempts[0].contains("a broke"));
    assert!(!dir.join("out.gif").exists());
    assert!(!dir.join("out.gif.partial").exists());
}

#[test]
fn all_failing_is_no_backend_and_leaves_existing_file() {
    let dir = scratch("none");
    let target = dir.join("out.gif");
    std::fs::write(&target, "previous").unwrap();
    let p = ExportPipeline::new(vec![
        mock("a", AnimationFormat::Gif, true),
        mock("b", AnimationFormat::Mp4, true),
    ]);
    let err = p
        .export_frames(&frames(2), &ExportOpts::for_path(&target, 100))
        .unwrap_err();
    match &err {
        VizError::NoBackend { attempts } => assert_eq!(attempts.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("no animation backend available"));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "previous");
    assert!(!dir.join("out.mp4").exists());
    assert!(!dir.join("out.gif.partial").exists());
    assert!(!dir.join("out.mp4.partial").exists());
}

#[test]
fn requested_format_goes_first_and_force_fallback_skips_it() {
    let p = ExportPipeline::new(vec![
        mock("a", AnimationFormat::Gif, false),
        mock("b", AnimationFormat::Mp4, false),
    ]);
    let mut opts = ExportOpts::for_path("x.mp4", 100);
    let names: Vec<_> = p.encoder_order(&opts).iter().map(|e| e.name().to_owned()).collect();
    assert_eq!(names, ["b", "a"]);

    opts.force_fallback = true;
    let names: Vec<_> = p.encoder_order(&opts).iter().map(|e| e.name().to_owned()).collect();
    assert_eq!(names, ["a"]);
}

#[test]
fn forced_fallback_reports_fallback() {
    let dir = scratch("forced");
    let p = ExportPipeline::new(vec![
        mock("a", AnimationFormat::Gif, false),
        mock("b", AnimationFormat::Mp4, false),
    ]);
    let mut opts = ExportOpts::for_path(dir.join("out.gif"), 100);
    opts.force_fallback = true;
    let art = p.export_frames(&frames(1), &opts).unwrap();
    assert_eq!(art.encoder, "b");
    assert!(art.fallback);
    assert!(art.failed_attempts.is_empty());
}

#[test]
fn frame_errors_abort_before_encoding() {
    let dir = scratch("frame_error");
    let p = ExportPipeline::new(vec![mock("a", AnimationFormat::Gif, false)]);
    let items = vec![
        Ok(frames(1).remove(0)),
        Err(VizError::render("boom")),
    ];
    let err = p
        .export(items, &ExportOpts::for_path(dir.join("out.gif"), 100))
        .unwrap_err();
    assert!(matches!(err, VizError::Render(_)));
    assert!(!dir.join("out.gif").exists());
}

#[test]
fn empty_input_and_zero_interval_are_rejected() {
    let p = ExportPipeline::new(vec![mock("a", AnimationFormat::Gif, false)]);
    let err = p
        .export_frames(&[], &ExportOpts::for_path("target/never.gif", 100))
        .unwrap_err();
    assert!(err.is_precondition());
    let err = p
        .export_frames(&frames(1), &ExportOpts::for_path("target/never.gif", 0))
        .unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn standard_chain_is_gif_then_mp4() {
    let p = ExportPipeline::standard();
    let names: Vec<_> = p.encoders().map(|e| e.name().to_owned()).collect();
    assert_eq!(names, ["gif", "ffmpeg-mp4"]);
}

#[test]
fn partial_path_appends_suffix() {
    assert_eq!(
        partial_path(Path::new("a/b/out.gif")),
        PathBuf::from("a/b/out.gif.partial")
    );
}
