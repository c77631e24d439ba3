use super::*;
use crate::render::layout::PixelRect;

fn frame(i: usize) -> RenderedFrame {
    RenderedFrame {
        time_index: i,
        time: i as f64,
        title: String::new(),
        plot_area: PixelRect::default(),
        width: 6,
        height: 4,
        data: vec![128; 6 * 4 * 4],
    }
}

#[test]
fn missing_program_is_an_encode_error() {
    let enc = FfmpegMp4Encoder::with_program("definitely-not-ffmpeg-fieldviz");
    assert!(!enc.is_available());
    let out = std::env::temp_dir().join("fieldviz_missing_ffmpeg.mp4");
    let err = enc
        .encode(&[frame(0)], &out, &EncodeOpts { interval_ms: 100 })
        .unwrap_err();
    assert!(matches!(err, VizError::Encode(_)), "{err}");
    assert!(!out.exists());
}

#[test]
fn identity_is_mp4() {
    let enc = FfmpegMp4Encoder::default();
    assert_eq!(enc.name(), "ffmpeg-mp4");
    assert_eq!(enc.format(), AnimationFormat::Mp4);
    assert_eq!(enc.program(), Path::new("ffmpeg"));
}

#[test]
fn encodes_when_ffmpeg_is_installed() {
    let enc = FfmpegMp4Encoder::default();
    if !enc.is_available() {
        eprintln!("skipping: ffmpeg not found on PATH");
        return;
    }
    let dir = std::path::PathBuf::from("target").join("unit_ffmpeg");
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("clip.mp4");
    let frames: Vec<_> = (0..3).map(frame).collect();
    enc.encode(&frames, &out, &EncodeOpts { interval_ms: 200 })
        .unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}
