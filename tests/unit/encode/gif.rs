use std::path::PathBuf;

use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use super::*;
use crate::render::layout::PixelRect;

fn solid(i: usize, rgb: [u8; 3]) -> RenderedFrame {
    let (w, h) = (8u32, 6u32);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    RenderedFrame {
        time_index: i,
        time: i as f64,
        title: String::new(),
        plot_area: PixelRect::new(0, 0, w, h),
        width: w,
        height: h,
        data,
    }
}

fn out_dir() -> PathBuf {
    let dir = PathBuf::from("target").join("unit_gif");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn writes_decodable_animation_with_all_frames() {
    let out = out_dir().join("three.gif");
    let frames = [solid(0, [255, 0, 0]), solid(1, [0, 255, 0]), solid(2, [0, 0, 255])];
    GifAnimationEncoder::default()
        .encode(&frames, &out, &EncodeOpts { interval_ms: 150 })
        .unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));

    let decoder = GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);
    let (num, den) = decoded[0].delay().numer_denom_ms();
    assert_eq!(num / den, 150);
    let px = decoded[2].buffer().get_pixel(4, 3).0;
    assert!(px[2] > 200 && px[0] < 50, "{px:?}");
}

#[test]
fn empty_sequence_is_rejected() {
    let out = out_dir().join("empty.gif");
    assert!(
        GifAnimationEncoder::default()
            .encode(&[], &out, &EncodeOpts { interval_ms: 100 })
            .is_err()
    );
}

#[test]
fn speed_is_bounded() {
    assert!(GifAnimationEncoder::with_speed(0).is_err());
    assert!(GifAnimationEncoder::with_speed(31).is_err());
    assert!(GifAnimationEncoder::with_speed(30).is_ok());
}

#[test]
fn sub_centisecond_intervals_round_up() {
    assert_eq!(centisecond_delay_ms(5), 10);
    assert_eq!(centisecond_delay_ms(10), 10);
    assert_eq!(centisecond_delay_ms(155), 160);

    let out = out_dir().join("fast.gif");
    let frames = [solid(0, [255, 0, 0]), solid(1, [0, 0, 255])];
    GifAnimationEncoder::default()
        .encode(&frames, &out, &EncodeOpts { interval_ms: 5 })
        .unwrap();
    let decoder = GifDecoder::new(std::io::Cursor::new(std::fs::read(&out).unwrap())).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    let (num, den) = decoded[0].delay().numer_denom_ms();
    assert_eq!(num / den, 10);
}
