use ndarray::Array2;

use super::*;
use crate::foundation::core::FigureSize;
use crate::style::colormap::Colormap;

fn small_style() -> RenderStyle {
    RenderStyle {
        figure: FigureSize::new(4.0, 3.0),
        dpi: 40,
        levels: 10,
        colormap: Colormap::named("viridis").unwrap(),
        ..RenderStyle::default()
    }
}

fn renderer(min: f64, max: f64) -> FrameRenderer {
    FrameRenderer::new(
        LevelSet::new(min, max, 10).unwrap(),
        small_style(),
        Arc::new(TextEngine::without_fonts()),
    )
    .unwrap()
}

fn grid() -> CoordinateGrid {
    let axis: Vec<f64> = (0..10).map(|i| i as f64).collect();
    CoordinateGrid::from_axes(&axis, &axis).unwrap()
}

#[test]
fn axis_position_brackets_and_clamps() {
    let axis = [0.0, 1.0, 3.0];
    assert_eq!(axis_position(&axis, 0.5), (0, 0.5));
    assert_eq!(axis_position(&axis, 2.0), (1, 0.5));
    assert_eq!(axis_position(&axis, 3.0), (1, 1.0));
    assert_eq!(axis_position(&axis, -1.0), (0, 0.0));
    assert_eq!(axis_position(&axis, 9.0), (1, 1.0));
}

#[test]
fn palette_is_fixed_per_renderer() {
    let r = renderer(0.0, 1.0);
    assert_eq!(r.color_for(0.55), r.color_for(0.55));
    assert_eq!(r.color_for(0.0), Some(Colormap::named("viridis").unwrap().sample(0.05)));
    assert_eq!(r.color_for(f64::NAN), None);
    assert_ne!(r.color_for(0.0), r.color_for(1.0));
}

#[test]
fn constant_field_renders_uniform_plot_area() {
    let levels = LevelSet::new(2.5, 2.5, 20).unwrap();
    let r = FrameRenderer::new(levels, small_style(), Arc::new(TextEngine::without_fonts())).unwrap();
    let g = grid();
    let values = Array2::from_elem((10, 10), 2.5);
    let mut canvas = r.new_canvas().unwrap();
    let frame = r
        .render_frame(&mut canvas, &g, values.view(), 0, 0.0, "constant")
        .unwrap();

    let area = frame.plot_area;
    assert!(area.width > 0 && area.height > 0);
    let first = frame.pixel(area.x, area.y).unwrap();
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            assert_eq!(frame.pixel(x, y).unwrap(), first);
        }
    }
    assert_eq!(Some(first), r.color_for(2.5));
}

#[test]
fn contour_lines_appear_on_band_edges() {
    let r = renderer(0.0, 9.0);
    let g = grid();
    let values = Array2::from_shape_fn((10, 10), |(_, i)| i as f64);
    let mut canvas = r.new_canvas().unwrap();
    let frame = r
        .render_frame(&mut canvas, &g, values.view(), 0, 0.0, "")
        .unwrap();

    let area = frame.plot_area;
    let row = area.y + area.height / 2;
    let colors: std::collections::HashSet<Rgba8> = (area.x..area.right())
        .filter_map(|x| frame.pixel(x, row))
        .collect();
    // Ten bands plus a tinted edge color per boundary.
    assert!(colors.len() > 10, "{}", colors.len());
}

#[test]
fn slice_shape_mismatch_is_rejected() {
    let r = renderer(0.0, 1.0);
    let g = grid();
    let values = Array2::<f64>::zeros((10, 9));
    let mut canvas = r.new_canvas().unwrap();
    let err = r
        .render_frame(&mut canvas, &g, values.view(), 0, 0.0, "")
        .unwrap_err();
    assert!(matches!(err, VizError::Shape(_)));
}

#[test]
fn foreign_canvas_size_is_rejected() {
    let r = renderer(0.0, 1.0);
    let g = grid();
    let values = Array2::<f64>::zeros((10, 10));
    let mut canvas = Canvas::new(10, 10).unwrap();
    assert!(
        r.render_frame(&mut canvas, &g, values.view(), 0, 0.0, "")
            .is_err()
    );
}

#[test]
fn non_finite_samples_leave_background() {
    let r = renderer(0.0, 1.0);
    let g = grid();
    let values = Array2::from_elem((10, 10), f64::NAN);
    let mut canvas = r.new_canvas().unwrap();
    let frame = r
        .render_frame(&mut canvas, &g, values.view(), 0, 0.0, "")
        .unwrap();
    let c = frame.plot_area.center();
    assert_eq!(frame.pixel(c.x as u32, c.y as u32), Some(Rgba8::WHITE));
}

#[test]
fn frame_converts_to_image() {
    let r = renderer(0.0, 1.0);
    let g = grid();
    let values = Array2::from_elem((10, 10), 0.5);
    let mut canvas = r.new_canvas().unwrap();
    let frame = r
        .render_frame(&mut canvas, &g, values.view(), 3, 1.5, "t")
        .unwrap();
    let img = frame.to_image().unwrap();
    assert_eq!(img.dimensions(), (160, 120));
    assert_eq!(frame.time_index, 3);
    assert_eq!(frame.pixel(160, 0), None);
}

#[test]
fn extreme_finite_range_keeps_both_ends_apart() {
    let r = renderer(-1e308, 1e308);
    let g = grid();
    let values = Array2::from_shape_fn((10, 10), |(_, i)| if i < 5 { -1e308 } else { 1e308 });
    let mut canvas = r.new_canvas().unwrap();
    let frame = r
        .render_frame(&mut canvas, &g, values.view(), 0, 0.0, "")
        .unwrap();
    let p = frame.plot_area;
    let y = p.center().y as u32;
    let left = frame.pixel(p.x + 1, y);
    let right = frame.pixel(p.right() - 2, y);
    assert_eq!(left, r.color_for(-1e308));
    assert_eq!(right, r.color_for(1e308));
    assert_ne!(left, right);
}
