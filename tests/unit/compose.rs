use ndarray::{Array1, Array3};

use super::*;
use crate::field::data::CoordinateGrid;
use crate::foundation::core::{FigureSize, Rgba8};

fn style() -> RenderStyle {
    RenderStyle {
        figure: FigureSize::new(8.0, 6.0),
        dpi: 40,
        levels: 10,
        ..RenderStyle::default()
    }
}

/// Slice `k` is the constant `k`.
fn stepped(nt: usize) -> FieldData {
    let axis: Vec<f64> = (0..10).map(f64::from).collect();
    let grid = CoordinateGrid::from_axes(&axis, &axis).unwrap();
    let times = Array1::from_shape_fn(nt, |k| k as f64);
    let values = Array3::from_shape_fn((nt, 10, 10), |(k, _, _)| k as f64);
    FieldData::new(grid, times, values).unwrap()
}

fn pixel(grid: &SnapshotGrid, x: u32, y: u32) -> Rgba8 {
    let p = grid.image().get_pixel(x, y).0;
    Rgba8 {
        r: p[0],
        g: p[1],
        b: p[2],
        a: p[3],
    }
}

#[test]
fn three_panels_fill_a_two_by_two_grid() {
    let d = stepped(5);
    let g = compose_grid(&d, &[0, 2, 4], &style(), "Snapshots").unwrap();
    assert_eq!((g.rows(), g.cols()), (2, 2));
    let titles: Vec<_> = g.panels().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["t = 0.000", "t = 2.000", "t = 4.000"]);
    let idx: Vec<_> = g.panels().iter().map(|p| p.time_index).collect();
    assert_eq!(idx, [0, 2, 4]);

    let (p0, p1, p2) = (g.panels()[0].rect, g.panels()[1].rect, g.panels()[2].rect);
    assert_eq!(p0.y, p1.y);
    assert!(p1.x > p0.x);
    assert_eq!(p2.x, p0.x);
    assert!(p2.y > p0.y);
    assert!(g.image().width() >= p1.right());
    assert!(g.image().height() >= p2.bottom());
}

#[test]
fn panels_share_the_global_level_set() {
    let d = stepped(5);
    let s = style();
    let g = compose_grid(&d, &[0, 4], &s, "").unwrap();
    let levels = LevelSet::from_field(&d, s.levels).unwrap();
    for p in g.panels() {
        let c = p.plot_area.center();
        let want = s
            .colormap
            .sample(levels.band_position(levels.band_of(p.time_index as f64).unwrap()));
        assert_eq!(pixel(&g, c.x as u32, c.y as u32), want, "panel {}", p.time_index);
    }
    let (a, b) = (g.panels()[0].plot_area.center(), g.panels()[1].plot_area.center());
    assert_ne!(pixel(&g, a.x as u32, a.y as u32), pixel(&g, b.x as u32, b.y as u32));
}

#[test]
fn negative_index_resolves_from_the_end() {
    let d = stepped(25);
    let g = compose_grid(&d, &[-1], &style(), "").unwrap();
    assert_eq!((g.rows(), g.cols()), (1, 1));
    let p = &g.panels()[0];
    assert_eq!(p.time_index, 24);
    assert_eq!(p.title, panel_title(d.time(24)));
}

#[test]
fn bad_selections_are_rejected_up_front() {
    let d = stepped(5);
    assert!(compose_grid(&d, &[], &style(), "").unwrap_err().is_precondition());
    assert!(compose_grid(&d, &[0, 5], &style(), "").unwrap_err().is_precondition());
    assert!(compose_grid(&d, &[-6], &style(), "").unwrap_err().is_precondition());
}

#[test]
fn default_indices_cover_start_thirds_and_end() {
    assert_eq!(default_snapshot_indices(25), [0, 8, 16, 24]);
    assert_eq!(default_snapshot_indices(3), [0, 1, 2]);
    assert_eq!(default_snapshot_indices(1), [0]);
    assert!(default_snapshot_indices(0).is_empty());
}

#[test]
fn save_writes_a_png() {
    let d = stepped(3);
    let g = compose_grid(&d, &[0, -1], &style(), "Snapshots").unwrap();
    let path = std::path::PathBuf::from("target/unit_compose/grid.png");
    g.save(&path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), g.image().dimensions());
}
