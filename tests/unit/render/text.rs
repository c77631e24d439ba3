use super::*;

#[test]
fn overlay_escapes_markup() {
    let labels = [Label::new("a < b & c", 10.0, 20.0, 12.0, Anchor::Middle)];
    let svg = overlay_svg(100, 50, &labels);
    assert!(svg.contains("a &lt; b &amp; c"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r#"viewBox="0 0 100 50""#));
}

#[test]
fn rotation_is_emitted_around_anchor() {
    let labels = [Label::new("Solution Value", 5.0, 6.0, 10.0, Anchor::Middle).rotated(-90.0)];
    let svg = overlay_svg(10, 10, &labels);
    assert!(svg.contains(r#"transform="rotate(-90.00 5.00 6.00)""#));
}

#[test]
fn overlay_parses_as_svg() {
    let labels = [
        Label::new("t = 0.000", 50.0, 10.0, 14.0, Anchor::Middle),
        Label::new("1.00", 90.0, 40.0, 10.0, Anchor::Start),
    ];
    let svg = overlay_svg(100, 50, &labels);
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 100.0);
}

#[test]
fn empty_font_database_leaves_canvas_untouched() {
    let engine = TextEngine::without_fonts();
    assert_eq!(engine.face_count(), 0);
    let mut canvas = Canvas::new(20, 10).unwrap();
    engine
        .draw(
            &mut canvas,
            &[Label::new("hello", 1.0, 5.0, 8.0, Anchor::Start)],
        )
        .unwrap();
    assert!(canvas.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
}
