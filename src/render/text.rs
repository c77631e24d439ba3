use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{VizError, VizResult};
use crate::render::canvas::Canvas;

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at the anchor.
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

impl Anchor {
    fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One text item, positioned by its vertical center.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Text content (plain, escaped on output).
    pub text: String,
    /// Anchor x in canvas pixels.
    pub x: f64,
    /// Anchor y in canvas pixels (vertical center of the line).
    pub y: f64,
    /// Font size in pixels.
    pub size_px: f64,
    /// Horizontal alignment.
    pub anchor: Anchor,
    /// Clockwise rotation in degrees around the anchor.
    pub rotate_deg: f64,
    /// Fill color.
    pub color: Rgba8,
}

impl Label {
    /// Black, unrotated label.
    pub fn new(text: impl Into<String>, x: f64, y: f64, size_px: f64, anchor: Anchor) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size_px,
            anchor,
            rotate_deg: 0.0,
            color: Rgba8::BLACK,
        }
    }

    /// Rotate by `deg` degrees (clockwise, SVG convention).
    pub fn rotated(mut self, deg: f64) -> Self {
        self.rotate_deg = deg;
        self
    }
}

/// Rasterizes labels through an SVG overlay using `usvg`/`resvg` and a font database.
///
/// With an empty font database labels are silently skipped; nothing else about the frame
/// changes.
#[derive(Clone)]
pub struct TextEngine {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl TextEngine {
    /// Engine backed by the system fonts.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.faces().count(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Engine without any fonts; labels are laid out but draw nothing.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Process-wide engine over the system fonts, loaded on first use.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<TextEngine>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::system())).clone()
    }

    /// Number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Draw every label onto `canvas` with one overlay pass.
    pub fn draw(&self, canvas: &mut Canvas, labels: &[Label]) -> VizResult<()> {
        if labels.is_empty() || self.fontdb.faces().next().is_none() {
            return Ok(());
        }

        let (width, height) = (canvas.width(), canvas.height());
        let svg = overlay_svg(width, height, labels);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| VizError::render(format!("failed to parse text overlay: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| VizError::render("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );
        canvas.composite_premul(pixmap.data())
    }
}

/// Build the SVG document holding `labels` on a `width × height` transparent page.
pub(crate) fn overlay_svg(width: u32, height: u32, labels: &[Label]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for label in labels {
        // SVG positions text by its baseline; shift down so `y` is the visual center.
        let baseline = label.y + label.size_px * 0.35;
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{baseline:.2}" font-family="DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif" font-size="{size:.2}" text-anchor="{anchor}" fill="{fill}""#,
            x = label.x,
            size = label.size_px,
            anchor = label.anchor.svg(),
            fill = label.color.with_alpha(255).to_hex(),
        );
        if label.color.a != 255 {
            let _ = write!(svg, r#" fill-opacity="{:.3}""#, f64::from(label.color.a) / 255.0);
        }
        if label.rotate_deg != 0.0 {
            let _ = write!(
                svg,
                r#" transform="rotate({:.2} {:.2} {:.2})""#,
                label.rotate_deg, label.x, label.y
            );
        }
        let _ = write!(svg, ">{}</text>", escape_xml(&label.text));
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
