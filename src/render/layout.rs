use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{VizError, VizResult};

/// Integer pixel rectangle, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Build a rectangle from its top-left corner and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap a floating-point rectangle to whole pixels (negative coordinates clamp to 0).
    pub fn from_rect(r: Rect) -> Self {
        let x0 = r.x0.round().max(0.0);
        let y0 = r.y0.round().max(0.0);
        let x1 = r.x1.round().max(x0);
        let y1 = r.y1.round().max(y0);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y + self.height
    }

    /// `true` when `(x, y)` lies inside.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Center point in pixel space.
    pub fn center(self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Intersection with a `width × height` surface, `None` when empty.
    pub fn clip(self, width: u32, height: u32) -> Option<Self> {
        let x1 = self.right().min(width);
        let y1 = self.bottom().min(height);
        if self.x >= x1 || self.y >= y1 {
            return None;
        }
        Some(Self::new(self.x, self.y, x1 - self.x, y1 - self.y))
    }
}

/// Point size expressed in pixels at `dpi`.
pub(crate) fn points_to_px(points: f64, dpi: u32) -> f64 {
    points * f64::from(dpi) / 72.0
}

pub(crate) const TITLE_PT: f64 = 14.0;
pub(crate) const SUPTITLE_PT: f64 = 16.0;
pub(crate) const LABEL_PT: f64 = 10.0;

/// What the plot layout has to leave room for.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutRequest {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) dpi: u32,
    pub(crate) extent: Rect,
    pub(crate) colorbar: bool,
    pub(crate) equal_aspect: bool,
}

/// Pixel placement of one contour plot and its decorations on a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlotLayout {
    pub(crate) plot: PixelRect,
    pub(crate) colorbar: Option<PixelRect>,
    pub(crate) title_at: Point,
    pub(crate) title_px: f64,
    pub(crate) label_px: f64,
}

impl PlotLayout {
    pub(crate) fn compute(req: LayoutRequest) -> VizResult<Self> {
        let w = f64::from(req.width);
        let h = f64::from(req.height);
        let title_px = points_to_px(TITLE_PT, req.dpi);
        let label_px = points_to_px(LABEL_PT, req.dpi);

        let top = title_px * 2.0;
        let bottom = label_px * 3.2;
        let left = label_px * 5.0;
        let bar_gap = label_px * 1.5;
        let bar_width = (label_px * 1.2).max(w * 0.02);
        let right = if req.colorbar {
            bar_gap + bar_width + label_px * 6.0
        } else {
            label_px * 1.5
        };

        let avail = Rect::new(left, top, w - right, h - bottom);
        if avail.width() < 2.0 || avail.height() < 2.0 {
            return Err(VizError::render(format!(
                "canvas {}x{} is too small for a plot at {} dpi",
                req.width, req.height, req.dpi
            )));
        }

        let plot = if req.equal_aspect {
            fit_aspect(avail, req.extent.width() / req.extent.height())
        } else {
            avail
        };
        let plot = PixelRect::from_rect(plot);

        let colorbar = req.colorbar.then(|| {
            let ph = f64::from(plot.height);
            let x0 = f64::from(plot.right()) + bar_gap;
            let y0 = f64::from(plot.y) + ph * 0.1;
            PixelRect::from_rect(Rect::new(x0, y0, x0 + bar_width, y0 + ph * 0.8))
        });

        Ok(Self {
            plot,
            colorbar,
            title_at: Point::new(plot.center().x, top * 0.5),
            title_px,
            label_px,
        })
    }
}

/// Largest rectangle of aspect `ratio` (width / height) centered inside `avail`.
fn fit_aspect(avail: Rect, ratio: f64) -> Rect {
    if !ratio.is_finite() || ratio <= 0.0 {
        return avail;
    }
    let (aw, ah) = (avail.width(), avail.height());
    let (pw, ph) = if aw / ah > ratio {
        (ah * ratio, ah)
    } else {
        (aw, aw / ratio)
    };
    let c = avail.center();
    Rect::new(c.x - pw / 2.0, c.y - ph / 2.0, c.x + pw / 2.0, c.y + ph / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
