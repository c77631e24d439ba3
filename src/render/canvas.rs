use image::RgbaImage;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::{blend_channel, blend_premul_channel};
use crate::render::layout::PixelRect;

/// Opaque RGBA8 drawing surface reused across the frames of one sequence.
///
/// Callers must [`Canvas::clear`] between frames; the frame renderer draws on top of whatever is
/// already there.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: RgbaImage,
    background: Rgba8,
    clears: u64,
}

impl Canvas {
    /// Allocate a canvas filled with white.
    pub fn new(width: u32, height: u32) -> VizResult<Self> {
        Self::with_background(width, height, Rgba8::WHITE)
    }

    /// Allocate a canvas filled with `background` (forced opaque).
    pub fn with_background(width: u32, height: u32, background: Rgba8) -> VizResult<Self> {
        if width == 0 || height == 0 {
            return Err(VizError::render(format!(
                "canvas width/height must be non-zero, got {width}x{height}"
            )));
        }
        let background = background.with_alpha(255);
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, image::Rgba(background.to_array())),
            background,
            clears: 0,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Background color restored by [`Canvas::clear`].
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Erase everything drawn so far.
    pub fn clear(&mut self) {
        let bg = image::Rgba(self.background.to_array());
        for px in self.pixels.pixels_mut() {
            *px = bg;
        }
        self.clears += 1;
    }

    /// Number of [`Canvas::clear`] calls since allocation.
    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Color at `(x, y)`; out-of-bounds reads return the background.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        match self.pixels.get_pixel_checked(x, y) {
            Some(image::Rgba([r, g, b, a])) => Rgba8 {
                r: *r,
                g: *g,
                b: *b,
                a: *a,
            },
            None => self.background,
        }
    }

    /// Composite a straight-alpha color at `(x, y)`; out-of-bounds writes are ignored.
    pub fn blend(&mut self, x: u32, y: u32, c: Rgba8) {
        let Some(px) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        if c.a == 255 {
            px.0 = c.to_array();
            return;
        }
        px.0[0] = blend_channel(px.0[0], c.r, c.a);
        px.0[1] = blend_channel(px.0[1], c.g, c.a);
        px.0[2] = blend_channel(px.0[2], c.b, c.a);
        px.0[3] = 255;
    }

    /// Fill `rect` (clipped to the canvas).
    pub fn fill_rect(&mut self, rect: PixelRect, c: Rgba8) {
        let Some(r) = rect.clip(self.width(), self.height()) else {
            return;
        };
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.blend(x, y, c);
            }
        }
    }

    /// One-pixel outline drawn just outside `rect`, leaving its interior untouched.
    pub fn stroke_outside(&mut self, rect: PixelRect, c: Rgba8) {
        let x0 = i64::from(rect.x) - 1;
        let y0 = i64::from(rect.y) - 1;
        let x1 = i64::from(rect.right());
        let y1 = i64::from(rect.bottom());
        for x in x0..=x1 {
            self.blend_signed(x, y0, c);
            self.blend_signed(x, y1, c);
        }
        for y in y0..=y1 {
            self.blend_signed(x0, y, c);
            self.blend_signed(x1, y, c);
        }
    }

    /// Horizontal segment `[x0, x1)` at row `y`.
    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, c: Rgba8) {
        for x in x0.min(x1)..x0.max(x1) {
            self.blend_signed(x, y, c);
        }
    }

    /// Vertical segment `[y0, y1)` at column `x`.
    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, c: Rgba8) {
        for y in y0.min(y1)..y0.max(y1) {
            self.blend_signed(x, y, c);
        }
    }

    fn blend_signed(&mut self, x: i64, y: i64, c: Rgba8) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            self.blend(x, y, c);
        }
    }

    /// Composite a premultiplied RGBA8 buffer of the same size as the canvas.
    pub fn composite_premul(&mut self, data: &[u8]) -> VizResult<()> {
        if data.len() != self.pixels.as_raw().len() {
            return Err(VizError::render(
                "overlay size mismatch with canvas width*height*4",
            ));
        }
        for (dst, src) in self.pixels.pixels_mut().zip(data.chunks_exact(4)) {
            let a = src[3];
            if a == 0 {
                continue;
            }
            dst.0[0] = blend_premul_channel(dst.0[0], src[0], a);
            dst.0[1] = blend_premul_channel(dst.0[1], src[1], a);
            dst.0[2] = blend_premul_channel(dst.0[2], src[2], a);
            dst.0[3] = 255;
        }
        Ok(())
    }

    /// Copy `src` with its top-left corner at `(x, y)` (clipped).
    pub fn blit(&mut self, src: &RgbaImage, x: u32, y: u32) {
        for (sx, sy, px) in src.enumerate_pixels() {
            if let Some(dst) = self.pixels.get_pixel_mut_checked(x + sx, y + sy) {
                *dst = *px;
            }
        }
    }

    /// Borrow the pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consume the canvas and return its pixels.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
