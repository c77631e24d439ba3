use crate::foundation::error::{VizError, VizResult};

pub use kurbo::{Point, Rect};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white, the figure background.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black, used for frames and tick marks.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channels as `[r, g, b, a]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> VizResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let byte = |range: std::ops::Range<usize>| -> VizResult<u8> {
            let pair = hex
                .get(range)
                .ok_or_else(|| VizError::validation(format!("invalid hex color \"{s}\"")))?;
            u8::from_str_radix(pair, 16)
                .map_err(|_| VizError::validation(format!("invalid hex byte \"{pair}\" in \"{s}\"")))
        };

        match hex.len() {
            6 => Ok(Self::opaque(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Ok(Self {
                r: byte(0..2)?,
                g: byte(2..4)?,
                b: byte(4..6)?,
                a: byte(6..8)?,
            }),
            _ => Err(VizError::validation(format!(
                "hex color must be #RRGGBB or #RRGGBBAA, got \"{s}\""
            ))),
        }
    }

    /// Format as `#rrggbb` (alpha is appended only when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Figure size in inches, matching the `figsize` convention of plotting libraries.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FigureSize {
    /// Width in inches.
    pub width: f64,
    /// Height in inches.
    pub height: f64,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 12.0,
            height: 8.0,
        }
    }
}

impl FigureSize {
    /// Build a figure size in inches.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at `dpi`, rounded and never smaller than 1×1.
    pub fn pixels(self, dpi: u32) -> (u32, u32) {
        let px = |inches: f64| -> u32 { (inches * f64::from(dpi)).round().max(1.0) as u32 };
        (px(self.width), px(self.height))
    }

    /// Scale both sides by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Reject non-finite or non-positive sides.
    pub fn validate(self) -> VizResult<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(VizError::validation(format!(
                "figure size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
