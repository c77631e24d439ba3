use crate::foundation::core::Rgba8;
use crate::foundation::error::{VizError, VizResult};

/// Serializable colormap selection: a registered name or an ordered list of hex colors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ColormapSpec {
    /// One of [`Colormap::NAMES`].
    Named(String),
    /// Ordered `#RRGGBB` / `#RRGGBBAA` stops, spread evenly over `[0, 1]`.
    Colors(Vec<String>),
}

impl Default for ColormapSpec {
    fn default() -> Self {
        Self::Named(Colormap::DEFAULT_NAME.to_owned())
    }
}

/// Linear-segmented colormap sampled into a fixed lookup table.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    name: String,
    lut: Vec<Rgba8>,
}

const CUSTOM_COOLWARM: &[&str] = &["#2E86AB", "#A23B72", "#F18F01", "#C73E1D"];
const COOLWARM: &[&str] = &[
    "#3B4CC0", "#6F92F3", "#AAC7FD", "#DDDCDC", "#F7B89C", "#E7745B", "#B40426",
];
const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3E4989", "#31688E", "#26828E", "#1F9E89", "#35B779", "#6ECE58",
    "#B5DE2B", "#FDE725",
];
const GRAYSCALE: &[&str] = &["#000000", "#FFFFFF"];

impl Colormap {
    /// Lookup-table resolution.
    pub const BINS: usize = 256;
    /// Colormap used when nothing else is configured.
    pub const DEFAULT_NAME: &'static str = "custom_coolwarm";
    /// Registered colormap names.
    pub const NAMES: &'static [&'static str] =
        &["custom_coolwarm", "coolwarm", "viridis", "grayscale"];

    /// Build a colormap from ordered stops spread evenly over `[0, 1]`.
    pub fn from_stops(name: impl Into<String>, stops: &[Rgba8]) -> VizResult<Self> {
        let name = name.into();
        let lut = match stops {
            [] => {
                return Err(VizError::validation(format!(
                    "colormap '{name}' needs at least one color"
                )));
            }
            [only] => vec![*only; Self::BINS],
            _ => {
                let segments = (stops.len() - 1) as f64;
                (0..Self::BINS)
                    .map(|i| {
                        let pos = i as f64 / (Self::BINS - 1) as f64 * segments;
                        let seg = (pos.floor() as usize).min(stops.len() - 2);
                        stops[seg].lerp(stops[seg + 1], pos - seg as f64)
                    })
                    .collect()
            }
        };
        Ok(Self { name, lut })
    }

    /// Build a colormap from hex color strings.
    pub fn from_hex(name: impl Into<String>, colors: &[impl AsRef<str>]) -> VizResult<Self> {
        let stops = colors
            .iter()
            .map(|c| Rgba8::parse_hex(c.as_ref()))
            .collect::<VizResult<Vec<_>>>()?;
        Self::from_stops(name, &stops)
    }

    /// Look up a registered colormap (case-insensitive).
    pub fn named(name: &str) -> VizResult<Self> {
        let stops = match name.to_ascii_lowercase().as_str() {
            "custom_coolwarm" => CUSTOM_COOLWARM,
            "coolwarm" => COOLWARM,
            "viridis" => VIRIDIS,
            "grayscale" | "gray" | "grey" => GRAYSCALE,
            _ => {
                return Err(VizError::validation(format!(
                    "unknown colormap '{name}' (known: {})",
                    Self::NAMES.join(", ")
                )));
            }
        };
        Self::from_hex(name.to_ascii_lowercase(), stops)
    }

    /// Resolve a [`ColormapSpec`].
    pub fn from_spec(spec: &ColormapSpec) -> VizResult<Self> {
        match spec {
            ColormapSpec::Named(name) => Self::named(name),
            ColormapSpec::Colors(colors) => Self::from_hex("custom", colors),
        }
    }

    /// Colormap name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at normalized position `t` (clamped to `[0, 1]`; NaN maps to the low end).
    pub fn sample(&self, t: f64) -> Rgba8 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = ((t * Self::BINS as f64) as usize).min(Self::BINS - 1);
        self.lut[idx]
    }
}

impl Default for Colormap {
    fn default() -> Self {
        let stops = CUSTOM_COOLWARM
            .iter()
            .filter_map(|c| Rgba8::parse_hex(c).ok())
            .collect::<Vec<_>>();
        Self::from_stops(Self::DEFAULT_NAME, &stops).unwrap_or_else(|_| Self {
            name: Self::DEFAULT_NAME.to_owned(),
            lut: vec![Rgba8::BLACK; Self::BINS],
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/colormap.rs"]
mod tests;
