//! Named color palettes and color interpolation
//!
//! Categorical palettes are cycled by the categorical color registry;
//! sequential and diverging palettes are the stops of continuous color
//! scales.

use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};

// =============================================================================
// Categorical Color Palettes
// =============================================================================

/// Default categorical palette
pub const SUPERSET_COLORS: &[&str] = &[
    "#1fa8c9", "#454e7c", "#5ac189", "#ff7f44", "#666666",
    "#e04355", "#fcc700", "#a868b7", "#3ccccb", "#a38f79",
    "#8fd3e4", "#a1a6bd", "#ace1c4", "#fec0a1", "#b2b2b2",
    "#efa1aa", "#fde380", "#d3b3da", "#9ee5e5", "#d1c6bc",
];

/// Tableau 10
pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// D3 Category 10
pub const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// ColorBrewer Set2
pub const SET2: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854",
    "#ffd92f", "#e5c494", "#b3b3b3",
];

/// ColorBrewer Dark2
pub const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e",
    "#e6ab02", "#a6761d", "#666666",
];

/// ColorBrewer Paired
pub const PAIRED: &[&str] = &[
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99",
    "#e31a1c", "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a",
    "#ffff99", "#b15928",
];

// =============================================================================
// Sequential Color Palettes
// =============================================================================

pub const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6",
    "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub const GREENS: &[&str] = &[
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476",
    "#41ab5d", "#238b45", "#006d2c", "#00441b",
];

pub const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a",
    "#ef3b2c", "#cb181d", "#a50f15", "#67000d",
];

pub const PURPLES: &[&str] = &[
    "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8",
    "#807dba", "#6a51a3", "#54278f", "#3f007d",
];

pub const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4a89", "#31688e", "#26828e",
    "#1f9e89", "#35b779", "#6ece58", "#b5de2b", "#fde725",
];

pub const MAGMA: &[&str] = &[
    "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f",
    "#cd4071", "#f1605d", "#fd9668", "#feca8d", "#fcfdbf",
];

// Diverging

pub const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7",
    "#f7f7f7", "#d1e5f0", "#92c5de", "#4393c3", "#2166ac", "#053061",
];

pub const RDYLGN: &[&str] = &[
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b",
    "#ffffbf", "#d9ef8b", "#a6d96a", "#66bd63", "#1a9850", "#006837",
];

/// Names accepted by [`categorical_palette`]
pub const CATEGORICAL_NAMES: &[&str] = &[
    "supersetColors", "tableau10", "category10", "set2", "dark2", "paired",
];

/// Names accepted by [`sequential_palette`]
pub const SEQUENTIAL_NAMES: &[&str] = &[
    "blues", "greens", "reds", "purples", "viridis", "magma", "rdbu", "rdylgn",
];

// =============================================================================
// Lookup Functions
// =============================================================================

/// Look up a categorical palette by name (case insensitive)
pub fn categorical_palette(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "supersetcolors" | "superset" => Some(SUPERSET_COLORS),
        "tableau10" | "tableau" => Some(TABLEAU10),
        "category10" | "d3category10" => Some(CATEGORY10),
        "set2" => Some(SET2),
        "dark2" => Some(DARK2),
        "paired" => Some(PAIRED),
        _ => None,
    }
}

/// Look up a sequential or diverging palette by name (case insensitive)
pub fn sequential_palette(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "blues" => Some(BLUES),
        "greens" => Some(GREENS),
        "reds" => Some(REDS),
        "purples" => Some(PURPLES),
        "viridis" => Some(VIRIDIS),
        "magma" => Some(MAGMA),
        "rdbu" => Some(RDBU),
        "rdylgn" => Some(RDYLGN),
        _ => None,
    }
}

pub fn default_categorical_palette() -> &'static [&'static str] {
    SUPERSET_COLORS
}

pub fn default_sequential_palette() -> &'static [&'static str] {
    BLUES
}

// =============================================================================
// Color Utilities
// =============================================================================

/// Normalize any CSS color (named, hex, rgb(), hsl(), ...) to lowercase hex.
pub fn color_to_hex(value: &str) -> Result<String, String> {
    csscolorparser::parse(value)
        .map(|c| c.to_css_hex())
        .map_err(|e| format!("Invalid color '{}': {}", value, e))
}

/// Color space in which ramps are interpolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Perceptually uniform; avoids muddy midpoints
    #[default]
    Oklab,
    LinearRgb,
}

/// Evenly spaced color stops that can be sampled at any position in `[0, 1]`
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<LinSrgb<f32>>,
    space: ColorSpace,
}

impl ColorRamp {
    pub fn new(colors: &[&str], space: ColorSpace) -> Result<Self, String> {
        if colors.is_empty() {
            return Err("A color ramp needs at least one color".to_string());
        }
        let stops = colors
            .iter()
            .map(|c| parse_to_srgb(c).map(LinSrgb::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stops, space })
    }

    /// Color at position `t`; positions outside `[0, 1]` are clamped
    pub fn sample(&self, t: f64) -> String {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        if self.stops.len() == 1 {
            return srgb_to_hex(&Srgb::from(self.stops[0]));
        }

        let segments = self.stops.len() - 1;
        let position = t * segments as f32;
        let segment = (position.floor() as usize).min(segments - 1);
        let local_t = position - segment as f32;
        let (from, to) = (self.stops[segment], self.stops[segment + 1]);

        let mixed = match self.space {
            ColorSpace::Oklab => {
                let a = Oklab::from_color(from);
                let b = Oklab::from_color(to);
                let lin: LinSrgb<f32> = a.mix(b, local_t).into_color();
                lin
            }
            ColorSpace::LinearRgb => from.mix(to, local_t),
        };
        srgb_to_hex(&Srgb::from(mixed))
    }
}

fn parse_to_srgb(color: &str) -> Result<Srgb<f32>, String> {
    let parsed = csscolorparser::parse(color)
        .map_err(|e| format!("Invalid color '{}': {}", color, e))?;
    Ok(Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32))
}

fn srgb_to_hex(color: &Srgb<f32>) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.red),
        channel(color.green),
        channel(color.blue)
    )
}
