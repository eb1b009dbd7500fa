//! Continuous color scale over a numeric domain

use tracing::warn;

use super::palettes::{default_sequential_palette, sequential_palette, ColorRamp, ColorSpace};
use crate::{Result, SunburstError};

/// Maps numbers in `[min, max]` onto a sequential palette.
///
/// Values outside the domain are clamped to the end colors. A degenerate
/// domain (`min == max`) maps everything to the middle color. Non-finite
/// values have no color.
#[derive(Debug, Clone)]
pub struct LinearColorScale {
    domain: (f64, f64),
    ramp: ColorRamp,
}

impl LinearColorScale {
    pub fn new(colors: &[&str], domain: (f64, f64), space: ColorSpace) -> Result<Self> {
        let ramp = ColorRamp::new(colors, space).map_err(SunburstError::ValidationError)?;
        Ok(Self { domain, ramp })
    }

    /// Scale for a named sequential scheme; unknown names use the default palette
    pub fn from_scheme(scheme: &str, domain: (f64, f64)) -> Result<Self> {
        let colors = sequential_palette(scheme).unwrap_or_else(|| {
            warn!(scheme = %scheme, "unknown sequential color scheme, using default palette");
            default_sequential_palette()
        });
        Self::new(colors, domain, ColorSpace::default())
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn color(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let (min, max) = self.domain;
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.5 };
        Some(self.ramp.sample(t))
    }
}
