//! Categorical color assignment
//!
//! Colors are handed out in palette order on first request and remembered per
//! `(scope, key)`, so the same label keeps its color across renders of the
//! same chart. The registry is an explicit object owned by the host; nothing
//! here is process-wide.

use std::collections::HashMap;

use tracing::warn;

use super::palettes::{categorical_palette, color_to_hex, default_categorical_palette};
use crate::{Result, SunburstError};

/// Keyed color lookup shared between chart renders
pub trait ColorRegistry {
    /// Color of `key` within `scope` for the palette `scheme`, assigning the
    /// next palette color when the key has not been seen yet.
    fn get_or_assign(&mut self, scheme: &str, key: &str, scope: Option<u64>) -> String;

    /// Pin `key` to `color` within `scope`, overriding palette assignment.
    fn force_color(&mut self, key: &str, color: &str, scope: Option<u64>) -> Result<()>;
}

/// Assignment state for a single palette
#[derive(Debug, Clone)]
pub struct CategoricalColorScale {
    colors: Vec<String>,
    assigned: HashMap<(Option<u64>, String), String>,
    next_index: HashMap<Option<u64>, usize>,
}

impl CategoricalColorScale {
    /// An empty palette is replaced by the default one
    pub fn new(colors: &[&str]) -> Self {
        let colors = if colors.is_empty() {
            default_categorical_palette()
        } else {
            colors
        };
        Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            assigned: HashMap::new(),
            next_index: HashMap::new(),
        }
    }

    pub fn get_or_assign(&mut self, key: &str, scope: Option<u64>) -> String {
        let slot = (scope, key.to_string());
        if let Some(color) = self.assigned.get(&slot) {
            return color.clone();
        }
        let index = self.next_index.entry(scope).or_insert(0);
        let color = self.colors[*index % self.colors.len()].clone();
        *index += 1;
        self.assigned.insert(slot, color.clone());
        color
    }

    pub fn assigned(&self, key: &str, scope: Option<u64>) -> Option<&str> {
        self.assigned
            .get(&(scope, key.to_string()))
            .map(String::as_str)
    }
}

/// In-memory [`ColorRegistry`] holding one scale per palette name
#[derive(Debug, Clone, Default)]
pub struct CategoricalColorNamespace {
    scales: HashMap<String, CategoricalColorScale>,
    forced: HashMap<(Option<u64>, String), String>,
}

impl CategoricalColorNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scale for `scheme`, created on first use. Unknown names fall back
    /// to the default palette.
    pub fn scale(&mut self, scheme: &str) -> &mut CategoricalColorScale {
        self.scales
            .entry(scheme.to_lowercase())
            .or_insert_with(|| {
                let colors = categorical_palette(scheme).unwrap_or_else(|| {
                    warn!(scheme = %scheme, "unknown categorical color scheme, using default palette");
                    default_categorical_palette()
                });
                CategoricalColorScale::new(colors)
            })
    }
}

impl ColorRegistry for CategoricalColorNamespace {
    fn get_or_assign(&mut self, scheme: &str, key: &str, scope: Option<u64>) -> String {
        if let Some(color) = self.forced.get(&(scope, key.to_string())) {
            return color.clone();
        }
        self.scale(scheme).get_or_assign(key, scope)
    }

    fn force_color(&mut self, key: &str, color: &str, scope: Option<u64>) -> Result<()> {
        let hex = color_to_hex(color).map_err(SunburstError::ValidationError)?;
        self.forced.insert((scope, key.to_string()), hex);
        Ok(())
    }
}
