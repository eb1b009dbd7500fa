//! Chart configuration
//!
//! [`SunburstConfig`] is the chart form data as saved by the host: selected
//! columns, measures, palettes, label and number formatting. It deserializes
//! from JSON with snake_case keys and falls back to documented defaults for
//! everything optional. [`ChartProps`] bundles the form data with the
//! per-render inputs (canvas size, theme, prior selection, cross-filter hook).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::writer::echarts::DataMaskHook;
use crate::{Result, SunburstError};

pub const DEFAULT_COLOR_SCHEME: &str = "supersetColors";
pub const DEFAULT_LINEAR_COLOR_SCHEME: &str = "blues";
pub const DEFAULT_NUMBER_FORMAT: &str = "SMART_NUMBER";
pub const DEFAULT_DATE_FORMAT: &str = "smart_date";

// =============================================================================
// Column and metric references
// =============================================================================

/// A measure: either a plain column/metric name or an adhoc metric definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Simple(String),
    Adhoc(AdhocMetric),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdhocMetric {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "sqlExpression")]
    pub sql_expression: Option<String>,
    #[serde(default)]
    pub aggregate: Option<String>,
    #[serde(default)]
    pub column: Option<Value>,
}

impl Metric {
    /// The label under which the metric appears in query results
    pub fn label(&self) -> String {
        match self {
            Metric::Simple(name) => name.clone(),
            Metric::Adhoc(adhoc) => {
                if let Some(label) = adhoc.label.as_ref().filter(|l| !l.is_empty()) {
                    return label.clone();
                }
                let column = adhoc
                    .column
                    .as_ref()
                    .and_then(|c| c.get("column_name"))
                    .and_then(Value::as_str);
                match (&adhoc.aggregate, column) {
                    (Some(aggregate), Some(column)) => format!("{}({})", aggregate, column),
                    _ => adhoc.sql_expression.clone().unwrap_or_default(),
                }
            }
        }
    }
}

impl From<&str> for Metric {
    fn from(name: &str) -> Self {
        Metric::Simple(name.to_string())
    }
}

/// A group-by column: a physical column name or an adhoc expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Physical(String),
    Adhoc {
        #[serde(default)]
        label: Option<String>,
        #[serde(default, rename = "sqlExpression")]
        sql_expression: Option<String>,
    },
}

impl ColumnRef {
    pub fn label(&self) -> String {
        match self {
            ColumnRef::Physical(name) => name.clone(),
            ColumnRef::Adhoc {
                label,
                sql_expression,
            } => label
                .clone()
                .filter(|l| !l.is_empty())
                .or_else(|| sql_expression.clone())
                .unwrap_or_default(),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Physical(name.to_string())
    }
}

// =============================================================================
// Enumerated options
// =============================================================================

/// What a segment label shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    #[default]
    Key,
    Value,
    KeyValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
}

/// Currency attached to a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    #[serde(default, rename = "symbolPosition")]
    pub symbol_position: SymbolPosition,
}

// =============================================================================
// Form data
// =============================================================================

/// Sunburst form data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstConfig {
    /// Dimensions forwarded to the interaction layer
    #[serde(default)]
    pub groupby: Vec<ColumnRef>,
    /// Hierarchy levels, outermost first
    #[serde(default)]
    pub columns: Vec<ColumnRef>,
    pub metric: Metric,
    #[serde(default)]
    pub secondary_metric: Option<Metric>,
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
    #[serde(default = "default_linear_color_scheme")]
    pub linear_color_scheme: String,
    #[serde(default)]
    pub label_type: LabelType,
    #[serde(default = "default_number_format")]
    pub number_format: String,
    #[serde(default)]
    pub currency_format: Option<Currency>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    /// Minimum share of the full circle (percent) a segment needs to show its label
    #[serde(default = "default_labels_threshold")]
    pub show_labels_threshold: f64,
    #[serde(default)]
    pub show_total: bool,
    #[serde(default)]
    pub slice_id: Option<u64>,
    /// Forced label colors, applied before palette assignment
    #[serde(default)]
    pub label_colors: HashMap<String, String>,
}

fn default_color_scheme() -> String {
    DEFAULT_COLOR_SCHEME.to_string()
}

fn default_linear_color_scheme() -> String {
    DEFAULT_LINEAR_COLOR_SCHEME.to_string()
}

fn default_number_format() -> String {
    DEFAULT_NUMBER_FORMAT.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_labels_threshold() -> f64 {
    5.0
}

impl SunburstConfig {
    /// Form data with defaults for everything but the hierarchy and the metric
    pub fn new(columns: &[&str], metric: &str) -> Self {
        Self {
            groupby: Vec::new(),
            columns: columns.iter().map(|c| ColumnRef::from(*c)).collect(),
            metric: Metric::from(metric),
            secondary_metric: None,
            color_scheme: default_color_scheme(),
            linear_color_scheme: default_linear_color_scheme(),
            label_type: LabelType::default(),
            number_format: default_number_format(),
            currency_format: None,
            date_format: default_date_format(),
            show_labels: true,
            show_labels_threshold: default_labels_threshold(),
            show_total: false,
            slice_id: None,
            label_colors: HashMap::new(),
        }
    }

    pub fn with_secondary_metric(mut self, metric: &str) -> Self {
        self.secondary_metric = Some(Metric::from(metric));
        self
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.columns.iter().map(ColumnRef::label).collect()
    }

    pub fn metric_label(&self) -> String {
        self.metric.label()
    }

    pub fn secondary_metric_label(&self) -> Option<String> {
        self.secondary_metric
            .as_ref()
            .map(Metric::label)
            .filter(|l| !l.is_empty())
    }

    /// Color by the secondary/primary ratio only when a distinct secondary metric is set
    pub fn colors_by_ratio(&self) -> bool {
        match self.secondary_metric_label() {
            Some(secondary) => secondary != self.metric_label(),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.metric_label().is_empty() {
            return Err(SunburstError::ValidationError(
                "A primary metric is required".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(SunburstError::ValidationError(
                "At least one hierarchy column is required".to_string(),
            ));
        }
        if let Some(column) = self.columns.iter().find(|c| c.label().is_empty()) {
            return Err(SunburstError::ValidationError(format!(
                "Hierarchy column {:?} has no label",
                column
            )));
        }
        if !(0.0..=100.0).contains(&self.show_labels_threshold) {
            return Err(SunburstError::ValidationError(format!(
                "show_labels_threshold must be between 0 and 100, got {}",
                self.show_labels_threshold
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Datasource, theme and interaction state
// =============================================================================

/// Per-metric formatting metadata of the datasource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(default)]
    pub currency_formats: HashMap<String, Currency>,
    #[serde(default)]
    pub column_formats: HashMap<String, String>,
    /// Human readable metric names
    #[serde(default)]
    pub verbose_map: HashMap<String, String>,
}

impl Datasource {
    pub fn verbose_name(&self, label: &str) -> String {
        self.verbose_map
            .get(label)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }
}

/// Theme tokens used for padding and label styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_size_unit")]
    pub size_unit: f64,
    #[serde(default = "default_color_text")]
    pub color_text: String,
    #[serde(default = "default_color_bg_base")]
    pub color_bg_base: String,
}

fn default_size_unit() -> f64 {
    4.0
}

fn default_color_text() -> String {
    "#000000e0".to_string()
}

fn default_color_bg_base() -> String {
    "#ffffff".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            size_unit: default_size_unit(),
            color_text: default_color_text(),
            color_bg_base: default_color_bg_base(),
        }
    }
}

/// Selection threaded back from earlier interactions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub selected_values: Vec<String>,
}

impl FilterState {
    pub fn selected(values: &[&str]) -> Self {
        Self {
            selected_values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Everything a single render needs besides the data
#[derive(Clone)]
pub struct ChartProps {
    pub config: SunburstConfig,
    pub datasource: Datasource,
    pub theme: Theme,
    pub width: f64,
    pub height: f64,
    pub filter_state: FilterState,
    pub in_context_menu: bool,
    pub emit_cross_filters: bool,
    pub set_data_mask: Option<DataMaskHook>,
}

impl ChartProps {
    pub fn new(config: SunburstConfig, width: f64, height: f64) -> Self {
        Self {
            config,
            datasource: Datasource::default(),
            theme: Theme::default(),
            width,
            height,
            filter_state: FilterState::default(),
            in_context_menu: false,
            emit_cross_filters: false,
            set_data_mask: None,
        }
    }

    pub fn with_datasource(mut self, datasource: Datasource) -> Self {
        self.datasource = datasource;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_filter_state(mut self, filter_state: FilterState) -> Self {
        self.filter_state = filter_state;
        self
    }

    pub fn with_cross_filters(mut self, hook: Option<DataMaskHook>) -> Self {
        self.emit_cross_filters = true;
        self.set_data_mask = hook;
        self
    }
}
