//! Tooltip composition for hovered segments

use crate::format::{FormatValue, NumberFormatter, ValueFormatter};
use crate::NULL_STRING;

const TRUNCATION_STYLE: &str =
    "max-width: 300px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;";

/// One entry of a hovered node's path, from the virtual root down to the node
#[derive(Debug, Clone, PartialEq)]
pub struct PathInfo {
    pub name: String,
    pub value: f64,
}

impl PathInfo {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Title and `(label, value)` rows of a tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Tooltip {
    /// Render as an HTML table with the title on top
    pub fn to_html(&self) -> String {
        let title = if self.title.is_empty() {
            String::new()
        } else {
            format!(
                r#"<span style="font-weight: 700;{}">{}</span>"#,
                TRUNCATION_STYLE, self.title
            )
        };
        let rows: String = if self.rows.is_empty() {
            "<tr><td>No data</td></tr>".to_string()
        } else {
            self.rows
                .iter()
                .map(|(label, value)| {
                    format!(
                        r#"<tr><td style="text-align: left; {}">{}</td><td style="text-align: left; padding-left: 8px; {}">{}</td></tr>"#,
                        TRUNCATION_STYLE,
                        escape_html(label),
                        TRUNCATION_STYLE,
                        escape_html(value)
                    )
                })
                .collect()
        };
        format!("<div>{}<table>{}</table></div>", title, rows)
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Everything a tooltip needs that does not depend on the hovered node
#[derive(Debug, Clone)]
pub struct TooltipFormatter {
    pub primary: ValueFormatter,
    pub secondary: Option<ValueFormatter>,
    pub color_by_category: bool,
    pub total_value: f64,
    /// Primary metric label, already mapped through the verbose map
    pub metric_label: String,
    pub secondary_metric_label: Option<String>,
}

impl TooltipFormatter {
    /// Tooltip of the node named `name`.
    ///
    /// `tree_path` runs from the virtual root to the node itself, so the
    /// node has a real parent only when the path is longer than two.
    /// Percentages divide by the raw values; a zero denominator renders as
    /// whatever the percent formatter makes of the non-finite result.
    pub fn compose(
        &self,
        name: &str,
        value: f64,
        secondary_value: f64,
        tree_path: &[PathInfo],
    ) -> Tooltip {
        let percent = NumberFormatter::percent();
        let title = (if name.is_empty() { NULL_STRING } else { name })
            .replace('<', "&lt;")
            .replace('>', "&gt;");

        let mut rows = vec![(
            "% of total".to_string(),
            percent.format(value / self.total_value),
        )];
        if tree_path.len() > 2 {
            let parent = &tree_path[tree_path.len() - 2];
            rows.push(("% of parent".to_string(), percent.format(value / parent.value)));
        }
        rows.push((self.metric_label.clone(), self.primary.format_value(value)));

        if !self.color_by_category {
            let secondary_label = self
                .secondary_metric_label
                .clone()
                .unwrap_or_else(|| NULL_STRING.to_string());
            let formatted_secondary = self
                .secondary
                .as_ref()
                .map(|f| f.format_value(secondary_value))
                .unwrap_or_else(|| NULL_STRING.to_string());
            rows.push((secondary_label.clone(), formatted_secondary));
            rows.push((
                format!("{}/{}", self.metric_label, secondary_label),
                percent.format(secondary_value / value),
            ));
        }

        Tooltip { title, rows }
    }

    pub fn render(&self, name: &str, value: f64, secondary_value: f64, tree_path: &[PathInfo]) -> String {
        self.compose(name, value, secondary_value, tree_path).to_html()
    }
}
