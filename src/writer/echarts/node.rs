//! Serializable sunburst data items

use serde::Serialize;

use crate::config::Theme;
use crate::reader::Scalar;

/// Opacity of segments outside the current selection
pub const DIMMED_OPACITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Text style shared by series labels and dimmed segment labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub color: String,
    pub text_border_color: String,
    pub text_border_width: f64,
}

impl LabelStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            color: theme.color_text.clone(),
            text_border_color: theme.color_bg_base.clone(),
            text_border_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLabel {
    /// Rendered label text
    pub formatter: String,
    #[serde(flatten)]
    pub style: Option<LabelStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTooltip {
    /// Rendered tooltip HTML
    pub formatter: String,
}

/// One encoded segment of the sunburst
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    /// Display name
    pub name: String,
    pub value: f64,
    pub secondary_value: f64,
    /// Raw group-by values from the outermost level down to this node
    pub records: Vec<Scalar>,
    pub item_style: ItemStyle,
    pub label: NodeLabel,
    pub tooltip: NodeTooltip,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeItem>,
    /// Display names from the outermost level down to this node
    #[serde(skip)]
    pub path: Vec<String>,
}

impl NodeItem {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Key of this node in the label map and in selections: the joined path
    /// for leaves, the display name otherwise.
    pub fn selection_key(&self) -> String {
        if self.is_leaf() {
            self.path.join(",")
        } else {
            self.name.clone()
        }
    }

    pub fn is_dimmed(&self) -> bool {
        self.item_style.opacity.is_some()
    }

    /// Pre-order iterator over this node and all of its descendants
    pub fn iter(&self) -> impl Iterator<Item = &NodeItem> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
