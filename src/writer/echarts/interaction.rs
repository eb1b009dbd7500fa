//! Interaction side-channel: translating clicked segments into cross filters
//!
//! Every render hands the host an [`Interaction`] holding the label map (the
//! selection key of every segment mapped to its path segments) and the
//! current selection. When a segment is clicked, [`Interaction::cross_filter`]
//! turns its tree path back into filter clauses on the hierarchy columns.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::NULL_STRING;

/// Callback receiving the data mask emitted by a click
pub type DataMaskHook = Arc<dyn Fn(&DataMask) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOp {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "IS NULL")]
    IsNull,
}

/// A filter clause on one hierarchy column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilter {
    pub col: String,
    pub op: FilterOp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtraFormData {
    pub filters: Vec<QueryFilter>,
}

/// Selection state handed back to the next render
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossFilterState {
    /// Path segments of every selected key
    pub value: Option<Vec<Vec<String>>>,
    pub selected_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMask {
    pub extra_form_data: ExtraFormData,
    pub filter_state: CrossFilterState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossFilter {
    pub data_mask: DataMask,
    /// Whether the clicked segment was selected before the click
    pub is_current_value_selected: bool,
}

/// What the host's interaction layer needs after a render
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub label_map: BTreeMap<String, Vec<String>>,
    pub selected_values: Vec<String>,
    pub groupby: Vec<String>,
    /// Hierarchy column labels, outermost first
    pub columns: Vec<String>,
    pub emit_cross_filters: bool,
    #[serde(skip)]
    pub set_data_mask: Option<DataMaskHook>,
}

impl std::fmt::Debug for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interaction")
            .field("label_map", &self.label_map)
            .field("selected_values", &self.selected_values)
            .field("groupby", &self.groupby)
            .field("columns", &self.columns)
            .field("emit_cross_filters", &self.emit_cross_filters)
            .field("set_data_mask", &self.set_data_mask.is_some())
            .finish()
    }
}

impl Interaction {
    /// Data mask for a click on the segment at `tree_path`.
    ///
    /// `tree_path` holds the display names from the outermost level down to
    /// the clicked segment; empty names (the virtual root) are ignored.
    /// Clicking the selected segment clears the selection, clicking any
    /// other segment selects it alone.
    pub fn cross_filter(&self, tree_path: &[String]) -> CrossFilter {
        let tree_path: Vec<&str> = tree_path
            .iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect();
        let name = tree_path.join(",");

        let is_current_value_selected = self.selected_values.contains(&name);
        let values: Vec<String> = if is_current_value_selected {
            self.selected_values
                .iter()
                .filter(|v| **v != name)
                .cloned()
                .collect()
        } else {
            vec![name]
        };
        let labels: Vec<&Vec<String>> = values
            .iter()
            .filter_map(|v| self.label_map.get(v))
            .collect();

        let filters = if values.is_empty() {
            Vec::new()
        } else {
            self.columns
                .iter()
                .take(tree_path.len())
                .enumerate()
                .map(|(idx, col)| {
                    let val: Vec<String> = labels
                        .iter()
                        .filter_map(|segments| segments.get(idx).cloned())
                        .collect();
                    if !val.is_empty() && val.iter().all(|v| v == NULL_STRING) {
                        QueryFilter {
                            col: col.clone(),
                            op: FilterOp::IsNull,
                            val: None,
                        }
                    } else {
                        QueryFilter {
                            col: col.clone(),
                            op: FilterOp::In,
                            val: Some(val),
                        }
                    }
                })
                .collect()
        };

        let filter_state = if values.is_empty() {
            CrossFilterState::default()
        } else {
            CrossFilterState {
                value: Some(labels.into_iter().cloned().collect()),
                selected_values: Some(values),
            }
        };

        CrossFilter {
            data_mask: DataMask {
                extra_form_data: ExtraFormData { filters },
                filter_state,
            },
            is_current_value_selected,
        }
    }

    /// React to a click on the segment at `tree_path`.
    ///
    /// Returns `None` when cross filters are disabled. Otherwise the data
    /// mask is passed to the hook, if any, and returned.
    pub fn handle_click(&self, tree_path: &[String]) -> Option<DataMask> {
        if !self.emit_cross_filters {
            return None;
        }
        let data_mask = self.cross_filter(tree_path).data_mask;
        if let Some(hook) = &self.set_data_mask {
            hook(&data_mask);
        }
        Some(data_mask)
    }
}
