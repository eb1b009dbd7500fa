//! ECharts sunburst writer
//!
//! Converts a dataset into the option object of an ECharts sunburst series.
//!
//! # Pipeline
//!
//! 1. Aggregate the records into a tree along the hierarchy columns
//! 2. Sum the top level nodes into the chart totals
//! 3. Pick the color strategy: continuous by secondary/primary ratio when a
//!    distinct secondary metric is set, categorical by display name otherwise
//! 4. Encode every node: display name, color, dimming, label and tooltip
//! 5. Assemble geometry, series and the optional total overlay
//!
//! Alongside the options the writer returns the [`Interaction`] side-channel
//! used to turn clicks back into cross filters.

mod interaction;
mod node;
mod tooltip;

use std::collections::{BTreeMap, HashSet};

use serde_json::{json, Value};
use tracing::debug;

use crate::config::ChartProps;
use crate::format::{
    format_label, format_series_name, get_value_formatter, NumberFormatter, TimeFormatter,
    ValueFormatter,
};
use crate::plot::scale::LinearColorScale;
use crate::plot::{linear_domain, tree_builder, ColorRegistry, ColorStrategy, TreeNode};
use crate::reader::{Dataset, Scalar};
use crate::writer::Writer;
use crate::{Result, SunburstError};

pub use interaction::{
    CrossFilter, CrossFilterState, DataMask, DataMaskHook, ExtraFormData, FilterOp, Interaction,
    QueryFilter,
};
pub use node::{ItemStyle, LabelStyle, NodeItem, NodeLabel, NodeTooltip, DIMMED_OPACITY};
pub use tooltip::{PathInfo, Tooltip, TooltipFormatter};

/// Fraction of the outer radius left empty in the middle
const INNER_RADIUS_RATIO: f64 = 0.3;

/// Degrees per percent of the full circle
const DEGREES_PER_PERCENT: f64 = 3.6;

/// Result of one sunburst render
#[derive(Debug, Clone)]
pub struct SunburstChart {
    /// ECharts option object
    pub options: Value,
    /// Encoded top level segments (also serialized into `options`)
    pub data: Vec<NodeItem>,
    pub interaction: Interaction,
    pub tooltip: TooltipFormatter,
    pub total_value: f64,
    pub total_secondary_value: f64,
}

impl SunburstChart {
    pub fn color_by_category(&self) -> bool {
        self.tooltip.color_by_category
    }

    /// Pre-order iterator over every encoded segment
    pub fn nodes(&self) -> impl Iterator<Item = &NodeItem> {
        self.data.iter().flat_map(|item| item.iter())
    }
}

/// ECharts sunburst writer
#[derive(Debug, Default, Clone, Copy)]
pub struct EChartsWriter;

impl EChartsWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Per-render state shared by every node of the traversal
struct NodeEncoder<'a> {
    props: &'a ChartProps,
    data: &'a Dataset,
    number_formatter: NumberFormatter,
    time_formatter: TimeFormatter,
    value_formatter: &'a ValueFormatter,
    tooltip: &'a TooltipFormatter,
    strategy: &'a ColorStrategy,
    selected: HashSet<&'a str>,
    label_style: LabelStyle,
}

impl NodeEncoder<'_> {
    /// Encode `nodes` and their descendants.
    ///
    /// `path`, `records` and `tree_path` describe the common ancestors of
    /// `nodes`; `tree_path` starts with the virtual root.
    fn encode(
        &self,
        nodes: &[TreeNode],
        path: &[String],
        records: &[Scalar],
        tree_path: &[PathInfo],
        registry: &mut dyn ColorRegistry,
    ) -> Vec<NodeItem> {
        let mut items = Vec::with_capacity(nodes.len());
        for node in nodes {
            items.push(self.encode_node(node, path, records, tree_path, registry));
        }
        items
    }

    fn encode_node(
        &self,
        node: &TreeNode,
        path: &[String],
        records: &[Scalar],
        tree_path: &[PathInfo],
        registry: &mut dyn ColorRegistry,
    ) -> NodeItem {
        let name = format_series_name(
            &node.name,
            &self.number_formatter,
            &self.time_formatter,
            self.data.coltype(&node.group_by),
        );
        let color = self.strategy.color(registry, &name, node.ratio());

        let mut node_path = path.to_vec();
        node_path.push(name.clone());
        let mut node_records = records.to_vec();
        node_records.push(node.name.clone());
        let mut node_tree_path = tree_path.to_vec();
        node_tree_path.push(PathInfo::new(&name, node.value));

        let children = self.encode(
            &node.children,
            &node_path,
            &node_records,
            &node_tree_path,
            registry,
        );

        let mut item = NodeItem {
            label: NodeLabel {
                formatter: format_label(
                    &name,
                    node.value,
                    self.props.config.label_type,
                    self.value_formatter,
                ),
                style: None,
            },
            tooltip: NodeTooltip {
                formatter: self.tooltip.render(
                    &name,
                    node.value,
                    node.secondary_value,
                    &node_tree_path,
                ),
            },
            name,
            value: node.value,
            secondary_value: node.secondary_value,
            records: node_records,
            item_style: ItemStyle {
                color,
                opacity: None,
            },
            children,
            path: node_path,
        };

        if !self.selected.is_empty() && !self.selected.contains(item.selection_key().as_str()) {
            item.item_style.opacity = Some(DIMMED_OPACITY);
            item.label.style = Some(self.label_style.clone());
        }
        item
    }
}

/// Label map entries, children before their parent so that a parent wins a
/// key collision with one of its descendants.
fn collect_label_map(items: &[NodeItem], label_map: &mut BTreeMap<String, Vec<String>>) {
    for item in items {
        collect_label_map(&item.children, label_map);
        label_map.insert(item.selection_key(), item.path.clone());
    }
}

impl Writer for EChartsWriter {
    type Output = SunburstChart;

    fn write(
        &self,
        props: &ChartProps,
        data: &Dataset,
        registry: &mut dyn ColorRegistry,
    ) -> Result<SunburstChart> {
        self.validate(props)?;

        let config = &props.config;
        let datasource = &props.datasource;
        let metric_label = config.metric_label();
        let secondary_metric_label = config.secondary_metric_label();
        let columns = config.column_labels();

        let primary_formatter = get_value_formatter(
            &metric_label,
            datasource,
            &config.number_format,
            config.currency_format.as_ref(),
        );
        let secondary_formatter = secondary_metric_label.as_deref().map(|label| {
            get_value_formatter(
                label,
                datasource,
                &config.number_format,
                config.currency_format.as_ref(),
            )
        });

        let tree = tree_builder(
            &data.records,
            &columns,
            &metric_label,
            secondary_metric_label.as_deref(),
        );
        let total_value: f64 = tree.iter().map(|n| n.value).sum();
        let total_secondary_value: f64 = tree.iter().map(|n| n.secondary_value).sum();
        debug!(
            records = data.records.len(),
            nodes = tree.iter().map(TreeNode::size).sum::<usize>(),
            total_value,
            "built sunburst tree"
        );

        let strategy = if config.colors_by_ratio() {
            // Infinite ratios are left out too, so a zero primary value cannot widen the domain
            let domain = linear_domain(&tree, |node| Some(node.ratio()).filter(|r| r.is_finite()));
            debug!(min = domain.0, max = domain.1, "coloring by secondary/primary ratio");
            ColorStrategy::Continuous(LinearColorScale::from_scheme(
                &config.linear_color_scheme,
                domain,
            )?)
        } else {
            debug!(scheme = %config.color_scheme, "coloring by category");
            ColorStrategy::Categorical {
                scheme: config.color_scheme.clone(),
                scope: config.slice_id,
            }
        };

        for (label, color) in &config.label_colors {
            registry.force_color(label, color, config.slice_id)?;
        }
        if let ColorStrategy::Categorical { scheme, scope } = &strategy {
            // Base color for the metric itself, so palette order matches other charts
            registry.get_or_assign(scheme, &metric_label, *scope);
        }

        let tooltip = TooltipFormatter {
            primary: primary_formatter.clone(),
            secondary: secondary_formatter,
            color_by_category: strategy.is_categorical(),
            total_value,
            metric_label: datasource.verbose_name(&metric_label),
            secondary_metric_label: secondary_metric_label
                .as_deref()
                .map(|label| datasource.verbose_name(label)),
        };

        let label_style = LabelStyle::from_theme(&props.theme);
        let encoder = NodeEncoder {
            props,
            data,
            number_formatter: NumberFormatter::new(&config.number_format),
            time_formatter: TimeFormatter::new(&config.date_format),
            value_formatter: &primary_formatter,
            tooltip: &tooltip,
            strategy: &strategy,
            selected: props
                .filter_state
                .selected_values
                .iter()
                .map(String::as_str)
                .collect(),
            label_style: label_style.clone(),
        };
        let root = [PathInfo::new("", total_value)];
        let items = encoder.encode(&tree, &[], &[], &root, registry);

        let mut label_map = BTreeMap::new();
        collect_label_map(&items, &mut label_map);

        let options = build_options(
            props,
            &label_style,
            columns.len(),
            serde_json::to_value(&items)?,
            &primary_formatter,
            total_value,
        );

        let interaction = Interaction {
            label_map,
            selected_values: props.filter_state.selected_values.clone(),
            groupby: config.groupby.iter().map(|c| c.label()).collect(),
            columns,
            emit_cross_filters: props.emit_cross_filters,
            set_data_mask: props.set_data_mask.clone(),
        };

        Ok(SunburstChart {
            options,
            data: items,
            interaction,
            tooltip,
            total_value,
            total_secondary_value,
        })
    }

    fn validate(&self, props: &ChartProps) -> Result<()> {
        props.config.validate()?;
        for (name, size) in [("width", props.width), ("height", props.height)] {
            if !size.is_finite() || size < 0.0 {
                return Err(SunburstError::ValidationError(format!(
                    "Chart {} must be a non-negative number, got {}",
                    name, size
                )));
            }
        }
        Ok(())
    }
}

/// Geometry, series and overlay of the option object
fn build_options(
    props: &ChartProps,
    label_style: &LabelStyle,
    depth: usize,
    data: Value,
    value_formatter: &ValueFormatter,
    total_value: f64,
) -> Value {
    let config = &props.config;
    let unit = props.theme.size_unit;
    let (top, right, bottom, left) = (unit * 3.0, unit, unit * 3.0, unit);

    let visible_width = props.width - left - right;
    let visible_height = props.height - top - bottom;
    let radius = (visible_width.min(visible_height) / 2.0).max(0.0);

    let graphic = if config.show_total {
        json!({
            "type": "text",
            "top": "center",
            "left": "center",
            "style": {
                "text": format!("Total: {}", value_formatter.format(total_value)),
                "fontSize": 16,
                "fontWeight": "bold"
            },
            "z": 10
        })
    } else {
        Value::Null
    };

    json!({
        "grid": {"containLabel": true},
        "tooltip": {
            "show": !props.in_context_menu,
            "trigger": "item"
        },
        "series": [{
            "type": "sunburst",
            "top": top,
            "right": right,
            "bottom": bottom,
            "left": left,
            "nodeClick": false,
            "emphasis": {
                "focus": "ancestor",
                "label": {"show": config.show_labels}
            },
            "label": {
                "color": label_style.color,
                "textBorderColor": label_style.text_border_color,
                "textBorderWidth": label_style.text_border_width,
                "width": radius * 0.6 / depth.max(1) as f64,
                "show": config.show_labels,
                "minAngle": config.show_labels_threshold * DEGREES_PER_PERCENT,
                "overflow": "breakAll"
            },
            "radius": [radius * INNER_RADIUS_RATIO, radius],
            "data": data
        }],
        "graphic": graphic
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Datasource, FilterState, SunburstConfig};
    use crate::plot::scale::CategoricalColorNamespace;
    use crate::reader::{ColType, Record};
    use proptest::prelude::*;

    fn record(fields: &[(&str, Scalar)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn region_sales() -> Dataset {
        Dataset::new(vec![
            record(&[("region", "A".into()), ("sales", Scalar::from(10.0))]),
            record(&[("region", "A".into()), ("sales", Scalar::from(5.0))]),
            record(&[("region", "B".into()), ("sales", Scalar::from(7.0))]),
        ])
    }

    fn region_product() -> Dataset {
        Dataset::new(vec![
            record(&[
                ("region", "A".into()),
                ("product", "ProductX".into()),
                ("sales", Scalar::from(10.0)),
                ("cost", Scalar::from(4.0)),
            ]),
            record(&[
                ("region", "A".into()),
                ("product", "ProductY".into()),
                ("sales", Scalar::from(5.0)),
                ("cost", Scalar::from(5.0)),
            ]),
            record(&[
                ("region", "A".into()),
                ("product", "ProductX".into()),
                ("sales", Scalar::from(2.0)),
                ("cost", Scalar::from(1.0)),
            ]),
            record(&[
                ("region", "B".into()),
                ("product", "ProductX".into()),
                ("sales", Scalar::from(7.0)),
                ("cost", Scalar::from(0.0)),
            ]),
        ])
    }

    fn render(props: &ChartProps, data: &Dataset) -> SunburstChart {
        let mut colors = CategoricalColorNamespace::new();
        EChartsWriter::new().write(props, data, &mut colors).unwrap()
    }

    fn find<'a>(chart: &'a SunburstChart, key: &str) -> &'a NodeItem {
        chart
            .nodes()
            .find(|n| n.selection_key() == key)
            .unwrap()
    }

    #[test]
    fn test_single_level_totals() {
        let props = ChartProps::new(SunburstConfig::new(&["region"], "sales"), 800.0, 600.0);
        let chart = render(&props, &region_sales());

        assert_eq!(chart.total_value, 22.0);
        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data[0].name, "A");
        assert_eq!(chart.data[0].value, 15.0);
        assert_eq!(chart.data[1].name, "B");
        assert_eq!(chart.data[1].value, 7.0);
        assert!(chart.color_by_category());
        assert!(chart.nodes().all(|n| !n.is_dimmed()));
    }

    #[test]
    fn test_label_map_two_levels() {
        let props = ChartProps::new(
            SunburstConfig::new(&["region", "product"], "sales"),
            800.0,
            600.0,
        );
        let chart = render(&props, &region_product());
        let label_map = &chart.interaction.label_map;

        assert_eq!(label_map["A,ProductX"], vec!["A", "ProductX"]);
        assert_eq!(label_map["A,ProductY"], vec!["A", "ProductY"]);
        assert_eq!(label_map["A"], vec!["A"]);
        assert_eq!(label_map["B,ProductX"], vec!["B", "ProductX"]);

        let a = &chart.data[0];
        assert_eq!(a.value, 17.0);
        assert_eq!(a.value, a.children.iter().map(|c| c.value).sum::<f64>());
        assert_eq!(a.children[0].records, vec![Scalar::from("A"), Scalar::from("ProductX")]);
    }

    #[test]
    fn test_equal_metrics_color_by_category() {
        let config = SunburstConfig::new(&["region"], "sales").with_secondary_metric("sales");
        let chart = render(&ChartProps::new(config, 800.0, 600.0), &region_sales());
        assert!(chart.color_by_category());
    }

    #[test]
    fn test_distinct_secondary_colors_by_ratio() {
        let config =
            SunburstConfig::new(&["region", "product"], "sales").with_secondary_metric("cost");
        let chart = render(&ChartProps::new(config, 800.0, 600.0), &region_product());

        assert!(!chart.color_by_category());
        assert_eq!(chart.total_secondary_value, 10.0);
        // Every node samples the scale with its own ratio
        let a_y = find(&chart, "A,ProductY");
        let b = find(&chart, "B");
        assert_ne!(a_y.item_style.color, b.item_style.color);
        assert_eq!(b.item_style.color, find(&chart, "B,ProductX").item_style.color);
        assert!(chart.nodes().all(|n| n.item_style.color.is_some()));
        assert!(chart.data[0].tooltip.formatter.contains("sales/cost"));
    }

    #[test]
    fn test_zero_value_node_has_no_color() {
        let data = Dataset::new(vec![
            record(&[("region", "A".into()), ("sales", Scalar::from(0.0)), ("cost", Scalar::from(3.0))]),
            record(&[("region", "B".into()), ("sales", Scalar::from(4.0)), ("cost", Scalar::from(2.0))]),
        ]);
        let config = SunburstConfig::new(&["region"], "sales").with_secondary_metric("cost");
        let chart = render(&ChartProps::new(config, 400.0, 400.0), &data);
        assert!(find(&chart, "A").item_style.color.is_none());
        assert!(find(&chart, "B").item_style.color.is_some());
        assert!(find(&chart, "A").tooltip.formatter.contains("Infinity%"));
    }

    #[test]
    fn test_selection_dims_everything_else() {
        let props = ChartProps::new(
            SunburstConfig::new(&["region", "product"], "sales"),
            800.0,
            600.0,
        )
        .with_filter_state(FilterState::selected(&["A,ProductX"]));
        let chart = render(&props, &region_product());

        for node in chart.nodes() {
            assert_eq!(node.is_dimmed(), node.selection_key() != "A,ProductX");
        }
        let dimmed = find(&chart, "A");
        assert_eq!(dimmed.item_style.opacity, Some(DIMMED_OPACITY));
        assert!(dimmed.label.style.is_some());
        assert_eq!(chart.interaction.selected_values, vec!["A,ProductX"]);
    }

    #[test]
    fn test_empty_records() {
        let mut config = SunburstConfig::new(&["region"], "sales");
        config.show_total = true;
        let chart = render(&ChartProps::new(config, 800.0, 600.0), &Dataset::default());

        assert!(chart.data.is_empty());
        assert_eq!(chart.total_value, 0.0);
        assert_eq!(chart.total_secondary_value, 0.0);
        assert!(chart.interaction.label_map.is_empty());
        assert_eq!(chart.options["graphic"]["style"]["text"], json!("Total: 0"));
    }

    #[test]
    fn test_geometry() {
        let mut config = SunburstConfig::new(&["region", "product"], "sales");
        config.show_labels_threshold = 10.0;
        let chart = render(&ChartProps::new(config, 408.0, 224.0), &region_product());
        let series = &chart.options["series"][0];

        let number = |v: &Value| v.as_f64().unwrap();
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;

        // 224 - 2 * 12 = 200 visible height, radius 100
        assert!(close(number(&series["radius"][0]), 30.0));
        assert!(close(number(&series["radius"][1]), 100.0));
        assert!(close(number(&series["label"]["width"]), 30.0));
        assert!(close(number(&series["label"]["minAngle"]), 36.0));
        assert_eq!(series["top"], json!(12.0));
        assert_eq!(series["left"], json!(4.0));
        assert_eq!(series["nodeClick"], json!(false));
        assert_eq!(series["emphasis"]["focus"], json!("ancestor"));
        assert_eq!(chart.options["graphic"], Value::Null);
        assert_eq!(chart.options["tooltip"]["show"], json!(true));
        assert_eq!(series["data"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_labels_and_tooltips() {
        let mut config = SunburstConfig::new(&["region", "product"], "sales");
        config.label_type = crate::LabelType::KeyValue;
        let mut datasource = Datasource::default();
        datasource
            .verbose_map
            .insert("sales".to_string(), "Total Sales".to_string());
        let props = ChartProps::new(config, 800.0, 600.0).with_datasource(datasource);
        let chart = render(&props, &region_product());

        let x = find(&chart, "A,ProductX");
        assert_eq!(x.label.formatter, "ProductX: 12");
        assert!(x.tooltip.formatter.contains("% of parent"));
        assert!(x.tooltip.formatter.contains("Total Sales"));
        assert!(!find(&chart, "A").tooltip.formatter.contains("% of parent"));
    }

    #[test]
    fn test_renders_with_rounded_and_signed_formats() {
        for (number_format, expected) in [(".4r", "A: 15.00"), ("+,", "A: +15")] {
            let mut config = SunburstConfig::new(&["region"], "sales");
            config.label_type = crate::LabelType::KeyValue;
            config.number_format = number_format.to_string();
            let chart = render(&ChartProps::new(config, 800.0, 600.0), &region_sales());
            assert_eq!(find(&chart, "A").label.formatter, expected);
        }
    }

    #[test]
    fn test_unknown_number_format_still_renders() {
        let mut config = SunburstConfig::new(&["region"], "sales");
        config.label_type = crate::LabelType::Value;
        config.number_format = "nope".to_string();
        config.date_format = "%Q%".to_string();
        let chart = render(&ChartProps::new(config, 800.0, 600.0), &region_sales());
        assert_eq!(
            find(&chart, "B").label.formatter,
            "7 (Invalid format: nope)"
        );
    }

    #[test]
    fn test_series_names_use_coltypes() {
        let data = Dataset::new(vec![
            record(&[("day", Scalar::Number(0.0)), ("sales", Scalar::from(1.0))]),
            record(&[("day", Scalar::Null), ("sales", Scalar::from(2.0))]),
        ])
        .with_coltype("day", ColType::Temporal);
        let chart = render(
            &ChartProps::new(SunburstConfig::new(&["day"], "sales"), 800.0, 600.0),
            &data,
        );
        let names: Vec<&str> = chart.data.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["1970-01-01", crate::NULL_STRING]);
        assert_eq!(chart.data[1].records, vec![Scalar::Null]);
    }

    #[test]
    fn test_colors_stable_across_renders() {
        let mut config = SunburstConfig::new(&["region"], "sales");
        config.slice_id = Some(7);
        let props = ChartProps::new(config, 800.0, 600.0);
        let mut colors = CategoricalColorNamespace::new();
        let writer = EChartsWriter::new();

        let first = writer.write(&props, &region_sales(), &mut colors).unwrap();
        let second = writer.write(&props, &region_sales(), &mut colors).unwrap();
        assert_eq!(first.data[0].item_style, second.data[0].item_style);
        // The metric label takes the first palette color
        assert_eq!(
            colors.scale(&props.config.color_scheme).assigned("sales", Some(7)),
            Some(crate::plot::scale::palettes::SUPERSET_COLORS[0])
        );
    }

    #[test]
    fn test_forced_label_color() {
        let mut config = SunburstConfig::new(&["region"], "sales");
        config
            .label_colors
            .insert("B".to_string(), "red".to_string());
        let chart = render(&ChartProps::new(config, 800.0, 600.0), &region_sales());
        assert_eq!(chart.data[1].item_style.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_context_menu_hides_tooltip() {
        let mut props = ChartProps::new(SunburstConfig::new(&["region"], "sales"), 800.0, 600.0);
        props.in_context_menu = true;
        let chart = render(&props, &region_sales());
        assert_eq!(chart.options["tooltip"]["show"], json!(false));
    }

    #[test]
    fn test_validate_rejects_bad_props() {
        let writer = EChartsWriter::new();
        let props = ChartProps::new(SunburstConfig::new(&[], "sales"), 800.0, 600.0);
        assert!(matches!(
            writer.validate(&props),
            Err(SunburstError::ValidationError(_))
        ));

        let props = ChartProps::new(SunburstConfig::new(&["region"], "sales"), -1.0, 600.0);
        assert!(writer.validate(&props).is_err());
    }

    #[test]
    fn test_cross_filter_from_render() {
        let props = ChartProps::new(
            SunburstConfig::new(&["region", "product"], "sales"),
            800.0,
            600.0,
        )
        .with_cross_filters(None);
        let chart = render(&props, &region_product());
        let x = find(&chart, "A,ProductX");

        let mask = chart.interaction.handle_click(&x.path).unwrap();
        assert_eq!(mask.extra_form_data.filters.len(), 2);
        assert_eq!(
            mask.filter_state.selected_values,
            Some(vec!["A,ProductX".to_string()])
        );
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["A", "B", "C"]),
                prop::sample::select(vec!["x", "y"]),
                0u32..100,
            ),
            0..20,
        )
        .prop_map(|rows| {
            Dataset::new(
                rows.into_iter()
                    .map(|(region, product, sales)| {
                        record(&[
                            ("region", region.into()),
                            ("product", product.into()),
                            ("sales", (sales as f64).into()),
                        ])
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn test_label_map_contains_every_segment(data in arb_dataset()) {
            let props = ChartProps::new(
                SunburstConfig::new(&["region", "product"], "sales"),
                800.0,
                600.0,
            );
            let chart = render(&props, &data);
            for node in chart.nodes() {
                let key = node.selection_key();
                prop_assert!(chart.interaction.label_map.contains_key(&key));
                if node.is_leaf() {
                    prop_assert_eq!(&chart.interaction.label_map[&key], &node.path);
                }
            }
            let leaves = chart.nodes().filter(|n| n.is_leaf()).count();
            let leaf_keys = chart.interaction.label_map.keys().filter(|k| k.contains(',')).count();
            prop_assert_eq!(leaves, leaf_keys);
        }

        #[test]
        fn test_dimming_matches_selection(
            data in arb_dataset(),
            selected in prop::collection::vec(
                prop::sample::select(vec!["A", "B,x", "C,y", "Z"]),
                0..3,
            ),
        ) {
            let filter_state = FilterState::selected(&selected);
            let props = ChartProps::new(
                SunburstConfig::new(&["region", "product"], "sales"),
                800.0,
                600.0,
            )
            .with_filter_state(filter_state);
            let chart = render(&props, &data);
            for node in chart.nodes() {
                let expected = !selected.is_empty() && !selected.contains(&node.selection_key().as_str());
                prop_assert_eq!(node.is_dimmed(), expected);
            }
        }
    }
}
