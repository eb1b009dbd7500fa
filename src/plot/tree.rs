//! Hierarchical aggregation of flat records
//!
//! [`tree_builder`] groups records along an ordered list of columns and sums
//! the measures at every level; [`linear_domain`] scans the resulting tree for
//! the extent of a per-node quantity.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::reader::{Record, Scalar};

/// A node of the aggregation hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Group-by value at this level (`Scalar::Null` for missing values)
    pub name: Scalar,
    /// Column the name was taken from
    pub group_by: String,
    /// Sum of the primary measure over all records below this node
    pub value: f64,
    /// Sum of the secondary measure (0 when none is configured)
    pub secondary_value: f64,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// secondary / primary; NaN or infinite when `value` is 0
    pub fn ratio(&self) -> f64 {
        self.secondary_value / self.value
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Build the hierarchy for `records`.
///
/// Returns the top level nodes in order of first appearance. Each further
/// entry of `group_by` adds one level; records sharing the same values for a
/// prefix of `group_by` share the node at that depth. Measures that are
/// missing or non-numeric count as 0.
pub fn tree_builder(
    records: &[Record],
    group_by: &[String],
    metric: &str,
    secondary_metric: Option<&str>,
) -> Vec<TreeNode> {
    let rows: Vec<&Record> = records.iter().collect();
    build_level(&rows, group_by, metric, secondary_metric)
}

fn build_level(
    rows: &[&Record],
    group_by: &[String],
    metric: &str,
    secondary_metric: Option<&str>,
) -> Vec<TreeNode> {
    let Some((column, rest)) = group_by.split_first() else {
        return Vec::new();
    };

    group_rows(rows, column)
        .into_iter()
        .map(|(name, members)| {
            if rest.is_empty() {
                TreeNode {
                    name,
                    group_by: column.clone(),
                    value: members.iter().map(|r| measure(r, Some(metric))).sum(),
                    secondary_value: members.iter().map(|r| measure(r, secondary_metric)).sum(),
                    children: Vec::new(),
                }
            } else {
                let children = build_level(&members, rest, metric, secondary_metric);
                TreeNode {
                    name,
                    group_by: column.clone(),
                    value: children.iter().map(|c| c.value).sum(),
                    secondary_value: children.iter().map(|c| c.secondary_value).sum(),
                    children,
                }
            }
        })
        .collect()
}

/// Partition rows by their value in `column`, keeping first-appearance order
fn group_rows<'a>(rows: &[&'a Record], column: &str) -> Vec<(Scalar, Vec<&'a Record>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Scalar, Vec<&'a Record>)> = Vec::new();

    for &row in rows {
        let value = row.get(column).cloned().unwrap_or(Scalar::Null);
        match index.entry(value.key()) {
            Entry::Occupied(slot) => groups[*slot.get()].1.push(row),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push((value, vec![row]));
            }
        }
    }

    groups
}

fn measure(record: &Record, column: Option<&str>) -> f64 {
    column
        .and_then(|c| record.get(c))
        .and_then(Scalar::as_f64)
        .unwrap_or(0.0)
}

/// Extent of `f` over every node of the tree, children before parents.
///
/// `None` results are skipped, as are NaN results since they never compare.
/// Both bounds start at 0, so the result always contains 0 and an empty
/// tree yields `(0.0, 0.0)`.
pub fn linear_domain<F>(nodes: &[TreeNode], f: F) -> (f64, f64)
where
    F: Fn(&TreeNode) -> Option<f64>,
{
    fn traverse<F>(nodes: &[TreeNode], f: &F, bounds: &mut (f64, f64))
    where
        F: Fn(&TreeNode) -> Option<f64>,
    {
        for node in nodes {
            if !node.children.is_empty() {
                traverse(&node.children, f, bounds);
            }
            if let Some(v) = f(node) {
                if bounds.0 > v {
                    bounds.0 = v;
                }
                if bounds.1 < v {
                    bounds.1 = v;
                }
            }
        }
    }

    let mut bounds = (0.0, 0.0);
    traverse(nodes, &f, &mut bounds);
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(pairs: &[(&str, Scalar)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_single_level_merges_groups() {
        let records = vec![
            record(&[("region", "A".into()), ("sales", Scalar::from(10.0))]),
            record(&[("region", "A".into()), ("sales", Scalar::from(5.0))]),
            record(&[("region", "B".into()), ("sales", Scalar::from(7.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["region"]), "sales", None);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, Scalar::from("A"));
        assert_eq!(tree[0].value, 15.0);
        assert_eq!(tree[1].name, Scalar::from("B"));
        assert_eq!(tree[1].value, 7.0);
        assert!(tree.iter().all(TreeNode::is_leaf));
        assert_eq!(tree.iter().map(|n| n.value).sum::<f64>(), 22.0);
    }

    #[test]
    fn test_signed_zero_groups_merge() {
        let records = vec![
            record(&[("k", Scalar::Number(0.0)), ("sales", Scalar::from(1.0))]),
            record(&[("k", Scalar::Number(-0.0)), ("sales", Scalar::from(2.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["k"]), "sales", None);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].value, 3.0);
    }

    #[test]
    fn test_two_levels() {
        let records = vec![
            record(&[("region", "A".into()), ("product", "X".into()), ("sales", Scalar::from(1.0))]),
            record(&[("region", "A".into()), ("product", "Y".into()), ("sales", Scalar::from(2.0))]),
            record(&[("region", "A".into()), ("product", "X".into()), ("sales", Scalar::from(3.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["region", "product"]), "sales", None);

        assert_eq!(tree.len(), 1);
        let region = &tree[0];
        assert_eq!(region.group_by, "region");
        assert_eq!(region.value, 6.0);
        assert_eq!(region.children.len(), 2);
        assert_eq!(region.children[0].name, Scalar::from("X"));
        assert_eq!(region.children[0].value, 4.0);
        assert_eq!(region.children[0].group_by, "product");
        assert_eq!(region.children[1].value, 2.0);
    }

    #[test]
    fn test_sibling_order_is_first_appearance() {
        let records = vec![
            record(&[("k", "z".into()), ("m", Scalar::from(1.0))]),
            record(&[("k", "a".into()), ("m", Scalar::from(1.0))]),
            record(&[("k", "m".into()), ("m", Scalar::from(1.0))]),
            record(&[("k", "a".into()), ("m", Scalar::from(1.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["k"]), "m", None);
        let names: Vec<_> = tree.iter().map(|n| n.name.clone()).collect();
        assert_eq!(
            names,
            vec![Scalar::from("z"), Scalar::from("a"), Scalar::from("m")]
        );
    }

    #[test]
    fn test_null_and_missing_values_share_a_group() {
        let records = vec![
            record(&[("region", Scalar::Null), ("sales", Scalar::from(1.0))]),
            record(&[("sales", Scalar::from(2.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["region"]), "sales", None);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].name.is_null());
        assert_eq!(tree[0].value, 3.0);
    }

    #[test]
    fn test_secondary_metric_defaults_to_zero() {
        let records = vec![record(&[("region", "A".into()), ("sales", Scalar::from(4.0))])];
        let tree = tree_builder(&records, &columns(&["region"]), "sales", None);
        assert_eq!(tree[0].secondary_value, 0.0);

        let records = vec![record(&[
            ("region", "A".into()),
            ("sales", Scalar::from(4.0)),
            ("cost", Scalar::from(1.0)),
        ])];
        let tree = tree_builder(&records, &columns(&["region"]), "sales", Some("cost"));
        assert_eq!(tree[0].secondary_value, 1.0);
        assert_eq!(tree[0].ratio(), 0.25);
    }

    #[test]
    fn test_non_numeric_measure_counts_as_zero() {
        let records = vec![
            record(&[("region", "A".into()), ("sales", "n/a".into())]),
            record(&[("region", "A".into()), ("sales", Scalar::from(2.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["region"]), "sales", None);
        assert_eq!(tree[0].value, 2.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(tree_builder(&[], &columns(&["region"]), "sales", None).is_empty());
        let records = vec![record(&[("region", "A".into())])];
        assert!(tree_builder(&records, &[], "sales", None).is_empty());
    }

    #[test]
    fn test_linear_domain_empty_tree() {
        assert_eq!(linear_domain(&[], |n| Some(n.value)), (0.0, 0.0));
    }

    #[test]
    fn test_linear_domain_includes_zero_and_skips_none() {
        let records = vec![
            record(&[("r", "A".into()), ("p", "X".into()), ("s", Scalar::from(2.0))]),
            record(&[("r", "A".into()), ("p", "Y".into()), ("s", Scalar::from(8.0))]),
            record(&[("r", "B".into()), ("p", "X".into()), ("s", Scalar::from(3.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["r", "p"]), "s", None);

        // Parent sums (10) take part in the scan
        assert_eq!(linear_domain(&tree, |n| Some(n.value)), (0.0, 10.0));
        assert_eq!(linear_domain(&tree, |n| Some(-n.value)), (-10.0, 0.0));
        assert_eq!(linear_domain(&tree, |_| None), (0.0, 0.0));
    }

    #[test]
    fn test_linear_domain_visits_children_first() {
        use std::cell::RefCell;

        let records = vec![
            record(&[("r", "A".into()), ("p", "X".into()), ("s", Scalar::from(1.0))]),
            record(&[("r", "A".into()), ("p", "Y".into()), ("s", Scalar::from(1.0))]),
        ];
        let tree = tree_builder(&records, &columns(&["r", "p"]), "s", None);
        let visited = RefCell::new(Vec::new());
        linear_domain(&tree, |n| {
            visited.borrow_mut().push(n.name.clone());
            None
        });
        assert_eq!(
            visited.into_inner(),
            vec![Scalar::from("X"), Scalar::from("Y"), Scalar::from("A")]
        );
    }

    fn check_additive(node: &TreeNode) -> bool {
        if node.is_leaf() {
            return true;
        }
        let sum: f64 = node.children.iter().map(|c| c.value).sum();
        sum == node.value && node.children.iter().all(check_additive)
    }

    fn depth(node: &TreeNode) -> usize {
        1 + node.children.iter().map(depth).max().unwrap_or(0)
    }

    fn all_nodes(nodes: &[TreeNode]) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        for node in nodes {
            out.push(node);
            out.extend(all_nodes(&node.children));
        }
        out
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(
            (
                prop::option::of(prop::sample::select(vec!["A", "B", "C"])),
                prop::sample::select(vec!["X", "Y"]),
                0i32..1000,
                -50i32..50,
            ),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(region, product, sales, cost)| {
                    record(&[
                        ("region", region.map(Scalar::from).unwrap_or(Scalar::Null)),
                        ("product", product.into()),
                        ("sales", (sales as f64).into()),
                        ("cost", (cost as f64).into()),
                    ])
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_values_are_additive(records in arb_records()) {
            let tree = tree_builder(&records, &columns(&["region", "product"]), "sales", Some("cost"));
            prop_assert!(tree.iter().all(check_additive));

            // Integer-valued measures sum exactly
            let total: f64 = records.iter().map(|r| r["sales"].as_f64().unwrap()).sum();
            prop_assert_eq!(tree.iter().map(|n| n.value).sum::<f64>(), total);

            for node in &tree {
                prop_assert_eq!(depth(node), 2);
            }
        }

        #[test]
        fn prop_domain_bounds_every_node(records in arb_records()) {
            let tree = tree_builder(&records, &columns(&["region", "product"]), "sales", Some("cost"));
            let f = |n: &TreeNode| Some(n.ratio()).filter(|r| r.is_finite());
            let (min, max) = linear_domain(&tree, f);
            prop_assert!(min <= 0.0 && max >= 0.0);
            for node in all_nodes(&tree) {
                if let Some(v) = f(node) {
                    prop_assert!(min <= v && v <= max);
                }
            }
        }
    }
}
