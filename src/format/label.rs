//! Segment label text

use super::FormatValue;
use crate::config::LabelType;

/// Label text of a segment named `name` holding `value`
pub fn format_label<F: FormatValue + ?Sized>(
    name: &str,
    value: f64,
    label_type: LabelType,
    formatter: &F,
) -> String {
    match label_type {
        LabelType::Key => name.to_string(),
        LabelType::Value => formatter.format_value(value),
        LabelType::KeyValue => format!("{}: {}", name, formatter.format_value(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NumberFormatter;
    use proptest::prelude::*;

    #[test]
    fn test_label_types() {
        let formatter = NumberFormatter::smart();
        assert_eq!(format_label("A", 1500.0, LabelType::Key, &formatter), "A");
        assert_eq!(format_label("A", 1500.0, LabelType::Value, &formatter), "1.5k");
        assert_eq!(
            format_label("A", 1500.0, LabelType::KeyValue, &formatter),
            "A: 1.5k"
        );
    }

    #[test]
    fn test_closure_formatter() {
        let formatter = |v: f64| format!("<{}>", v);
        assert_eq!(format_label("B", 2.0, LabelType::KeyValue, &formatter), "B: <2>");
    }

    #[test]
    fn test_non_finite_value_is_formatter_output() {
        let formatter = NumberFormatter::smart();
        assert_eq!(format_label("C", f64::NAN, LabelType::Value, &formatter), "NaN");
    }

    proptest! {
        #[test]
        fn test_format_label_is_deterministic(
            name in "[a-zA-Z ]{0,12}",
            value in -1e9f64..1e9,
            kind in 0usize..3,
        ) {
            let label_type = [LabelType::Key, LabelType::Value, LabelType::KeyValue][kind];
            let formatter = NumberFormatter::smart();
            let first = format_label(&name, value, label_type, &formatter);
            let second = format_label(&name, value, label_type, &formatter);
            prop_assert_eq!(&first, &second);
            if label_type == LabelType::Key {
                prop_assert_eq!(first, name);
            }
        }
    }
}
