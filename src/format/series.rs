//! Display names for group-by values

use super::number::NumberFormatter;
use super::time::{parse_timestamp, TimeFormatter};
use crate::reader::{ColType, Scalar};
use crate::NULL_STRING;

/// Render a group-by value for display.
///
/// Datetimes, and any value of a temporal column, go through the time
/// formatter (numbers in temporal columns are epoch milliseconds; text that
/// does not parse as a timestamp is shown unchanged). Other numbers go
/// through the number formatter.
pub fn format_series_name(
    name: &Scalar,
    number_formatter: &NumberFormatter,
    time_formatter: &TimeFormatter,
    coltype: Option<ColType>,
) -> String {
    match (name, coltype) {
        (Scalar::Null, _) => NULL_STRING.to_string(),
        (Scalar::Boolean(b), _) => b.to_string(),
        (Scalar::Datetime(dt), _) => time_formatter.format(dt),
        (Scalar::Number(ms), Some(ColType::Temporal)) => match Scalar::from_timestamp_millis(*ms as i64) {
            Scalar::Datetime(dt) => time_formatter.format(&dt),
            _ => number_formatter.format(*ms),
        },
        (Scalar::String(text), Some(ColType::Temporal)) => parse_timestamp(text)
            .map(|dt| time_formatter.format(&dt))
            .unwrap_or_else(|| text.clone()),
        (Scalar::Number(n), _) => number_formatter.format(*n),
        (Scalar::String(text), _) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &Scalar, coltype: Option<ColType>) -> String {
        format_series_name(
            value,
            &NumberFormatter::smart(),
            &TimeFormatter::smart(),
            coltype,
        )
    }

    #[test]
    fn test_null_and_boolean() {
        assert_eq!(name(&Scalar::Null, None), NULL_STRING);
        assert_eq!(name(&Scalar::Boolean(true), None), "true");
    }

    #[test]
    fn test_number_uses_number_formatter() {
        assert_eq!(name(&Scalar::Number(1234.0), Some(ColType::Numeric)), "1.23k");
        assert_eq!(name(&Scalar::Number(3.0), None), "3");
    }

    #[test]
    fn test_strings_pass_through() {
        assert_eq!(name(&Scalar::from("East"), Some(ColType::String)), "East");
    }

    #[test]
    fn test_temporal_values() {
        assert_eq!(
            name(&Scalar::Number(86_400_000.0), Some(ColType::Temporal)),
            "1970-01-02"
        );
        assert_eq!(
            name(&Scalar::from("2024-05-06T00:00:00"), Some(ColType::Temporal)),
            "2024-05-06"
        );
        assert_eq!(
            name(&Scalar::from("not a date"), Some(ColType::Temporal)),
            "not a date"
        );
        assert_eq!(
            name(&Scalar::from_timestamp_millis(0), None),
            "1970-01-01"
        );
    }
}
