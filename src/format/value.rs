//! Metric-aware value formatting (numbers with optional currency)

use super::number::NumberFormatter;
use super::FormatValue;
use crate::config::{Currency, Datasource, SymbolPosition};

/// Formatter for the values of one metric
#[derive(Debug, Clone, PartialEq)]
pub enum ValueFormatter {
    Number(NumberFormatter),
    Currency {
        number: NumberFormatter,
        symbol: String,
        position: SymbolPosition,
    },
}

impl ValueFormatter {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormatter::Number(number) => number.format(value),
            ValueFormatter::Currency {
                number,
                symbol,
                position,
            } => {
                let formatted = number.format(value);
                match position {
                    SymbolPosition::Prefix => format!("{} {}", symbol, formatted),
                    SymbolPosition::Suffix => format!("{} {}", formatted, symbol),
                }
            }
        }
    }
}

impl FormatValue for ValueFormatter {
    fn format_value(&self, value: f64) -> String {
        self.format(value)
    }
}

impl From<NumberFormatter> for ValueFormatter {
    fn from(number: NumberFormatter) -> Self {
        ValueFormatter::Number(number)
    }
}

/// Build the formatter for `metric_label`.
///
/// The number format is the datasource's column format for the metric, else
/// `number_format`. A currency is applied when the chart sets one with a
/// symbol, else when the datasource declares one for the metric.
pub fn get_value_formatter(
    metric_label: &str,
    datasource: &Datasource,
    number_format: &str,
    currency_format: Option<&Currency>,
) -> ValueFormatter {
    let format_id = datasource
        .column_formats
        .get(metric_label)
        .map(String::as_str)
        .unwrap_or(number_format);
    let number = NumberFormatter::new(format_id);

    let currency = currency_format
        .filter(|c| !c.symbol.is_empty())
        .or_else(|| datasource.currency_formats.get(metric_label))
        .filter(|c| !c.symbol.is_empty());

    match currency {
        Some(currency) => ValueFormatter::Currency {
            number,
            symbol: currency_symbol(&currency.symbol).to_string(),
            position: currency.symbol_position,
        },
        None => ValueFormatter::Number(number),
    }
}

/// Display symbol for an ISO 4217 code; unknown codes are shown as-is
pub fn currency_symbol(code: &str) -> &str {
    match code.to_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "BRL" => "R$",
        _ => code,
    }
}
