//! Value formatting
//!
//! Formatters turn measures and group-by values into display strings:
//!
//! - `number` - d3-style number formats and `SMART_NUMBER`
//! - `time` - date/time formats and `smart_date`
//! - `value` - metric-aware formatting with currencies
//! - `series` - display names for group-by values
//! - `label` - segment label text

pub mod label;
pub mod number;
pub mod series;
pub mod time;
pub mod value;

pub use label::format_label;
pub use number::{NumberFormatter, PERCENT_2_POINT, SMART_NUMBER};
pub use series::format_series_name;
pub use time::{parse_timestamp, TimeFormatter, SMART_DATE};
pub use value::{currency_symbol, get_value_formatter, ValueFormatter};

/// Anything that renders a number as text
pub trait FormatValue {
    fn format_value(&self, value: f64) -> String;
}

impl<F> FormatValue for F
where
    F: Fn(f64) -> String,
{
    fn format_value(&self, value: f64) -> String {
        self(value)
    }
}
