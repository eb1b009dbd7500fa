//! Date/time formatting for temporal group-by values

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::warn;

pub const SMART_DATE: &str = "smart_date";

#[derive(Debug, Clone, PartialEq)]
enum TimeFormat {
    /// Date only at midnight, otherwise date and time
    Smart,
    Pattern(String),
    /// Unusable pattern: smart rendering with a note
    Invalid(String),
}

/// Formats datetimes according to a format identifier: `smart_date` or a
/// d3/strftime pattern such as `%Y-%m-%d`. `%L` (milliseconds) is accepted.
/// A pattern chrono cannot render falls back to `smart_date` followed by
/// `(Invalid format: id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormatter {
    format: TimeFormat,
}

impl TimeFormatter {
    pub fn new(id: &str) -> Self {
        if id.is_empty() || id == SMART_DATE {
            return Self::smart();
        }

        let pattern = id.replace("%L", "%3f");
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            warn!(format = %id, "unsupported date format, using smart_date");
            return Self {
                format: TimeFormat::Invalid(id.to_string()),
            };
        }
        Self {
            format: TimeFormat::Pattern(pattern),
        }
    }

    pub fn smart() -> Self {
        Self {
            format: TimeFormat::Smart,
        }
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        match &self.format {
            TimeFormat::Pattern(pattern) => value.format(pattern).to_string(),
            TimeFormat::Smart => smart_date(value),
            TimeFormat::Invalid(id) => format!("{} (Invalid format: {})", smart_date(value), id),
        }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::smart()
    }
}

/// Date only at midnight, milliseconds only when present
fn smart_date(value: &NaiveDateTime) -> String {
    let pattern = if value.time() == NaiveTime::MIN {
        "%Y-%m-%d"
    } else if value.nanosecond() == 0 {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d %H:%M:%S%.3f"
    };
    value.format(pattern).to_string()
}

/// Parse the textual timestamp forms query results commonly carry
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.fZ"];

    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
