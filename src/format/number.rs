//! Number formatting
//!
//! Supports the named formats (`SMART_NUMBER`, `SMART_NUMBER_SIGNED` and the
//! `DURATION` family) and a subset of d3-format specifiers:
//! `[sign][$][,][.precision][~][type]`, where sign is one of `-`, `+`, `(`
//! or a space and type is one of `d`, `f`, `%`, `s`, `e`, `g`, `r`, `p` (or
//! none for the shortest representation).
//!
//! Construction never fails. An identifier outside this grammar yields a
//! formatter that prints the raw value followed by `(Invalid format: id)`.
//!
//! Non-finite input is not an error either: it renders as `NaN`, `Infinity`
//! or `-Infinity`, decorated like any other value (`NaN%` for percent formats).

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::FormatValue;

pub const SMART_NUMBER: &str = "SMART_NUMBER";
pub const SMART_NUMBER_SIGNED: &str = "SMART_NUMBER_SIGNED";
/// Milliseconds as `1d 2h 3m 4.5s`
pub const DURATION: &str = "DURATION";
/// Like `DURATION`, down to `ms`, `µs` and `ns`
pub const DURATION_SUB: &str = "DURATION_SUB";
/// Milliseconds in colon notation (`1:02:03.5`)
pub const DURATION_COL: &str = "DURATION_COL";
pub const PERCENT_2_POINT: &str = ".2%";

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+( ])?(\$)?(,)?(?:\.(\d+))?(~)?([dfse%grp])?$")
        .expect("number specifier pattern is valid")
});

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Shortest,
    Integer,
    Fixed,
    Percent,
    Si,
    Exponent,
    Significant,
    Rounded,
    RoundedPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    /// Minus for negatives only
    Minus,
    Plus,
    /// Negatives in parentheses
    Parens,
    Space,
}

#[derive(Debug, Clone, PartialEq)]
struct Specifier {
    sign: Sign,
    currency: bool,
    grouping: bool,
    precision: Option<usize>,
    trim: bool,
    kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DurationStyle {
    Units,
    SubMilliseconds,
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
enum Format {
    Smart { signed: bool },
    Duration(DurationStyle),
    Spec(Specifier),
    Invalid,
}

/// Formats numbers according to a format identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatter {
    id: String,
    format: Format,
}

impl NumberFormatter {
    pub fn new(id: &str) -> Self {
        let format = match id {
            "" | SMART_NUMBER => Format::Smart { signed: false },
            SMART_NUMBER_SIGNED => Format::Smart { signed: true },
            DURATION => Format::Duration(DurationStyle::Units),
            DURATION_SUB => Format::Duration(DurationStyle::SubMilliseconds),
            DURATION_COL => Format::Duration(DurationStyle::Colon),
            _ => match parse_specifier(id) {
                Some(spec) => Format::Spec(spec),
                None => {
                    warn!(format = %id, "unsupported number format, values are shown unformatted");
                    Format::Invalid
                }
            },
        };
        Self {
            id: id.to_string(),
            format,
        }
    }

    pub fn smart() -> Self {
        Self {
            id: SMART_NUMBER.to_string(),
            format: Format::Smart { signed: false },
        }
    }

    /// Percentage with two decimals (`.2%`)
    pub fn percent() -> Self {
        Self {
            id: PERCENT_2_POINT.to_string(),
            format: Format::Spec(Specifier {
                sign: Sign::Minus,
                currency: false,
                grouping: false,
                precision: Some(2),
                trim: false,
                kind: Kind::Percent,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the identifier was understood
    pub fn is_valid(&self) -> bool {
        self.format != Format::Invalid
    }

    pub fn format(&self, value: f64) -> String {
        match &self.format {
            Format::Smart { signed } => {
                let sign = if *signed && value > 0.0 { "+" } else { "" };
                format!("{}{}", sign, smart_number(value))
            }
            Format::Duration(style) => format_duration(value, *style),
            Format::Spec(spec) => format_with(spec, value),
            Format::Invalid => format!("{} (Invalid format: {})", plain_number(value), self.id),
        }
    }
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self::smart()
    }
}

impl FormatValue for NumberFormatter {
    fn format_value(&self, value: f64) -> String {
        self.format(value)
    }
}

fn parse_specifier(id: &str) -> Option<Specifier> {
    let caps = SPECIFIER.captures(id)?;

    let precision = match caps.get(4) {
        Some(m) => Some(m.as_str().parse::<usize>().ok()?),
        None => None,
    };
    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("+") => Sign::Plus,
        Some("(") => Sign::Parens,
        Some(" ") => Sign::Space,
        _ => Sign::Minus,
    };
    let kind = match caps.get(6).map(|m| m.as_str()) {
        Some("d") => Kind::Integer,
        Some("f") => Kind::Fixed,
        Some("%") => Kind::Percent,
        Some("s") => Kind::Si,
        Some("e") => Kind::Exponent,
        Some("g") => Kind::Significant,
        Some("r") => Kind::Rounded,
        Some("p") => Kind::RoundedPercent,
        _ => Kind::Shortest,
    };

    Some(Specifier {
        sign,
        currency: caps.get(2).is_some(),
        grouping: caps.get(3).is_some(),
        precision: precision.map(|p| p.min(20)),
        trim: caps.get(5).is_some(),
        kind,
    })
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else {
        "Infinity"
    }
}

/// The value as a script engine would print it
fn plain_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        format!("{}Infinity", if value < 0.0 { "-" } else { "" })
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

fn format_with(spec: &Specifier, value: f64) -> String {
    let suffix = match spec.kind {
        Kind::Percent | Kind::RoundedPercent => "%",
        _ => "",
    };
    let currency = if spec.currency { "$" } else { "" };

    let (digits, unit) = if value.is_finite() {
        let magnitude = value.abs();
        let (mut digits, unit) = match spec.kind {
            Kind::Shortest => (format!("{}", magnitude), ""),
            Kind::Integer => (format!("{:.0}", magnitude.round()), ""),
            Kind::Fixed => (format!("{:.*}", spec.precision.unwrap_or(6), magnitude), ""),
            Kind::Percent => (format!("{:.*}", spec.precision.unwrap_or(6), magnitude * 100.0), ""),
            Kind::Si => si_parts(magnitude, spec.precision.unwrap_or(6)),
            Kind::Exponent => (exponent(magnitude, spec.precision.unwrap_or(6)), ""),
            Kind::Significant => {
                let rounded = round_significant(magnitude, spec.precision.unwrap_or(6).max(1));
                (format!("{}", rounded), "")
            }
            Kind::Rounded => (rounded_fixed(magnitude, spec.precision.unwrap_or(6)), ""),
            Kind::RoundedPercent => (rounded_fixed(magnitude * 100.0, spec.precision.unwrap_or(6)), ""),
        };
        if spec.trim {
            digits = trim_mantissa(&digits);
        }
        if spec.grouping {
            digits = group_thousands(&digits);
        }
        (digits, unit)
    } else {
        (non_finite(value).to_string(), "")
    };

    // Negative zero after rounding loses its sign, except under `+`
    let negative = !value.is_nan()
        && value.is_sign_negative()
        && (spec.sign == Sign::Plus
            || value.is_infinite()
            || digits.chars().any(|c| matches!(c, '1'..='9')));

    let (open, close) = match (negative, spec.sign) {
        (true, Sign::Parens) => ("(", ")"),
        (true, _) => ("-", ""),
        (false, Sign::Plus) => ("+", ""),
        (false, Sign::Space) => (" ", ""),
        (false, _) => ("", ""),
    };
    format!("{}{}{}{}{}{}", open, currency, digits, unit, suffix, close)
}

/// Superset's adaptive default: SI prefixes for large and very small
/// magnitudes, up to four decimals in between.
fn smart_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return plain_number(value);
    }

    let magnitude = value.abs();
    let si = |magnitude: f64| {
        let (digits, unit) = si_parts(magnitude, 3);
        format!("{}{}", trim_mantissa(&digits), unit)
    };
    let body = if magnitude >= 1000.0 {
        si(magnitude).replace('G', "B")
    } else if magnitude >= 1.0 {
        trim_mantissa(&format!("{:.2}", magnitude))
    } else if magnitude >= 0.001 {
        trim_mantissa(&format!("{:.4}", magnitude))
    } else if magnitude > 0.000001 {
        format!("{}µ", si(magnitude * 1_000_000.0))
    } else {
        si(magnitude)
    };

    if value < 0.0 && body != "0" {
        format!("-{}", body)
    } else {
        body
    }
}

/// Milliseconds as a human readable duration
fn format_duration(value: f64, style: DurationStyle) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let ms = value.abs();
    let colon = style == DurationStyle::Colon;

    let part = |divisor: f64, modulus: f64| (ms / divisor).floor() % modulus;
    let days = (ms / 86_400_000.0).floor();
    let micros = (ms * 1000.0).floor() % 1000.0;
    let nanos = (ms * 1e6).floor() % 1000.0;

    let mut parts: Vec<String> = Vec::new();
    let mut add = |amount: f64, text: String, unit: &str| {
        if (parts.is_empty() || !colon) && amount == 0.0 && !(colon && unit == "m") {
            return;
        }
        if colon {
            let whole_digits = text.split('.').next().map_or(0, str::len);
            let min_len: usize = if parts.is_empty() { 1 } else { 2 };
            parts.push(format!("{}{}", "0".repeat(min_len.saturating_sub(whole_digits)), text));
        } else {
            parts.push(format!("{}{}", text, unit));
        }
    };
    let mut add_whole = |amount: f64, unit: &str| add(amount, format!("{}", amount), unit);

    add_whole((days / 365.0).trunc(), "y");
    add_whole(days % 365.0, "d");
    add_whole(part(3_600_000.0, 24.0), "h");
    add_whole(part(60_000.0, 60.0), "m");

    if style == DurationStyle::SubMilliseconds {
        add_whole(part(1000.0, 60.0), "s");
        add_whole(part(1.0, 1000.0), "ms");
        add_whole(micros, "µs");
        add_whole(nanos, "ns");
    } else if !colon && ms < 1000.0 {
        add_whole(part(1000.0, 60.0), "s");
        let below = part(1.0, 1000.0) + micros / 1000.0 + nanos / 1e6;
        let rounded = if below >= 1.0 { below.round() } else { below.ceil() };
        add_whole(rounded, "ms");
    } else {
        let seconds = ms / 1000.0 % 60.0;
        let floored = ((seconds * 10.0) + 1e-7).floor() / 10.0;
        let text = format!("{:.1}", floored);
        let text = text.strip_suffix(".0").unwrap_or(&text).to_string();
        add(floored, text, "s");
    }

    if parts.is_empty() {
        return "0ms".to_string();
    }
    format!("{}{}", sign, parts.join(if colon { ":" } else { " " }))
}

/// Round to `digits` significant digits
fn round_significant(value: f64, digits: usize) -> f64 {
    let text = format!("{:.*e}", digits.saturating_sub(1), value);
    text.parse().unwrap_or(value)
}

/// Decimal exponent of a finite, non-zero value
fn decimal_exponent(value: f64) -> i32 {
    let text = format!("{:e}", value);
    text.rsplit('e')
        .next()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0)
}

/// Fixed notation with exactly `precision` significant digits (d3 `r`)
fn rounded_fixed(magnitude: f64, precision: usize) -> String {
    let precision = precision.clamp(1, 21);
    let rounded = round_significant(magnitude, precision);
    let exponent = if rounded == 0.0 { 0 } else { decimal_exponent(rounded) };
    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, rounded)
}

/// Mantissa and SI prefix of a non-negative value with `precision` significant digits
fn si_parts(magnitude: f64, precision: usize) -> (String, &'static str) {
    let precision = precision.clamp(1, 21);
    if magnitude == 0.0 {
        return (format!("{:.*}", precision - 1, 0.0), "");
    }
    let rounded = round_significant(magnitude, precision);
    let exponent = decimal_exponent(rounded);
    let group = exponent.div_euclid(3).clamp(-8, 8);
    let scaled = rounded / 10f64.powi(group * 3);
    let decimals = (precision as i32 - 1 - (exponent - group * 3)).max(0) as usize;
    (
        format!("{:.*}", decimals, scaled),
        SI_PREFIXES[(group + 8) as usize],
    )
}

/// d3-style exponent notation (`1.23e+4`)
fn exponent(magnitude: f64, precision: usize) -> String {
    let text = format!("{:.*e}", precision, magnitude);
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => text,
    }
}

/// Drop insignificant trailing zeros of the fractional part
fn trim_mantissa(digits: &str) -> String {
    let (mantissa, rest) = match digits.find('e') {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };
    if !mantissa.contains('.') {
        return digits.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, rest)
}

fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = match digits.find(|c: char| !c.is_ascii_digit()) {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(fraction);
    grouped
}
