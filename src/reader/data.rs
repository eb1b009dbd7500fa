//! Tabular input types
//!
//! A [`Dataset`] is one query result: an ordered sequence of [`Record`]s plus
//! the declared type of every column. Datasets are built from polars
//! DataFrames or from the JSON payload a query endpoint returns.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{AnyValue, DataFrame, DataType, TimeUnit};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{Result, SunburstError};

/// One input row: column name to scalar value
pub type Record = HashMap<String, Scalar>;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Datetime(NaiveDateTime),
}

impl Scalar {
    /// Numeric view of the value. Only numbers are measures; everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Grouping identity of the value.
    ///
    /// The variant is part of the key so that the string `"1"` and the number
    /// `1` land in different groups. `-0.0` and `0.0` share a key.
    pub fn key(&self) -> String {
        match self {
            Scalar::Null => "null:".to_string(),
            Scalar::Boolean(b) => format!("b:{}", b),
            Scalar::Number(n) if *n == 0.0 => "n:0".to_string(),
            Scalar::Number(n) => format!("n:{}", n),
            Scalar::String(s) => format!("s:{}", s),
            Scalar::Datetime(dt) => format!("t:{}", dt),
        }
    }

    /// Epoch milliseconds to a datetime, `Null` when out of range.
    pub fn from_timestamp_millis(ms: i64) -> Self {
        DateTime::from_timestamp_millis(ms)
            .map(|dt| Scalar::Datetime(dt.naive_utc()))
            .unwrap_or(Scalar::Null)
    }

    /// Convert a polars cell
    pub fn from_any_value(value: &AnyValue) -> Self {
        match value {
            AnyValue::Null => Scalar::Null,
            AnyValue::Boolean(b) => Scalar::Boolean(*b),
            AnyValue::String(s) => Scalar::String(s.to_string()),
            AnyValue::StringOwned(s) => Scalar::String(s.to_string()),
            AnyValue::Date(days) => Scalar::from_timestamp_millis(*days as i64 * MS_PER_DAY),
            AnyValue::Datetime(v, unit, _) => Scalar::from_timestamp_millis(to_millis(*v, *unit)),
            AnyValue::DatetimeOwned(v, unit, _) => {
                Scalar::from_timestamp_millis(to_millis(*v, *unit))
            }
            other => other
                .extract::<f64>()
                .map(Scalar::Number)
                .unwrap_or_else(|| Scalar::String(other.to_string())),
        }
    }
}

const MS_PER_DAY: i64 = 86_400_000;

fn to_millis(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value / 1_000_000,
        TimeUnit::Microseconds => value / 1_000,
        TimeUnit::Milliseconds => value,
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Boolean(*b),
            Value::Number(n) => n.as_f64().map(Scalar::Number).unwrap_or(Scalar::Null),
            Value::String(s) => Scalar::String(s.clone()),
            // Nested values are not groupable; keep their JSON text
            other => Scalar::String(other.to_string()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Boolean(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Datetime(dt) => serializer.serialize_i64(dt.and_utc().timestamp_millis()),
        }
    }
}

/// Declared type of a column, using the wire codes of query payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColType {
    Numeric,
    String,
    Temporal,
    Boolean,
}

impl ColType {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(ColType::Numeric),
            1 => Some(ColType::String),
            2 => Some(ColType::Temporal),
            3 => Some(ColType::Boolean),
            _ => None,
        }
    }

    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Boolean => ColType::Boolean,
            DataType::Date | DataType::Datetime(_, _) => ColType::Temporal,
            dt if dt.is_numeric() => ColType::Numeric,
            _ => ColType::String,
        }
    }
}

/// A tabular query result
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub coltypes: HashMap<String, ColType>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            coltypes: HashMap::new(),
        }
    }

    pub fn with_coltype(mut self, column: &str, coltype: ColType) -> Self {
        self.coltypes.insert(column.to_string(), coltype);
        self
    }

    pub fn coltype(&self, column: &str) -> Option<ColType> {
        self.coltypes.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a dataset from a polars DataFrame, taking column types from the dtypes
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = df.get_columns();
        let coltypes = columns
            .iter()
            .map(|c| (c.name().to_string(), ColType::from_dtype(c.dtype())))
            .collect();

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let mut record = Record::with_capacity(columns.len());
            for column in columns {
                let value = column.get(row)?;
                record.insert(column.name().to_string(), Scalar::from_any_value(&value));
            }
            records.push(record);
        }

        Ok(Self { records, coltypes })
    }

    /// Build a dataset from a query payload of the form
    /// `{"data": [{...}], "colnames": [...], "coltypes": [...]}`.
    ///
    /// `colnames`/`coltypes` are optional. Numbers in temporal columns are
    /// read as epoch milliseconds.
    pub fn from_query_payload(payload: &Value) -> Result<Self> {
        let rows = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SunburstError::ReaderError("Query payload has no 'data' array".to_string())
            })?;

        let mut coltypes = HashMap::new();
        if let (Some(names), Some(types)) = (
            payload.get("colnames").and_then(Value::as_array),
            payload.get("coltypes").and_then(Value::as_array),
        ) {
            for (name, code) in names.iter().zip(types) {
                if let (Some(name), Some(coltype)) =
                    (name.as_str(), code.as_u64().and_then(ColType::from_code))
                {
                    coltypes.insert(name.to_string(), coltype);
                }
            }
        }

        let mut records = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| {
                SunburstError::ReaderError(format!("Row {} is not a JSON object", idx))
            })?;
            let record = object
                .iter()
                .map(|(column, value)| {
                    let scalar = match (coltypes.get(column), value) {
                        (Some(ColType::Temporal), Value::Number(n)) => n
                            .as_f64()
                            .map(|ms| Scalar::from_timestamp_millis(ms as i64))
                            .unwrap_or(Scalar::Null),
                        _ => Scalar::from(value),
                    };
                    (column.clone(), scalar)
                })
                .collect();
            records.push(record);
        }

        Ok(Self { records, coltypes })
    }
}
