//! Record-store result rows and the typed rows the normalizer consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{DataType, StatValue};

/// One executor result row: output field name to value.
pub type Row = Map<String, Value>;

/// Handle to a record type the store knows how to query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType {
    /// Legacy record type name (e.g. `Accounts`).
    pub legacy_name: String,
    /// Backing table (e.g. `accounts`).
    pub table: String,
}

impl RecordType {
    pub fn new(legacy_name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            legacy_name: legacy_name.into(),
            table: table.into(),
        }
    }
}

/// Names of the result-row fields that carry the series dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFields {
    pub group: String,
    pub axis: String,
    pub value: String,
}

impl SeriesFields {
    pub fn new(group: impl Into<String>, axis: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            axis: axis.into(),
            value: value.into(),
        }
    }
}

/// A grouped aggregate row: one value at one axis position for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub value: StatValue,
    pub axis_key: i64,
    pub group_key: String,
}

impl RawRow {
    pub fn new(value: StatValue, axis_key: i64, group_key: impl Into<String>) -> Self {
        Self {
            value,
            axis_key,
            group_key: group_key.into(),
        }
    }

    /// Read a typed row out of a result row.
    ///
    /// Returns `None` when any of the three fields is missing, null or not
    /// convertible. SQL stores commonly return numbers as strings, so numeric
    /// strings are accepted for the axis key and the value.
    pub fn from_row(row: &Row, fields: &SeriesFields, data_type: DataType) -> Option<Self> {
        let group_key = match row.get(&fields.group)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        let axis_key = axis_key_from(row.get(&fields.axis)?)?;
        let value = data_type.parse_value(row.get(&fields.value)?)?;

        Some(Self {
            value,
            axis_key,
            group_key,
        })
    }
}

fn axis_key_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
