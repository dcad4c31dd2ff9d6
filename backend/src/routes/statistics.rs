use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::StatisticKey;
use crate::models::AxisDefinition;

// =========================================================
// Statistics chart types + route
// =========================================================

/// Value kind of a statistic, which also fixes its zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Int,
    Double,
}

impl DataType {
    /// Value used for axis positions that have no data.
    pub fn zero(&self) -> StatValue {
        match self {
            DataType::Int => StatValue::Int(0),
            DataType::Double => StatValue::Double(0.0),
        }
    }

    /// Convert a raw store value into this data type.
    ///
    /// Numeric strings are accepted. `Int` rejects values with a fractional
    /// part or outside the `i64` range rather than truncating them.
    pub fn parse_value(&self, value: &Value) -> Option<StatValue> {
        match self {
            DataType::Int => match value {
                Value::Number(n) if n.is_f64() => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| StatValue::Int(f as i64)),
                Value::Number(n) => n.as_i64().map(StatValue::Int),
                Value::String(s) => s.trim().parse().ok().map(StatValue::Int),
                _ => None,
            },
            DataType::Double => match value {
                Value::Number(n) => n.as_f64().map(StatValue::Double),
                Value::String(s) => s.trim().parse().ok().map(StatValue::Double),
                _ => None,
            },
        }
    }
}

/// A single chart value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Double(f64),
}

impl StatValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            StatValue::Int(v) => *v as f64,
            StatValue::Double(v) => *v,
        }
    }
}

/// Mixing kinds widens to `Double`.
impl std::ops::Add for StatValue {
    type Output = StatValue;

    fn add(self, other: StatValue) -> StatValue {
        match (self, other) {
            (StatValue::Int(a), StatValue::Int(b)) => StatValue::Int(a.saturating_add(b)),
            (a, b) => StatValue::Double(a.as_f64() + b.as_f64()),
        }
    }
}

/// One `(axis key, value)` point. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, StatValue)", into = "(i64, StatValue)")]
pub struct DataPoint {
    pub axis_key: i64,
    pub value: StatValue,
}

impl From<(i64, StatValue)> for DataPoint {
    fn from((axis_key, value): (i64, StatValue)) -> Self {
        DataPoint { axis_key, value }
    }
}

impl From<DataPoint> for (i64, StatValue) {
    fn from(point: DataPoint) -> Self {
        (point.axis_key, point.value)
    }
}

/// Named series aligned to the statistic's axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values in axis order.
    pub fn values(&self) -> Vec<StatValue> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn axis_keys(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.axis_key).collect()
    }
}

/// Presentational chart metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub x_axis_ticks: AxisDefinition,
    pub y_axis_tick_formatting: bool,
}

/// Chart-ready statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticResponse {
    pub key: StatisticKey,
    pub data_type: DataType,
    pub series: Vec<Series>,
    pub options: ChartOptions,
}

impl StatisticResponse {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Route function name constant for a single statistic
pub const GET_STATISTIC: &str = "get_statistic";
/// Route function name constant for the registered statistic keys
pub const LIST_STATISTICS: &str = "list_statistics";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_json_shape() {
        let response = StatisticResponse {
            key: StatisticKey::from("accounts-new-by-month"),
            data_type: DataType::Int,
            series: vec![Series {
                name: "Customer".to_string(),
                points: vec![
                    DataPoint::from((1, StatValue::Int(0))),
                    DataPoint::from((2, StatValue::Int(3))),
                ],
            }],
            options: ChartOptions {
                x_axis_ticks: AxisDefinition::new([1, 2]),
                y_axis_tick_formatting: true,
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "key": "accounts-new-by-month",
                "dataType": "int",
                "series": [{"name": "Customer", "points": [[1, 0], [2, 3]]}],
                "options": {"xAxisTicks": [1, 2], "yAxisTickFormatting": true}
            })
        );
    }

    #[test]
    fn test_default_options() {
        let options = ChartOptions::default();
        assert!(options.x_axis_ticks.is_empty());
        assert!(!options.y_axis_tick_formatting);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(DataType::Int.parse_value(&json!(4)), Some(StatValue::Int(4)));
        assert_eq!(DataType::Int.parse_value(&json!("12")), Some(StatValue::Int(12)));
        assert_eq!(DataType::Int.parse_value(&json!(1.5)), None);
        assert_eq!(DataType::Int.parse_value(&json!(3.0)), Some(StatValue::Int(3)));
        assert_eq!(DataType::Int.parse_value(&json!(-7)), Some(StatValue::Int(-7)));
        assert_eq!(DataType::Int.parse_value(&json!(null)), None);
        assert_eq!(DataType::Double.parse_value(&json!(1.5)), Some(StatValue::Double(1.5)));
        assert_eq!(DataType::Double.parse_value(&json!("2.25")), Some(StatValue::Double(2.25)));
    }

    #[test]
    fn test_parse_int_rejects_out_of_range() {
        assert_eq!(DataType::Int.parse_value(&json!(u64::MAX)), None);
        assert_eq!(DataType::Int.parse_value(&json!(1e20)), None);
        assert_eq!(
            DataType::Int.parse_value(&json!(i64::MAX)),
            Some(StatValue::Int(i64::MAX))
        );
        assert_eq!(DataType::Int.parse_value(&json!("18446744073709551615")), None);
    }

    #[test]
    fn test_stat_value_add() {
        assert_eq!(StatValue::Int(2) + StatValue::Int(3), StatValue::Int(5));
        assert_eq!(StatValue::Int(2) + StatValue::Double(0.5), StatValue::Double(2.5));
    }

    #[test]
    fn test_const_values() {
        assert_eq!(GET_STATISTIC, "get_statistic");
        assert_eq!(LIST_STATISTICS, "list_statistics");
    }
}
