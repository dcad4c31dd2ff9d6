//! Chart response assembly.

use crate::api::{ChartOptions, DataType, Series, StatisticKey, StatisticResponse};

pub fn build_series_response(
    key: impl Into<StatisticKey>,
    data_type: DataType,
    series: Vec<Series>,
    options: ChartOptions,
) -> StatisticResponse {
    StatisticResponse {
        key: key.into(),
        data_type,
        series,
        options,
    }
}

/// Response for a statistic that has nothing to show: no series, `int`
/// values, default options.
pub fn empty_series_response(key: impl Into<StatisticKey>) -> StatisticResponse {
    build_series_response(key, DataType::Int, Vec::new(), ChartOptions::default())
}
