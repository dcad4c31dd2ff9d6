//! Series normalization.
//!
//! Turns the sparse, unordered rows of a grouped aggregate query into dense
//! series: one per group, each holding exactly one point per axis key in axis
//! order. Chart clients index series positionally against the shared axis, so
//! every series must have the same length and alignment whatever the data.

use std::collections::HashMap;

use log::{debug, warn};

use crate::api::{DataPoint, DataType, Series, StatValue};
use crate::models::{AxisDefinition, RawRow, Row, SeriesFields};

/// Build one zero-filled series per group.
///
/// * Groups are emitted in the order their key is first seen among rows that
///   fall on the axis; they are not sorted.
/// * Rows whose axis key is not on `axis` are dropped.
/// * Axis positions without a row take `zero`.
/// * Several rows for the same group and axis key are summed.
pub fn normalize(rows: &[RawRow], axis: &AxisDefinition, zero: StatValue) -> Vec<Series> {
    let positions: HashMap<i64, usize> = axis
        .keys()
        .iter()
        .enumerate()
        .map(|(pos, key)| (*key, pos))
        .collect();

    let mut groups: Vec<(String, Vec<Option<StatValue>>)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(&pos) = positions.get(&row.axis_key) else {
            debug!(
                "Dropping row outside axis: group={} axis_key={}",
                row.group_key, row.axis_key
            );
            continue;
        };

        let slot = *group_index.entry(row.group_key.as_str()).or_insert_with(|| {
            groups.push((row.group_key.clone(), vec![None; axis.len()]));
            groups.len() - 1
        });

        let cell = &mut groups[slot].1[pos];
        *cell = Some(match *cell {
            Some(existing) => existing + row.value,
            None => row.value,
        });
    }

    groups
        .into_iter()
        .map(|(name, cells)| Series {
            name,
            points: axis
                .keys()
                .iter()
                .zip(cells)
                .map(|(key, cell)| DataPoint {
                    axis_key: *key,
                    value: cell.unwrap_or(zero),
                })
                .collect(),
        })
        .collect()
}

/// Normalize executor result rows, reading the group, axis and value from the
/// named fields.
///
/// Rows missing one of the fields, or holding a value that does not convert to
/// `data_type`, are skipped with a warning.
pub fn normalize_rows(
    rows: &[Row],
    axis: &AxisDefinition,
    fields: &SeriesFields,
    data_type: DataType,
) -> Vec<Series> {
    let raw: Vec<RawRow> = rows
        .iter()
        .filter_map(|row| {
            let parsed = RawRow::from_row(row, fields, data_type);
            if parsed.is_none() {
                warn!("Skipping malformed statistics row: {:?}", row);
            }
            parsed
        })
        .collect();

    normalize(&raw, axis, data_type.zero())
}
