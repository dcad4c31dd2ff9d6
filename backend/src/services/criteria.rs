//! Base query construction from list-view criteria and sort.
//!
//! Criteria arrive in the list-view shape:
//!
//! ```json
//! {"filters": {"account_type": {"operator": "=", "values": ["Customer"]}}}
//! ```
//!
//! Filters that cannot be expressed (unknown operator, no usable value, wrong
//! shape) are skipped with a warning rather than failing the statistic.

use log::warn;
use serde_json::{Map, Value};

use crate::models::{Column, Criteria, OrderBy, Predicate, RecordQuery, RecordType, SortDirection, SortSpec};

/// `SELECT * FROM <table>` narrowed by the criteria filters and ordered by
/// the sort spec.
pub fn build_base_query(record_type: &RecordType, criteria: &Criteria, sort: &SortSpec) -> RecordQuery {
    let mut query = RecordQuery::select_all(&record_type.table);

    if let Some(filters) = criteria.filters() {
        for (field, spec) in filters {
            let column = Column::qualified(&record_type.table, field);
            match spec.as_object() {
                Some(spec) => {
                    for predicate in filter_predicates(column, spec) {
                        query.filter.push(predicate);
                    }
                }
                None => warn!("Skipping criteria filter '{}': not an object", field),
            }
        }
    }

    if let Some(field) = sort.order_by() {
        let direction = sort
            .sort_order()
            .map(SortDirection::parse)
            .unwrap_or_default();
        query = query.with_order_by(vec![OrderBy::new(field, direction)]);
    }

    query
}

/// Non-empty filter values. A scalar `values` is treated as a one-element list.
fn filter_values(spec: &Map<String, Value>) -> Vec<Value> {
    let raw = match spec.get("values") {
        Some(Value::Array(values)) => values.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(value) => vec![value.clone()],
    };

    raw.into_iter()
        .filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
        .collect()
}

fn filter_predicates(column: Column, spec: &Map<String, Value>) -> Vec<Predicate> {
    let operator = spec
        .get("operator")
        .and_then(Value::as_str)
        .unwrap_or("=")
        .trim()
        .to_lowercase();

    match operator.as_str() {
        "empty" => return vec![Predicate::IsNull(column)],
        "not_empty" => return vec![Predicate::IsNotNull(column)],
        _ => {}
    }

    let mut values = filter_values(spec);
    if values.is_empty() {
        warn!("Skipping criteria filter on {}: no values", column);
        return Vec::new();
    }

    match operator.as_str() {
        "=" | "equal" if values.len() == 1 => vec![Predicate::Eq(column, values.remove(0))],
        "=" | "equal" | "in" => vec![Predicate::In(column, values)],
        "!=" | "not_equal" => values
            .into_iter()
            .map(|v| Predicate::NotEq(column.clone(), v))
            .collect(),
        "like" => match values.remove(0) {
            Value::String(pattern) => vec![Predicate::Like(column, pattern)],
            other => vec![Predicate::Like(column, other.to_string())],
        },
        ">" | "greater_than" => vec![Predicate::Gt(column, values.remove(0))],
        ">=" | "greater_than_equals" => vec![Predicate::Gte(column, values.remove(0))],
        "<" | "less_than" => vec![Predicate::Lt(column, values.remove(0))],
        "<=" | "less_than_equals" => vec![Predicate::Lte(column, values.remove(0))],
        "between" if values.len() >= 2 => {
            let high = values.remove(1);
            let low = values.remove(0);
            vec![Predicate::Between(column, low, high)]
        }
        "between" => {
            warn!("Skipping criteria filter on {}: between needs two values", column);
            Vec::new()
        }
        other => {
            warn!("Skipping criteria filter on {}: unknown operator '{}'", column, other);
            Vec::new()
        }
    }
}
