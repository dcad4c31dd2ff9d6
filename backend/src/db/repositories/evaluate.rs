//! Evaluation of structured query fragments against in-memory records.
//!
//! Semantics follow SQL where it matters to the statistics queries: null
//! never compares equal to anything, `COUNT(col)` skips nulls, grouping keeps
//! the first-seen order of groups.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Column, Expr, OrderBy, Predicate, Projection, QueryLimit, RecordQuery, Row, SortDirection};

fn field<'a>(record: &'a Row, column: &Column) -> Option<&'a Value> {
    record.get(&column.name).filter(|v| !v.is_null())
}

/// Month (1-12) of a `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 value.
pub(crate) fn extract_month(value: &Value) -> Option<u32> {
    let text = value.as_str()?.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.month());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.month());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.month())
}

/// Compare two non-null values. Numbers compare numerically, also against
/// numeric strings; strings compare lexicographically.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Number(x), Value::String(s)) => x.as_f64()?.partial_cmp(&s.trim().parse::<f64>().ok()?),
        (Value::String(s), Value::Number(y)) => s.trim().parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compares(record: &Row, column: &Column, value: &Value, accept: fn(Ordering) -> bool) -> bool {
    field(record, column)
        .and_then(|f| compare_values(f, value))
        .is_some_and(accept)
}

/// Case-insensitive SQL `LIKE` (`%` any run, `_` one character).
pub(crate) fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    // matches[j]: text[..i] matches pattern[..j]
    let mut matches = vec![false; pattern.len() + 1];
    matches[0] = true;
    for j in 1..=pattern.len() {
        matches[j] = matches[j - 1] && pattern[j - 1] == '%';
    }

    for &c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matches[j],
                '_' => matches[j - 1],
                p => matches[j - 1] && p == c,
            };
        }
        matches = next;
    }

    matches[pattern.len()]
}

/// Whether a record satisfies a predicate.
pub(crate) fn matches(record: &Row, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Eq(c, v) => compares(record, c, v, Ordering::is_eq),
        Predicate::NotEq(c, v) => compares(record, c, v, Ordering::is_ne),
        Predicate::In(c, values) => values
            .iter()
            .any(|v| compares(record, c, v, Ordering::is_eq)),
        Predicate::Like(c, pattern) => field(record, c)
            .and_then(Value::as_str)
            .is_some_and(|text| like_match(text, pattern)),
        Predicate::Gt(c, v) => compares(record, c, v, Ordering::is_gt),
        Predicate::Gte(c, v) => compares(record, c, v, Ordering::is_ge),
        Predicate::Lt(c, v) => compares(record, c, v, Ordering::is_lt),
        Predicate::Lte(c, v) => compares(record, c, v, Ordering::is_le),
        Predicate::Between(c, lo, hi) => {
            compares(record, c, lo, Ordering::is_ge) && compares(record, c, hi, Ordering::is_le)
        }
        Predicate::IsNull(c) => field(record, c).is_none(),
        Predicate::IsNotNull(c) => field(record, c).is_some(),
    }
}

/// Scalar value of an expression for one record.
fn eval_scalar(expr: &Expr, record: &Row) -> Value {
    match expr {
        Expr::Wildcard => Value::Null,
        Expr::Column(c) => field(record, c).cloned().unwrap_or(Value::Null),
        Expr::ExtractMonth(c) => field(record, c)
            .and_then(extract_month)
            .map(Value::from)
            .unwrap_or(Value::Null),
        Expr::Count(c) => Value::from(u64::from(field(record, c).is_some())),
    }
}

/// Value of an expression over a group of records.
fn eval_group(expr: &Expr, group: &[&Row]) -> Value {
    match expr {
        Expr::Count(c) => Value::from(group.iter().filter(|r| field(r, c).is_some()).count()),
        other => group
            .first()
            .map(|r| eval_scalar(other, r))
            .unwrap_or(Value::Null),
    }
}

fn project_record(select: &[Projection], record: &Row) -> Row {
    let mut out = Row::new();
    for projection in select {
        match projection.expr {
            Expr::Wildcard => out.extend(record.iter().map(|(k, v)| (k.clone(), v.clone()))),
            ref expr => {
                out.insert(projection.output_name(), eval_scalar(expr, record));
            }
        }
    }
    out
}

fn compare_rows(a: &Row, b: &Row, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let left = a.get(&order.field).filter(|v| !v.is_null());
        let right = b.get(&order.field).filter(|v| !v.is_null());
        // Nulls sort first ascending, last descending.
        let ordering = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(l), Some(r)) => compare_values(l, r).unwrap_or(Ordering::Equal),
        };
        let ordering = match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Execute a query over the records of one table.
pub(crate) fn execute(query: &RecordQuery, records: &[Row], limit: QueryLimit) -> RepositoryResult<Vec<Row>> {
    let selected: Vec<&Row> = records
        .iter()
        .filter(|r| query.filter.predicates().iter().all(|p| matches(r, p)))
        .collect();

    let mut rows: Vec<Row> = if query.is_aggregate() {
        if query.select.iter().any(|p| p.expr == Expr::Wildcard) {
            return Err(
                RepositoryError::query("Wildcard projection is not allowed in an aggregate query")
                    .with_context(ErrorContext::new("run_query").for_table(&query.from)),
            );
        }

        let mut groups: Vec<(Vec<Value>, Vec<&Row>)> = Vec::new();
        if query.group_by.is_empty() {
            groups.push((Vec::new(), selected));
        } else {
            for record in selected {
                let key: Vec<Value> = query.group_by.iter().map(|e| eval_scalar(e, record)).collect();
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, members)) => members.push(record),
                    None => groups.push((key, vec![record])),
                }
            }
        }

        groups
            .iter()
            .map(|(_, members)| {
                query
                    .select
                    .iter()
                    .map(|p| (p.output_name(), eval_group(&p.expr, members)))
                    .collect()
            })
            .collect()
    } else {
        selected
            .into_iter()
            .map(|r| project_record(&query.select, r))
            .collect()
    };

    if !query.order_by.is_empty() {
        rows.sort_by(|a, b| compare_rows(a, b, &query.order_by));
    }
    if let QueryLimit::Limited(n) = limit {
        rows.truncate(n);
    }

    Ok(rows)
}
