//! Structured record-store query fragments.
//!
//! A [`RecordQuery`] carries the projection, filter, grouping and ordering of a
//! store query as typed values instead of raw SQL strings. Statistics providers
//! start from the base query produced by the criteria resolver and substitute
//! or append fragments; the store executes the structure directly, and the
//! [`Display`](fmt::Display) impl renders SQL for logging and SQL-backed stores.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A column reference, optionally qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
}

impl Column {
    /// Unqualified column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Column qualified with a table name (`accounts.name`).
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Expression usable in a projection, a grouping or an ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Every field of the record (`*`).
    Wildcard,
    /// Plain column value.
    Column(Column),
    /// Month number (1-12) of a date or datetime column.
    ExtractMonth(Column),
    /// Number of non-null values of a column within a group.
    Count(Column),
}

impl Expr {
    pub fn column(column: Column) -> Self {
        Expr::Column(column)
    }

    pub fn extract_month(column: Column) -> Self {
        Expr::ExtractMonth(column)
    }

    pub fn count(column: Column) -> Self {
        Expr::Count(column)
    }

    /// Whether the expression aggregates over a group of records.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expr::Count(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Wildcard => write!(f, "*"),
            Expr::Column(column) => write!(f, "{}", column),
            Expr::ExtractMonth(column) => write!(f, "EXTRACT(MONTH FROM {})", column),
            Expr::Count(column) => write!(f, "COUNT({})", column),
        }
    }
}

/// Projected expression with its output field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl Projection {
    /// `SELECT *`.
    pub fn all() -> Self {
        Self {
            expr: Expr::Wildcard,
            alias: None,
        }
    }

    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }

    /// Name of the field this projection produces in a result row.
    ///
    /// Falls back to the column name for unaliased columns and to the
    /// rendered expression otherwise.
    pub fn output_name(&self) -> String {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => alias.clone(),
            (None, Expr::Column(column)) => column.name.clone(),
            (None, expr) => expr.to_string(),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.expr, alias),
            None => write!(f, "{}", self.expr),
        }
    }
}

/// A single boolean condition over a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Eq(Column, Value),
    NotEq(Column, Value),
    In(Column, Vec<Value>),
    /// SQL `LIKE` with `%` and `_` wildcards, case-insensitive.
    Like(Column, String),
    Gt(Column, Value),
    Gte(Column, Value),
    Lt(Column, Value),
    Lte(Column, Value),
    Between(Column, Value, Value),
    IsNull(Column),
    IsNotNull(Column),
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq(c, v) => write!(f, "{} = {}", c, render_value(v)),
            Predicate::NotEq(c, v) => write!(f, "{} <> {}", c, render_value(v)),
            Predicate::In(c, values) => {
                let rendered: Vec<String> = values.iter().map(render_value).collect();
                write!(f, "{} IN ({})", c, rendered.join(", "))
            }
            Predicate::Like(c, pattern) => {
                write!(f, "{} LIKE {}", c, render_value(&Value::String(pattern.clone())))
            }
            Predicate::Gt(c, v) => write!(f, "{} > {}", c, render_value(v)),
            Predicate::Gte(c, v) => write!(f, "{} >= {}", c, render_value(v)),
            Predicate::Lt(c, v) => write!(f, "{} < {}", c, render_value(v)),
            Predicate::Lte(c, v) => write!(f, "{} <= {}", c, render_value(v)),
            Predicate::Between(c, lo, hi) => write!(
                f,
                "{} BETWEEN {} AND {}",
                c,
                render_value(lo),
                render_value(hi)
            ),
            Predicate::IsNull(c) => write!(f, "{} IS NULL", c),
            Predicate::IsNotNull(c) => write!(f, "{} IS NOT NULL", c),
        }
    }
}

/// Conjunction of predicates. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate; existing predicates are kept.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", rendered.join(" AND "))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `ASC`/`DESC` (any case). Anything else is ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Ordering on an output field of the result rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{} ASC", self.field),
            SortDirection::Desc => write!(f, "{} DESC", self.field),
        }
    }
}

/// Structured query against one record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub from: String,
    pub select: Vec<Projection>,
    pub filter: Filter,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderBy>,
}

impl RecordQuery {
    /// `SELECT * FROM <table>` with no filter, grouping or ordering.
    pub fn select_all(table: impl Into<String>) -> Self {
        Self {
            from: table.into(),
            select: vec![Projection::all()],
            filter: Filter::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Replace the projection.
    pub fn with_select(mut self, select: Vec<Projection>) -> Self {
        self.select = select;
        self
    }

    /// Append a predicate to the existing filter.
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }

    /// Replace the grouping.
    pub fn with_group_by(mut self, group_by: Vec<Expr>) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// True when the query groups records or projects an aggregate.
    pub fn is_aggregate(&self) -> bool {
        !self.group_by.is_empty() || self.select.iter().any(|p| p.expr.is_aggregate())
    }
}

impl fmt::Display for RecordQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let select: Vec<String> = self.select.iter().map(|p| p.to_string()).collect();
        write!(f, "SELECT {} FROM {}", select.join(", "), self.from)?;
        if !self.filter.is_empty() {
            write!(f, " WHERE {}", self.filter)?;
        }
        if !self.group_by.is_empty() {
            let group: Vec<String> = self.group_by.iter().map(|e| e.to_string()).collect();
            write!(f, " GROUP BY {}", group.join(", "))?;
        }
        if !self.order_by.is_empty() {
            let order: Vec<String> = self.order_by.iter().map(|o| o.to_string()).collect();
            write!(f, " ORDER BY {}", order.join(", "))?;
        }
        Ok(())
    }
}

/// Result size requested from the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryLimit {
    /// Return every matching row.
    Unlimited,
    /// Return at most this many rows.
    Limited(usize),
}
