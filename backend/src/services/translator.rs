//! Statistic-specific query translation.
//!
//! A translator takes the generic base query built from the caller's criteria
//! and rewrites it into the aggregate the statistic needs. Caller filters are
//! always kept: the translator only appends.

use crate::models::{Column, Expr, Predicate, Projection, RecordQuery, SeriesFields};

/// Output field holding the aggregated value.
pub const VALUE_FIELD: &str = "value";
/// Output field holding the month number.
pub const MONTH_FIELD: &str = "month";
/// Output field holding the group key.
pub const GROUP_FIELD: &str = "name";

/// Rewrites a base query into a statistic query.
pub trait QueryTranslator: Send + Sync {
    fn translate(&self, base: RecordQuery) -> RecordQuery;

    /// Output fields of the translated query, for the normalizer.
    fn series_fields(&self) -> SeriesFields;
}

/// "Records created per month, grouped by a field":
///
/// ```sql
/// SELECT COUNT(t.<count>) AS value,
///        EXTRACT(MONTH FROM t.<date>) AS month,
///        t.<group> AS name
/// FROM t WHERE <base filter> AND t.<group> IS NOT NULL
/// GROUP BY EXTRACT(MONTH FROM t.<date>), t.<group>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCountSpec {
    pub count_field: String,
    pub date_field: String,
    pub group_field: String,
}

impl MonthlyCountSpec {
    pub fn new(
        count_field: impl Into<String>,
        date_field: impl Into<String>,
        group_field: impl Into<String>,
    ) -> Self {
        Self {
            count_field: count_field.into(),
            date_field: date_field.into(),
            group_field: group_field.into(),
        }
    }
}

impl QueryTranslator for MonthlyCountSpec {
    fn translate(&self, base: RecordQuery) -> RecordQuery {
        let table = base.from.clone();
        let count = Column::qualified(&table, &self.count_field);
        let date = Column::qualified(&table, &self.date_field);
        let group = Column::qualified(&table, &self.group_field);

        base.with_select(vec![
            Projection::aliased(Expr::count(count), VALUE_FIELD),
            Projection::aliased(Expr::extract_month(date.clone()), MONTH_FIELD),
            Projection::aliased(Expr::column(group.clone()), GROUP_FIELD),
        ])
        .and_where(Predicate::IsNotNull(group.clone()))
        .with_group_by(vec![Expr::extract_month(date), Expr::column(group)])
        .clear_order_by()
    }

    fn series_fields(&self) -> SeriesFields {
        SeriesFields::new(GROUP_FIELD, MONTH_FIELD, VALUE_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderBy, SortDirection};
    use serde_json::json;

    fn accounts_spec() -> MonthlyCountSpec {
        MonthlyCountSpec::new("name", "date_entered", "account_type")
    }

    #[test]
    fn test_translate_empty_base() {
        let query = accounts_spec().translate(RecordQuery::select_all("accounts"));
        assert_eq!(
            query.to_string(),
            "SELECT COUNT(accounts.name) AS value, \
             EXTRACT(MONTH FROM accounts.date_entered) AS month, \
             accounts.account_type AS name \
             FROM accounts WHERE accounts.account_type IS NOT NULL \
             GROUP BY EXTRACT(MONTH FROM accounts.date_entered), accounts.account_type"
        );
    }

    #[test]
    fn test_translate_keeps_caller_filters() {
        let base = RecordQuery::select_all("accounts")
            .and_where(Predicate::Eq(Column::qualified("accounts", "industry"), json!("Banking")))
            .with_order_by(vec![OrderBy::new("name", SortDirection::Asc)]);

        let query = accounts_spec().translate(base);

        assert_eq!(query.filter.len(), 2);
        assert_eq!(
            query.filter.predicates()[0],
            Predicate::Eq(Column::qualified("accounts", "industry"), json!("Banking"))
        );
        assert_eq!(
            query.filter.predicates()[1],
            Predicate::IsNotNull(Column::qualified("accounts", "account_type"))
        );
        assert!(query.order_by.is_empty());
        assert_eq!(query.group_by.len(), 2);
        assert!(query.is_aggregate());
    }

    #[test]
    fn test_series_fields() {
        assert_eq!(
            accounts_spec().series_fields(),
            SeriesFields::new("name", "month", "value")
        );
    }
}
