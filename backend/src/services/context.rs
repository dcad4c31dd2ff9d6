//! Query context extraction.

use log::debug;
use serde_json::Value;

use crate::api::RecordId;
use crate::models::{Criteria, GenericQuery, QueryContext, SortSpec};

/// Pull `(module, id, criteria, sort)` out of a generic query.
///
/// Never fails. A missing, empty or non-string `module` yields
/// [`QueryContext::empty`]. The module is kept verbatim, so padded names do
/// not match any provider. `id` may be absent; numeric ids are accepted.
/// `criteria` and `sort` fall back to empty when absent or not objects.
pub fn extract_context(query: &GenericQuery) -> QueryContext {
    let module = match query.get("module").and_then(Value::as_str) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => {
            debug!("Generic query has no usable module");
            return QueryContext::empty();
        }
    };

    let record_id = match query.get("id") {
        Some(Value::String(s)) => RecordId::new(s.as_str()),
        Some(Value::Number(n)) => RecordId::new(n.to_string()),
        _ => RecordId::default(),
    };

    let criteria = match query.get("criteria") {
        Some(Value::Object(map)) => Criteria(map.clone()),
        _ => Criteria::default(),
    };

    let sort = match query.get("sort") {
        Some(Value::Object(map)) => SortSpec(map.clone()),
        _ => SortSpec::default(),
    };

    QueryContext {
        module,
        record_id,
        criteria,
        sort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(value: Value) -> GenericQuery {
        GenericQuery::try_from(value).unwrap()
    }

    #[test]
    fn test_full_context() {
        let ctx = extract_context(&query(json!({
            "module": "accounts",
            "id": "abc-123",
            "criteria": {"filters": {"industry": {"operator": "=", "values": ["Banking"]}}},
            "sort": {"orderBy": "name", "sortOrder": "DESC"}
        })));

        assert_eq!(ctx.module, "accounts");
        assert_eq!(ctx.record_id.as_str(), "abc-123");
        assert!(ctx.criteria.filters().is_some());
        assert_eq!(ctx.sort.order_by(), Some("name"));
    }

    #[test]
    fn test_missing_module_is_empty() {
        assert!(extract_context(&GenericQuery::new()).is_empty());
        assert!(extract_context(&query(json!({"module": ""}))).is_empty());
        assert!(extract_context(&query(json!({"module": 42, "id": "x"}))).is_empty());
    }

    #[test]
    fn test_module_is_not_normalized() {
        let ctx = extract_context(&query(json!({"module": " accounts "})));
        assert_eq!(ctx.module, " accounts ");
    }

    #[test]
    fn test_optional_parts_default() {
        let ctx = extract_context(&query(json!({
            "module": "accounts",
            "criteria": "not-an-object",
            "sort": null
        })));

        assert_eq!(ctx.module, "accounts");
        assert!(ctx.record_id.is_empty());
        assert!(ctx.criteria.is_empty());
        assert!(ctx.sort.is_empty());
    }

    #[test]
    fn test_numeric_id() {
        let ctx = extract_context(&query(json!({"module": "accounts", "id": 7})));
        assert_eq!(ctx.record_id.as_str(), "7");
    }
}
