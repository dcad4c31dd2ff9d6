//! Inbound query shapes: the untyped generic query and the context extracted
//! from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::RecordId;

/// Untyped key/value query as received from the caller.
///
/// Recognized keys are `module`, `id`, `criteria` and `sort`; anything else is
/// ignored by the statistics pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericQuery(pub Map<String, Value>);

impl GenericQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Shorthand for the common `{module, id}` request.
    pub fn for_module(module: &str, id: &str) -> Self {
        Self::new().with("module", module).with("id", id)
    }
}

impl From<Map<String, Value>> for GenericQuery {
    fn from(map: Map<String, Value>) -> Self {
        GenericQuery(map)
    }
}

impl TryFrom<Value> for GenericQuery {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(GenericQuery(map)),
            other => Err(other),
        }
    }
}

/// Caller filter criteria, kept opaque until the criteria resolver reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(pub Map<String, Value>);

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `filters` object, if present and well-formed.
    pub fn filters(&self) -> Option<&Map<String, Value>> {
        self.0.get("filters").and_then(Value::as_object)
    }
}

/// Caller sort specification (`{"orderBy": ..., "sortOrder": ...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(pub Map<String, Value>);

impl SortSpec {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn order_by(&self) -> Option<&str> {
        self.0
            .get("orderBy")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn sort_order(&self) -> Option<&str> {
        self.0.get("sortOrder").and_then(Value::as_str)
    }
}

/// Context of one statistics request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    pub module: String,
    pub record_id: RecordId,
    pub criteria: Criteria,
    pub sort: SortSpec,
}

impl QueryContext {
    /// Sentinel returned when the query carries no usable module.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.module.is_empty()
    }
}
