use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User preferences of one category, keyed the way the front end expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    /// Category name (e.g. `global`).
    pub id: String,
    pub items: Map<String, Value>,
}

impl UserPreference {
    pub fn item(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }
}

pub const GET_USER_PREFERENCE: &str = "get_user_preference";
