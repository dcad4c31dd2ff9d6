use serde::{Deserialize, Serialize};

/// Ordered, complete set of axis keys every series of a statistic is
/// aligned to.
///
/// Keys are unique; construction keeps the first occurrence of a repeated
/// key so positional indexing by chart consumers stays unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisDefinition {
    keys: Vec<i64>,
}

impl AxisDefinition {
    pub fn new(keys: impl IntoIterator<Item = i64>) -> Self {
        let mut unique = Vec::new();
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }

    /// Calendar months `1..=12`.
    pub fn months() -> Self {
        Self::new(1..=12)
    }

    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: i64) -> bool {
        self.keys.contains(&key)
    }
}
