//! Public API surface for the statistics backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::preferences::UserPreference;
pub use crate::routes::statistics::ChartOptions;
pub use crate::routes::statistics::DataPoint;
pub use crate::routes::statistics::DataType;
pub use crate::routes::statistics::Series;
pub use crate::routes::statistics::StatValue;
pub use crate::routes::statistics::StatisticResponse;

// Statistic key as used by the provider registry and echoed in responses.
crate::define_name_type!(StatisticKey);

// Identifier of the record a statistic is scoped to (may be empty).
crate::define_name_type!(RecordId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_key_roundtrip() {
        let key = StatisticKey::from("accounts-new-by-month");
        assert_eq!(key.as_str(), "accounts-new-by-month");
        assert_eq!(key.to_string(), "accounts-new-by-month");
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            "\"accounts-new-by-month\""
        );
    }

    #[test]
    fn test_record_id_default_is_empty() {
        assert!(RecordId::default().is_empty());
        assert!(!RecordId::new("abc").is_empty());
    }
}
