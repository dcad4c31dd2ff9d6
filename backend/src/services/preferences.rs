//! User preferences exposed to the front end.
//!
//! Preferences are stored by the legacy runtime under legacy names (`datef`,
//! `timef`, `currency`, ...). Only the names listed as exposed for a category
//! are returned; names with a [`PreferenceMapper`] are renamed and converted
//! into the front-end representation.

use log::debug;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use super::session::{LegacyRuntime, LegacySession};
use crate::api::UserPreference;
use crate::config::{CurrencySettings, PreferenceSettings};

/// Id of the system default currency.
pub const DEFAULT_CURRENCY_ID: i64 = -99;

/// Preference storage of the current user.
pub trait UserPreferenceSource: Send + Sync {
    fn preference(&self, name: &str, category: &str) -> Option<Value>;
}

/// In-memory preference source.
#[derive(Debug, Default)]
pub struct LocalPreferenceSource {
    values: RwLock<BTreeMap<String, Map<String, Value>>>,
}

impl LocalPreferenceSource {
    pub fn new(values: BTreeMap<String, Map<String, Value>>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn set(&self, category: &str, name: &str, value: Value) {
        self.values
            .write()
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }
}

impl UserPreferenceSource for LocalPreferenceSource {
    fn preference(&self, name: &str, category: &str) -> Option<Value> {
        self.values
            .read()
            .get(category)
            .and_then(|values| values.get(name))
            .cloned()
    }
}

/// Converts one legacy preference into its front-end form.
pub trait PreferenceMapper: Send + Sync {
    /// Front-end item key.
    fn key(&self) -> &str;

    fn to_front_end(&self, value: &Value) -> Value;
}

/// Converts legacy date/time format strings (`m/d/Y`) token by token
/// (`MM/dd/yyyy`). Characters without a mapping are kept.
#[derive(Debug, Clone, Default)]
pub struct DateTimeFormatConverter {
    format_map: HashMap<char, String>,
}

impl DateTimeFormatConverter {
    pub fn new(format_map: &BTreeMap<String, String>) -> Self {
        let format_map = format_map
            .iter()
            .filter_map(|(legacy, front_end)| {
                let mut chars = legacy.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some((c, front_end.clone())),
                    _ => None,
                }
            })
            .collect();
        Self { format_map }
    }

    pub fn convert(&self, format: &str) -> String {
        format
            .chars()
            .map(|c| match self.format_map.get(&c) {
                Some(mapped) => mapped.clone(),
                None => c.to_string(),
            })
            .collect()
    }

    fn convert_value(&self, value: &Value) -> Value {
        match value {
            Value::String(format) => Value::String(self.convert(format)),
            other => other.clone(),
        }
    }
}

/// `datef` → `date_format`.
pub struct DateFormatPreferenceMapper {
    converter: Arc<DateTimeFormatConverter>,
}

impl DateFormatPreferenceMapper {
    pub fn new(converter: Arc<DateTimeFormatConverter>) -> Self {
        Self { converter }
    }
}

impl PreferenceMapper for DateFormatPreferenceMapper {
    fn key(&self) -> &str {
        "date_format"
    }

    fn to_front_end(&self, value: &Value) -> Value {
        self.converter.convert_value(value)
    }
}

/// `timef` → `time_format`.
pub struct TimeFormatPreferenceMapper {
    converter: Arc<DateTimeFormatConverter>,
}

impl TimeFormatPreferenceMapper {
    pub fn new(converter: Arc<DateTimeFormatConverter>) -> Self {
        Self { converter }
    }
}

impl PreferenceMapper for TimeFormatPreferenceMapper {
    fn key(&self) -> &str {
        "time_format"
    }

    fn to_front_end(&self, value: &Value) -> Value {
        self.converter.convert_value(value)
    }
}

/// Currency id → `{id, name, symbol, iso4217}`.
///
/// Unknown ids resolve to the system default currency.
pub struct CurrencyPreferenceMapper {
    currencies: Vec<CurrencySettings>,
}

impl CurrencyPreferenceMapper {
    pub fn new(currencies: Vec<CurrencySettings>) -> Self {
        Self { currencies }
    }

    fn find(&self, id: i64) -> Option<&CurrencySettings> {
        self.currencies.iter().find(|c| c.id == id)
    }
}

impl PreferenceMapper for CurrencyPreferenceMapper {
    fn key(&self) -> &str {
        "currency"
    }

    fn to_front_end(&self, value: &Value) -> Value {
        let id = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .unwrap_or(DEFAULT_CURRENCY_ID);

        match self.find(id).or_else(|| self.find(DEFAULT_CURRENCY_ID)) {
            Some(currency) => json!({
                "id": currency.id,
                "name": currency.name,
                "symbol": currency.symbol,
                "iso4217": currency.iso4217,
            }),
            None => Value::Null,
        }
    }
}

/// Mappers keyed by legacy preference name.
#[derive(Clone, Default)]
pub struct PreferenceMappers {
    mappers: HashMap<String, Arc<dyn PreferenceMapper>>,
}

impl PreferenceMappers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `datef`, `timef` and `currency` mappers.
    pub fn from_settings(settings: &PreferenceSettings) -> Self {
        let converter = Arc::new(DateTimeFormatConverter::new(&settings.datetime_format_map));
        Self::new()
            .with_mapper(
                "datef",
                Arc::new(DateFormatPreferenceMapper::new(Arc::clone(&converter))),
            )
            .with_mapper("timef", Arc::new(TimeFormatPreferenceMapper::new(converter)))
            .with_mapper(
                "currency",
                Arc::new(CurrencyPreferenceMapper::new(settings.currencies.clone())),
            )
    }

    pub fn with_mapper(mut self, name: impl Into<String>, mapper: Arc<dyn PreferenceMapper>) -> Self {
        self.mappers.insert(name.into(), mapper);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn PreferenceMapper> {
        self.mappers.get(name).map(|m| m.as_ref())
    }
}

/// Serves the exposed preferences of a category.
pub struct UserPreferenceHandler {
    exposed: BTreeMap<String, Vec<String>>,
    mappers: PreferenceMappers,
    source: Arc<dyn UserPreferenceSource>,
}

impl UserPreferenceHandler {
    pub fn new(
        exposed: BTreeMap<String, Vec<String>>,
        mappers: PreferenceMappers,
        source: Arc<dyn UserPreferenceSource>,
    ) -> Self {
        Self {
            exposed,
            mappers,
            source,
        }
    }

    /// Handler over the configured exposure and mappers, reading from a local
    /// source seeded with the configured defaults.
    pub fn from_settings(settings: &PreferenceSettings) -> Self {
        Self::new(
            settings.exposed.clone(),
            PreferenceMappers::from_settings(settings),
            Arc::new(LocalPreferenceSource::new(settings.defaults.clone())),
        )
    }

    /// Exposed preferences of `category`.
    ///
    /// # Returns
    /// * `Ok(None)` - `category` is empty
    /// * `Ok(Some(UserPreference))` - One item per exposed name; values the
    ///   user has not set are `null`
    /// * `Err(ServiceError::PreferenceNotFound)` - `category` is not exposed
    pub fn get_user_preference(
        &self,
        category: &str,
        runtime: &dyn LegacyRuntime,
    ) -> ServiceResult<Option<UserPreference>> {
        if category.is_empty() {
            return Ok(None);
        }

        let names = self
            .exposed
            .get(category)
            .ok_or_else(|| ServiceError::PreferenceNotFound(category.to_string()))?;

        let _session = LegacySession::open(runtime)?;

        let mut items = Map::new();
        for name in names {
            let value = self.source.preference(name, category);
            match self.mappers.get(name) {
                Some(mapper) => {
                    let mapped = value.map_or(Value::Null, |v| mapper.to_front_end(&v));
                    items.insert(mapper.key().to_string(), mapped);
                }
                None => {
                    items.insert(name.clone(), value.unwrap_or(Value::Null));
                }
            }
        }

        debug!("Resolved {} preferences for category '{}'", items.len(), category);

        Ok(Some(UserPreference {
            id: category.to_string(),
            items,
        }))
    }
}
