//! Statistic provider registry.
//!
//! Providers are looked up by their statistic key. The registry is built once
//! at startup and shared read-only between requests.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use super::session::LegacyRuntime;
use crate::api::StatisticResponse;
use crate::models::GenericQuery;

/// A chart statistic computed from the record store.
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Statistic key, unique within a registry.
    fn key(&self) -> &str;

    /// Compute the statistic for a generic query.
    ///
    /// # Returns
    /// * `Ok(StatisticResponse)` - The statistic, possibly the empty response
    ///   when the query does not apply to this provider
    /// * `Err(ServiceError)` - If the session or the record store failed
    async fn get_data(
        &self,
        query: &GenericQuery,
        runtime: &dyn LegacyRuntime,
    ) -> ServiceResult<StatisticResponse>;
}

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn StatisticsProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its key, replacing any provider already
    /// registered there. Returns the replaced provider.
    pub fn register(
        &mut self,
        provider: Arc<dyn StatisticsProvider>,
    ) -> Option<Arc<dyn StatisticsProvider>> {
        let key = provider.key().to_string();
        let previous = self.providers.insert(key.clone(), provider);
        if previous.is_some() {
            warn!("Replacing statistics provider '{}'", key);
        } else {
            debug!("Registered statistics provider '{}'", key);
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn StatisticsProvider>> {
        self.providers.get(key).cloned()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.providers.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Dispatch a query to the provider registered under `key`.
    pub async fn get_data(
        &self,
        key: &str,
        query: &GenericQuery,
        runtime: &dyn LegacyRuntime,
    ) -> ServiceResult<StatisticResponse> {
        let provider = self
            .get(key)
            .ok_or_else(|| ServiceError::UnknownStatistic(key.to_string()))?;
        provider.get_data(query, runtime).await
    }
}
