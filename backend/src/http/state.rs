//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::{RecordRepository, RepositoryResult};
use crate::db::RepositoryFactory;
use crate::services::{
    build_registry, LegacyRuntime, LocalRuntime, ProviderRegistry, StaticModuleNameMapper,
    UserPreferenceHandler,
};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store used by the statistics providers
    pub repository: Arc<dyn RecordRepository>,
    pub registry: Arc<ProviderRegistry>,
    pub runtime: Arc<dyn LegacyRuntime>,
    pub preferences: Arc<UserPreferenceHandler>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        registry: ProviderRegistry,
        runtime: Arc<dyn LegacyRuntime>,
        preferences: UserPreferenceHandler,
    ) -> Self {
        Self {
            repository,
            registry: Arc::new(registry),
            runtime,
            preferences: Arc::new(preferences),
        }
    }

    /// Wire repository, providers, runtime and preferences from configuration.
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Self> {
        let repository = RepositoryFactory::from_config(config)?;
        Ok(Self::with_repository(config, repository))
    }

    /// Same as [`AppState::from_config`] over an existing repository.
    pub fn with_repository(config: &AppConfig, repository: Arc<dyn RecordRepository>) -> Self {
        let module_names = Arc::new(StaticModuleNameMapper::new(config.modules.clone()));
        let registry = build_registry(config, Arc::clone(&repository), module_names);
        Self::new(
            repository,
            registry,
            Arc::new(LocalRuntime::new()),
            UserPreferenceHandler::from_settings(&config.preferences),
        )
    }
}
