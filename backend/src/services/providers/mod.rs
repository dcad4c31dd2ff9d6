//! Built-in statistics providers and registry assembly.

pub mod monthly;

pub use monthly::MonthlyCountProvider;

use std::sync::Arc;

use super::module_names::ModuleNameMapper;
use super::registry::ProviderRegistry;
use super::translator::MonthlyCountSpec;
use crate::config::AppConfig;
use crate::db::repository::RecordRepository;

/// New accounts per month, one series per account type.
pub const ACCOUNTS_NEW_BY_MONTH: &str = "accounts-new-by-month";

pub fn accounts_new_by_month(
    repository: Arc<dyn RecordRepository>,
    module_names: Arc<dyn ModuleNameMapper>,
) -> MonthlyCountProvider {
    MonthlyCountProvider::new(
        ACCOUNTS_NEW_BY_MONTH,
        "accounts",
        MonthlyCountSpec::new("name", "date_entered", "account_type"),
        repository,
        module_names,
    )
}

/// Registry holding the built-in providers plus every
/// `[[statistics.monthly]]` entry of the configuration.
pub fn build_registry(
    config: &AppConfig,
    repository: Arc<dyn RecordRepository>,
    module_names: Arc<dyn ModuleNameMapper>,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(accounts_new_by_month(
        Arc::clone(&repository),
        Arc::clone(&module_names),
    )));

    for stat in &config.statistics.monthly {
        registry.register(Arc::new(MonthlyCountProvider::new(
            stat.key.as_str(),
            stat.module.as_str(),
            MonthlyCountSpec::new(&stat.count_field, &stat.date_field, &stat.group_field),
            Arc::clone(&repository),
            Arc::clone(&module_names),
        )));
    }

    registry
}
