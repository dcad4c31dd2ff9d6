//! Service layer: the statistics pipeline and user preferences.
//!
//! A statistics request flows through
//! [`extract_context`] → [`build_base_query`] → [`QueryTranslator::translate`]
//! → [`RecordRepository::run_query`](crate::db::RecordRepository::run_query)
//! → [`normalize_rows`](crate::algorithms::normalize_rows) →
//! [`build_series_response`], dispatched by key through the
//! [`ProviderRegistry`].

pub mod chart;
pub mod context;
pub mod criteria;
pub mod error;
pub mod module_names;
pub mod preferences;
pub mod providers;
pub mod registry;
pub mod session;
pub mod translator;

pub use chart::{build_series_response, empty_series_response};
pub use context::extract_context;
pub use criteria::build_base_query;
pub use error::{ServiceError, ServiceResult};
pub use module_names::{ModuleNameMapper, StaticModuleNameMapper};
pub use preferences::{
    PreferenceMapper, PreferenceMappers, UserPreferenceHandler, UserPreferenceSource,
};
pub use providers::{build_registry, MonthlyCountProvider, ACCOUNTS_NEW_BY_MONTH};
pub use registry::{ProviderRegistry, StatisticsProvider};
pub use session::{LegacyRuntime, LegacySession, LocalRuntime};
pub use translator::{MonthlyCountSpec, QueryTranslator};
