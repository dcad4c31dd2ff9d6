//! Record store access for the statistics pipeline.
//!
//! This module provides the query-executor boundary via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Statistics providers (services::providers)             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │  RecordQuery + RecordType
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository::RecordRepository)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use crm_statistics::config::AppConfig;
//! use crm_statistics::db::{RecordRepository, RepositoryFactory};
//!
//! let repo = RepositoryFactory::from_config(&AppConfig::default()).unwrap();
//! assert!(repo.record_type("Accounts").is_some());
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, RecordRepository, RepositoryError, RepositoryResult};

/// Check that the record store is reachable.
pub async fn health_check(repo: &dyn RecordRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
