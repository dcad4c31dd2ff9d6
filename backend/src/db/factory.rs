//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use log::info;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{RecordRepository, RepositoryError, RepositoryResult};
use crate::config::AppConfig;
use crate::models::RecordType;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("local", "memory")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use crm_statistics::db::{RecordRepository, RepositoryFactory};
///
/// let repo = RepositoryFactory::create_local();
/// assert!(repo.record_type("Accounts").is_some());
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an in-memory local repository with the default CRM record
    /// types registered and no records.
    pub fn create_local() -> Arc<LocalRepository> {
        let repo = LocalRepository::new();
        for (legacy_name, table) in default_record_types() {
            repo.register_record_type(RecordType::new(legacy_name, table));
        }
        Arc::new(repo)
    }

    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> Arc<dyn RecordRepository> {
        match repo_type {
            RepositoryType::Local => Self::create_local() as Arc<dyn RecordRepository>,
        }
    }

    /// Create repository from application configuration, loading the seed
    /// file when one is configured.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn RecordRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If the type is invalid or the seed cannot be loaded
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Arc<dyn RecordRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Local => {
                let repo = Self::create_local();
                if let Some(seed_file) = &config.repository.seed_file {
                    let content = std::fs::read_to_string(seed_file).map_err(|e| {
                        RepositoryError::configuration(format!(
                            "Failed to read seed file {}: {}",
                            seed_file.display(),
                            e
                        ))
                    })?;
                    let loaded = repo.load_seed(&content)?;
                    info!("Loaded {} records from {}", loaded, seed_file.display());
                }
                Ok(repo as Arc<dyn RecordRepository>)
            }
        }
    }
}

/// Legacy module names and their tables.
fn default_record_types() -> [(&'static str, &'static str); 5] {
    [
        ("Accounts", "accounts"),
        ("Contacts", "contacts"),
        ("Leads", "leads"),
        ("Opportunities", "opportunities"),
        ("Cases", "cases"),
    ]
}
