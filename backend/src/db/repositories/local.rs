//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`RecordRepository`]
//! suitable for unit testing and local development. Records are stored as
//! JSON objects per table and structured queries are executed directly over
//! them, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::evaluate;
use crate::db::repository::{ErrorContext, RecordRepository, RepositoryError, RepositoryResult};
use crate::models::{QueryLimit, RecordQuery, RecordType, Row};

/// In-memory local repository.
///
/// # Example
/// ```
/// use crm_statistics::db::repositories::LocalRepository;
/// use crm_statistics::models::RecordType;
/// use serde_json::json;
///
/// let repo = LocalRepository::new();
/// repo.register_record_type(RecordType::new("Accounts", "accounts"));
/// repo.insert_record("accounts", json!({"name": "Acme"}).as_object().unwrap().clone());
/// assert_eq!(repo.record_count("accounts"), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    record_types: HashMap<String, RecordType>,
    tables: HashMap<String, Vec<Row>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            record_types: HashMap::new(),
            tables: HashMap::new(),
            is_healthy: true,
        }
    }
}

/// Seed file entry for one record type.
#[derive(Debug, Deserialize)]
struct SeedRecordType {
    table: String,
    #[serde(default)]
    records: Vec<Row>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Register a record type so [`RecordRepository::record_type`] resolves it.
    pub fn register_record_type(&self, record_type: RecordType) {
        let mut data = self.data.write();
        data.tables.entry(record_type.table.clone()).or_default();
        data.record_types
            .insert(record_type.legacy_name.clone(), record_type);
    }

    /// Append a record to a table, creating the table if needed.
    pub fn insert_record(&self, table: &str, record: Row) {
        self.data
            .write()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    /// Append several records to a table.
    pub fn insert_records(&self, table: &str, records: impl IntoIterator<Item = Row>) {
        self.data
            .write()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(records);
    }

    /// Number of records stored in a table.
    pub fn record_count(&self, table: &str) -> usize {
        self.data.read().tables.get(table).map_or(0, Vec::len)
    }

    /// Mark the store healthy or unhealthy. An unhealthy store fails every
    /// query with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Load record types and records from a JSON seed document:
    /// `{"Accounts": {"table": "accounts", "records": [...]}}`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records loaded
    /// * `Err(RepositoryError)` - If the document is not a valid seed
    pub fn load_seed(&self, json: &str) -> RepositoryResult<usize> {
        let seed: HashMap<String, SeedRecordType> = serde_json::from_str(json).map_err(|e| {
            RepositoryError::validation(format!("Invalid seed document: {}", e))
                .with_context(ErrorContext::new("load_seed"))
        })?;

        let mut loaded = 0;
        for (legacy_name, entry) in seed {
            loaded += entry.records.len();
            self.register_record_type(RecordType::new(legacy_name, entry.table.clone()));
            self.insert_records(&entry.table, entry.records);
        }

        debug!("Loaded {} seed records", loaded);
        Ok(loaded)
    }

    /// Create a repository seeded from a JSON file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read seed file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let repo = Self::new();
        repo.load_seed(&content)?;
        Ok(repo)
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    fn record_type(&self, legacy_name: &str) -> Option<RecordType> {
        self.data.read().record_types.get(legacy_name).cloned()
    }

    async fn run_query(
        &self,
        query: &RecordQuery,
        record_type: &RecordType,
        limit: QueryLimit,
    ) -> RepositoryResult<Vec<Row>> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(
                RepositoryError::connection("Local repository is unhealthy").with_context(
                    ErrorContext::new("run_query").for_record_type(&record_type.legacy_name),
                ),
            );
        }

        debug!("Running query for {}: {}", record_type.legacy_name, query);

        let records = data
            .tables
            .get(&query.from)
            .map(Vec::as_slice)
            .unwrap_or_default();

        evaluate::execute(query, records, limit)
            .map_err(|e| e.with_operation("run_query"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, Predicate};
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.register_record_type(RecordType::new("Accounts", "accounts"));
        repo.insert_records(
            "accounts",
            vec![
                row(json!({"name": "Acme", "account_type": "Customer"})),
                row(json!({"name": "Globex", "account_type": null})),
            ],
        );
        repo
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[test]
    fn test_record_type_resolution() {
        let repo = seeded();
        assert_eq!(
            repo.record_type("Accounts"),
            Some(RecordType::new("Accounts", "accounts"))
        );
        assert_eq!(repo.record_type("Leads"), None);
    }

    #[tokio::test]
    async fn test_run_query_filters() {
        let repo = seeded();
        let rt = repo.record_type("Accounts").unwrap();
        let query = RecordQuery::select_all("accounts")
            .and_where(Predicate::IsNotNull(Column::new("account_type")));

        let rows = repo.run_query(&query, &rt, QueryLimit::Unlimited).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("Acme"));
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_queries() {
        let repo = seeded();
        let rt = repo.record_type("Accounts").unwrap();
        repo.set_healthy(false);

        let err = repo
            .run_query(&RecordQuery::select_all("accounts"), &rt, QueryLimit::Unlimited)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_load_seed() {
        let repo = LocalRepository::new();
        let loaded = repo
            .load_seed(
                r#"{"Accounts": {"table": "accounts", "records": [{"name": "A"}, {"name": "B"}]},
                    "Leads": {"table": "leads"}}"#,
            )
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(repo.record_count("accounts"), 2);
        assert!(repo.record_type("Leads").is_some());
    }

    #[test]
    fn test_load_seed_rejects_invalid_document() {
        let repo = LocalRepository::new();
        let err = repo.load_seed(r#"{"Accounts": []}"#).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }
}
