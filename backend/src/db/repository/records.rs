//! Record repository trait: the query-executor boundary of the statistics
//! pipeline.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{QueryLimit, RecordQuery, RecordType, Row};

/// Repository trait for record-store queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Resolve a legacy record type name (e.g. `Accounts`) to a queryable
    /// handle.
    ///
    /// # Returns
    /// * `Some(RecordType)` - The store knows the record type
    /// * `None` - Unknown record type
    fn record_type(&self, legacy_name: &str) -> Option<RecordType>;

    /// Execute a structured query against a record type.
    ///
    /// # Arguments
    /// * `query` - The structured query to run
    /// * `record_type` - Handle obtained from [`RecordRepository::record_type`]
    /// * `limit` - [`QueryLimit::Unlimited`] to return every row
    ///
    /// # Returns
    /// * `Ok(Vec<Row>)` - Result rows keyed by projection output name
    /// * `Err(RepositoryError)` - If the store cannot run the query
    async fn run_query(
        &self,
        query: &RecordQuery,
        record_type: &RecordType,
        limit: QueryLimit,
    ) -> RepositoryResult<Vec<Row>>;
}
