//! Errors surfaced by the statistics and preference services.

use crate::db::repository::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Hard failures of a service call.
///
/// Context validation problems and unknown record types are not errors: the
/// statistics pipeline answers them with an empty response.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No provider is registered under the requested key.
    #[error("Unknown statistic: {0}")]
    UnknownStatistic(String),

    /// The preference category is not exposed to the front end.
    #[error("User preference not found: {0}")]
    PreferenceNotFound(String),

    /// The legacy runtime refused to open a session.
    #[error("Legacy session error: {0}")]
    Session(String),

    /// The record store failed while executing a query.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// True when the caller asked for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::UnknownStatistic(_) | ServiceError::PreferenceNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        fn run() -> ServiceResult<()> {
            Err(RepositoryError::connection("store offline"))?;
            Ok(())
        }

        let err = run().unwrap_err();
        assert!(matches!(err, ServiceError::Repository(_)));
        assert!(err.to_string().contains("store offline"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(ServiceError::UnknownStatistic("x".into()).is_not_found());
        assert!(ServiceError::PreferenceNotFound("dbconfig".into()).is_not_found());
        assert!(!ServiceError::Session("locked".into()).is_not_found());
    }
}
