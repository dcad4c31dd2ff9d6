//! Repository traits and error types.

pub mod error;
pub mod records;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use records::RecordRepository;
