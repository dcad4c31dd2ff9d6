//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `evaluate`: Structured query evaluation over JSON records, used by `local`
mod evaluate;
pub mod local;

pub use local::LocalRepository;
