//! # CRM Statistics Backend
//!
//! Chart-ready statistics over CRM records.
//!
//! A statistic is computed by one provider in a single pass: the incoming
//! generic query is reduced to a module, record id, criteria and sort; the
//! criteria become a base record query; the provider rewrites it into its
//! aggregate; the record store executes it; and the sparse result rows are
//! normalized into zero-filled series over a fixed axis (months of the year
//! for the built-in providers).
//!
//! ## Architecture
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: Query context, structured query fragments, axis and row types
//! - [`algorithms`]: Series normalization
//! - [`db`]: Record store access, repository pattern and local store
//! - [`services`]: Statistics pipeline, provider registry, user preferences
//! - [`config`]: TOML configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific data types
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
