//! # TIL Shared Library
//!
//! Domain types, persistence, authentication, and service logic for the
//! TIL acronym API.
//!
//! ## Module Organization
//!
//! - `models`: Records and request payloads (users, tokens, acronyms, categories)
//! - `store`: Persistence trait with PostgreSQL and in-memory implementations
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, bearer tokens, and Axum auth extractors
//! - `services`: One method per API operation, over an injected store

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
