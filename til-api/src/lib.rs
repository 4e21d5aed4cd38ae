//! # TIL API Server Library
//!
//! HTTP surface for the acronym service. The binary in `main.rs` only loads
//! configuration, picks a store, and serves [`app::build_router`].
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
