/// Middleware for the API server
///
/// Bearer authentication lives in `til_shared::auth::middleware`; this crate
/// only adds response hardening.

pub mod security;
