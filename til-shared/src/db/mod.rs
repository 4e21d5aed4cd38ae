/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// Queries themselves live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
