/// Authentication
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Bearer token generation and SHA-256 hashing
/// - [`provider`]: Verifies basic credentials and bearer tokens against the store
/// - [`middleware`]: Axum extractors and the bearer-token middleware
///
/// # Flow
///
/// 1. `POST /api/users/login` with `Authorization: Basic ...` ->
///    [`provider::AuthProvider::authenticate_basic`] -> a new token is issued
/// 2. Protected routes with `Authorization: Bearer <token>` ->
///    [`middleware::bearer_auth_middleware`] -> [`middleware::Principal`] in
///    request extensions
///
/// # Example
///
/// ```
/// use til_shared::auth::password::{hash_password, verify_password};
/// use til_shared::auth::token::{generate_token, verify_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (value, value_hash) = generate_token();
/// assert!(verify_token(&value, &value_hash));
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod provider;
pub mod token;
