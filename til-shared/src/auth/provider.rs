/// Credential and token verification
///
/// [`AuthProvider`] is the single place that turns presented credentials into
/// an identity:
///
/// - bearer token -> [`Principal`] (every protected write)
/// - username + password -> [`User`] (login only)
///
/// It is cheap to clone and is carried in the application state.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    middleware::{AuthError, BasicCredentials, Principal},
    password, token,
};
use crate::{models::user::User, store::Store};

/// Verifies basic credentials and bearer tokens against the store
#[derive(Clone)]
pub struct AuthProvider {
    store: Arc<dyn Store>,
}

impl AuthProvider {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolves a bearer token value to the principal it was issued for
    ///
    /// # Errors
    ///
    /// `InvalidToken` if the value is malformed, unknown, or its user no
    /// longer exists.
    #[instrument(skip_all)]
    pub async fn authenticate_bearer(&self, value: &str) -> Result<Principal, AuthError> {
        if !token::validate_token_format(value) {
            debug!("Rejected malformed bearer token");
            return Err(AuthError::InvalidToken);
        }

        let stored = self
            .store
            .find_token_by_hash(&token::hash_token(value))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = self
            .store
            .find_user(stored.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        debug!(user_id = %user.id, token_id = %stored.id, "Bearer token accepted");

        Ok(Principal {
            user_id: user.id,
            token_id: stored.id,
        })
    }

    /// Checks a username/password pair against the stored Argon2id hash
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown username or wrong password; the two
    /// cases are indistinguishable to the caller.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn authenticate_basic(&self, credentials: &BasicCredentials) -> Result<User, AuthError> {
        let user = self
            .store
            .find_user_by_username(&credentials.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(&credentials.password, &user.password_hash)? {
            debug!("Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}
