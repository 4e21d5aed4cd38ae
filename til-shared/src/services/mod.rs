/// Request-level operations
///
/// Each service wraps an injected `Arc<dyn Store>` and exposes one method per
/// API operation. Services hold no other state; every call is independent.
///
/// - [`acronyms::AcronymService`]: CRUD, search, sort, owner and category links
/// - [`users::UserService`]: signup, listing, per-user acronyms, login
/// - [`categories::CategoryService`]: CRUD-lite and per-category acronyms
///
/// Protected operations take the caller's [`Principal`](crate::auth::middleware::Principal)
/// explicitly.

pub mod acronyms;
pub mod categories;
pub mod users;

use crate::{auth::password::PasswordError, store::StoreError};

/// Error type shared by all services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Looked-up record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Required input missing or unusable
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Payload failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Unique constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Any other store failure
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => ServiceError::Conflict(what),
            other => ServiceError::Store(other),
        }
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::auth::middleware::Principal;
    use crate::models::user::{CreateUser, User};
    use crate::store::{memory::MemoryStore, Store};

    pub fn store() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new())
    }

    /// Inserts a user directly (no hashing) and a principal for it
    pub async fn user(store: &Arc<dyn Store>, username: &str) -> (User, Principal) {
        let user = store
            .create_user(CreateUser {
                name: format!("{} name", username),
                username: username.to_string(),
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap();
        let principal = Principal {
            user_id: user.id,
            token_id: Uuid::new_v4(),
        };
        (user, principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_becomes_service_conflict() {
        let err = ServiceError::from(StoreError::Conflict("users_username_key".to_string()));
        assert!(matches!(err, ServiceError::Conflict(c) if c == "users_username_key"));

        let err = ServiceError::from(StoreError::ForeignKey("acronyms_user_id_fkey".to_string()));
        assert!(matches!(err, ServiceError::Store(StoreError::ForeignKey(_))));
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(ServiceError::NotFound("Acronym").to_string(), "Acronym not found");
    }
}
