/// User operations
///
/// Signup is itself a protected operation: only an existing user can create
/// another. The first account on a fresh deployment comes from
/// [`UserService::ensure_admin`], called once at startup.

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::{
    auth::{middleware::Principal, password, token},
    models::{
        acronym::Acronym,
        token::{CreateToken, IssuedToken},
        user::{CreateUser, CreateUserData, PublicUser, User},
    },
    store::Store,
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn require(&self, id: Uuid) -> ServiceResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn insert(&self, data: CreateUserData) -> ServiceResult<User> {
        data.validate()?;

        let password_hash = password::hash_password(&data.password)?;
        let user = self
            .store
            .create_user(CreateUser {
                name: data.name,
                username: data.username,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Creates a user with an Argon2id-hashed password
    ///
    /// # Errors
    ///
    /// - `Validation` for empty fields or a password under 8 characters
    /// - `Conflict` if the username is taken
    #[instrument(skip(self, data), fields(created_by = %principal.user_id, username = %data.username))]
    pub async fn create(&self, principal: Principal, data: CreateUserData) -> ServiceResult<PublicUser> {
        let user = self.insert(data).await?;

        info!(user_id = %user.id, "user_created");
        Ok(user.into())
    }

    /// All users, ascending by username
    pub async fn list_all(&self) -> ServiceResult<Vec<PublicUser>> {
        let users = self.store.list_users_by_username().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<PublicUser> {
        Ok(self.require(id).await?.into())
    }

    /// Acronyms owned by a user
    pub async fn list_acronyms(&self, id: Uuid) -> ServiceResult<Vec<Acronym>> {
        let user = self.require(id).await?;
        Ok(self.store.list_user_acronyms(user.id).await?)
    }

    /// Issues a new bearer token for an already-authenticated user
    ///
    /// Every call persists a fresh token; earlier tokens stay valid.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn login(&self, user: &User) -> ServiceResult<IssuedToken> {
        let (value, value_hash) = token::generate_token();

        let stored = self
            .store
            .create_token(CreateToken {
                value_hash,
                user_id: user.id,
            })
            .await?;

        info!(token_id = %stored.id, "token_issued");
        Ok(IssuedToken::new(stored, value))
    }

    /// Creates the bootstrap account if no user has `username` yet
    ///
    /// Returns `true` when a user was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, username: &str, password: &str) -> ServiceResult<bool> {
        if self.store.find_user_by_username(username).await?.is_some() {
            info!("Admin user already present");
            return Ok(false);
        }

        let user = self
            .insert(CreateUserData {
                name: "Admin".to_string(),
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!(user_id = %user.id, "admin_user_created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{middleware::BasicCredentials, provider::AuthProvider};
    use crate::services::test_support;

    fn signup(username: &str) -> CreateUserData {
        CreateUserData {
            name: "Grace Hopper".to_string(),
            username: username.to_string(),
            password: "cobol-1959".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "root").await;
        let service = UserService::new(store.clone());

        let created = service.create(principal, signup("grace")).await.unwrap();
        assert_eq!(created.username, "grace");

        let row = store.find_user(created.id).await.unwrap().unwrap();
        assert_ne!(row.password_hash, "cobol-1959");
        assert!(password::verify_password("cobol-1959", &row.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_username_conflicts() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "root").await;
        let service = UserService::new(store);

        service.create(principal, signup("grace")).await.unwrap();
        assert!(matches!(
            service.create(principal, signup("grace")).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "root").await;
        let service = UserService::new(store);

        let data = CreateUserData {
            password: "short".to_string(),
            ..signup("grace")
        };
        assert!(matches!(
            service.create(principal, data).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_username() {
        let store = test_support::store();
        for name in ["mallory", "alice", "bob"] {
            test_support::user(&store, name).await;
        }
        let service = UserService::new(store);

        let names: Vec<String> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "mallory"]);
    }

    #[tokio::test]
    async fn test_get_and_list_acronyms_of_missing_user() {
        let service = UserService::new(test_support::store());

        assert!(matches!(
            service.get(Uuid::new_v4()).await,
            Err(ServiceError::NotFound("User"))
        ));
        assert!(matches!(
            service.list_acronyms(Uuid::new_v4()).await,
            Err(ServiceError::NotFound("User"))
        ));
    }

    #[tokio::test]
    async fn test_login_issues_distinct_working_tokens() {
        let store = test_support::store();
        let (user, _) = test_support::user(&store, "grace").await;
        let service = UserService::new(store.clone());
        let auth = AuthProvider::new(store.clone());

        let first = service.login(&user).await.unwrap();
        let second = service.login(&user).await.unwrap();

        assert_ne!(first.value, second.value);
        assert_eq!(first.value.len(), token::TOKEN_LENGTH);
        assert_eq!(store.count_user_tokens(user.id).await.unwrap(), 2);

        for issued in [first, second] {
            let principal = auth.authenticate_bearer(&issued.value).await.unwrap();
            assert_eq!(principal.user_id, user.id);
        }
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = test_support::store();
        let service = UserService::new(store.clone());

        assert!(service.ensure_admin("admin", "bootstrap-pass").await.unwrap());
        assert!(!service.ensure_admin("admin", "another-pass").await.unwrap());
        assert_eq!(store.list_users_by_username().await.unwrap().len(), 1);

        let auth = AuthProvider::new(store);
        let admin = auth
            .authenticate_basic(&BasicCredentials {
                username: "admin".to_string(),
                password: "bootstrap-pass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(admin.username, "admin");
    }
}
