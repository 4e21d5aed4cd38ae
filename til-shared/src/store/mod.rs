/// Persistence interface
///
/// Every service talks to storage through the [`Store`] trait, injected as an
/// `Arc<dyn Store>`. There are two implementations:
///
/// - [`postgres::PgStore`]: PostgreSQL via a `sqlx` connection pool
/// - [`memory::MemoryStore`]: in-process tables behind a mutex, used by tests
///   and by `STORE_BACKEND=memory`
///
/// Both implementations follow the same observable rules:
///
/// - "Default ordering" for acronyms is insertion order
/// - `list_acronyms_sorted` orders by `short` using byte-wise comparison
/// - Usernames are unique; a duplicate is [`StoreError::Conflict`]
/// - Attaching an existing acronym/category pair is a no-op, and so is
///   detaching a missing one
/// - Deleting an acronym removes its category associations
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use til_shared::store::{memory::MemoryStore, Store};
/// use til_shared::models::user::CreateUser;
///
/// # async fn example() -> Result<(), til_shared::store::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let user = store
///     .create_user(CreateUser {
///         name: "Ada".into(),
///         username: "ada".into(),
///         password_hash: "$argon2id$...".into(),
///     })
///     .await?;
/// assert_eq!(store.find_user(user.id).await?, Some(user));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    acronym::{Acronym, SaveAcronym},
    category::{Category, CategoryData},
    token::{CreateToken, Token},
    user::{CreateUser, User},
};

/// Errors surfaced by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated (e.g. duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced row does not exist
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Async persistence operations over users, tokens, acronyms and categories
#[async_trait]
pub trait Store: Send + Sync {
    /// Checks that the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;

    // Users

    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// All users, ascending by username
    async fn list_users_by_username(&self) -> StoreResult<Vec<User>>;

    /// Acronyms owned by a user, in default ordering
    async fn list_user_acronyms(&self, user_id: Uuid) -> StoreResult<Vec<Acronym>>;

    // Tokens

    async fn create_token(&self, data: CreateToken) -> StoreResult<Token>;

    async fn find_token_by_hash(&self, value_hash: &str) -> StoreResult<Option<Token>>;

    async fn count_user_tokens(&self, user_id: Uuid) -> StoreResult<i64>;

    // Acronyms

    /// All acronyms, in default ordering
    async fn list_acronyms(&self) -> StoreResult<Vec<Acronym>>;

    async fn create_acronym(&self, data: SaveAcronym) -> StoreResult<Acronym>;

    async fn find_acronym(&self, id: Uuid) -> StoreResult<Option<Acronym>>;

    /// Overwrites every column of an acronym; `None` if it does not exist
    async fn update_acronym(&self, id: Uuid, data: SaveAcronym) -> StoreResult<Option<Acronym>>;

    /// Returns false if the acronym did not exist
    async fn delete_acronym(&self, id: Uuid) -> StoreResult<bool>;

    /// Acronyms whose short OR long form equals `term` exactly
    async fn search_acronyms(&self, term: &str) -> StoreResult<Vec<Acronym>>;

    /// First acronym in default ordering
    async fn first_acronym(&self) -> StoreResult<Option<Acronym>>;

    /// All acronyms, ascending by short form
    async fn list_acronyms_sorted(&self) -> StoreResult<Vec<Acronym>>;

    // Categories

    async fn create_category(&self, data: CategoryData) -> StoreResult<Category>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    // Acronym/category association

    /// Idempotent: attaching an existing pair is a no-op
    async fn attach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()>;

    /// Idempotent: detaching a missing pair is a no-op
    async fn detach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()>;

    async fn list_acronym_categories(&self, acronym_id: Uuid) -> StoreResult<Vec<Category>>;

    async fn list_category_acronyms(&self, category_id: Uuid) -> StoreResult<Vec<Acronym>>;
}
