/// PostgreSQL [`Store`] implementation
///
/// Thin wrapper around a `sqlx::PgPool`. Queries use runtime-checked
/// `query_as` so the crate builds without a live database.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use til_shared::db::pool::{create_pool, DatabaseConfig};
/// use til_shared::store::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///
/// let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
/// let acronyms = store.list_acronyms().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    acronym::{Acronym, SaveAcronym},
    category::{Category, CategoryData},
    token::{CreateToken, Token},
    user::{CreateUser, User},
};

const USER_COLUMNS: &str = "id, name, username, password_hash";
const ACRONYM_COLUMNS: &str = "id, short, long, user_id";

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps constraint violations onto [`StoreError`] variants
fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Conflict(constraint);
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or("foreign key").to_string();
            return StoreError::ForeignKey(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn list_users_by_username(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users ORDER BY username COLLATE "C" ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_user_acronyms(&self, user_id: Uuid) -> StoreResult<Vec<Acronym>> {
        let acronyms = sqlx::query_as::<_, Acronym>(&format!(
            "SELECT {ACRONYM_COLUMNS} FROM acronyms WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(acronyms)
    }

    async fn create_token(&self, data: CreateToken) -> StoreResult<Token> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (value_hash, user_id)
            VALUES ($1, $2)
            RETURNING id, value_hash, user_id, created_at
            "#,
        )
        .bind(data.value_hash)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(token)
    }

    async fn find_token_by_hash(&self, value_hash: &str) -> StoreResult<Option<Token>> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            SELECT id, value_hash, user_id, created_at
            FROM tokens
            WHERE value_hash = $1
            "#,
        )
        .bind(value_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn count_user_tokens(&self, user_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_acronyms(&self) -> StoreResult<Vec<Acronym>> {
        let acronyms = sqlx::query_as::<_, Acronym>(&format!(
            "SELECT {ACRONYM_COLUMNS} FROM acronyms ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(acronyms)
    }

    async fn create_acronym(&self, data: SaveAcronym) -> StoreResult<Acronym> {
        let acronym = sqlx::query_as::<_, Acronym>(&format!(
            "INSERT INTO acronyms (short, long, user_id) VALUES ($1, $2, $3) RETURNING {ACRONYM_COLUMNS}"
        ))
        .bind(data.short)
        .bind(data.long)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(acronym)
    }

    async fn find_acronym(&self, id: Uuid) -> StoreResult<Option<Acronym>> {
        let acronym =
            sqlx::query_as::<_, Acronym>(&format!("SELECT {ACRONYM_COLUMNS} FROM acronyms WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(acronym)
    }

    async fn update_acronym(&self, id: Uuid, data: SaveAcronym) -> StoreResult<Option<Acronym>> {
        let acronym = sqlx::query_as::<_, Acronym>(&format!(
            "UPDATE acronyms SET short = $2, long = $3, user_id = $4 WHERE id = $1 RETURNING {ACRONYM_COLUMNS}"
        ))
        .bind(id)
        .bind(data.short)
        .bind(data.long)
        .bind(data.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(acronym)
    }

    async fn delete_acronym(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM acronyms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_acronyms(&self, term: &str) -> StoreResult<Vec<Acronym>> {
        let acronyms = sqlx::query_as::<_, Acronym>(&format!(
            "SELECT {ACRONYM_COLUMNS} FROM acronyms WHERE short = $1 OR long = $1 ORDER BY created_at, id"
        ))
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(acronyms)
    }

    async fn first_acronym(&self) -> StoreResult<Option<Acronym>> {
        let acronym = sqlx::query_as::<_, Acronym>(&format!(
            "SELECT {ACRONYM_COLUMNS} FROM acronyms ORDER BY created_at, id LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(acronym)
    }

    async fn list_acronyms_sorted(&self) -> StoreResult<Vec<Acronym>> {
        let acronyms = sqlx::query_as::<_, Acronym>(&format!(
            r#"SELECT {ACRONYM_COLUMNS} FROM acronyms ORDER BY short COLLATE "C" ASC, created_at, id"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(acronyms)
    }

    async fn create_category(&self, data: CategoryData) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(category)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn attach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO acronym_category_pivot (acronym_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT (acronym_id, category_id) DO NOTHING
            "#,
        )
        .bind(acronym_id)
        .bind(category_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn detach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM acronym_category_pivot WHERE acronym_id = $1 AND category_id = $2")
            .bind(acronym_id)
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_acronym_categories(&self, acronym_id: Uuid) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN acronym_category_pivot p ON p.category_id = c.id
            WHERE p.acronym_id = $1
            ORDER BY p.created_at, c.id
            "#,
        )
        .bind(acronym_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn list_category_acronyms(&self, category_id: Uuid) -> StoreResult<Vec<Acronym>> {
        let acronyms = sqlx::query_as::<_, Acronym>(
            r#"
            SELECT a.id, a.short, a.long, a.user_id
            FROM acronyms a
            JOIN acronym_category_pivot p ON p.acronym_id = a.id
            WHERE p.category_id = $1
            ORDER BY p.created_at, a.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(acronyms)
    }
}
