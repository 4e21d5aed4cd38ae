/// In-memory [`Store`] implementation
///
/// All tables live behind one `std::sync::Mutex`. The lock is never held
/// across an `.await`, so a plain mutex is enough even on a multi-threaded
/// runtime.
///
/// Rows are kept in `Vec`s, so insertion order doubles as the default
/// ordering, matching `created_at` ordering in [`PgStore`](super::postgres::PgStore).

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    acronym::{Acronym, SaveAcronym},
    category::{AcronymCategoryPivot, Category, CategoryData},
    token::{CreateToken, Token},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tokens: Vec<Token>,
    acronyms: Vec<Acronym>,
    categories: Vec<Category>,
    pivots: Vec<AcronymCategoryPivot>,
}

impl Tables {
    fn acronyms_in(&self, ids: impl Iterator<Item = Uuid>) -> Vec<Acronym> {
        ids.filter_map(|id| self.acronyms.iter().find(|a| a.id == id).cloned())
            .collect()
    }
}

/// Process-local store, see the module docs
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave a row half-written,
        // so a poisoned lock is still safe to use.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables();

        if tables.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict(format!(
                "username '{}' already exists",
                data.username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            username: data.username,
            password_hash: data.password_hash,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users_by_username(&self) -> StoreResult<Vec<User>> {
        let mut users = self.tables().users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn list_user_acronyms(&self, user_id: Uuid) -> StoreResult<Vec<Acronym>> {
        Ok(self
            .tables()
            .acronyms
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_token(&self, data: CreateToken) -> StoreResult<Token> {
        let mut tables = self.tables();

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::ForeignKey(format!("user {} does not exist", data.user_id)));
        }
        if tables.tokens.iter().any(|t| t.value_hash == data.value_hash) {
            return Err(StoreError::Conflict("token value already issued".to_string()));
        }

        let token = Token {
            id: Uuid::new_v4(),
            value_hash: data.value_hash,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        tables.tokens.push(token.clone());

        Ok(token)
    }

    async fn find_token_by_hash(&self, value_hash: &str) -> StoreResult<Option<Token>> {
        Ok(self
            .tables()
            .tokens
            .iter()
            .find(|t| t.value_hash == value_hash)
            .cloned())
    }

    async fn count_user_tokens(&self, user_id: Uuid) -> StoreResult<i64> {
        let count = self
            .tables()
            .tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .count();
        Ok(count as i64)
    }

    async fn list_acronyms(&self) -> StoreResult<Vec<Acronym>> {
        Ok(self.tables().acronyms.clone())
    }

    async fn create_acronym(&self, data: SaveAcronym) -> StoreResult<Acronym> {
        let mut tables = self.tables();

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::ForeignKey(format!("user {} does not exist", data.user_id)));
        }

        let acronym = Acronym {
            id: Uuid::new_v4(),
            short: data.short,
            long: data.long,
            user_id: data.user_id,
        };
        tables.acronyms.push(acronym.clone());

        Ok(acronym)
    }

    async fn find_acronym(&self, id: Uuid) -> StoreResult<Option<Acronym>> {
        Ok(self.tables().acronyms.iter().find(|a| a.id == id).cloned())
    }

    async fn update_acronym(&self, id: Uuid, data: SaveAcronym) -> StoreResult<Option<Acronym>> {
        let mut tables = self.tables();

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::ForeignKey(format!("user {} does not exist", data.user_id)));
        }

        let Some(acronym) = tables.acronyms.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        acronym.short = data.short;
        acronym.long = data.long;
        acronym.user_id = data.user_id;

        Ok(Some(acronym.clone()))
    }

    async fn delete_acronym(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables();

        let before = tables.acronyms.len();
        tables.acronyms.retain(|a| a.id != id);
        let deleted = tables.acronyms.len() < before;

        if deleted {
            tables.pivots.retain(|p| p.acronym_id != id);
        }

        Ok(deleted)
    }

    async fn search_acronyms(&self, term: &str) -> StoreResult<Vec<Acronym>> {
        Ok(self
            .tables()
            .acronyms
            .iter()
            .filter(|a| a.short == term || a.long == term)
            .cloned()
            .collect())
    }

    async fn first_acronym(&self) -> StoreResult<Option<Acronym>> {
        Ok(self.tables().acronyms.first().cloned())
    }

    async fn list_acronyms_sorted(&self) -> StoreResult<Vec<Acronym>> {
        let mut acronyms = self.tables().acronyms.clone();
        // Stable, so equal short forms keep insertion order
        acronyms.sort_by(|a, b| a.short.as_bytes().cmp(b.short.as_bytes()));
        Ok(acronyms)
    }

    async fn create_category(&self, data: CategoryData) -> StoreResult<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: data.name,
        };
        self.tables().categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables().categories.clone())
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.tables().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn attach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables();

        // Either side may have been deleted since the caller looked it up
        let acronym_exists = tables.acronyms.iter().any(|a| a.id == acronym_id);
        let category_exists = tables.categories.iter().any(|c| c.id == category_id);
        if !acronym_exists || !category_exists {
            tracing::warn!(%acronym_id, %category_id, "Ignoring attach to a missing row");
            return Ok(());
        }

        let pivot = AcronymCategoryPivot::new(acronym_id, category_id);
        if !tables.pivots.contains(&pivot) {
            tables.pivots.push(pivot);
        }

        Ok(())
    }

    async fn detach_category(&self, acronym_id: Uuid, category_id: Uuid) -> StoreResult<()> {
        let pivot = AcronymCategoryPivot::new(acronym_id, category_id);
        self.tables().pivots.retain(|p| *p != pivot);
        Ok(())
    }

    async fn list_acronym_categories(&self, acronym_id: Uuid) -> StoreResult<Vec<Category>> {
        let tables = self.tables();
        Ok(tables
            .pivots
            .iter()
            .filter(|p| p.acronym_id == acronym_id)
            .filter_map(|p| tables.categories.iter().find(|c| c.id == p.category_id).cloned())
            .collect())
    }

    async fn list_category_acronyms(&self, category_id: Uuid) -> StoreResult<Vec<Acronym>> {
        let tables = self.tables();
        let ids = tables
            .pivots
            .iter()
            .filter(|p| p.category_id == category_id)
            .map(|p| p.acronym_id);
        Ok(tables.acronyms_in(ids))
    }
}
