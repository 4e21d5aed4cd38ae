/// Category operations
///
/// Categories are free-form labels. Linking them to acronyms goes through
/// [`AcronymService`](super::acronyms::AcronymService).

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::{
    auth::middleware::Principal,
    models::{
        acronym::Acronym,
        category::{Category, CategoryData},
    },
    store::Store,
};

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn Store>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn require(&self, id: Uuid) -> ServiceResult<Category> {
        self.store
            .find_category(id)
            .await?
            .ok_or(ServiceError::NotFound("Category"))
    }

    #[instrument(skip(self, data), fields(user_id = %principal.user_id))]
    pub async fn create(&self, principal: Principal, data: CategoryData) -> ServiceResult<Category> {
        data.validate()?;

        let category = self.store.create_category(data).await?;

        info!(category_id = %category.id, name = %category.name, "category_created");
        Ok(category)
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Category> {
        self.require(id).await
    }

    /// Acronyms linked to a category
    pub async fn list_acronyms(&self, id: Uuid) -> ServiceResult<Vec<Acronym>> {
        let category = self.require(id).await?;
        Ok(self.store.list_category_acronyms(category.id).await?)
    }
}
