/// Acronym operations
///
/// Reads are public; writes take the caller's [`Principal`]. Any
/// authenticated user may update or delete any acronym, and an update always
/// transfers ownership to the caller.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use til_shared::auth::middleware::Principal;
/// use til_shared::models::{acronym::AcronymData, user::CreateUser};
/// use til_shared::services::acronyms::AcronymService;
/// use til_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let user = store
///     .create_user(CreateUser { name: "Ada".into(), username: "ada".into(), password_hash: "h".into() })
///     .await?;
/// let principal = Principal { user_id: user.id, token_id: uuid::Uuid::new_v4() };
///
/// let acronyms = AcronymService::new(store);
/// let created = acronyms
///     .create(principal, AcronymData { short: "TIL".into(), long: "Today I Learned".into() })
///     .await?;
/// assert_eq!(acronyms.get(created.id).await?.user_id, user.id);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::{
    auth::middleware::Principal,
    models::{
        acronym::{Acronym, AcronymData, SaveAcronym},
        category::Category,
        user::PublicUser,
    },
    store::Store,
};

#[derive(Clone)]
pub struct AcronymService {
    store: Arc<dyn Store>,
}

impl AcronymService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn require(&self, id: Uuid) -> ServiceResult<Acronym> {
        self.store
            .find_acronym(id)
            .await?
            .ok_or(ServiceError::NotFound("Acronym"))
    }

    /// All acronyms, in the store's default ordering
    pub async fn list_all(&self) -> ServiceResult<Vec<Acronym>> {
        Ok(self.store.list_acronyms().await?)
    }

    /// Creates an acronym owned by the caller
    #[instrument(skip(self, data), fields(user_id = %principal.user_id))]
    pub async fn create(&self, principal: Principal, data: AcronymData) -> ServiceResult<Acronym> {
        data.validate()?;

        let acronym = self
            .store
            .create_acronym(SaveAcronym::owned_by(data, principal.user_id))
            .await?;

        info!(acronym_id = %acronym.id, short = %acronym.short, "acronym_created");
        Ok(acronym)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Acronym> {
        self.require(id).await
    }

    /// Overwrites short/long and reassigns the owner to the caller
    ///
    /// The ownership transfer is long-standing API behavior: the last editor
    /// becomes the owner.
    #[instrument(skip(self, data), fields(user_id = %principal.user_id))]
    pub async fn update(
        &self,
        principal: Principal,
        id: Uuid,
        data: AcronymData,
    ) -> ServiceResult<Acronym> {
        data.validate()?;

        let previous = self.require(id).await?;
        let updated = self
            .store
            .update_acronym(id, SaveAcronym::owned_by(data, principal.user_id))
            .await?
            .ok_or(ServiceError::NotFound("Acronym"))?;

        if previous.user_id != updated.user_id {
            info!(
                acronym_id = %id,
                previous_owner = %previous.user_id,
                "acronym_owner_reassigned"
            );
        }
        Ok(updated)
    }

    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn delete(&self, principal: Principal, id: Uuid) -> ServiceResult<()> {
        let acronym = self.require(id).await?;

        if !self.store.delete_acronym(acronym.id).await? {
            // Deleted concurrently between lookup and delete
            return Err(ServiceError::NotFound("Acronym"));
        }

        info!(acronym_id = %id, "acronym_deleted");
        Ok(())
    }

    /// Exact (case-sensitive) match on short OR long form
    ///
    /// # Errors
    ///
    /// `BadRequest` when `term` is absent or empty.
    pub async fn search(&self, term: Option<&str>) -> ServiceResult<Vec<Acronym>> {
        let term = term
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Missing search term".to_string()))?;

        debug!(term, "Searching acronyms");
        Ok(self.store.search_acronyms(term).await?)
    }

    pub async fn first(&self) -> ServiceResult<Acronym> {
        self.store
            .first_acronym()
            .await?
            .ok_or(ServiceError::NotFound("Acronym"))
    }

    /// All acronyms, ascending by short form
    pub async fn sorted(&self) -> ServiceResult<Vec<Acronym>> {
        Ok(self.store.list_acronyms_sorted().await?)
    }

    /// Owner of an acronym, redacted
    pub async fn get_owner(&self, id: Uuid) -> ServiceResult<PublicUser> {
        let acronym = self.require(id).await?;

        let owner = self
            .store
            .find_user(acronym.user_id)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        Ok(owner.into())
    }

    pub async fn list_categories(&self, id: Uuid) -> ServiceResult<Vec<Category>> {
        let acronym = self.require(id).await?;
        Ok(self.store.list_acronym_categories(acronym.id).await?)
    }

    /// Looks both records up concurrently; fails without mutating if either
    /// is missing
    async fn require_pair(&self, acronym_id: Uuid, category_id: Uuid) -> ServiceResult<(Acronym, Category)> {
        let category_lookup = async {
            self.store
                .find_category(category_id)
                .await?
                .ok_or(ServiceError::NotFound("Category"))
        };

        tokio::try_join!(self.require(acronym_id), category_lookup)
    }

    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn add_category(
        &self,
        principal: Principal,
        acronym_id: Uuid,
        category_id: Uuid,
    ) -> ServiceResult<()> {
        let (acronym, category) = self.require_pair(acronym_id, category_id).await?;

        self.store.attach_category(acronym.id, category.id).await?;

        info!(%acronym_id, %category_id, "category_attached");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn remove_category(
        &self,
        principal: Principal,
        acronym_id: Uuid,
        category_id: Uuid,
    ) -> ServiceResult<()> {
        let (acronym, category) = self.require_pair(acronym_id, category_id).await?;

        self.store.detach_category(acronym.id, category.id).await?;

        info!(%acronym_id, %category_id, "category_detached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::CategoryData;
    use crate::services::test_support;

    fn data(short: &str, long: &str) -> AcronymData {
        AcronymData {
            short: short.to_string(),
            long: long.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_to_caller() {
        let store = test_support::store();
        let (user, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let created = service.create(principal, data("OMG", "Oh My God")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.user_id, user.id);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let result = service.create(principal, data("", "Oh My God")).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_reassigns_owner_to_editor() {
        let store = test_support::store();
        let (_, creator) = test_support::user(&store, "ada").await;
        let (editor_user, editor) = test_support::user(&store, "bob").await;
        let service = AcronymService::new(store);

        let created = service.create(creator, data("OMG", "Oh My God")).await.unwrap();
        let updated = service
            .update(editor, created.id, data("OMG", "Oh My Gosh"))
            .await
            .unwrap();

        assert_eq!(updated.long, "Oh My Gosh");
        assert_eq!(updated.user_id, editor_user.id);
        assert_eq!(service.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.update(principal, missing, data("A", "B")).await,
            Err(ServiceError::NotFound("Acronym"))
        ));
        assert!(matches!(
            service.delete(principal, missing).await,
            Err(ServiceError::NotFound("Acronym"))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let created = service.create(principal, data("BRB", "Be Right Back")).await.unwrap();
        service.delete(principal, created.id).await.unwrap();

        assert!(matches!(
            service.get(created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_requires_term() {
        let service = AcronymService::new(test_support::store());

        assert!(matches!(service.search(None).await, Err(ServiceError::BadRequest(_))));
        assert!(matches!(service.search(Some("")).await, Err(ServiceError::BadRequest(_))));
        assert!(service.search(Some("LOL")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_short_or_long_exactly() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let lol = service.create(principal, data("LOL", "Laugh Out Loud")).await.unwrap();
        service.create(principal, data("LMAO", "LOL more")).await.unwrap();
        let long_match = service.create(principal, data("XD", "LOL")).await.unwrap();

        let found = service.search(Some("LOL")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&lol));
        assert!(found.contains(&long_match));
        assert!(found.iter().all(|a| a.short == "LOL" || a.long == "LOL"));
    }

    #[tokio::test]
    async fn test_first_on_empty_is_not_found() {
        let service = AcronymService::new(test_support::store());
        assert!(matches!(service.first().await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sorted_is_non_decreasing() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        for short in ["TTYL", "AFK", "OMG", "BRB", "AFK"] {
            service.create(principal, data(short, "x")).await.unwrap();
        }

        let sorted = service.sorted().await.unwrap();
        assert_eq!(sorted.len(), 5);
        assert!(sorted.windows(2).all(|w| w[0].short <= w[1].short));
    }

    #[tokio::test]
    async fn test_get_owner_is_redacted_user() {
        let store = test_support::store();
        let (user, principal) = test_support::user(&store, "ada").await;
        let service = AcronymService::new(store);

        let created = service.create(principal, data("IRL", "In Real Life")).await.unwrap();
        let owner = service.get_owner(created.id).await.unwrap();

        assert_eq!(owner, PublicUser::from(user));
    }

    #[tokio::test]
    async fn test_add_and_remove_category() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let category = store
            .create_category(CategoryData {
                name: "Funny".to_string(),
            })
            .await
            .unwrap();
        let service = AcronymService::new(store);

        let acronym = service.create(principal, data("LOL", "Laugh Out Loud")).await.unwrap();

        service.add_category(principal, acronym.id, category.id).await.unwrap();
        assert_eq!(
            service.list_categories(acronym.id).await.unwrap(),
            vec![category.clone()]
        );

        service.remove_category(principal, acronym.id, category.id).await.unwrap();
        assert!(service.list_categories(acronym.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_category_with_missing_side_does_not_mutate() {
        let store = test_support::store();
        let (_, principal) = test_support::user(&store, "ada").await;
        let category = store
            .create_category(CategoryData {
                name: "Funny".to_string(),
            })
            .await
            .unwrap();
        let service = AcronymService::new(store.clone());
        let acronym = service.create(principal, data("LOL", "Laugh Out Loud")).await.unwrap();

        assert!(matches!(
            service.add_category(principal, acronym.id, Uuid::new_v4()).await,
            Err(ServiceError::NotFound("Category"))
        ));
        assert!(matches!(
            service.add_category(principal, Uuid::new_v4(), category.id).await,
            Err(ServiceError::NotFound("Acronym"))
        ));

        assert!(store.list_acronym_categories(acronym.id).await.unwrap().is_empty());
        assert!(store.list_category_acronyms(category.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_categories_of_missing_acronym() {
        let service = AcronymService::new(test_support::store());
        assert!(matches!(
            service.list_categories(Uuid::new_v4()).await,
            Err(ServiceError::NotFound("Acronym"))
        ));
    }
}
