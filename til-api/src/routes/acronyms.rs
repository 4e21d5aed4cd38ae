/// Acronym endpoints
///
/// Reads are public. Writes require `Authorization: Bearer <token>`; the
/// bearer layer puts a [`Principal`] in the request before these handlers run.
///
/// # Example
///
/// ```text
/// POST /api/acronyms
/// Authorization: Bearer 5kTn...
///
/// {"short": "TIL", "long": "Today I Learned"}
/// ```
///
/// Response:
/// ```json
/// {"id": "...", "short": "TIL", "long": "Today I Learned", "user_id": "..."}
/// ```

use super::parse_id;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use til_shared::{
    auth::middleware::Principal,
    models::{
        acronym::{Acronym, AcronymData},
        category::Category,
        user::PublicUser,
    },
};

/// Query string for `GET /api/acronyms/search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
}

/// `GET /api/acronyms`
pub async fn list_acronyms(State(state): State<AppState>) -> ApiResult<Json<Vec<Acronym>>> {
    Ok(Json(state.acronyms.list_all().await?))
}

/// `POST /api/acronyms`
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 422 if `short` or `long` is empty
pub async fn create_acronym(
    State(state): State<AppState>,
    principal: Principal,
    Json(data): Json<AcronymData>,
) -> ApiResult<Json<Acronym>> {
    Ok(Json(state.acronyms.create(principal, data).await?))
}

/// `GET /api/acronyms/:id`
pub async fn get_acronym(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Acronym>> {
    let id = parse_id(&id, "Acronym")?;
    Ok(Json(state.acronyms.get(id).await?))
}

/// `PUT /api/acronyms/:id`
///
/// The caller becomes the acronym's owner.
pub async fn update_acronym(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(data): Json<AcronymData>,
) -> ApiResult<Json<Acronym>> {
    let id = parse_id(&id, "Acronym")?;
    Ok(Json(state.acronyms.update(principal, id, data).await?))
}

/// `DELETE /api/acronyms/:id` (204 on success)
pub async fn delete_acronym(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "Acronym")?;
    state.acronyms.delete(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/acronyms/search?term=...`
///
/// # Errors
///
/// 400 when `term` is missing or empty.
pub async fn search_acronyms(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Acronym>>> {
    Ok(Json(state.acronyms.search(params.term.as_deref()).await?))
}

/// `GET /api/acronyms/first`
pub async fn first_acronym(State(state): State<AppState>) -> ApiResult<Json<Acronym>> {
    Ok(Json(state.acronyms.first().await?))
}

/// `GET /api/acronyms/sorted`
pub async fn sorted_acronyms(State(state): State<AppState>) -> ApiResult<Json<Vec<Acronym>>> {
    Ok(Json(state.acronyms.sorted().await?))
}

/// `GET /api/acronyms/:id/user`
pub async fn get_acronym_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PublicUser>> {
    let id = parse_id(&id, "Acronym")?;
    Ok(Json(state.acronyms.get_owner(id).await?))
}

/// `GET /api/acronyms/:id/categories`
pub async fn list_acronym_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Category>>> {
    let id = parse_id(&id, "Acronym")?;
    Ok(Json(state.acronyms.list_categories(id).await?))
}

/// `POST /api/acronyms/:id/categories/:category_id` (201 on success)
///
/// Attaching an already-linked category is a no-op that still returns 201.
pub async fn add_category(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, category_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "Acronym")?;
    let category_id = parse_id(&category_id, "Category")?;

    state.acronyms.add_category(principal, id, category_id).await?;
    Ok(StatusCode::CREATED)
}

/// `DELETE /api/acronyms/:id/categories/:category_id` (204 on success)
pub async fn remove_category(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, category_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "Acronym")?;
    let category_id = parse_id(&category_id, "Category")?;

    state.acronyms.remove_category(principal, id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
