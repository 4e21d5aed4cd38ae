/// Category endpoints

use super::parse_id;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use til_shared::{
    auth::middleware::Principal,
    models::{
        acronym::Acronym,
        category::{Category, CategoryData},
    },
};

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list_all().await?))
}

/// `POST /api/categories`
pub async fn create_category(
    State(state): State<AppState>,
    principal: Principal,
    Json(data): Json<CategoryData>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.categories.create(principal, data).await?))
}

/// `GET /api/categories/:id`
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id, "Category")?;
    Ok(Json(state.categories.get(id).await?))
}

/// `GET /api/categories/:id/acronyms`
pub async fn list_category_acronyms(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Acronym>>> {
    let id = parse_id(&id, "Category")?;
    Ok(Json(state.categories.list_acronyms(id).await?))
}
