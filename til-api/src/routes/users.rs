/// User endpoints
///
/// # Login
///
/// ```text
/// POST /api/users/login
/// Authorization: Basic base64(username:password)
/// ```
///
/// Response:
/// ```json
/// {
///   "id": "0d9e...",
///   "value": "5kTn3bq0Yx2sVQ8aWm1r9g==",
///   "user_id": "41c2...",
///   "created_at": "2024-01-01T00:00:00Z"
/// }
/// ```
///
/// The `value` is the bearer token for protected endpoints. It is shown only
/// once; the server keeps a SHA-256 hash.

use super::parse_id;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use til_shared::{
    auth::middleware::{BasicCredentials, Principal},
    models::{
        acronym::Acronym,
        token::IssuedToken,
        user::{CreateUserData, PublicUser},
    },
};

/// `GET /api/users`, sorted by username
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    Ok(Json(state.users.list_all().await?))
}

/// `POST /api/users`
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 409 if the username is taken
/// - 422 for empty fields or a password under 8 characters
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    Json(data): Json<CreateUserData>,
) -> ApiResult<Json<PublicUser>> {
    Ok(Json(state.users.create(principal, data).await?))
}

/// `GET /api/users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PublicUser>> {
    let id = parse_id(&id, "User")?;
    Ok(Json(state.users.get(id).await?))
}

/// `GET /api/users/:id/acronyms`
pub async fn list_user_acronyms(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Acronym>>> {
    let id = parse_id(&id, "User")?;
    Ok(Json(state.users.list_acronyms(id).await?))
}

/// `POST /api/users/login`
///
/// # Errors
///
/// 401 for a missing or malformed header, unknown username, or wrong
/// password. No token is stored in any of these cases.
pub async fn login(
    State(state): State<AppState>,
    credentials: BasicCredentials,
) -> ApiResult<Json<IssuedToken>> {
    let user = state.auth.authenticate_basic(&credentials).await?;
    Ok(Json(state.users.login(&user).await?))
}
