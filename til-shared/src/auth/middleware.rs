/// Authentication plumbing for Axum
///
/// - [`Principal`]: the authenticated identity of a request, inserted into
///   request extensions by the bearer middleware and extracted by protected
///   handlers
/// - [`BasicCredentials`]: extractor for `Authorization: Basic ...`, used by
///   login
/// - [`bearer_auth_middleware`]: validates `Authorization: Bearer <token>`
///   against persisted tokens
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::post, Router};
/// use std::sync::Arc;
/// use til_shared::auth::{middleware::{bearer_auth_middleware, Principal}, provider::AuthProvider};
/// use til_shared::store::memory::MemoryStore;
///
/// async fn protected(principal: Principal) -> String {
///     format!("Hello, user {}!", principal.user_id)
/// }
///
/// let auth = AuthProvider::new(Arc::new(MemoryStore::new()));
/// let app: Router = Router::new()
///     .route("/protected", post(protected))
///     .layer(middleware::from_fn_with_state(auth, bearer_auth_middleware));
/// ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::provider::AuthProvider;

/// Authenticated identity attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User the bearer token belongs to
    pub user_id: Uuid,

    /// Token that authenticated the request
    pub token_id: Uuid,
}

/// Username and password decoded from a basic `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or no principal on a protected route
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not in the expected scheme/encoding
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Username/password did not match
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Bearer token unknown, or its user no longer exists
    #[error("Invalid token")]
    InvalidToken,

    /// Store or hashing failure while authenticating
    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Responds with the same `{error, message}` envelope as the API's own errors
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::Backend(msg) => {
                tracing::error!("Authentication backend error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            other => (StatusCode::UNAUTHORIZED, "unauthorized", other.to_string()),
        };

        let body = Json(json!({ "error": code, "message": message }));
        (status, body).into_response()
    }
}

impl From<crate::store::StoreError> for AuthError {
    fn from(err: crate::store::StoreError) -> Self {
        AuthError::Backend(err.to_string())
    }
}

impl From<super::password::PasswordError> for AuthError {
    fn from(err: super::password::PasswordError) -> Self {
        AuthError::Backend(err.to_string())
    }
}

fn authorization_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid ASCII".to_string()))
}

/// Splits `<scheme> <rest>` with a case-insensitive scheme match
fn strip_scheme<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let (given, rest) = value.split_once(' ')?;
    given.eq_ignore_ascii_case(scheme).then(|| rest.trim())
}

/// Extracts the token from `Authorization: Bearer <token>`
pub fn parse_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = authorization_header(headers)?;
    let token = strip_scheme(value, "Bearer")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty Bearer token".to_string()));
    }
    Ok(token)
}

/// Decodes `Authorization: Basic base64(username:password)`
///
/// The password may itself contain `:`; only the first colon separates.
pub fn parse_basic_credentials(headers: &HeaderMap) -> Result<BasicCredentials, AuthError> {
    let value = authorization_header(headers)?;
    let encoded = strip_scheme(value, "Basic")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Basic credentials".to_string()))?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::InvalidFormat("Credentials are not valid base64".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::InvalidFormat("Credentials are not valid UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::InvalidFormat("Expected username:password".to_string()))?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_basic_credentials(&parts.headers)
    }
}

/// Guard: protected handlers take a `Principal` argument, and requests that
/// did not pass the bearer middleware are rejected with 401.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Bearer token middleware
///
/// Validates the token through the [`AuthProvider`] and inserts the resulting
/// [`Principal`] into request extensions.
///
/// # Errors
///
/// 401 when the header is missing or malformed, or the token is unknown.
pub async fn bearer_auth_middleware(
    State(auth): State<AuthProvider>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = parse_bearer_token(req.headers())?.to_owned();
    let principal = auth.authenticate_bearer(&token).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
