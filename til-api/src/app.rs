/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use til_api::{app::{build_router, AppState}, config::Config};
/// use til_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use til_shared::{
    auth::{middleware::bearer_auth_middleware, provider::AuthProvider},
    services::{acronyms::AcronymService, categories::CategoryService, users::UserService},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Record store shared by every service
    pub store: Arc<dyn Store>,

    pub auth: AuthProvider,
    pub acronyms: AcronymService,
    pub users: UserService,
    pub categories: CategoryService,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every service to the same store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            auth: AuthProvider::new(store.clone()),
            acronyms: AcronymService::new(store.clone()),
            users: UserService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check
/// └── /api/
///     ├── /acronyms/
///     │   ├── GET    /                     # list
///     │   ├── POST   /                     # create (bearer)
///     │   ├── GET    /search?term=         # exact short/long match
///     │   ├── GET    /first
///     │   ├── GET    /sorted
///     │   ├── GET    /:id
///     │   ├── PUT    /:id                  # update (bearer)
///     │   ├── DELETE /:id                  # delete (bearer)
///     │   ├── GET    /:id/user
///     │   ├── GET    /:id/categories
///     │   ├── POST   /:id/categories/:cid  # attach (bearer)
///     │   └── DELETE /:id/categories/:cid  # detach (bearer)
///     ├── /users/
///     │   ├── GET    /
///     │   ├── POST   /                     # create (bearer)
///     │   ├── POST   /login                # basic auth, issues token
///     │   ├── GET    /:id
///     │   └── GET    /:id/acronyms
///     └── /categories/
///         ├── GET    /
///         ├── POST   /                     # create (bearer)
///         ├── GET    /:id
///         └── GET    /:id/acronyms
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Bearer authentication (per-method, protected writes only)
pub fn build_router(state: AppState) -> Router {
    let bearer = || from_fn_with_state(state.auth.clone(), bearer_auth_middleware);

    let acronym_routes = Router::new()
        .route(
            "/",
            get(routes::acronyms::list_acronyms)
                .merge(post(routes::acronyms::create_acronym).route_layer(bearer())),
        )
        .route("/search", get(routes::acronyms::search_acronyms))
        .route("/first", get(routes::acronyms::first_acronym))
        .route("/sorted", get(routes::acronyms::sorted_acronyms))
        .route(
            "/:id",
            get(routes::acronyms::get_acronym).merge(
                put(routes::acronyms::update_acronym)
                    .delete(routes::acronyms::delete_acronym)
                    .route_layer(bearer()),
            ),
        )
        .route("/:id/user", get(routes::acronyms::get_acronym_user))
        .route("/:id/categories", get(routes::acronyms::list_acronym_categories))
        .route(
            "/:id/categories/:category_id",
            post(routes::acronyms::add_category)
                .merge(delete(routes::acronyms::remove_category))
                .route_layer(bearer()),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users)
                .merge(post(routes::users::create_user).route_layer(bearer())),
        )
        .route("/login", post(routes::users::login))
        .route("/:id", get(routes::users::get_user))
        .route("/:id/acronyms", get(routes::users::list_user_acronyms));

    let category_routes = Router::new()
        .route(
            "/",
            get(routes::categories::list_categories)
                .merge(post(routes::categories::create_category).route_layer(bearer())),
        )
        .route("/:id", get(routes::categories::get_category))
        .route("/:id/acronyms", get(routes::categories::list_category_acronyms));

    let api_routes = Router::new()
        .nest("/acronyms", acronym_routes)
        .nest("/users", user_routes)
        .nest("/categories", category_routes);

    let cors = if state.config.cors_permissive() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    let security = SecurityHeadersLayer::new(state.config.api.hsts);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(security)
        .with_state(state)
}
