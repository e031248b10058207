use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, BlogService, SeaOrmAuthService, SeaOrmBlogService, TokenService,
};

pub mod auth;
pub mod blogs;
mod error;
pub mod middleware;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub tokens: Arc<TokenService>,

    pub auth_service: Arc<dyn AuthService>,

    pub blog_service: Arc<dyn BlogService>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[must_use]
    pub fn auth_service(&self) -> &dyn AuthService {
        self.auth_service.as_ref()
    }

    #[must_use]
    pub fn blog_service(&self) -> &dyn BlogService {
        self.blog_service.as_ref()
    }
}

/// Opens the store, runs migrations and wires the services.
pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let tokens = Arc::new(TokenService::from_config(&config.auth)?);

    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        tokens.clone(),
        config.security.clone(),
    ));
    let blog_service: Arc<dyn BlogService> = Arc::new(SeaOrmBlogService::new(store));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        tokens,
        auth_service,
        blog_service,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = create_api_router(state.clone())
        .method_not_allowed_fallback(system::method_not_allowed)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    // TraceLayer must wrap the request span: authentication records user_id on the
    // current span.
    Router::new()
        .route("/", get(system::welcome))
        .nest("/api", api_router)
        .fallback(system::route_not_found)
        .method_not_allowed_fallback(system::method_not_allowed)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(axum::middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Public and protected API routes. Protected stages run in order:
/// `attach_blog`, then `authenticate_token`, then `authorize_author`.
fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let authenticated =
        axum::middleware::from_fn_with_state(state.clone(), middleware::authenticate_token);
    let attached = axum::middleware::from_fn_with_state(state, middleware::attach_blog);

    let blog_item = get(blogs::get_blog)
        .route_layer(authenticated.clone())
        .merge(
            put(blogs::update_blog)
                .delete(blogs::delete_blog)
                .route_layer(axum::middleware::from_fn(middleware::authorize_author))
                .route_layer(authenticated.clone()),
        )
        .route_layer(attached);

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/create-account", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/auth/get-user",
            get(auth::get_user).route_layer(authenticated.clone()),
        )
        .route(
            "/blogs",
            get(blogs::list_blogs).merge(post(blogs::create_blog).route_layer(authenticated)),
        )
        .route("/blogs/{blog_id}", blog_item)
        .route("/blog/{slug}", get(blogs::get_blog_by_slug))
}
