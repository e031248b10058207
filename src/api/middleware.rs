//! Request pipeline stages for protected routes.
//!
//! Stages communicate through request extensions: [`authenticate_token`] attaches an
//! [`AuthContext`], [`attach_blog`] attaches an [`AttachedBlog`], and
//! [`authorize_author`] reads both. Handlers pull them back out with the
//! extractors implemented below.

use axum::{
    extract::{FromRequestParts, MatchedPath, Path, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{ApiError, AppState, validation::validate_blog_id};
use crate::models::{Blog, User};
use crate::services::TokenClaims;

/// Path parameter carrying the blog id on item routes.
pub const BLOG_ID_PARAM: &str = "blog_id";

/// True when the matched route template captures a blog id.
fn route_captures_blog_id(parts: &Parts) -> bool {
    parts
        .extensions
        .get::<MatchedPath>()
        .is_some_and(|path| path.as_str().contains(&format!("{{{BLOG_ID_PARAM}}}")))
}

/// Identity of the caller, attached after a valid token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: TokenClaims,
    pub user: User,
}

/// Blog addressed by the request path, loaded before the handler runs.
#[derive(Debug, Clone)]
pub struct AttachedBlog(pub Blog);

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Verifies the bearer token and attaches the caller's [`AuthContext`].
pub async fn authenticate_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let Some(token) = bearer_token(request.headers()) else {
            debug!("Rejected request without bearer token");
            return Err(ApiError::unauthorized("Access denied: no token provided"));
        };

        state.tokens().verify(token).map_err(|e| {
            warn!("Rejected session token: {e}");
            ApiError::from(e)
        })?
    };

    let Some(user) = state.auth_service().find_user(&claims.sub).await? else {
        warn!(user_id = %claims.sub, "Token subject no longer exists");
        return Err(ApiError::unauthorized("User not found"));
    };

    tracing::Span::current().record("user_id", user.id.as_str());

    request.extensions_mut().insert(AuthContext { claims, user });
    Ok(next.run(request).await)
}

/// Loads the blog named by the `blog_id` path parameter. Routes without that
/// parameter pass through untouched; an undecodable id is a 400.
pub async fn attach_blog(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let blog_id = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &state)
        .await
    {
        Ok(Path(mut params)) => params.remove(BLOG_ID_PARAM),
        Err(rejection) if route_captures_blog_id(&parts) => {
            debug!("Rejected blog id: {}", rejection.body_text());
            return Err(ApiError::validation("Invalid blog id"));
        }
        Err(_) => None,
    };
    let mut request = Request::from_parts(parts, body);

    let Some(blog_id) = blog_id else {
        return Ok(next.run(request).await);
    };

    let blog_id = validate_blog_id(&blog_id)?;
    let blog = state.blog_service().get(&blog_id).await?;

    request.extensions_mut().insert(AttachedBlog(blog));
    Ok(next.run(request).await)
}

/// Lets the request through only when the caller wrote the attached blog.
/// Must run after both [`authenticate_token`] and [`attach_blog`].
pub async fn authorize_author(request: Request, next: Next) -> Result<Response, ApiError> {
    let is_author = {
        let blog = request
            .extensions()
            .get::<AttachedBlog>()
            .ok_or_else(|| ApiError::missing_resource("author check ran without a blog"))?;
        let caller = request
            .extensions()
            .get::<AuthContext>()
            .ok_or_else(|| ApiError::missing_resource("author check ran without a caller"))?;

        let is_author = blog.0.is_authored_by(&caller.user.id);
        if !is_author {
            warn!(
                blog_id = %blog.0.id,
                user_id = %caller.user.id,
                "Rejected change by non-author"
            );
        }
        is_author
    };

    if !is_author {
        return Err(ApiError::forbidden("Access denied: not the author"));
    }

    Ok(next.run(request).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::missing_resource("handler requires an authenticated caller"))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AttachedBlog {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::missing_resource("handler requires an attached blog"))
    }
}
