use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AuthError, BlogError, TokenError};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    Unauthorized(String),

    Forbidden(String),

    NotFound(String),

    Conflict(String),

    /// A middleware expected context an earlier stage should have attached.
    /// Always a routing bug, never the client's fault.
    MissingResource(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::MissingResource(msg) => write!(f, "Missing request context: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MissingResource(_)
            | ApiError::DatabaseError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::ValidationError(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::MissingResource(msg) => {
                tracing::error!("Request pipeline misconfigured: {}", msg);
                INTERNAL_MESSAGE.to_string()
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                INTERNAL_MESSAGE.to_string()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_MESSAGE.to_string()
            }
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{err:#}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => Self::Unauthorized(err.to_string()),
            TokenError::Signing(msg) => Self::internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::validation("Invalid credentials"),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Conflict(msg) => Self::Conflict(msg),
            AuthError::Token(e) => e.into(),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound(_) => Self::NotFound("Blog not found".to_string()),
            BlogError::Validation(msg) => Self::validation(msg),
            BlogError::Conflict(msg) => Self::Conflict(msg),
            BlogError::Database(msg) => Self::DatabaseError(msg),
            BlogError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn missing_resource(msg: impl Into<String>) -> Self {
        ApiError::MissingResource(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
