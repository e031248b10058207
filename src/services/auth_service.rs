//! Domain service for registration, login and identity lookup.

use thiserror::Error;

use crate::models::User;
use crate::services::token::TokenError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Registration fields as received; validated by the service.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for missing fields and
    /// [`AuthError::Conflict`] if the username or email is taken.
    async fn register(&self, registration: Registration) -> Result<AuthSession, AuthError>;

    /// Verifies credentials, where `login` is a username or an email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, login: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Looks a user up by id.
    async fn find_user(&self, id: &str) -> Result<Option<User>, AuthError>;
}
