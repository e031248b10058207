//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{Store, is_unique_violation};
use crate::models::{NewUser, User};
use crate::services::auth_service::{AuthError, AuthService, AuthSession, Registration};
use crate::services::token::{TokenService, TokenSubject};

const DUPLICATE_ACCOUNT: &str = "Username or email already exists";

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenService>,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenService>, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(&TokenSubject {
            id: user.id.clone(),
            name: user.name.clone(),
        })?;
        Ok(AuthSession { user, token })
    }
}

fn validate_registration(registration: Registration) -> Result<NewUser, AuthError> {
    let name = registration.name.trim().to_string();
    let username = registration.username.trim().to_string();
    let email = registration.email.trim().to_string();

    if name.is_empty() || username.is_empty() || email.is_empty() || registration.password.is_empty()
    {
        return Err(AuthError::Validation("All fields are required".to_string()));
    }

    if !looks_like_email(&email) {
        return Err(AuthError::Validation("Email address is invalid".to_string()));
    }

    Ok(NewUser {
        name,
        username,
        email,
        password: registration.password,
    })
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<AuthSession, AuthError> {
        let new_user = validate_registration(registration)?;

        if self
            .store
            .user_exists(&new_user.username, &new_user.email)
            .await?
        {
            return Err(AuthError::Conflict(DUPLICATE_ACCOUNT.to_string()));
        }

        // The pre-check can race with a concurrent registration; the unique
        // indexes have the final word.
        let user = match self.store.create_user(new_user, &self.security).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(AuthError::Conflict(DUPLICATE_ACCOUNT.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, "Registered user {}", user.username);
        self.session_for(user)
    }

    async fn login(&self, login: &str, password: &str) -> Result<AuthSession, AuthError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("All fields are required".to_string()));
        }

        let Some(user) = self.store.verify_user_password(login, password).await? else {
            warn!("Failed login attempt for {login}");
            return Err(AuthError::InvalidCredentials);
        };

        self.session_for(user)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}
