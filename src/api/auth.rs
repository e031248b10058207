use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, AuthPayload, JsonBody, UserDto, UserPayload};
use crate::api::middleware::AuthContext;
use crate::services::{AuthSession, Registration};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name.unwrap_or_default(),
            username: req.username.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        }
    }
}

/// `usernameOrEmail` is the documented field; `username` and `email` are accepted
/// as fallbacks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn login(&self) -> &str {
        self.username_or_email
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

impl From<AuthSession> for AuthPayload {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserDto::from(session.user),
            token: session.token,
        }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>), ApiError> {
    let session = state.auth_service().register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User registered successfully",
            AuthPayload::from(session),
        )),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, ApiError> {
    let password = req.password.as_deref().unwrap_or_default();
    let session = state.auth_service().login(req.login(), password).await?;

    Ok(Json(ApiResponse::success(
        "Login successful",
        AuthPayload::from(session),
    )))
}

/// Returns the caller's own profile.
pub async fn get_user(auth: AuthContext) -> Json<ApiResponse<UserPayload>> {
    Json(ApiResponse::success(
        "User retrieved successfully",
        UserPayload {
            user: UserDto::from(auth.user),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_field_precedence() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"usernameOrEmail":"alice","email":"a@x.com","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.login(), "alice");

        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw"}"#).unwrap();
        assert_eq!(req.login(), "a@x.com");

        let req: LoginRequest = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert_eq!(req.login(), "");
    }

    #[test]
    fn test_register_request_missing_fields_become_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        let registration = Registration::from(req);
        assert_eq!(registration.name, "Alice");
        assert!(registration.username.is_empty());
        assert!(registration.password.is_empty());
    }
}
