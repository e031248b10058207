use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quill::config::{Config, SecurityConfig};
use quill::services::TokenService;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "auth-test-secret";

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("quill-auth-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.auth.jwt_secret = SECRET.to_string();
    config.security = SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    };

    let state = quill::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    quill::api::router(state)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn alice() -> Value {
    json!({
        "name": "Alice",
        "username": "alice",
        "email": "alice@example.com",
        "password": "pw12345",
    })
}

#[tokio::test]
async fn test_register_returns_user_and_token() {
    let app = spawn_app().await;

    let (status, body) = post_json(&app, "/api/auth/register", alice()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["error"], false);

    let user = &body["user"];
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let tokens = TokenService::new(SECRET, chrono::TimeDelta::days(1));
    let claims = tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, user["id"].as_str().unwrap());
    assert_eq!(claims.name, "Alice");
}

#[tokio::test]
async fn test_create_account_alias() {
    let app = spawn_app().await;
    let (status, _) = post_json(&app, "/api/auth/create-account", alice()).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = spawn_app().await;
    post_json(&app, "/api/auth/register", alice()).await;

    let mut same_username = alice();
    same_username["email"] = json!("other@example.com");
    let (status, body) = post_json(&app, "/api/auth/register", same_username).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username or email already exists");

    let mut same_email = alice();
    same_email["username"] = json!("alice2");
    let (status, _) = post_json(&app, "/api/auth/register", same_email).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = spawn_app().await;

    for field in ["name", "username", "email", "password"] {
        let mut payload = alice();
        payload.as_object_mut().unwrap().remove(field);
        let (status, body) = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
        assert_eq!(body["message"], "All fields are required");
    }

    let mut payload = alice();
    payload["email"] = json!("not-an-email");
    let (status, _) = post_json(&app, "/api/auth/register", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    let app = spawn_app().await;
    let (_, registered) = post_json(&app, "/api/auth/register", alice()).await;

    for login in ["alice", "alice@example.com"] {
        let (status, body) = post_json(
            &app,
            "/api/auth/login",
            json!({ "usernameOrEmail": login, "password": "pw12345" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{login}");
        assert_eq!(body["user"]["id"], registered["user"]["id"]);
        assert!(body["token"].is_string());
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    post_json(&app, "/api/auth/register", alice()).await;

    let (status, wrong_password) = post_json(
        &app,
        "/api/auth/login",
        json!({ "usernameOrEmail": "alice", "password": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown_user) = post_json(
        &app,
        "/api/auth/login",
        json!({ "usernameOrEmail": "nobody", "password": "pw12345" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(unknown_user["message"], "Invalid credentials");

    let (status, _) = post_json(&app, "/api/auth/login", json!({ "usernameOrEmail": "alice" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_returns_caller() {
    let app = spawn_app().await;
    let (_, registered) = post_json(&app, "/api/auth/register", alice()).await;
    let token = registered["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/get-user")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["user"]["id"], registered["user"]["id"]);
    assert_eq!(body["user"]["username"], "alice");
}
