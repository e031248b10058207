//! Smoke tests for the routing shell: welcome, fallbacks and CORS.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quill::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("quill-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = quill::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");

    quill::api::router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_welcome() {
    let app = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "error": false, "message": "Welcome to the Blog API", "status": "running" })
    );
}

#[tokio::test]
async fn test_unknown_route_gets_envelope() {
    let app = spawn_app().await;

    for uri in ["/nope", "/api/nope", "/api/blogs/a/b"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": true, "message": "Route not found" })
        );
    }
}

#[tokio::test]
async fn test_wrong_method_gets_envelope() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/api/blogs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], true);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/blogs")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
