use axum::{Json, http::StatusCode};

use super::{ApiError, ApiResponse, StatusPayload};

pub async fn welcome() -> Json<ApiResponse<StatusPayload>> {
    Json(ApiResponse::success(
        "Welcome to the Blog API",
        StatusPayload { status: "running" },
    ))
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

pub async fn method_not_allowed() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error("Method not allowed")),
    )
}
