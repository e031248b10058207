use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, BlogDto, BlogPayload, BlogsPayload, JsonBody,
    validation::validate_slug,
};
use crate::api::middleware::{AttachedBlog, AuthContext};
use crate::models::{Author, BlogChanges, TagsInput};
use crate::services::BlogDraft;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub tags: Option<TagsInput>,
}

impl From<CreateBlogRequest> for BlogDraft {
    fn from(req: CreateBlogRequest) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
            cover_image_url: req.cover_image_url,
            tags: req.tags.map(TagsInput::into_tags).unwrap_or_default(),
        }
    }
}

/// Every field is optional; only the ones present are changed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub tags: Option<TagsInput>,
}

impl From<UpdateBlogRequest> for BlogChanges {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            cover_image_url: req.cover_image_url,
            tags: req.tags.map(TagsInput::into_tags),
        }
    }
}

fn blog_payload(blog: crate::models::Blog) -> BlogPayload {
    BlogPayload {
        blog: BlogDto::from(blog),
    }
}

pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    JsonBody(req): JsonBody<CreateBlogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogPayload>>), ApiError> {
    let author = Author {
        id: auth.user.id,
        name: auth.user.name,
    };
    let blog = state.blog_service().create(author, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Blog added successfully",
            blog_payload(blog),
        )),
    ))
}

pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<BlogsPayload>>, ApiError> {
    let blogs = state.blog_service().list().await?;

    Ok(Json(ApiResponse::success(
        "Blogs retrieved successfully",
        BlogsPayload {
            blogs: blogs.into_iter().map(BlogDto::from).collect(),
        },
    )))
}

pub async fn get_blog(AttachedBlog(blog): AttachedBlog) -> Json<ApiResponse<BlogPayload>> {
    Json(ApiResponse::success(
        "Blog retrieved successfully",
        blog_payload(blog),
    ))
}

pub async fn get_blog_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<BlogPayload>>, ApiError> {
    let slug = validate_slug(&slug)?;
    let blog = state.blog_service().get_by_slug(slug).await?;

    Ok(Json(ApiResponse::success(
        "Blog retrieved successfully",
        blog_payload(blog),
    )))
}

pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    AttachedBlog(blog): AttachedBlog,
    JsonBody(req): JsonBody<UpdateBlogRequest>,
) -> Result<Json<ApiResponse<BlogPayload>>, ApiError> {
    let updated = state.blog_service().update(&blog, req.into()).await?;

    Ok(Json(ApiResponse::success(
        "Blog updated successfully",
        blog_payload(updated),
    )))
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    AttachedBlog(blog): AttachedBlog,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.blog_service().delete(&blog).await?;

    Ok(Json(ApiResponse::message("Blog deleted successfully")))
}
