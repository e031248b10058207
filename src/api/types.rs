use axum::extract::FromRequest;
use serde::Serialize;

use super::ApiError;
use crate::models::{Author, Blog, User};

/// Response envelope shared by every endpoint:
/// `{ "error": bool, "message": string, ...payload }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub error: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// `axum::Json` whose rejections are reported through [`ApiError`], so malformed
/// bodies still get the standard envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorDto {
    pub id: String,
    pub name: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDto {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Blog> for BlogDto {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            content: blog.content,
            cover_image_url: blog.cover_image_url,
            tags: blog.tags,
            author: AuthorDto::from(blog.author),
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct BlogPayload {
    pub blog: BlogDto,
}

#[derive(Debug, Serialize)]
pub struct BlogsPayload {
    pub blogs: Vec<BlogDto>,
}

#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_flattens_payload() {
        let body = ApiResponse::success("ok", StatusPayload { status: "running" });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": false, "message": "ok", "status": "running" })
        );
    }

    #[test]
    fn test_error_envelope_has_no_payload() {
        let json = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": true, "message": "nope" }));
    }

    #[test]
    fn test_blog_dto_uses_camel_case() {
        let blog = Blog {
            id: "id-1".into(),
            title: "Hello".into(),
            slug: "hello".into(),
            content: "body".into(),
            cover_image_url: None,
            tags: vec!["a".into()],
            author: Author {
                id: "u1".into(),
                name: "Alice".into(),
            },
            created_at: "2024-01-01T00:00:00.000000Z".into(),
            updated_at: "2024-01-01T00:00:00.000000Z".into(),
        };
        let json = serde_json::to_value(BlogDto::from(blog)).unwrap();
        assert!(json["coverImageUrl"].is_null());
        assert_eq!(json["author"]["name"], "Alice");
        assert!(json["createdAt"].is_string());
        assert!(json.get("cover_image_url").is_none());
    }
}
