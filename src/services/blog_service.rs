//! Domain service for blog posts.
//!
//! Ownership is not checked here: update and delete are only reachable behind the
//! author authorization middleware, which hands the service an already-loaded blog.

use thiserror::Error;

use crate::models::{Author, Blog, BlogChanges};

/// Errors specific to blog operations.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Blog not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for BlogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for BlogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Fields for a new blog as received from the client.
#[derive(Debug, Clone, Default)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
}

/// Domain service trait for blog posts.
#[async_trait::async_trait]
pub trait BlogService: Send + Sync {
    /// Creates a blog owned by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for an empty title or content and
    /// [`BlogError::Conflict`] if the derived slug is taken.
    async fn create(&self, author: Author, draft: BlogDraft) -> Result<Blog, BlogError>;

    /// All blogs, newest first.
    async fn list(&self) -> Result<Vec<Blog>, BlogError>;

    async fn get(&self, id: &str) -> Result<Blog, BlogError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Blog, BlogError>;

    /// Applies `changes` to `blog`. A title change re-derives the slug.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] when `changes` is empty.
    async fn update(&self, blog: &Blog, changes: BlogChanges) -> Result<Blog, BlogError>;

    async fn delete(&self, blog: &Blog) -> Result<(), BlogError>;
}
