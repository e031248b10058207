//! `SeaORM` implementation of the `BlogService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, is_unique_violation};
use crate::models::{Author, Blog, BlogChanges, NewBlog, slugify};
use crate::services::blog_service::{BlogDraft, BlogError, BlogService};

pub struct SeaOrmBlogService {
    store: Store,
}

impl SeaOrmBlogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn slug_for(title: &str) -> Result<String, BlogError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(BlogError::Validation(
            "Title must contain at least one letter or number".to_string(),
        ));
    }
    Ok(slug)
}

fn conflict_or(err: anyhow::Error, slug: &str) -> BlogError {
    if is_unique_violation(&err) {
        BlogError::Conflict(format!("A blog with slug '{slug}' already exists"))
    } else {
        err.into()
    }
}

/// Non-empty cover URLs only; an empty string means "no cover".
fn cover(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Validates an update and returns it with the slug for a changed title.
fn prepare_changes(mut changes: BlogChanges) -> Result<(BlogChanges, Option<String>), BlogError> {
    if changes.is_empty() {
        return Err(BlogError::Validation("No changes provided".to_string()));
    }

    let slug = match changes.title.take() {
        Some(title) => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(BlogError::Validation("Title cannot be empty".to_string()));
            }
            let slug = slug_for(&title)?;
            changes.title = Some(title);
            Some(slug)
        }
        None => None,
    };

    if changes
        .content
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(BlogError::Validation("Content cannot be empty".to_string()));
    }

    changes.cover_image_url = changes
        .cover_image_url
        .map(|u| u.trim().to_string());

    Ok((changes, slug))
}

#[async_trait]
impl BlogService for SeaOrmBlogService {
    async fn create(&self, author: Author, draft: BlogDraft) -> Result<Blog, BlogError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() || draft.content.trim().is_empty() {
            return Err(BlogError::Validation(
                "Title and content are required".to_string(),
            ));
        }
        let slug = slug_for(&title)?;

        let new_blog = NewBlog {
            title,
            slug: slug.clone(),
            content: draft.content,
            cover_image_url: cover(draft.cover_image_url),
            tags: draft.tags,
            author,
        };

        self.store
            .create_blog(new_blog)
            .await
            .map_err(|e| conflict_or(e, &slug))
    }

    async fn list(&self) -> Result<Vec<Blog>, BlogError> {
        Ok(self.store.list_blogs().await?)
    }

    async fn get(&self, id: &str) -> Result<Blog, BlogError> {
        self.store
            .get_blog(id)
            .await?
            .ok_or_else(|| BlogError::NotFound(id.to_string()))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Blog, BlogError> {
        self.store
            .get_blog_by_slug(slug)
            .await?
            .ok_or_else(|| BlogError::NotFound(slug.to_string()))
    }

    async fn update(&self, blog: &Blog, changes: BlogChanges) -> Result<Blog, BlogError> {
        let (changes, slug) = prepare_changes(changes)?;
        let attempted_slug = slug.clone().unwrap_or_else(|| blog.slug.clone());

        let updated = self
            .store
            .update_blog(&blog.id, changes, slug)
            .await
            .map_err(|e| conflict_or(e, &attempted_slug))?
            .ok_or_else(|| BlogError::NotFound(blog.id.clone()))?;

        info!(blog_id = %updated.id, "Updated blog");
        Ok(updated)
    }

    async fn delete(&self, blog: &Blog) -> Result<(), BlogError> {
        if self.store.remove_blog(&blog.id).await? {
            Ok(())
        } else {
            Err(BlogError::NotFound(blog.id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_changes_rejects_empty_update() {
        let err = prepare_changes(BlogChanges::default()).unwrap_err();
        assert!(matches!(err, BlogError::Validation(msg) if msg == "No changes provided"));
    }

    #[test]
    fn test_prepare_changes_derives_slug_from_new_title() {
        let changes = BlogChanges {
            title: Some("  New Title! ".to_string()),
            ..Default::default()
        };
        let (changes, slug) = prepare_changes(changes).unwrap();
        assert_eq!(changes.title.as_deref(), Some("New Title!"));
        assert_eq!(slug.as_deref(), Some("new-title"));
    }

    #[test]
    fn test_prepare_changes_without_title_keeps_slug() {
        let changes = BlogChanges {
            content: Some("v2".to_string()),
            ..Default::default()
        };
        let (_, slug) = prepare_changes(changes).unwrap();
        assert!(slug.is_none());
    }

    #[test]
    fn test_prepare_changes_rejects_blank_title_or_content() {
        let blank_title = BlogChanges {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            prepare_changes(blank_title),
            Err(BlogError::Validation(_))
        ));

        let blank_content = BlogChanges {
            content: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            prepare_changes(blank_content),
            Err(BlogError::Validation(_))
        ));
    }

    #[test]
    fn test_cover_drops_blank_urls() {
        assert_eq!(cover(Some("  ".to_string())), None);
        assert_eq!(cover(None), None);
        assert_eq!(
            cover(Some(" https://img/x.png ".to_string())),
            Some("https://img/x.png".to_string())
        );
    }

    #[test]
    fn test_slug_for_rejects_symbol_only_titles() {
        assert!(matches!(slug_for("???"), Err(BlogError::Validation(_))));
        assert_eq!(slug_for("Hello World").unwrap(), "hello-world");
    }
}
