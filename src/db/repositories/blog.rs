use crate::db::now_timestamp;
use crate::entities::{blogs, prelude::*};
use crate::models::{Author, Blog, BlogChanges, NewBlog};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, warn};

/// Repository for blog operations
pub struct BlogRepository {
    conn: DatabaseConnection,
}

impl BlogRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: blogs::Model) -> Blog {
        let tags = serde_json::from_str(&m.tags).unwrap_or_else(|e| {
            warn!(blog_id = %m.id, "Unreadable tags column, treating as empty: {e}");
            Vec::new()
        });

        Blog {
            id: m.id,
            title: m.title,
            slug: m.slug,
            content: m.content,
            cover_image_url: m.cover_image_url,
            tags,
            author: Author {
                id: m.author_id,
                name: m.author_name,
            },
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn encode_tags(tags: &[String]) -> Result<String> {
        serde_json::to_string(tags).context("Failed to encode tags")
    }

    // ========================================================================
    // Blog Operations
    // ========================================================================

    /// Inserts a blog. A duplicate slug surfaces as a unique-constraint `DbErr`.
    pub async fn create(&self, blog: NewBlog) -> Result<Blog> {
        let now = now_timestamp();
        let active = blogs::ActiveModel {
            id: Set(uuid::Uuid::now_v7().to_string()),
            title: Set(blog.title),
            slug: Set(blog.slug),
            content: Set(blog.content),
            cover_image_url: Set(blog.cover_image_url),
            tags: Set(Self::encode_tags(&blog.tags)?),
            author_id: Set(blog.author.id),
            author_name: Set(blog.author.name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert blog")?;

        info!("Created blog {} ({})", model.id, model.slug);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: &str) -> Result<Option<Blog>> {
        let row = Blogs::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query blog by ID")?;

        Ok(row.map(Self::map_model))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        let row = Blogs::find()
            .filter(blogs::Column::Slug.eq(slug))
            .one(&self.conn)
            .await
            .context("Failed to query blog by slug")?;

        Ok(row.map(Self::map_model))
    }

    /// All blogs, newest first. Ids are time-ordered, so they break timestamp ties.
    pub async fn list_newest_first(&self) -> Result<Vec<Blog>> {
        let rows = Blogs::find()
            .order_by_desc(blogs::Column::CreatedAt)
            .order_by_desc(blogs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list blogs")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Applies the provided fields and refreshes `updated_at`. `slug` must accompany a
    /// title change. Returns `None` if the blog no longer exists.
    pub async fn update(
        &self,
        id: &str,
        changes: BlogChanges,
        slug: Option<String>,
    ) -> Result<Option<Blog>> {
        let Some(existing) = Blogs::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query blog for update")?
        else {
            return Ok(None);
        };

        let mut active: blogs::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(cover) = changes.cover_image_url {
            active.cover_image_url = Set((!cover.is_empty()).then_some(cover));
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(Self::encode_tags(&tags)?);
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update blog")?;

        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = Blogs::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete blog")?;

        if result.rows_affected > 0 {
            info!("Deleted blog {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
