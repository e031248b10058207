use crate::config::SecurityConfig;
use crate::models::{Blog, BlogChanges, NewBlog, NewUser, User};
use anyhow::Result;
use chrono::SecondsFormat;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn blog_repo(&self) -> repositories::blog::BlogRepository {
        repositories::blog::BlogRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(&self, user: NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, security).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo()
            .exists_with_username_or_email(username, email)
            .await
    }

    pub async fn verify_user_password(&self, login: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(login, password).await
    }

    // ========================================================================
    // Blogs
    // ========================================================================

    pub async fn create_blog(&self, blog: NewBlog) -> Result<Blog> {
        self.blog_repo().create(blog).await
    }

    pub async fn get_blog(&self, id: &str) -> Result<Option<Blog>> {
        self.blog_repo().get(id).await
    }

    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        self.blog_repo().get_by_slug(slug).await
    }

    pub async fn list_blogs(&self) -> Result<Vec<Blog>> {
        self.blog_repo().list_newest_first().await
    }

    pub async fn update_blog(
        &self,
        id: &str,
        changes: BlogChanges,
        slug: Option<String>,
    ) -> Result<Option<Blog>> {
        self.blog_repo().update(id, changes, slug).await
    }

    pub async fn remove_blog(&self, id: &str) -> Result<bool> {
        self.blog_repo().remove(id).await
    }
}

/// Current instant as fixed-width RFC 3339 (UTC, microseconds), so stored
/// timestamps sort lexically in time order.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// True when the error chain carries a unique-constraint violation from the database.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)))
}
