use crate::entities::{blogs, prelude::*};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Blogs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Listing is always newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_created_at")
                    .table(Blogs)
                    .col(blogs::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs).to_owned())
            .await
    }
}
