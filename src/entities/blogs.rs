use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    /// Time-ordered UUID (v7) string
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub content: String,

    pub cover_image_url: Option<String>,

    /// JSON array of tag strings
    pub tags: String,

    /// Author snapshot taken at creation; not a foreign key.
    pub author_id: String,

    pub author_name: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
