use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub bar_id: i64,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// Always equal to the number of `post_likes` rows for this post.
    pub like_count: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::Id",
        on_delete = "Cascade"
    )]
    UserProfile,
    #[sea_orm(
        belongs_to = "super::bar::Entity",
        from = "Column::BarId",
        to = "super::bar::Column::Id",
        on_delete = "Cascade"
    )]
    Bar,
    #[sea_orm(has_many = "super::post_image::Entity")]
    PostImages,
    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLikes,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::bar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bar.def()
    }
}

impl Related<super::post_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostImages.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
