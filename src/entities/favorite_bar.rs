use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite_bars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub bar_id: i64,
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
}

impl Related<super::bar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bar.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
