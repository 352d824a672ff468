use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bar_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bar::Entity",
        from = "Column::BarId",
        to = "super::bar::Column::Id",
        on_delete = "Cascade"
    )]
    Bar,
    #[sea_orm(has_many = "super::user_coupon::Entity")]
    UserCoupons,
}

impl Related<super::bar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bar.def()
    }
}

impl Related<super::user_coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCoupons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
