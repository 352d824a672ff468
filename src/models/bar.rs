use crate::entities::sea_orm_active_enums::Prefecture;
use crate::entities::{article, bar, coupon};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BarQuery {
    /// Matched against the bar's name and address.
    pub keyword: Option<String>,
    pub prefecture: Option<Prefecture>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BarResponse {
    pub id: i64,
    pub name: String,
    pub prefecture: Prefecture,
    pub address: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_favorite: bool,
}

impl BarResponse {
    pub fn new(bar: bar::Model, is_favorite: bool) -> Self {
        BarResponse {
            id: bar.id,
            name: bar.name,
            prefecture: bar.prefecture,
            address: bar.address,
            description: bar.description,
            image_url: bar.image_url,
            latitude: bar.latitude,
            longitude: bar.longitude,
            is_favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    pub favorite: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ViewHistoryEntry {
    pub bar: BarResponse,
    pub viewed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CouponQuery {
    pub bar_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponResponse {
    pub id: i64,
    pub bar_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub acquired: bool,
}

impl CouponResponse {
    pub fn new(coupon: coupon::Model, acquired: bool) -> Self {
        CouponResponse {
            id: coupon.id,
            bar_id: coupon.bar_id,
            title: coupon.title,
            description: coupon.description,
            expires_at: coupon.expires_at,
            acquired,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyCouponResponse {
    pub coupon: CouponResponse,
    pub acquired_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub thumbnail_url: Option<String>,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl From<article::Model> for ArticleResponse {
    fn from(a: article::Model) -> Self {
        ArticleResponse {
            id: a.id,
            title: a.title,
            body: a.body,
            thumbnail_url: a.thumbnail_url,
            published_at: a.published_at,
        }
    }
}
