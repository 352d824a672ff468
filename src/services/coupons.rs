use crate::db::DbPool;
use crate::entities::{coupon, user_coupon};
use crate::errors::AppError;
use crate::models::{CouponResponse, MyCouponResponse};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashSet;

/// Coupons that have not expired, optionally for one bar.
pub async fn list_coupons(
    db: &DbPool,
    bar_id: Option<i64>,
    viewer_id: Option<i64>,
) -> Result<Vec<CouponResponse>, AppError> {
    let now = Utc::now();
    let mut select = coupon::Entity::find().filter(
        Condition::any()
            .add(coupon::Column::ExpiresAt.is_null())
            .add(coupon::Column::ExpiresAt.gt(now)),
    );
    if let Some(bar_id) = bar_id {
        select = select.filter(coupon::Column::BarId.eq(bar_id));
    }
    let coupons = select
        .order_by_desc(coupon::Column::CreatedAt)
        .order_by_desc(coupon::Column::Id)
        .all(db)
        .await?;

    let acquired: HashSet<i64> = match viewer_id {
        Some(viewer) => user_coupon::Entity::find()
            .select_only()
            .column(user_coupon::Column::CouponId)
            .filter(user_coupon::Column::UserId.eq(viewer))
            .into_tuple::<i64>()
            .all(db)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    Ok(coupons
        .into_iter()
        .map(|c| {
            let held = acquired.contains(&c.id);
            CouponResponse::new(c, held)
        })
        .collect())
}

pub async fn acquire_coupon(
    db: &DbPool,
    viewer_id: i64,
    coupon_id: i64,
) -> Result<MyCouponResponse, AppError> {
    let found = coupon::Entity::find_by_id(coupon_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("クーポンが見つかりません"))?;
    let now = Utc::now();
    if found.expires_at.is_some_and(|expires| expires <= now) {
        return Err(AppError::validation(
            "このクーポンは有効期限が切れています",
        ));
    }

    let held = user_coupon::ActiveModel {
        user_id: Set(viewer_id),
        coupon_id: Set(coupon_id),
        acquired_at: Set(now),
    };
    user_coupon::Entity::insert(held)
        .exec_without_returning(db)
        .await
        .map_err(|e| AppError::from_db(e, "このクーポンはすでに取得済みです"))?;

    log::info!("Profile {} acquired coupon {}", viewer_id, coupon_id);
    Ok(MyCouponResponse {
        coupon: CouponResponse::new(found, true),
        acquired_at: now,
    })
}

pub async fn list_my_coupons(
    db: &DbPool,
    viewer_id: i64,
) -> Result<Vec<MyCouponResponse>, AppError> {
    let rows = user_coupon::Entity::find()
        .filter(user_coupon::Column::UserId.eq(viewer_id))
        .order_by_desc(user_coupon::Column::AcquiredAt)
        .order_by_desc(user_coupon::Column::CouponId)
        .find_also_related(coupon::Entity)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(held, c)| {
            c.map(|c| MyCouponResponse {
                coupon: CouponResponse::new(c, true),
                acquired_at: held.acquired_at,
            })
        })
        .collect())
}
