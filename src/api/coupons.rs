use crate::auth::AuthenticatedAccount;
use crate::db::DbPool;
use crate::models::CouponQuery;
use crate::services::{coupons, profiles};
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    get,
    path = "/api/coupons",
    params(
        ("bar_id" = Option<i64>, Query, description = "Only coupons for this bar")
    ),
    responses(
        (status = 200, description = "Unexpired coupons", body = Vec<crate::models::CouponResponse>)
    ),
    tag = "coupons"
)]
pub async fn list_coupons(
    query: web::Query<CouponQuery>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let coupons = coupons::list_coupons(pool.get_ref(), query.bar_id, viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(coupons))
}

#[utoipa::path(
    post,
    path = "/api/coupons/{coupon_id}/acquire",
    params(
        ("coupon_id" = i64, Path, description = "Coupon ID")
    ),
    responses(
        (status = 201, description = "Coupon acquired", body = crate::models::MyCouponResponse),
        (status = 400, description = "Coupon expired"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coupon not found"),
        (status = 409, description = "Coupon already acquired")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "coupons"
)]
pub async fn acquire_coupon(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let held = coupons::acquire_coupon(pool.get_ref(), viewer.id, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(held))
}

#[utoipa::path(
    get,
    path = "/api/me/coupons",
    responses(
        (status = 200, description = "Coupons held by the caller", body = Vec<crate::models::MyCouponResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "coupons"
)]
pub async fn list_my_coupons(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let held = coupons::list_my_coupons(pool.get_ref(), viewer.id).await?;
    Ok(HttpResponse::Ok().json(held))
}
