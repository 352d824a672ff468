use crate::auth::AuthenticatedAccount;
use crate::db::DbPool;
use crate::models::UnreadCountResponse;
use crate::services::{activity, profiles};
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/notify",
    responses(
        (status = 200, description = "Notifications for the caller, newest first", body = Vec<crate::models::NotificationResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "notify"
)]
pub async fn get_notifications(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let recipient = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let notifications = activity::list_notifications(pool.get_ref(), recipient.id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[utoipa::path(
    get,
    path = "/api/notify/unread-count",
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "notify"
)]
pub async fn get_unread_count(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let recipient = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let unread_count = activity::unread_count(pool.get_ref(), recipient.id).await?;
    Ok(HttpResponse::Ok().json(UnreadCountResponse { unread_count }))
}

#[utoipa::path(
    put,
    path = "/api/notify/{notification_id}/read",
    params(
        ("notification_id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = crate::models::NotificationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Notification belongs to someone else"),
        (status = 404, description = "Notification not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "notify"
)]
pub async fn mark_notification_read(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let recipient = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let notification =
        activity::mark_read(pool.get_ref(), path.into_inner(), recipient.id).await?;
    Ok(HttpResponse::Ok().json(notification))
}

#[utoipa::path(
    put,
    path = "/api/notify/read-all",
    responses(
        (status = 200, description = "All notifications marked as read"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "notify"
)]
pub async fn mark_all_read(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let recipient = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let updated = activity::mark_all_read(pool.get_ref(), recipient.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "updated": updated
    })))
}
