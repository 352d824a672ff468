use crate::api::see_other;
use crate::auth::AuthenticatedAccount;
use crate::db::DbPool;
use crate::models::FollowResponse;
use crate::services::registration::LOGIN_PATH;
use crate::services::social_graph::{self, Timeline};
use crate::services::{profiles, Redirect};
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile with follow counts", body = crate::models::ProfileDetailResponse),
        (status = 404, description = "Profile not found")
    ),
    tag = "social"
)]
pub async fn show_profile(
    path: web::Path<i64>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let detail =
        profiles::profile_detail(pool.get_ref(), path.into_inner(), viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/follow",
    params(
        ("user_id" = i64, Path, description = "Profile to follow")
    ),
    responses(
        (status = 200, description = "Now following", body = FollowResponse),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Already following")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "social"
)]
pub async fn follow(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let followee_id = path.into_inner();
    let follower = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    social_graph::follow(pool.get_ref(), &follower, followee_id).await?;

    let follower_count = social_graph::follower_count(pool.get_ref(), followee_id).await?;
    Ok(HttpResponse::Ok().json(FollowResponse {
        following: true,
        follower_count,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/follow",
    params(
        ("user_id" = i64, Path, description = "Profile to unfollow")
    ),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not following this profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "social"
)]
pub async fn unfollow(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let followee_id = path.into_inner();
    let follower = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    social_graph::unfollow(pool.get_ref(), follower.id, followee_id).await?;

    let follower_count = social_graph::follower_count(pool.get_ref(), followee_id).await?;
    Ok(HttpResponse::Ok().json(FollowResponse {
        following: false,
        follower_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/following",
    params(
        ("user_id" = i64, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profiles this user follows, most recent first", body = Vec<crate::models::FollowEntry>),
        (status = 404, description = "Profile not found")
    ),
    tag = "social"
)]
pub async fn list_following(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let entries = social_graph::list_following(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/followers",
    params(
        ("user_id" = i64, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profiles following this user, most recent first", body = Vec<crate::models::FollowEntry>),
        (status = 404, description = "Profile not found")
    ),
    tag = "social"
)]
pub async fn list_followers(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let entries = social_graph::list_followers(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[utoipa::path(
    get,
    path = "/api/timeline",
    responses(
        (status = 200, description = "Posts by followed profiles, newest first", body = Vec<crate::models::PostResponse>),
        (status = 303, description = "Not signed in; go to the login page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "social"
)]
pub async fn timeline(
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    match social_graph::timeline(pool.get_ref(), viewer.as_ref()).await? {
        Timeline::NoViewer => Ok(see_other(&Redirect::to(LOGIN_PATH))),
        Timeline::Posts(posts) => Ok(HttpResponse::Ok().json(posts)),
    }
}
