use crate::auth::AuthenticatedAccount;
use crate::db::DbPool;
use crate::models::{BarQuery, FavoriteResponse};
use crate::services::{catalog, posts, profiles};
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    get,
    path = "/api/bars",
    params(
        ("keyword" = Option<String>, Query, description = "Matched against bar name and address"),
        ("prefecture" = Option<String>, Query, description = "Prefecture, e.g. 東京都")
    ),
    responses(
        (status = 200, description = "Matching bars", body = Vec<crate::models::BarResponse>)
    ),
    tag = "bars"
)]
pub async fn search_bars(
    query: web::Query<BarQuery>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let bars = catalog::search_bars(pool.get_ref(), &query, viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(bars))
}

#[utoipa::path(
    get,
    path = "/api/bars/{bar_id}",
    params(
        ("bar_id" = i64, Path, description = "Bar ID")
    ),
    responses(
        (status = 200, description = "Bar detail", body = crate::models::BarResponse),
        (status = 404, description = "Bar not found")
    ),
    tag = "bars"
)]
pub async fn show_bar(
    path: web::Path<i64>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let bar = catalog::show_bar(pool.get_ref(), path.into_inner(), viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(bar))
}

#[utoipa::path(
    get,
    path = "/api/bars/{bar_id}/posts",
    params(
        ("bar_id" = i64, Path, description = "Bar ID")
    ),
    responses(
        (status = 200, description = "Posts about this bar, newest first", body = Vec<crate::models::PostResponse>),
        (status = 404, description = "Bar not found")
    ),
    tag = "bars"
)]
pub async fn list_bar_posts(
    path: web::Path<i64>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let posts =
        posts::list_bar_posts(pool.get_ref(), path.into_inner(), viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[utoipa::path(
    post,
    path = "/api/bars/{bar_id}/favorite",
    params(
        ("bar_id" = i64, Path, description = "Bar ID")
    ),
    responses(
        (status = 200, description = "Favorite toggled", body = FavoriteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bar not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "bars"
)]
pub async fn toggle_favorite(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let favorite = catalog::toggle_favorite(pool.get_ref(), viewer.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(FavoriteResponse { favorite }))
}

#[utoipa::path(
    get,
    path = "/api/me/favorites",
    responses(
        (status = 200, description = "Favorite bars, most recently added first", body = Vec<crate::models::BarResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "bars"
)]
pub async fn list_favorites(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let bars = catalog::list_favorites(pool.get_ref(), viewer.id).await?;
    Ok(HttpResponse::Ok().json(bars))
}

#[utoipa::path(
    get,
    path = "/api/me/history",
    responses(
        (status = 200, description = "Up to 20 recently viewed bars", body = Vec<crate::models::ViewHistoryEntry>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "bars"
)]
pub async fn list_view_history(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let history = catalog::list_view_history(pool.get_ref(), viewer.id).await?;
    Ok(HttpResponse::Ok().json(history))
}
