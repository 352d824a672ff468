use crate::auth::AuthenticatedAccount;
use crate::config::Config;
use crate::db::DbPool;
use crate::identity::ObjectStorage;
use crate::models::{CreatePostRequest, PostCreatedResponse};
use crate::services::{activity, posts, profiles};
use actix_web::http::header;
use actix_web::{web, HttpResponse, ResponseError, Result as ActixResult};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 303, description = "Post created; back to the bar page", body = PostCreatedResponse),
        (status = 400, description = "Invalid body or too many images"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bar not found"),
        (status = 502, description = "Image storage failed; nothing was saved")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn create_post(
    req: web::Json<CreatePostRequest>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    storage: web::Data<dyn ObjectStorage>,
) -> ActixResult<HttpResponse> {
    let author = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let req = req.into_inner();
    let bar_id = req.bar_id;

    match posts::create_post(pool.get_ref(), storage.get_ref(), &config, &author, req).await {
        Ok(created) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, created.redirect.location.clone()))
            .json(PostCreatedResponse {
                redirect_to: created.redirect.location,
                post: created.post,
            })),
        // Echo the bar back so the form can be refilled.
        Err(e) => Ok(HttpResponse::build(e.status_code()).json(json!({
            "error": e.to_string(),
            "bar_id": bar_id
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post detail", body = crate::models::PostResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn show_post(
    path: web::Path<i64>,
    account: Option<AuthenticatedAccount>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer = profiles::viewer_profile(pool.get_ref(), account.as_ref()).await?;
    let post = posts::get_post(pool.get_ref(), path.into_inner(), viewer.map(|v| v.id)).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn delete_post(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let actor = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    posts::delete_post(pool.get_ref(), &actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/like",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Like toggled", body = crate::models::LikeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "posts"
)]
pub async fn toggle_like(
    path: web::Path<i64>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let actor = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let result = activity::toggle_like(pool.get_ref(), &actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}
