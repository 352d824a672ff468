use crate::db::DbPool;
use crate::services::catalog;
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "Articles, newest first", body = Vec<crate::models::ArticleResponse>)
    ),
    tag = "articles"
)]
pub async fn list_articles(pool: web::Data<DbPool>) -> ActixResult<HttpResponse> {
    let articles = catalog::list_articles(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[utoipa::path(
    get,
    path = "/api/articles/{article_id}",
    params(
        ("article_id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article", body = crate::models::ArticleResponse),
        (status = 404, description = "Article not found")
    ),
    tag = "articles"
)]
pub async fn show_article(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let article = catalog::get_article(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(article))
}
