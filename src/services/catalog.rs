//! Bars, favourites, view history and articles.

use crate::db::DbPool;
use crate::entities::{article, bar, favorite_bar, view_history};
use crate::errors::{is_unique_violation, AppError};
use crate::models::{ArticleResponse, BarQuery, BarResponse, ViewHistoryEntry};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashSet;

pub const VIEW_HISTORY_LIMIT: u64 = 20;

pub async fn search_bars(
    db: &DbPool,
    query: &BarQuery,
    viewer_id: Option<i64>,
) -> Result<Vec<BarResponse>, AppError> {
    let mut select = bar::Entity::find();
    if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(bar::Column::Name.contains(keyword))
                .add(bar::Column::Address.contains(keyword)),
        );
    }
    if let Some(prefecture) = query.prefecture {
        select = select.filter(bar::Column::Prefecture.eq(prefecture));
    }
    let bars = select.order_by_asc(bar::Column::Id).all(db).await?;
    log::debug!("Bar search {:?} matched {} bar(s)", query, bars.len());

    let favorites = favorite_ids(db, viewer_id).await?;
    Ok(bars
        .into_iter()
        .map(|b| {
            let is_favorite = favorites.contains(&b.id);
            BarResponse::new(b, is_favorite)
        })
        .collect())
}

async fn favorite_ids(db: &DbPool, viewer_id: Option<i64>) -> Result<HashSet<i64>, AppError> {
    let Some(viewer) = viewer_id else {
        return Ok(HashSet::new());
    };
    let ids: Vec<i64> = favorite_bar::Entity::find()
        .select_only()
        .column(favorite_bar::Column::BarId)
        .filter(favorite_bar::Column::UserId.eq(viewer))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

pub async fn get_bar(db: &DbPool, bar_id: i64) -> Result<bar::Model, AppError> {
    bar::Entity::find_by_id(bar_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("店舗が見つかりません"))
}

/// Bar detail. A signed-in viewer's visit is recorded in their history.
pub async fn show_bar(
    db: &DbPool,
    bar_id: i64,
    viewer_id: Option<i64>,
) -> Result<BarResponse, AppError> {
    let found = get_bar(db, bar_id).await?;
    let is_favorite = match viewer_id {
        Some(viewer) => {
            record_view(db, viewer, bar_id).await?;
            favorite_bar::Entity::find_by_id((viewer, bar_id))
                .one(db)
                .await?
                .is_some()
        }
        None => false,
    };
    Ok(BarResponse::new(found, is_favorite))
}

/// One row per viewer and bar; a repeat visit only moves `viewed_at`.
pub async fn record_view(db: &DbPool, viewer_id: i64, bar_id: i64) -> Result<(), AppError> {
    let entry = view_history::ActiveModel {
        user_id: Set(viewer_id),
        bar_id: Set(bar_id),
        viewed_at: Set(Utc::now()),
    };
    view_history::Entity::insert(entry)
        .on_conflict(
            OnConflict::columns([view_history::Column::UserId, view_history::Column::BarId])
                .update_column(view_history::Column::ViewedAt)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Returns whether the bar is a favourite after the call.
pub async fn toggle_favorite(db: &DbPool, viewer_id: i64, bar_id: i64) -> Result<bool, AppError> {
    get_bar(db, bar_id).await?;

    let removed = favorite_bar::Entity::delete_by_id((viewer_id, bar_id))
        .exec(db)
        .await?;
    if removed.rows_affected > 0 {
        log::info!("Profile {} removed bar {} from favorites", viewer_id, bar_id);
        return Ok(false);
    }

    let favorite = favorite_bar::ActiveModel {
        user_id: Set(viewer_id),
        bar_id: Set(bar_id),
        created_at: Set(Utc::now()),
    };
    match favorite_bar::Entity::insert(favorite)
        .exec_without_returning(db)
        .await
    {
        Ok(_) => {}
        // A concurrent request already added it.
        Err(e) if is_unique_violation(&e) => {}
        Err(e) => return Err(e.into()),
    }
    log::info!("Profile {} added bar {} to favorites", viewer_id, bar_id);
    Ok(true)
}

pub async fn list_favorites(db: &DbPool, viewer_id: i64) -> Result<Vec<BarResponse>, AppError> {
    let rows = favorite_bar::Entity::find()
        .filter(favorite_bar::Column::UserId.eq(viewer_id))
        .order_by_desc(favorite_bar::Column::CreatedAt)
        .order_by_desc(favorite_bar::Column::BarId)
        .find_also_related(bar::Entity)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(_, b)| b.map(|b| BarResponse::new(b, true)))
        .collect())
}

/// Most recently viewed bars, newest first.
pub async fn list_view_history(
    db: &DbPool,
    viewer_id: i64,
) -> Result<Vec<ViewHistoryEntry>, AppError> {
    let rows = view_history::Entity::find()
        .filter(view_history::Column::UserId.eq(viewer_id))
        .order_by_desc(view_history::Column::ViewedAt)
        .order_by_desc(view_history::Column::BarId)
        .limit(VIEW_HISTORY_LIMIT)
        .find_also_related(bar::Entity)
        .all(db)
        .await?;
    let favorites = favorite_ids(db, Some(viewer_id)).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(entry, b)| {
            let b = b?;
            let is_favorite = favorites.contains(&b.id);
            Some(ViewHistoryEntry {
                bar: BarResponse::new(b, is_favorite),
                viewed_at: entry.viewed_at,
            })
        })
        .collect())
}

pub async fn list_articles(db: &DbPool) -> Result<Vec<ArticleResponse>, AppError> {
    let articles = article::Entity::find()
        .order_by_desc(article::Column::PublishedAt)
        .order_by_desc(article::Column::Id)
        .all(db)
        .await?;
    Ok(articles.into_iter().map(Into::into).collect())
}

pub async fn get_article(db: &DbPool, article_id: i64) -> Result<ArticleResponse, AppError> {
    article::Entity::find_by_id(article_id)
        .one(db)
        .await?
        .map(Into::into)
        .ok_or_else(|| AppError::not_found("記事が見つかりません"))
}
