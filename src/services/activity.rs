//! Likes with their denormalised counter, and the notifications they fan out.

use crate::db::DbPool;
use crate::entities::sea_orm_active_enums::NotificationType;
use crate::entities::{notification, post, post_like, user_profile};
use crate::errors::AppError;
use crate::models::{LikeResponse, NotificationResponse};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeDelta {
    Add,
    Remove,
}

/// A notification about to be written for `recipient_id`.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub link_url: String,
}

impl NewNotification {
    pub fn post_liked(actor: &user_profile::Model, post: &post::Model) -> Self {
        NewNotification {
            recipient_id: post.user_id,
            notification_type: NotificationType::PostLiked,
            title: "いいねされました".to_string(),
            message: format!("{}さんがあなたの投稿にいいねしました", actor.nickname),
            link_url: format!("/posts/{}", post.id),
        }
    }

    pub fn followed(actor: &user_profile::Model, followee_id: i64) -> Self {
        NewNotification {
            recipient_id: followee_id,
            notification_type: NotificationType::Followed,
            title: "フォローされました".to_string(),
            message: format!("{}さんがあなたをフォローしました", actor.nickname),
            link_url: format!("/users/{}", actor.id),
        }
    }
}

/// Writes `notification` unless the actor is also the recipient.
pub async fn notify<C>(
    conn: &C,
    actor_id: i64,
    notification: NewNotification,
) -> Result<Option<notification::Model>, AppError>
where
    C: ConnectionTrait,
{
    if notification.recipient_id == actor_id {
        return Ok(None);
    }
    let created = notification::ActiveModel {
        user_id: Set(notification.recipient_id),
        notification_type: Set(notification.notification_type),
        title: Set(notification.title),
        message: Set(notification.message),
        link_url: Set(notification.link_url),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    log::debug!(
        "Notification {} ({:?}) for profile {}",
        created.id,
        created.notification_type,
        created.user_id
    );
    Ok(Some(created))
}

/// Adds or removes one like row and moves `posts.like_count` by the same
/// amount. Both writes go through `txn`, so they commit or roll back together.
pub async fn apply_like_delta(
    txn: &DatabaseTransaction,
    post_id: i64,
    profile_id: i64,
    delta: LikeDelta,
) -> Result<(), AppError> {
    let step = match delta {
        LikeDelta::Add => {
            let like = post_like::ActiveModel {
                post_id: Set(post_id),
                user_id: Set(profile_id),
                created_at: Set(Utc::now()),
            };
            post_like::Entity::insert(like)
                .exec_without_returning(txn)
                .await
                .map_err(|e| AppError::from_db(e, "すでにいいねしています"))?;
            1
        }
        LikeDelta::Remove => {
            let removed = post_like::Entity::delete_by_id((post_id, profile_id))
                .exec(txn)
                .await?;
            if removed.rows_affected == 0 {
                return Err(AppError::not_found("いいねが見つかりません"));
            }
            -1
        }
    };

    post::Entity::update_many()
        .col_expr(
            post::Column::LikeCount,
            Expr::col(post::Column::LikeCount).add(step),
        )
        .filter(post::Column::Id.eq(post_id))
        .exec(txn)
        .await?;
    Ok(())
}

/// Likes the post if the actor has not liked it yet, otherwise removes the
/// like. Liking someone else's post notifies its author.
pub async fn toggle_like(
    db: &DbPool,
    actor: &user_profile::Model,
    post_id: i64,
) -> Result<LikeResponse, AppError> {
    let txn = db.begin().await?;

    let Some(target) = post::Entity::find_by_id(post_id).one(&txn).await? else {
        txn.rollback().await?;
        return Err(AppError::not_found("投稿が見つかりません"));
    };
    let existing = post_like::Entity::find_by_id((post_id, actor.id))
        .one(&txn)
        .await?;

    let liked = match existing {
        Some(_) => {
            apply_like_delta(&txn, post_id, actor.id, LikeDelta::Remove).await?;
            false
        }
        None => {
            apply_like_delta(&txn, post_id, actor.id, LikeDelta::Add).await?;
            notify(&txn, actor.id, NewNotification::post_liked(actor, &target)).await?;
            true
        }
    };

    let like_count = post::Entity::find_by_id(post_id)
        .one(&txn)
        .await?
        .map(|p| p.like_count)
        .unwrap_or_default();
    txn.commit().await?;

    log::info!(
        "Profile {} {} post {} (likes: {})",
        actor.id,
        if liked { "liked" } else { "unliked" },
        post_id,
        like_count
    );
    Ok(LikeResponse { liked, like_count })
}

pub async fn list_notifications(
    db: &DbPool,
    recipient_id: i64,
) -> Result<Vec<NotificationResponse>, AppError> {
    let notifications = notification::Entity::find()
        .filter(notification::Column::UserId.eq(recipient_id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await?;
    Ok(notifications.into_iter().map(Into::into).collect())
}

pub async fn unread_count(db: &DbPool, recipient_id: i64) -> Result<u64, AppError> {
    let count = notification::Entity::find()
        .filter(notification::Column::UserId.eq(recipient_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?;
    Ok(count)
}

/// Marks one notification read. Only its recipient may do so; repeating the
/// call is a no-op.
pub async fn mark_read(
    db: &DbPool,
    notification_id: i64,
    actor_id: i64,
) -> Result<NotificationResponse, AppError> {
    let found = notification::Entity::find_by_id(notification_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("通知が見つかりません"))?;
    if found.user_id != actor_id {
        return Err(AppError::forbidden(
            "この通知を操作する権限がありません",
        ));
    }
    if found.is_read {
        return Ok(found.into());
    }

    let mut active: notification::ActiveModel = found.into();
    active.is_read = Set(true);
    let updated = active.update(db).await?;
    Ok(updated.into())
}

/// Returns how many notifications flipped to read.
pub async fn mark_all_read(db: &DbPool, recipient_id: i64) -> Result<u64, AppError> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::UserId.eq(recipient_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
