//! Directed follow relationships and everything derived from them.
//!
//! Counts and the timeline are computed from `follow_relations` on every call.

use crate::db::DbPool;
use crate::entities::{follow_relation, post, user_profile};
use crate::errors::AppError;
use crate::models::{FollowEntry, PostResponse};
use crate::services::activity::{self, NewNotification};
use crate::services::posts;
use crate::services::profiles;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

/// Result of asking for a timeline. A missing viewer is not the same as a
/// viewer who follows nobody.
#[derive(Debug)]
pub enum Timeline {
    NoViewer,
    Posts(Vec<PostResponse>),
}

pub async fn follow(
    db: &DbPool,
    follower: &user_profile::Model,
    followee_id: i64,
) -> Result<(), AppError> {
    if follower.id == followee_id {
        return Err(AppError::validation(
            "自分自身をフォローすることはできません",
        ));
    }
    profiles::get_profile(db, followee_id).await?;

    let txn = db.begin().await?;
    let relation = follow_relation::ActiveModel {
        follower_id: Set(follower.id),
        followee_id: Set(followee_id),
        created_at: Set(Utc::now()),
    };
    if let Err(e) = follow_relation::Entity::insert(relation)
        .exec_without_returning(&txn)
        .await
    {
        txn.rollback().await?;
        return Err(AppError::from_db(e, "すでにフォローしています"));
    }
    activity::notify(&txn, follower.id, NewNotification::followed(follower, followee_id)).await?;
    txn.commit().await?;

    log::info!("Profile {} followed {}", follower.id, followee_id);
    Ok(())
}

pub async fn unfollow(db: &DbPool, follower_id: i64, followee_id: i64) -> Result<(), AppError> {
    let result = follow_relation::Entity::delete_by_id((follower_id, followee_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("フォローしていません"));
    }
    log::info!("Profile {} unfollowed {}", follower_id, followee_id);
    Ok(())
}

pub async fn is_following(db: &DbPool, follower_id: i64, followee_id: i64) -> Result<bool, AppError> {
    let relation = follow_relation::Entity::find_by_id((follower_id, followee_id))
        .one(db)
        .await?;
    Ok(relation.is_some())
}

pub async fn following_count(db: &DbPool, profile_id: i64) -> Result<u64, AppError> {
    let count = follow_relation::Entity::find()
        .filter(follow_relation::Column::FollowerId.eq(profile_id))
        .count(db)
        .await?;
    Ok(count)
}

pub async fn follower_count(db: &DbPool, profile_id: i64) -> Result<u64, AppError> {
    let count = follow_relation::Entity::find()
        .filter(follow_relation::Column::FolloweeId.eq(profile_id))
        .count(db)
        .await?;
    Ok(count)
}

/// Profiles `profile_id` follows, most recent first.
pub async fn list_following(db: &DbPool, profile_id: i64) -> Result<Vec<FollowEntry>, AppError> {
    profiles::get_profile(db, profile_id).await?;
    let relations = follow_relation::Entity::find()
        .filter(follow_relation::Column::FollowerId.eq(profile_id))
        .order_by_desc(follow_relation::Column::CreatedAt)
        .order_by_desc(follow_relation::Column::FolloweeId)
        .all(db)
        .await?;
    let pairs = relations
        .into_iter()
        .map(|r| (r.followee_id, r.created_at))
        .collect();
    follow_entries(db, pairs).await
}

/// Profiles following `profile_id`, most recent first.
pub async fn list_followers(db: &DbPool, profile_id: i64) -> Result<Vec<FollowEntry>, AppError> {
    profiles::get_profile(db, profile_id).await?;
    let relations = follow_relation::Entity::find()
        .filter(follow_relation::Column::FolloweeId.eq(profile_id))
        .order_by_desc(follow_relation::Column::CreatedAt)
        .order_by_desc(follow_relation::Column::FollowerId)
        .all(db)
        .await?;
    let pairs = relations
        .into_iter()
        .map(|r| (r.follower_id, r.created_at))
        .collect();
    follow_entries(db, pairs).await
}

async fn follow_entries(
    db: &DbPool,
    pairs: Vec<(i64, chrono::DateTime<Utc>)>,
) -> Result<Vec<FollowEntry>, AppError> {
    let ids = pairs.iter().map(|(id, _)| *id).collect();
    let mut summaries = profiles::load_summaries(db, ids).await?;
    Ok(pairs
        .into_iter()
        .filter_map(|(id, followed_at)| {
            summaries
                .remove(&id)
                .map(|profile| FollowEntry { profile, followed_at })
        })
        .collect())
}

/// Posts by everyone the viewer follows, newest first.
pub async fn timeline(
    db: &DbPool,
    viewer: Option<&user_profile::Model>,
) -> Result<Timeline, AppError> {
    let Some(viewer) = viewer else {
        return Ok(Timeline::NoViewer);
    };

    let followee_ids: Vec<i64> = follow_relation::Entity::find()
        .select_only()
        .column(follow_relation::Column::FolloweeId)
        .filter(follow_relation::Column::FollowerId.eq(viewer.id))
        .into_tuple()
        .all(db)
        .await?;
    if followee_ids.is_empty() {
        return Ok(Timeline::Posts(Vec::new()));
    }

    let found = post::Entity::find()
        .filter(post::Column::UserId.is_in(followee_ids))
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .all(db)
        .await?;
    let hydrated = posts::hydrate(db, found, Some(viewer.id)).await?;
    Ok(Timeline::Posts(hydrated))
}
