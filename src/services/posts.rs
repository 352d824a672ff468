use crate::config::Config;
use crate::db::DbPool;
use crate::entities::{bar, post, post_image, post_like, user_profile};
use crate::errors::AppError;
use crate::identity::ObjectStorage;
use crate::models::{CreatePostRequest, ImageUpload, PostResponse};
use crate::services::{profiles, Redirect};
use crate::validation::{validate_post_body, MAX_POST_IMAGES};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

pub const POST_FAILED_MESSAGE: &str = "投稿に失敗しました。もう一度お試しください";

#[derive(Debug)]
pub struct CreatedPost {
    pub post: PostResponse,
    pub redirect: Redirect,
}

/// Stores a post with up to four images. The post row, its image rows and the
/// uploaded objects are kept only if every image is stored.
pub async fn create_post(
    db: &DbPool,
    storage: &dyn ObjectStorage,
    config: &Config,
    author: &user_profile::Model,
    req: CreatePostRequest,
) -> Result<CreatedPost, AppError> {
    validate_post_body(&req.body)?;
    if req.images.len() > MAX_POST_IMAGES {
        return Err(AppError::validation("画像は4枚まで添付できます"));
    }
    let mut decoded = Vec::with_capacity(req.images.len());
    for image in &req.images {
        decoded.push((image.decode()?, image));
    }

    bar::Entity::find_by_id(req.bar_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("店舗が見つかりません"))?;

    let txn = db.begin().await?;
    let mut stored_keys = Vec::new();
    let outcome = insert_post_with_images(
        &txn,
        storage,
        config,
        author,
        &req,
        decoded,
        &mut stored_keys,
    )
    .await;

    let created = match outcome {
        Ok(created) => created,
        Err(e) => {
            log::warn!(
                "Rolling back post by profile {} for bar {}: {}",
                author.id,
                req.bar_id,
                e
            );
            if let Err(rollback_err) = txn.rollback().await {
                log::error!("Post rollback failed: {:?}", rollback_err);
            }
            discard_objects(storage, &config.storage.post_image_bucket, &stored_keys).await;
            return Err(AppError::Dependency(POST_FAILED_MESSAGE.into()));
        }
    };
    txn.commit().await?;

    log::info!(
        "Profile {} created post {} with {} image(s)",
        author.id,
        created.id,
        stored_keys.len()
    );
    let post = get_post(db, created.id, Some(author.id)).await?;
    Ok(CreatedPost {
        redirect: Redirect::to(format!("/bars/{}", post.bar_id)),
        post,
    })
}

async fn insert_post_with_images(
    txn: &DatabaseTransaction,
    storage: &dyn ObjectStorage,
    config: &Config,
    author: &user_profile::Model,
    req: &CreatePostRequest,
    images: Vec<(Vec<u8>, &ImageUpload)>,
    stored_keys: &mut Vec<String>,
) -> Result<post::Model, AppError> {
    let created = post::ActiveModel {
        user_id: Set(author.id),
        bar_id: Set(req.bar_id),
        body: Set(req.body.trim().to_string()),
        like_count: Set(0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let millis = Utc::now().timestamp_millis();
    for (index, (bytes, image)) in images.into_iter().enumerate() {
        let key = format!(
            "{}/{}_{}.{}",
            author.account_id,
            millis,
            index,
            image.extension()
        );
        let url = storage
            .store_object(
                &config.storage.post_image_bucket,
                &key,
                bytes,
                &image.content_type,
            )
            .await
            .map_err(|e| AppError::Dependency(e.to_string()))?;
        stored_keys.push(key);

        post_image::ActiveModel {
            post_id: Set(created.id),
            image_url: Set(url),
            sort_order: Set(index as i32),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(created)
}

async fn discard_objects(storage: &dyn ObjectStorage, bucket: &str, keys: &[String]) {
    for key in keys {
        if let Err(e) = storage.delete_object(bucket, key).await {
            log::error!("Failed to remove orphaned object {}/{}: {}", bucket, key, e);
        }
    }
}

/// Decorates posts with images, author and the viewer's like state. Order is kept.
pub async fn hydrate(
    db: &DbPool,
    posts: Vec<post::Model>,
    viewer_id: Option<i64>,
) -> Result<Vec<PostResponse>, AppError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

    let mut images: HashMap<i64, Vec<String>> = HashMap::new();
    for image in post_image::Entity::find()
        .filter(post_image::Column::PostId.is_in(post_ids.clone()))
        .order_by_asc(post_image::Column::SortOrder)
        .all(db)
        .await?
    {
        images.entry(image.post_id).or_default().push(image.image_url);
    }

    let author_ids: Vec<i64> = posts
        .iter()
        .map(|p| p.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let authors = profiles::load_summaries(db, author_ids).await?;

    let liked: HashSet<i64> = match viewer_id {
        Some(viewer) => post_like::Entity::find()
            .filter(post_like::Column::UserId.eq(viewer))
            .filter(post_like::Column::PostId.is_in(post_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.post_id)
            .collect(),
        None => HashSet::new(),
    };

    Ok(posts
        .into_iter()
        .filter_map(|p| {
            let author = authors.get(&p.user_id)?.clone();
            Some(PostResponse {
                id: p.id,
                bar_id: p.bar_id,
                body: p.body,
                like_count: p.like_count,
                is_liked: liked.contains(&p.id),
                author,
                images: images.remove(&p.id).unwrap_or_default(),
                created_at: p.created_at,
            })
        })
        .collect())
}

pub async fn get_post(
    db: &DbPool,
    post_id: i64,
    viewer_id: Option<i64>,
) -> Result<PostResponse, AppError> {
    let found = post::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("投稿が見つかりません"))?;
    hydrate(db, vec![found], viewer_id)
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("投稿が見つかりません"))
}

/// A bar's posts, newest first.
pub async fn list_bar_posts(
    db: &DbPool,
    bar_id: i64,
    viewer_id: Option<i64>,
) -> Result<Vec<PostResponse>, AppError> {
    bar::Entity::find_by_id(bar_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("店舗が見つかりません"))?;
    let found = post::Entity::find()
        .filter(post::Column::BarId.eq(bar_id))
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .all(db)
        .await?;
    hydrate(db, found, viewer_id).await
}

/// Removes a post together with its images and likes. Author only.
pub async fn delete_post(
    db: &DbPool,
    actor: &user_profile::Model,
    post_id: i64,
) -> Result<(), AppError> {
    let found = post::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("投稿が見つかりません"))?;
    if found.user_id != actor.id {
        return Err(AppError::forbidden("この投稿を削除する権限がありません"));
    }

    let txn = db.begin().await?;
    post_image::Entity::delete_many()
        .filter(post_image::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;
    post_like::Entity::delete_many()
        .filter(post_like::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;
    found.delete(&txn).await?;
    txn.commit().await?;

    log::info!("Profile {} deleted post {}", actor.id, post_id);
    Ok(())
}
