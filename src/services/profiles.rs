use crate::auth::AuthenticatedAccount;
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::user_profile;
use crate::errors::AppError;
use crate::identity::ObjectStorage;
use crate::models::{ImageUpload, ProfileDetailResponse, ProfileSummary, UpdateProfileRequest};
use crate::services::social_graph;
use crate::validation::validate_bio;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::collections::HashMap;

pub async fn find_by_account(
    db: &DbPool,
    account_id: &str,
) -> Result<Option<user_profile::Model>, AppError> {
    let profile = user_profile::Entity::find()
        .filter(user_profile::Column::AccountId.eq(account_id))
        .one(db)
        .await?;
    Ok(profile)
}

/// The acting profile for an authenticated account. An account that never
/// finished registration has no profile and counts as unauthenticated.
pub async fn require_profile(
    db: &DbPool,
    account_id: &str,
) -> Result<user_profile::Model, AppError> {
    find_by_account(db, account_id)
        .await?
        .ok_or(AppError::Unauthenticated)
}

/// The viewer's profile, if signed in and registered.
pub async fn viewer_profile(
    db: &DbPool,
    account: Option<&AuthenticatedAccount>,
) -> Result<Option<user_profile::Model>, AppError> {
    match account {
        Some(account) => find_by_account(db, &account.account_id).await,
        None => Ok(None),
    }
}

pub async fn get_profile(db: &DbPool, profile_id: i64) -> Result<user_profile::Model, AppError> {
    user_profile::Entity::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("ユーザーが見つかりません"))
}

pub async fn profile_detail(
    db: &DbPool,
    profile_id: i64,
    viewer_id: Option<i64>,
) -> Result<ProfileDetailResponse, AppError> {
    let profile = get_profile(db, profile_id).await?;
    let following_count = social_graph::following_count(db, profile.id).await?;
    let follower_count = social_graph::follower_count(db, profile.id).await?;
    let is_following = match viewer_id {
        Some(viewer) if viewer != profile.id => {
            social_graph::is_following(db, viewer, profile.id).await?
        }
        _ => false,
    };

    Ok(ProfileDetailResponse {
        profile: ProfileSummary::from(&profile),
        following_count,
        follower_count,
        is_following,
        is_me: viewer_id == Some(profile.id),
    })
}

/// Summaries keyed by profile id, for decorating lists.
pub async fn load_summaries(
    db: &DbPool,
    ids: Vec<i64>,
) -> Result<HashMap<i64, ProfileSummary>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let profiles = user_profile::Entity::find()
        .filter(user_profile::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(profiles
        .iter()
        .map(|p| (p.id, ProfileSummary::from(p)))
        .collect())
}

/// Stores a profile image under `<account>/<millis>.<ext>` and returns its public URL.
pub async fn upload_profile_image(
    storage: &dyn ObjectStorage,
    config: &Config,
    account_id: &str,
    image: &ImageUpload,
) -> Result<String, AppError> {
    let bytes = image.decode()?;
    let key = format!(
        "{}/{}.{}",
        account_id,
        Utc::now().timestamp_millis(),
        image.extension()
    );
    storage
        .store_object(
            &config.storage.profile_image_bucket,
            &key,
            bytes,
            &image.content_type,
        )
        .await
        .map_err(|e| {
            log::warn!("Profile image upload failed for {}: {}", account_id, e);
            AppError::Dependency("画像のアップロードに失敗しました".into())
        })
}

/// Owner-only edit of the mutable profile fields.
pub async fn update_profile(
    db: &DbPool,
    storage: &dyn ObjectStorage,
    config: &Config,
    owner: user_profile::Model,
    req: UpdateProfileRequest,
) -> Result<user_profile::Model, AppError> {
    validate_bio(req.bio.as_deref())?;

    let image_url = match &req.profile_image {
        Some(image) => Some(upload_profile_image(storage, config, &owner.account_id, image).await?),
        None => None,
    };

    let mut active: user_profile::ActiveModel = owner.into();
    if let Some(bio) = req.bio {
        let bio = bio.trim().to_string();
        active.bio = Set(if bio.is_empty() { None } else { Some(bio) });
    }
    if let Some(url) = image_url {
        active.profile_image_url = Set(Some(url));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    Ok(updated)
}
