//! Sign-up → email confirmation → profile draft → review → persisted profile.
//!
//! No intermediate state is kept on the server: the account lives with the
//! identity provider, the session travels as a token, and the profile draft
//! travels through the client as an encoded [`ProfileDraft`] until the review
//! step commits it as a single `user_profiles` row.

use crate::auth::{create_token, AuthenticatedAccount, Claims};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::user_profile;
use crate::errors::{is_unique_violation, AppError};
use crate::identity::{Account, CreatedAccount, IdentityProvider, ObjectStorage};
use crate::models::{ProfileDraft, ProfileDraftRequest, ReviewAction};
use crate::services::{profiles, Redirect};
use crate::validation::{
    birthday_from_parts, parse_birthday, require, validate_bio, validate_email,
    validate_password,
};
use chrono::Utc;
use sea_orm::{EntityTrait, Set};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const PROFILE_DRAFT_PATH: &str = "/signup/profile";
pub const PROFILE_REVIEW_PATH: &str = "/signup/confirm";

/// A session minted for an active account.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub redirect: Redirect,
}

#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub draft: ProfileDraft,
    pub redirect: Redirect,
    pub image_upload_error: Option<String>,
}

pub async fn register_account(
    identity: &dyn IdentityProvider,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<CreatedAccount, AppError> {
    validate_email(email)?;
    validate_password(password)?;

    let created = identity
        .create_account(email.trim(), password, &config.confirmation_redirect())
        .await?;
    log::info!(
        "Registered account {} (pending: {})",
        created.account_id,
        created.pending_confirmation
    );
    Ok(created)
}

/// Verifies the token from the confirmation email and signs the account in.
pub async fn confirm_email(
    db: &DbPool,
    identity: &dyn IdentityProvider,
    config: &Config,
    token: &str,
) -> Result<Session, AppError> {
    if token.trim().is_empty() {
        return Err(AppError::validation("確認用リンクが正しくありません"));
    }
    let account = identity.verify_confirmation_token(token.trim()).await?;
    log::info!("Account {} confirmed", account.account_id);
    start_session(db, config, account).await
}

pub async fn sign_in(
    db: &DbPool,
    identity: &dyn IdentityProvider,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(AppError::validation("パスワードを入力してください"));
    }
    let account = identity.sign_in(email.trim(), password).await?;
    start_session(db, config, account).await
}

async fn start_session(db: &DbPool, config: &Config, account: Account) -> Result<Session, AppError> {
    let redirect = post_sign_in_destination(db, &account.account_id).await?;
    let claims = Claims::new(account.account_id, account.email, config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret).map_err(|e| {
        log::error!("Failed to sign session token: {:?}", e);
        AppError::Internal("ログインに失敗しました".into())
    })?;
    Ok(Session { token, redirect })
}

/// Accounts that have not completed their profile are sent to the draft form.
pub async fn post_sign_in_destination(db: &DbPool, account_id: &str) -> Result<Redirect, AppError> {
    match profiles::find_by_account(db, account_id).await? {
        Some(_) => Ok(Redirect::to(HOME_PATH)),
        None => Ok(Redirect::to(PROFILE_DRAFT_PATH)),
    }
}

/// Validates the profile form and produces the draft for the review step.
/// Nothing is written to the store. A failed image upload is reported but
/// does not block the draft.
pub async fn submit_profile_draft(
    storage: &dyn ObjectStorage,
    config: &Config,
    account: &AuthenticatedAccount,
    form: ProfileDraftRequest,
) -> Result<DraftOutcome, AppError> {
    let last_name = require(form.last_name.as_deref(), "姓")?.to_string();
    let first_name = require(form.first_name.as_deref(), "名")?.to_string();
    let nickname = require(form.nickname.as_deref(), "ニックネーム")?.to_string();
    let birthday = draft_birthday(&form)?;
    let gender = form
        .gender
        .ok_or_else(|| AppError::validation("性別を選択してください"))?;
    let prefecture = form
        .prefecture
        .ok_or_else(|| AppError::validation("都道府県を選択してください"))?;
    let bio = form
        .bio
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);
    validate_bio(bio.as_deref())?;

    let mut image_upload_error = None;
    let profile_image_url = match &form.profile_image {
        Some(image) => {
            match profiles::upload_profile_image(storage, config, &account.account_id, image).await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!(
                        "Continuing profile draft for {} without image: {}",
                        account.account_id,
                        e
                    );
                    image_upload_error = Some(e.to_string());
                    None
                }
            }
        }
        None => None,
    };

    let draft = ProfileDraft {
        last_name,
        first_name,
        nickname,
        birthday,
        gender,
        prefecture,
        bio,
        profile_image_url,
    };
    let redirect = Redirect::to(draft.location(PROFILE_REVIEW_PATH)?);

    Ok(DraftOutcome {
        draft,
        redirect,
        image_upload_error,
    })
}

fn draft_birthday(form: &ProfileDraftRequest) -> Result<String, AppError> {
    if let Some(iso) = form.birthday.as_deref().filter(|b| !b.trim().is_empty()) {
        return Ok(parse_birthday(iso)?.format("%Y-%m-%d").to_string());
    }
    match (&form.birth_year, &form.birth_month, &form.birth_day) {
        (None, None, None) => Err(AppError::validation("生年月日を入力してください")),
        (year, month, day) => birthday_from_parts(
            year.as_deref().unwrap_or_default(),
            month.as_deref().unwrap_or_default(),
            day.as_deref().unwrap_or_default(),
        ),
    }
}

/// Review step: either go back to the form with the draft, or commit it.
pub async fn review_profile(
    db: &DbPool,
    account: &AuthenticatedAccount,
    encoded_draft: &str,
    action: ReviewAction,
) -> Result<Redirect, AppError> {
    let draft = ProfileDraft::decode(encoded_draft)?;
    match action {
        ReviewAction::Edit => Ok(Redirect::to(draft.location(PROFILE_DRAFT_PATH)?)),
        ReviewAction::Confirm => confirm_and_persist_profile(db, account, &draft).await,
    }
}

/// Commits the draft as the account's profile. Resubmitting after success is
/// a no-op that lands on the home page.
pub async fn confirm_and_persist_profile(
    db: &DbPool,
    account: &AuthenticatedAccount,
    draft: &ProfileDraft,
) -> Result<Redirect, AppError> {
    if profiles::find_by_account(db, &account.account_id)
        .await?
        .is_some()
    {
        log::info!(
            "Profile for {} already exists; skipping creation",
            account.account_id
        );
        return Ok(Redirect::to(HOME_PATH));
    }

    // The draft came back from the client, so it is checked again.
    let birthday = parse_birthday(&draft.birthday)?;
    let last_name = require(Some(draft.last_name.as_str()), "姓")?.to_string();
    let first_name = require(Some(draft.first_name.as_str()), "名")?.to_string();
    let nickname = require(Some(draft.nickname.as_str()), "ニックネーム")?.to_string();
    validate_bio(draft.bio.as_deref())?;

    let now = Utc::now();
    let profile = user_profile::ActiveModel {
        account_id: Set(account.account_id.clone()),
        last_name: Set(last_name),
        first_name: Set(first_name),
        nickname: Set(nickname),
        birthday: Set(birthday),
        gender: Set(draft.gender),
        prefecture: Set(draft.prefecture),
        profile_image_url: Set(draft.profile_image_url.clone()),
        bio: Set(draft.bio.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match user_profile::Entity::insert(profile).exec(db).await {
        Ok(result) => {
            log::info!(
                "Created profile {} for account {}",
                result.last_insert_id,
                account.account_id
            );
            Ok(Redirect::to(HOME_PATH))
        }
        Err(e) if is_unique_violation(&e) => {
            log::info!(
                "Concurrent profile creation for {} already committed",
                account.account_id
            );
            Ok(Redirect::to(HOME_PATH))
        }
        Err(e) => {
            log::error!(
                "Failed to create profile for {}: {:?}",
                account.account_id,
                e
            );
            Err(AppError::Internal("プロフィールの登録に失敗しました".into()))
        }
    }
}
