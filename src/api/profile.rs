use crate::api::see_other;
use crate::auth::AuthenticatedAccount;
use crate::config::Config;
use crate::db::DbPool;
use crate::identity::ObjectStorage;
use crate::models::{
    ConfirmProfileRequest, MyProfileResponse, ProfileDraftRequest, ProfileDraftResponse,
    UpdateProfileRequest,
};
use crate::services::{profiles, registration};
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    post,
    path = "/api/profile/draft",
    request_body = ProfileDraftRequest,
    responses(
        (status = 303, description = "Draft accepted; continue to review", body = ProfileDraftResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "profile"
)]
pub async fn submit_draft(
    req: web::Json<ProfileDraftRequest>,
    account: AuthenticatedAccount,
    config: web::Data<Config>,
    storage: web::Data<dyn ObjectStorage>,
) -> ActixResult<HttpResponse> {
    let outcome =
        registration::submit_profile_draft(storage.get_ref(), &config, &account, req.into_inner())
            .await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, outcome.redirect.location.clone()))
        .json(ProfileDraftResponse {
            redirect_to: outcome.redirect.location,
            draft: outcome.draft.encode()?,
            image_upload_error: outcome.image_upload_error,
        }))
}

#[utoipa::path(
    post,
    path = "/api/profile/confirm",
    request_body = ConfirmProfileRequest,
    responses(
        (status = 303, description = "Profile stored (confirm) or back to the form (edit)", body = crate::models::RedirectResponse),
        (status = 400, description = "Draft could not be read or failed validation"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "profile"
)]
pub async fn confirm_profile(
    req: web::Json<ConfirmProfileRequest>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let redirect =
        registration::review_profile(pool.get_ref(), &account, &req.draft, req.action).await?;
    Ok(see_other(&redirect))
}

#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "The caller's profile", body = MyProfileResponse),
        (status = 401, description = "Unauthorized or profile not registered")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "profile"
)]
pub async fn my_profile(
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let profile = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    Ok(HttpResponse::Ok().json(MyProfileResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/profile/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MyProfileResponse),
        (status = 400, description = "Bio too long or unreadable image"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Image storage failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "profile"
)]
pub async fn update_my_profile(
    req: web::Json<UpdateProfileRequest>,
    account: AuthenticatedAccount,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    storage: web::Data<dyn ObjectStorage>,
) -> ActixResult<HttpResponse> {
    let owner = profiles::require_profile(pool.get_ref(), &account.account_id).await?;
    let updated = profiles::update_profile(
        pool.get_ref(),
        storage.get_ref(),
        &config,
        owner,
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(MyProfileResponse::from(updated)))
}
