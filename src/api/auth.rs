use crate::auth::SESSION_COOKIE;
use crate::config::Config;
use crate::db::DbPool;
use crate::identity::IdentityProvider;
use crate::models::{
    ConfirmEmailRequest, LoginRequest, SessionResponse, SignupRequest, SignupResponse,
};
use crate::services::registration::{self, Session};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result as ActixResult};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; confirmation email sent", body = SignupResponse),
        (status = 400, description = "Invalid email or password, or rejected by the identity provider"),
        (status = 502, description = "Identity provider unreachable")
    ),
    tag = "auth"
)]
pub async fn signup(
    req: web::Json<SignupRequest>,
    config: web::Data<Config>,
    identity: web::Data<dyn IdentityProvider>,
) -> ActixResult<HttpResponse> {
    let created =
        registration::register_account(identity.get_ref(), &config, &req.email, &req.password)
            .await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        account_id: created.account_id,
        pending_confirmation: created.pending_confirmation,
        message: "確認メールを送信しました。メール内のリンクから登録を完了してください".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/confirm",
    request_body = ConfirmEmailRequest,
    responses(
        (status = 303, description = "Email confirmed; session issued", body = SessionResponse),
        (status = 400, description = "Invalid or expired confirmation token")
    ),
    tag = "auth"
)]
pub async fn confirm_email(
    req: web::Json<ConfirmEmailRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    identity: web::Data<dyn IdentityProvider>,
) -> ActixResult<HttpResponse> {
    let session = registration::confirm_email(
        pool.get_ref(),
        identity.get_ref(),
        &config,
        &req.token_hash,
    )
    .await?;
    Ok(session_response(session))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Invalid credentials or unconfirmed account")
    ),
    tag = "auth"
)]
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    identity: web::Data<dyn IdentityProvider>,
) -> ActixResult<HttpResponse> {
    let session = registration::sign_in(
        pool.get_ref(),
        identity.get_ref(),
        &config,
        &req.email,
        &req.password,
    )
    .await?;
    Ok(session_response(session))
}

fn session_response(session: Session) -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, session.redirect.location.clone()))
        .cookie(cookie)
        .json(SessionResponse {
            token: session.token,
            redirect_to: session.redirect.location,
        })
}
