use crate::auth::verify_token;
use crate::config::Config;
use crate::errors::AppError;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const SESSION_COOKIE: &str = "session";

/// The signed-in account, resolved from `Authorization: Bearer <token>` or the
/// `session` cookie.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: String,
    pub email: String,
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(header_value) = req.headers().get("Authorization") {
        if let Ok(header_str) = header_value.to_str() {
            if let Some(token) = header_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequest for AuthenticatedAccount {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let Some(token) = session_token(req) else {
            return ready(Err(AppError::Unauthenticated));
        };
        let Some(config) = req.app_data::<web::Data<Config>>() else {
            log::error!("Config missing from app data");
            return ready(Err(AppError::Internal("設定が読み込まれていません".into())));
        };

        match verify_token(&token, &config.jwt.secret) {
            Ok(claims) => ready(Ok(AuthenticatedAccount {
                account_id: claims.sub,
                email: claims.email,
            })),
            Err(e) => {
                log::debug!("Rejected session token: {:?}", e);
                ready(Err(AppError::Unauthenticated))
            }
        }
    }
}
