pub mod articles;
pub mod auth;
pub mod bars;
pub mod coupons;
pub mod notify;
pub mod posts;
pub mod profile;
pub mod social;

use crate::entities::sea_orm_active_enums::{Gender, NotificationType, Prefecture};
use crate::models::{
    ArticleResponse, BarResponse, ConfirmEmailRequest, ConfirmProfileRequest, CouponResponse,
    CreatePostRequest, FavoriteResponse, FollowEntry, FollowResponse, ImageUpload, LikeResponse,
    LoginRequest, MyCouponResponse, MyProfileResponse, NotificationResponse,
    PostCreatedResponse, PostResponse, ProfileDetailResponse, ProfileDraft, ProfileDraftRequest,
    ProfileDraftResponse, ProfileSummary, RedirectResponse, ReviewAction, SessionResponse,
    SignupRequest, SignupResponse, UnreadCountResponse, UpdateProfileRequest, ViewHistoryEntry,
};
use crate::services::Redirect;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Registration & sessions
        auth::signup,
        auth::confirm_email,
        auth::login,
        profile::submit_draft,
        profile::confirm_profile,
        profile::my_profile,
        profile::update_my_profile,
        // Social graph
        social::show_profile,
        social::follow,
        social::unfollow,
        social::list_following,
        social::list_followers,
        social::timeline,
        // Posts & likes
        posts::create_post,
        posts::show_post,
        posts::delete_post,
        posts::toggle_like,
        // Notifications
        notify::get_notifications,
        notify::get_unread_count,
        notify::mark_notification_read,
        notify::mark_all_read,
        // Bars
        bars::search_bars,
        bars::show_bar,
        bars::list_bar_posts,
        bars::toggle_favorite,
        bars::list_favorites,
        bars::list_view_history,
        // Coupons
        coupons::list_coupons,
        coupons::acquire_coupon,
        coupons::list_my_coupons,
        // Articles
        articles::list_articles,
        articles::show_article,
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        ConfirmEmailRequest,
        LoginRequest,
        SessionResponse,
        RedirectResponse,
        ImageUpload,
        ProfileDraftRequest,
        ProfileDraft,
        ProfileDraftResponse,
        ReviewAction,
        ConfirmProfileRequest,
        UpdateProfileRequest,
        ProfileSummary,
        MyProfileResponse,
        ProfileDetailResponse,
        FollowEntry,
        FollowResponse,
        CreatePostRequest,
        PostCreatedResponse,
        PostResponse,
        LikeResponse,
        NotificationResponse,
        NotificationType,
        UnreadCountResponse,
        BarResponse,
        FavoriteResponse,
        ViewHistoryEntry,
        CouponResponse,
        MyCouponResponse,
        ArticleResponse,
        Gender,
        Prefecture,
    )),
    tags(
        (name = "auth", description = "Sign-up, email confirmation and sign-in"),
        (name = "profile", description = "Profile registration and editing"),
        (name = "social", description = "Follow relationships and timeline"),
        (name = "posts", description = "Bar posts and likes"),
        (name = "notify", description = "Notification endpoints"),
        (name = "bars", description = "Bar search, favorites and view history"),
        (name = "coupons", description = "Coupon endpoints"),
        (name = "articles", description = "Editorial articles"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// `303 See Other` pointing at the next step, with the same path in the body.
pub fn see_other(redirect: &Redirect) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, redirect.location.clone()))
        .json(RedirectResponse {
            redirect_to: redirect.location.clone(),
        })
}

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/confirm", web::post().to(auth::confirm_email))
                    .route("/login", web::post().to(auth::login)),
            )
            .service(
                web::scope("/profile")
                    .route("/draft", web::post().to(profile::submit_draft))
                    .route("/confirm", web::post().to(profile::confirm_profile))
                    .route("/me", web::get().to(profile::my_profile))
                    .route("/me", web::patch().to(profile::update_my_profile)),
            )
            .service(
                web::scope("/users")
                    .route("/{user_id}", web::get().to(social::show_profile))
                    .route("/{user_id}/follow", web::post().to(social::follow))
                    .route("/{user_id}/follow", web::delete().to(social::unfollow))
                    .route("/{user_id}/following", web::get().to(social::list_following))
                    .route("/{user_id}/followers", web::get().to(social::list_followers)),
            )
            .route("/timeline", web::get().to(social::timeline))
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("/{post_id}", web::get().to(posts::show_post))
                    .route("/{post_id}", web::delete().to(posts::delete_post))
                    .route("/{post_id}/like", web::post().to(posts::toggle_like)),
            )
            .service(
                web::scope("/notify")
                    .route("", web::get().to(notify::get_notifications))
                    .route("/unread-count", web::get().to(notify::get_unread_count))
                    .route("/read-all", web::put().to(notify::mark_all_read))
                    .route(
                        "/{notification_id}/read",
                        web::put().to(notify::mark_notification_read),
                    ),
            )
            .service(
                web::scope("/bars")
                    .route("", web::get().to(bars::search_bars))
                    .route("/{bar_id}", web::get().to(bars::show_bar))
                    .route("/{bar_id}/posts", web::get().to(bars::list_bar_posts))
                    .route("/{bar_id}/favorite", web::post().to(bars::toggle_favorite)),
            )
            .service(
                web::scope("/me")
                    .route("/favorites", web::get().to(bars::list_favorites))
                    .route("/history", web::get().to(bars::list_view_history))
                    .route("/coupons", web::get().to(coupons::list_my_coupons)),
            )
            .service(
                web::scope("/coupons")
                    .route("", web::get().to(coupons::list_coupons))
                    .route("/{coupon_id}/acquire", web::post().to(coupons::acquire_coupon)),
            )
            .service(
                web::scope("/articles")
                    .route("", web::get().to(articles::list_articles))
                    .route("/{article_id}", web::get().to(articles::show_article)),
            ),
    );
}
