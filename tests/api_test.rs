// Integration tests for API endpoints
// Everything runs in-process: SQLite in memory plus the local identity backend.
// Run with: cargo test --test api_test

use actix_web::{http::StatusCode, test, web, App};
use beer_salon::{
    api,
    config::{
        Config, IdentityBackend, IdentityConfig, JwtConfig, MysqlConfig, ServerConfig,
        StorageConfig,
    },
    db::{self, DbPool},
    entities::{bar, coupon, sea_orm_active_enums::Prefecture},
    identity::{IdentityProvider, LocalIdentityProvider, LocalObjectStorage, ObjectStorage},
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::OpenApi;

const PASSWORD: &str = "Strong1!";

struct TestContext {
    config: Config,
    pool: DbPool,
    identity: Arc<LocalIdentityProvider>,
    storage: Arc<LocalObjectStorage>,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        },
        mysql: MysqlConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "password".to_string(),
            database: "beer_salon_test".to_string(),
        },
        database_url: Some("sqlite::memory:".to_string()),
        identity: IdentityConfig {
            backend: IdentityBackend::Local,
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: String::new(),
            site_url: "http://localhost:3000".to_string(),
        },
        storage: StorageConfig {
            profile_image_bucket: "profile-images".to_string(),
            post_image_bucket: "post-images".to_string(),
            local_public_url: "http://localhost:8080/storage".to_string(),
        },
    }
}

async fn setup() -> TestContext {
    let config = test_config();
    let pool = db::connect(&config.database_url())
        .await
        .expect("Failed to open SQLite");
    db::create_schema(&pool)
        .await
        .expect("Failed to create schema");

    TestContext {
        storage: Arc::new(LocalObjectStorage::new(&config.storage.local_public_url)),
        identity: Arc::new(LocalIdentityProvider::with_hash_cost(4)),
        config,
        pool,
    }
}

/// Sends one request through a freshly built app. All state lives in the
/// context, so building the app per request is cheap and keeps helpers simple.
async fn send(ctx: &TestContext, req: test::TestRequest) -> TestResponse {
    let identity: Arc<dyn IdentityProvider> = ctx.identity.clone();
    let storage: Arc<dyn ObjectStorage> = ctx.storage.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.config.clone()))
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::from(identity))
            .app_data(web::Data::from(storage))
            .configure(api::configure),
    )
    .await;

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let location = resp
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    TestResponse {
        status,
        location,
        body,
    }
}

fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
}

fn draft_form(nickname: &str) -> Value {
    json!({
        "last_name": "山田",
        "first_name": "太郎",
        "nickname": nickname,
        "birthday": "1990-04-01",
        "gender": "male",
        "prefecture": "東京都",
        "bio": "クラフトビールが好きです"
    })
}

/// Signs up, confirms the email and returns the session token.
async fn confirmed_session(ctx: &TestContext, email: &str) -> String {
    let resp = send(
        ctx,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "signup failed: {}", resp.body);

    let token_hash = ctx
        .identity
        .pending_confirmation_token(email)
        .expect("No confirmation token issued");
    let resp = send(
        ctx,
        test::TestRequest::post()
            .uri("/api/auth/confirm")
            .set_json(json!({ "token_hash": token_hash })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    resp.body["token"].as_str().unwrap().to_string()
}

/// Runs the whole registration pipeline and returns `(token, profile_id)`.
async fn register_user(ctx: &TestContext, email: &str, nickname: &str) -> (String, i64) {
    let token = confirmed_session(ctx, email).await;

    let resp = send(
        ctx,
        authed(test::TestRequest::post().uri("/api/profile/draft"), &token)
            .set_json(draft_form(nickname)),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER, "draft failed: {}", resp.body);
    let draft = resp.body["draft"].as_str().unwrap().to_string();

    let resp = send(
        ctx,
        authed(test::TestRequest::post().uri("/api/profile/confirm"), &token)
            .set_json(json!({ "draft": draft, "action": "confirm" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/"));

    let resp = send(
        ctx,
        authed(test::TestRequest::get().uri("/api/profile/me"), &token),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    (token, resp.body["id"].as_i64().unwrap())
}

async fn seed_bar(ctx: &TestContext, name: &str, prefecture: Prefecture) -> i64 {
    bar::ActiveModel {
        name: Set(name.to_string()),
        prefecture: Set(prefecture),
        address: Set(format!("{} 1-2-3", name)),
        description: Set(None),
        image_url: Set(None),
        latitude: Set(None),
        longitude: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&ctx.pool)
    .await
    .expect("Failed to seed bar")
    .id
}

#[actix_web::test]
async fn test_signup_rejects_short_password() {
    let ctx = setup().await;

    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "a@example.com", "password": "Weak1!" })),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "パスワードは8文字以上で入力してください");
    assert_eq!(ctx.identity.account_count(), 0);
}

#[actix_web::test]
async fn test_registration_pipeline_creates_one_profile() {
    let ctx = setup().await;

    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "a@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["pending_confirmation"], true);

    // Unconfirmed accounts cannot sign in yet.
    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Email not confirmed");

    let token_hash = ctx.identity.pending_confirmation_token("a@example.com").unwrap();
    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/auth/confirm")
            .set_json(json!({ "token_hash": token_hash })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/signup/profile"));
    let token = resp.body["token"].as_str().unwrap().to_string();

    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/profile/draft"), &token)
            .set_json(draft_form("たろう")),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let location = resp.location.unwrap();
    assert!(location.starts_with("/signup/confirm?draft="), "{}", location);
    let draft = resp.body["draft"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let resp = send(
            &ctx,
            authed(test::TestRequest::post().uri("/api/profile/confirm"), &token)
                .set_json(json!({ "draft": draft, "action": "confirm" })),
        )
        .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location.as_deref(), Some("/"));
    }

    let profiles = beer_salon::entities::user_profile::Entity::find()
        .count(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(profiles, 1);

    // With a profile in place, sign-in lands on the home page.
    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.body["redirect_to"], "/");
}

#[actix_web::test]
async fn test_profile_draft_requires_session() {
    let ctx = setup().await;

    let resp = send(
        &ctx,
        test::TestRequest::post()
            .uri("/api/profile/draft")
            .set_json(draft_form("たろう")),
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "ログインが必要です");
}

#[actix_web::test]
async fn test_bio_length_limit() {
    let ctx = setup().await;
    let token = confirmed_session(&ctx, "bio@example.com").await;

    let mut form = draft_form("びお");
    form["bio"] = json!("あ".repeat(500));
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/profile/draft"), &token).set_json(&form),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);

    form["bio"] = json!("あ".repeat(501));
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/profile/draft"), &token).set_json(&form),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "自己紹介は500文字以内で入力してください");
}

#[actix_web::test]
async fn test_review_edit_returns_to_form() {
    let ctx = setup().await;
    let token = confirmed_session(&ctx, "edit@example.com").await;

    let mut form = draft_form("へんしゅう");
    form["birthday"] = Value::Null;
    form["birth_year"] = json!("1985");
    form["birth_month"] = json!("12");
    form["birth_day"] = json!("3");
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/profile/draft"), &token).set_json(&form),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let draft = resp.body["draft"].as_str().unwrap().to_string();
    assert!(draft.contains("1985-12-03"));

    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/profile/confirm"), &token)
            .set_json(json!({ "draft": draft, "action": "edit" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert!(resp
        .location
        .unwrap()
        .starts_with("/signup/profile?draft="));

    let resp = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/profile/me"), &token),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_follow_like_and_notifications() {
    let ctx = setup().await;
    let (token_a, _) = register_user(&ctx, "a@example.com", "エー").await;
    let (token_b, id_b) = register_user(&ctx, "b@example.com", "ビー").await;
    let bar_id = seed_bar(&ctx, "麦酒堂", Prefecture::Tokyo).await;

    let resp = send(
        &ctx,
        authed(
            test::TestRequest::post().uri(&format!("/api/users/{}/follow", id_b)),
            &token_a,
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["follower_count"], 1);

    let resp = send(
        &ctx,
        authed(
            test::TestRequest::get().uri(&format!("/api/users/{}", id_b)),
            &token_a,
        ),
    )
    .await;
    assert_eq!(resp.body["is_following"], true);
    assert_eq!(resp.body["follower_count"], 1);
    assert_eq!(resp.body["following_count"], 0);

    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/posts"), &token_b)
            .set_json(json!({ "bar_id": bar_id, "body": "最高のIPAでした" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location, Some(format!("/bars/{}", bar_id)));
    let post_id = resp.body["post"]["id"].as_i64().unwrap();

    let resp = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/timeline"), &token_a),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["author"]["id"], id_b);

    let like_uri = format!("/api/posts/{}/like", post_id);
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri(&like_uri), &token_a),
    )
    .await;
    assert_eq!(resp.body["liked"], true);
    assert_eq!(resp.body["like_count"], 1);

    let resp = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/notify"), &token_b),
    )
    .await;
    let notifications = resp.body.as_array().unwrap().clone();
    let liked: Vec<_> = notifications
        .iter()
        .filter(|n| n["notification_type"] == "post_liked")
        .collect();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["is_read"], false);

    let unread_before = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/notify/unread-count"), &token_b),
    )
    .await
    .body["unread_count"]
        .as_u64()
        .unwrap();
    assert_eq!(unread_before, 2);

    // Toggling the like off sends nothing new.
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri(&like_uri), &token_a),
    )
    .await;
    assert_eq!(resp.body["liked"], false);
    assert_eq!(resp.body["like_count"], 0);

    let unread_after = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/notify/unread-count"), &token_b),
    )
    .await
    .body["unread_count"]
        .as_u64()
        .unwrap();
    assert_eq!(unread_after, unread_before);

    // The liker never receives anything.
    let resp = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/notify"), &token_a),
    )
    .await;
    assert!(resp.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_follow_rules() {
    let ctx = setup().await;
    let (token_a, id_a) = register_user(&ctx, "a@example.com", "エー").await;
    let (_, id_b) = register_user(&ctx, "b@example.com", "ビー").await;

    let resp = send(
        &ctx,
        authed(
            test::TestRequest::post().uri(&format!("/api/users/{}/follow", id_a)),
            &token_a,
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let follow_b = format!("/api/users/{}/follow", id_b);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&follow_b), &token_a)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&follow_b), &token_a)).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = send(
        &ctx,
        test::TestRequest::get().uri(&format!("/api/users/{}/followers", id_b)),
    )
    .await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["profile"]["id"], id_a);

    let resp = send(&ctx, authed(test::TestRequest::delete().uri(&follow_b), &token_a)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["follower_count"], 0);
    let resp = send(&ctx, authed(test::TestRequest::delete().uri(&follow_b), &token_a)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/users/9999/follow"), &token_a),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_mark_read_is_recipient_only() {
    let ctx = setup().await;
    let (token_a, _) = register_user(&ctx, "a@example.com", "エー").await;
    let (token_b, id_b) = register_user(&ctx, "b@example.com", "ビー").await;

    send(
        &ctx,
        authed(
            test::TestRequest::post().uri(&format!("/api/users/{}/follow", id_b)),
            &token_a,
        ),
    )
    .await;
    let resp = send(
        &ctx,
        authed(test::TestRequest::get().uri("/api/notify"), &token_b),
    )
    .await;
    assert_eq!(resp.body[0]["notification_type"], "followed");
    let read_uri = format!("/api/notify/{}/read", resp.body[0]["id"].as_i64().unwrap());

    let resp = send(&ctx, authed(test::TestRequest::put().uri(&read_uri), &token_a)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let resp = send(&ctx, authed(test::TestRequest::put().uri(&read_uri), &token_b)).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["is_read"], true);
    }

    let resp = send(
        &ctx,
        authed(test::TestRequest::put().uri("/api/notify/99999/read"), &token_b),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_timeline_without_session_redirects_to_login() {
    let ctx = setup().await;

    let resp = send(&ctx, test::TestRequest::get().uri("/api/timeline")).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/login"));

    let (token, _) = register_user(&ctx, "lonely@example.com", "ひとり").await;
    let resp = send(&ctx, authed(test::TestRequest::get().uri("/api/timeline"), &token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_post_failure_echoes_bar_id() {
    let ctx = setup().await;
    let (token, _) = register_user(&ctx, "a@example.com", "エー").await;

    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/posts"), &token)
            .set_json(json!({ "bar_id": 424242, "body": "どこ?" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["bar_id"], 424242);

    let bar_id = seed_bar(&ctx, "麦酒堂", Prefecture::Osaka).await;
    let images: Vec<Value> = (0..5)
        .map(|i| json!({ "file_name": format!("{}.png", i), "content_type": "image/png", "data": "iVBORw0KGgo=" }))
        .collect();
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/posts"), &token)
            .set_json(json!({ "bar_id": bar_id, "body": "写真多め", "images": images })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "画像は4枚まで添付できます");
    assert_eq!(resp.body["bar_id"], bar_id);
}

#[actix_web::test]
async fn test_post_with_images_keeps_order() {
    let ctx = setup().await;
    let (token, _) = register_user(&ctx, "a@example.com", "エー").await;
    let bar_id = seed_bar(&ctx, "麦酒堂", Prefecture::Kyoto).await;

    let images: Vec<Value> = ["first.jpg", "second.png"]
        .iter()
        .map(|name| json!({ "file_name": name, "content_type": "image/jpeg", "data": "aGVsbG8=" }))
        .collect();
    let resp = send(
        &ctx,
        authed(test::TestRequest::post().uri("/api/posts"), &token)
            .set_json(json!({ "bar_id": bar_id, "body": "二枚", "images": images })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let urls = resp.body["post"]["images"].as_array().unwrap().clone();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].as_str().unwrap().ends_with("_0.jpg"));
    assert!(urls[1].as_str().unwrap().ends_with("_1.png"));
    assert_eq!(ctx.storage.object_count(), 2);

    let resp = send(
        &ctx,
        test::TestRequest::get().uri(&format!("/api/bars/{}/posts", bar_id)),
    )
    .await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_bars_favorites_and_history() {
    let ctx = setup().await;
    let (token, _) = register_user(&ctx, "a@example.com", "エー").await;
    let tokyo = seed_bar(&ctx, "ホップ横丁", Prefecture::Tokyo).await;
    let osaka = seed_bar(&ctx, "麦の家", Prefecture::Osaka).await;

    let resp = send(&ctx, test::TestRequest::get().uri("/api/bars?keyword=%E3%83%9B%E3%83%83%E3%83%97")).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["id"], tokyo);

    let resp = send(
        &ctx,
        test::TestRequest::get().uri("/api/bars?prefecture=%E5%A4%A7%E9%98%AA%E5%BA%9C"),
    )
    .await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["id"], osaka);

    for bar_id in [tokyo, osaka, tokyo] {
        let resp = send(
            &ctx,
            authed(test::TestRequest::get().uri(&format!("/api/bars/{}", bar_id)), &token),
        )
        .await;
        assert_eq!(resp.status, StatusCode::OK);
    }
    let resp = send(&ctx, authed(test::TestRequest::get().uri("/api/me/history"), &token)).await;
    let history = resp.body.as_array().unwrap();
    assert_eq!(history.len(), 2);

    let favorite_uri = format!("/api/bars/{}/favorite", osaka);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&favorite_uri), &token)).await;
    assert_eq!(resp.body["favorite"], true);
    let resp = send(&ctx, authed(test::TestRequest::get().uri("/api/me/favorites"), &token)).await;
    assert_eq!(resp.body[0]["id"], osaka);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&favorite_uri), &token)).await;
    assert_eq!(resp.body["favorite"], false);
    let resp = send(&ctx, authed(test::TestRequest::get().uri("/api/me/favorites"), &token)).await;
    assert!(resp.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_coupon_acquisition() {
    let ctx = setup().await;
    let (token, _) = register_user(&ctx, "a@example.com", "エー").await;
    let bar_id = seed_bar(&ctx, "麦酒堂", Prefecture::Hokkaido).await;

    let now = Utc::now();
    let active = coupon::ActiveModel {
        bar_id: Set(bar_id),
        title: Set("1杯無料".to_string()),
        description: Set(None),
        expires_at: Set(Some(now + Duration::days(7))),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&ctx.pool)
    .await
    .unwrap();
    coupon::ActiveModel {
        bar_id: Set(bar_id),
        title: Set("期限切れ".to_string()),
        description: Set(None),
        expires_at: Set(Some(now - Duration::days(1))),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&ctx.pool)
    .await
    .unwrap();

    let resp = send(&ctx, test::TestRequest::get().uri("/api/coupons")).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);

    let acquire_uri = format!("/api/coupons/{}/acquire", active.id);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&acquire_uri), &token)).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let resp = send(&ctx, authed(test::TestRequest::post().uri(&acquire_uri), &token)).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = send(&ctx, authed(test::TestRequest::get().uri("/api/me/coupons"), &token)).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
    assert_eq!(resp.body[0]["coupon"]["acquired"], true);
}

#[::core::prelude::v1::test]
fn test_openapi_documents_response_schemas() {
    let doc = serde_json::to_value(api::ApiDoc::openapi()).unwrap();

    let schema_ref = |path: &str, method: &str, status: &str| -> Value {
        doc["paths"][path][method]["responses"][status]["content"]["application/json"]
            ["schema"]
            .clone()
    };
    assert_eq!(
        schema_ref("/api/articles", "get", "200")["items"]["$ref"],
        "#/components/schemas/ArticleResponse"
    );
    assert_eq!(
        schema_ref("/api/posts/{post_id}/like", "post", "200")["$ref"],
        "#/components/schemas/LikeResponse"
    );
    assert_eq!(
        schema_ref("/api/timeline", "get", "200")["items"]["$ref"],
        "#/components/schemas/PostResponse"
    );

    for schema in [
        "ArticleResponse",
        "BarResponse",
        "CouponResponse",
        "FollowEntry",
        "MyCouponResponse",
        "NotificationResponse",
        "ProfileDetailResponse",
        "ViewHistoryEntry",
    ] {
        assert!(
            doc["components"]["schemas"].get(schema).is_some(),
            "missing schema {}",
            schema
        );
    }
}
