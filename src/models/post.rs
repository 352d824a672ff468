use super::profile::{ImageUpload, ProfileSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub bar_id: i64,
    pub body: String,
    /// Up to four images, kept in the order given.
    #[serde(default)]
    pub images: Vec<ImageUpload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub bar_id: i64,
    pub body: String,
    pub like_count: i32,
    pub is_liked: bool,
    pub author: ProfileSummary,
    pub images: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i32,
}

/// Returned after a post is stored: the post itself and the bar page to go back to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostCreatedResponse {
    pub redirect_to: String,
    pub post: PostResponse,
}
