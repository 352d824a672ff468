use crate::entities::sea_orm_active_enums::{Gender, Prefecture};
use crate::entities::user_profile;
use crate::errors::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded file carried inline in a JSON body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageUpload {
    #[schema(example = "photo.jpg")]
    pub file_name: String,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Base64-encoded file contents.
    pub data: String,
}

impl ImageUpload {
    pub fn decode(&self) -> Result<Vec<u8>, AppError> {
        let bytes = STANDARD
            .decode(self.data.trim())
            .map_err(|_| AppError::validation("画像データを読み込めませんでした"))?;
        if bytes.is_empty() {
            return Err(AppError::validation("画像データが空です"));
        }
        Ok(bytes)
    }

    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Raw profile form. Every field is optional here so that missing input turns
/// into a validation message instead of a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileDraftRequest {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub nickname: Option<String>,
    /// ISO date (`1990-04-01`); alternative to the three parts below.
    pub birthday: Option<String>,
    pub birth_year: Option<String>,
    pub birth_month: Option<String>,
    pub birth_day: Option<String>,
    pub gender: Option<Gender>,
    pub prefecture: Option<Prefecture>,
    pub bio: Option<String>,
    pub profile_image: Option<ImageUpload>,
}

/// Validated profile waiting for the review step. Travels through the client
/// as canonical JSON; nothing is stored server-side until it is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileDraft {
    pub last_name: String,
    pub first_name: String,
    pub nickname: String,
    pub birthday: String,
    pub gender: Gender,
    pub prefecture: Prefecture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl ProfileDraft {
    pub fn encode(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| {
            log::error!("Failed to encode profile draft: {:?}", e);
            AppError::Internal("入力内容の保存に失敗しました".into())
        })
    }

    pub fn decode(payload: &str) -> Result<Self, AppError> {
        serde_json::from_str(payload)
            .map_err(|_| AppError::validation("入力内容を読み込めませんでした。もう一度入力してください"))
    }

    /// `path?draft=<url-encoded payload>`
    pub fn location(&self, path: &str) -> Result<String, AppError> {
        let payload = self.encode()?;
        let encoded: String = url::form_urlencoded::byte_serialize(payload.as_bytes()).collect();
        Ok(format!("{}?draft={}", path, encoded))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDraftResponse {
    pub redirect_to: String,
    /// The encoded draft, to be echoed back on the review step.
    pub draft: String,
    /// Set when the optional image could not be stored; the draft is still usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_upload_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Confirm,
    Edit,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmProfileRequest {
    pub draft: String,
    pub action: ReviewAction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New bio; an empty string clears it.
    pub bio: Option<String>,
    pub profile_image: Option<ImageUpload>,
}

/// Public view of a profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub id: i64,
    pub nickname: String,
    pub prefecture: Prefecture,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<&user_profile::Model> for ProfileSummary {
    fn from(profile: &user_profile::Model) -> Self {
        ProfileSummary {
            id: profile.id,
            nickname: profile.nickname.clone(),
            prefecture: profile.prefecture,
            profile_image_url: profile.profile_image_url.clone(),
            bio: profile.bio.clone(),
        }
    }
}

/// The owner's own view, including the private fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyProfileResponse {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub nickname: String,
    pub birthday: chrono::NaiveDate,
    pub gender: Gender,
    pub prefecture: Prefecture,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<user_profile::Model> for MyProfileResponse {
    fn from(profile: user_profile::Model) -> Self {
        MyProfileResponse {
            id: profile.id,
            last_name: profile.last_name,
            first_name: profile.first_name,
            nickname: profile.nickname,
            birthday: profile.birthday,
            gender: profile.gender,
            prefecture: profile.prefecture,
            profile_image_url: profile.profile_image_url,
            bio: profile.bio,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDetailResponse {
    pub profile: ProfileSummary,
    pub following_count: u64,
    pub follower_count: u64,
    pub is_following: bool,
    pub is_me: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowEntry {
    pub profile: ProfileSummary,
    pub followed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            last_name: "山田".into(),
            first_name: "太郎".into(),
            nickname: "hoppy".into(),
            birthday: "1990-04-01".into(),
            gender: Gender::Male,
            prefecture: Prefecture::Tokyo,
            bio: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn draft_encoding_is_canonical_json() {
        let encoded = draft().encode().unwrap();
        assert_eq!(
            encoded,
            r#"{"last_name":"山田","first_name":"太郎","nickname":"hoppy","birthday":"1990-04-01","gender":"male","prefecture":"東京都"}"#
        );
        assert_eq!(ProfileDraft::decode(&encoded).unwrap(), draft());
    }

    #[test]
    fn draft_location_is_url_encoded() {
        let location = draft().location("/signup/confirm").unwrap();
        assert!(location.starts_with("/signup/confirm?draft=%7B%22last_name%22"));
        assert!(!location.contains('"'));
    }

    #[test]
    fn tampered_draft_is_a_validation_error() {
        let err = ProfileDraft::decode("{\"nickname\":1}").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn image_extension_falls_back_to_bin() {
        let image = |name: &str| ImageUpload {
            file_name: name.into(),
            content_type: "image/png".into(),
            data: String::new(),
        };
        assert_eq!(image("Photo.PNG").extension(), "png");
        assert_eq!(image("noext").extension(), "bin");
        assert_eq!(image("bad.p/ng").extension(), "bin");
    }
}
