use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "a@example.com")]
    pub email: String,
    #[schema(example = "Strong1!")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub account_id: String,
    pub pending_confirmation: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmEmailRequest {
    /// Token carried by the confirmation link.
    pub token_hash: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly minted session plus where the client should go next.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    pub redirect_to: String,
}
