//! Supabase (GoTrue + Storage) REST adapter.

use super::{
    Account, CreatedAccount, IdentityError, IdentityProvider, ObjectStorage, StorageError,
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    // With email confirmation enabled GoTrue answers with the bare user; with
    // it disabled the user arrives wrapped in a session.
    id: Option<String>,
    user: Option<UserDto>,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user: UserDto,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
    }
}

fn base_url(raw: &str) -> Result<Url, anyhow::Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn build_client() -> Result<Client, anyhow::Error> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Maps a non-success response to a user-facing rejection (4xx) or an outage (5xx).
async fn identity_failure(response: Response) -> IdentityError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    let message = body
        .into_message()
        .unwrap_or_else(|| format!("HTTP {}", status));
    if status.is_client_error() {
        IdentityError::Rejected(message)
    } else {
        IdentityError::Unavailable(message)
    }
}

fn transport_error(err: reqwest::Error) -> IdentityError {
    IdentityError::Unavailable(err.to_string())
}

pub struct SupabaseIdentityProvider {
    client: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(base_url_raw: &str, anon_key: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            client: build_client()?,
            base: base_url(base_url_raw)?,
            anon_key: anon_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base
            .join(path)
            .map_err(|e| IdentityError::Unavailable(e.to_string()))
    }

    async fn post_json(
        &self,
        url: Url,
        body: serde_json::Value,
    ) -> Result<Response, IdentityError> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(identity_failure(response).await);
        }
        Ok(response)
    }

    fn account_from(user: UserDto, fallback_email: &str) -> Account {
        Account {
            account_id: user.id,
            email: user.email.unwrap_or_else(|| fallback_email.to_string()),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<CreatedAccount, IdentityError> {
        let mut url = self.endpoint("auth/v1/signup")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let response = self
            .post_json(url, json!({ "email": email, "password": password }))
            .await?;
        let body: SignupResponse = response.json().await.map_err(transport_error)?;

        let account_id = body
            .user
            .map(|u| u.id)
            .or(body.id)
            .ok_or_else(|| IdentityError::Unavailable("signup response without user".into()))?;

        log::info!("Created account {} (pending confirmation)", account_id);
        Ok(CreatedAccount {
            account_id,
            pending_confirmation: body.access_token.is_none(),
        })
    }

    async fn verify_confirmation_token(&self, token: &str) -> Result<Account, IdentityError> {
        let url = self.endpoint("auth/v1/verify")?;
        let response = self
            .post_json(url, json!({ "type": "email", "token_hash": token }))
            .await?;
        let session: SessionResponse = response.json().await.map_err(transport_error)?;
        Ok(Self::account_from(session.user, ""))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .post_json(url, json!({ "email": email, "password": password }))
            .await?;
        let session: SessionResponse = response.json().await.map_err(transport_error)?;
        Ok(Self::account_from(session.user, email))
    }
}

pub struct SupabaseObjectStorage {
    client: Client,
    base: Url,
    api_key: String,
}

impl SupabaseObjectStorage {
    pub fn new(base_url_raw: &str, api_key: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            client: build_client()?,
            base: base_url(base_url_raw)?,
            api_key: api_key.to_string(),
        })
    }

    fn object_url(&self, scope: &str, bucket: &str, key: &str) -> Result<Url, StorageError> {
        self.base
            .join(&format!("storage/v1/object/{}{}/{}", scope, bucket, key))
            .map_err(|e| StorageError(e.to_string()))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseObjectStorage {
    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.object_url("", bucket, key)?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .into_message()
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(StorageError(message));
        }

        Ok(self.object_url("public/", bucket, key)?.to_string())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let url = self.object_url("", bucket, key)?;
        let response = self
            .client
            .delete(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StorageError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError(format!("HTTP {}", response.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_gotrue_msg() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":422,"msg":"User already registered","error":"x"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().unwrap(), "User already registered");

        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().unwrap(), "Email not confirmed");
    }

    #[test]
    fn public_urls_point_at_the_public_scope() {
        let storage = SupabaseObjectStorage::new("https://demo.supabase.co", "key").unwrap();
        let url = storage
            .object_url("public/", "post-images", "abc/1.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/storage/v1/object/public/post-images/abc/1.png"
        );
    }
}
