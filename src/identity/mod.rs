//! Identity & storage collaborators.
//!
//! The core never talks to the hosted auth/storage provider directly; it goes
//! through [`IdentityProvider`] and [`ObjectStorage`] so the provider can be
//! swapped for the in-memory [`local`] backend in development and tests.

pub mod local;
pub mod supabase;

use crate::config::{Config, IdentityBackend};
use async_trait::async_trait;
use std::sync::Arc;

pub use local::{LocalIdentityProvider, LocalObjectStorage};
pub use supabase::{SupabaseIdentityProvider, SupabaseObjectStorage};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider refused the request; the message is shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
#[error("object storage error: {0}")]
pub struct StorageError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub account_id: String,
    /// True while the confirmation email has not been acted on.
    pub pending_confirmation: bool,
}

/// A confirmed (active) account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an unconfirmed account and asks the provider to mail a
    /// confirmation link that lands on `redirect_to`.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<CreatedAccount, IdentityError>;

    /// Consumes a confirmation token, activating the account it was issued for.
    async fn verify_confirmation_token(&self, token: &str) -> Result<Account, IdentityError>;

    /// Password sign-in. Pending accounts are rejected by the provider.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, IdentityError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under `bucket/key` and returns the object's public URL.
    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

pub fn build_backends(
    config: &Config,
) -> Result<(Arc<dyn IdentityProvider>, Arc<dyn ObjectStorage>), anyhow::Error> {
    match config.identity.backend {
        IdentityBackend::Supabase => {
            let identity = SupabaseIdentityProvider::new(
                &config.identity.supabase_url,
                &config.identity.supabase_anon_key,
            )?;
            let storage = SupabaseObjectStorage::new(
                &config.identity.supabase_url,
                &config.identity.supabase_anon_key,
            )?;
            Ok((Arc::new(identity), Arc::new(storage)))
        }
        IdentityBackend::Local => {
            log::warn!("Using in-memory identity and storage backends");
            Ok((
                Arc::new(LocalIdentityProvider::new()),
                Arc::new(LocalObjectStorage::new(&config.storage.local_public_url)),
            ))
        }
    }
}
