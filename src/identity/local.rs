//! In-memory identity and storage backends for development and tests.

use super::{
    Account, CreatedAccount, IdentityError, IdentityProvider, ObjectStorage, StorageError,
};
use crate::auth::{hash_password_with_cost, verify_password};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct LocalAccount {
    id: String,
    email: String,
    password_hash: String,
    confirmed: bool,
}

#[derive(Default)]
struct AccountBook {
    by_email: HashMap<String, LocalAccount>,
    /// confirmation token -> email
    pending_tokens: HashMap<String, String>,
}

pub struct LocalIdentityProvider {
    book: Mutex<AccountBook>,
    hash_cost: u32,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::with_hash_cost(bcrypt::DEFAULT_COST)
    }

    /// Cheaper hashing for test suites.
    pub fn with_hash_cost(hash_cost: u32) -> Self {
        Self {
            book: Mutex::new(AccountBook::default()),
            hash_cost,
        }
    }

    /// The token a real provider would have mailed to `email`.
    pub fn pending_confirmation_token(&self, email: &str) -> Option<String> {
        let book = self.book.lock().ok()?;
        book.pending_tokens
            .iter()
            .find(|(_, e)| e.as_str() == email)
            .map(|(token, _)| token.clone())
    }

    pub fn account_count(&self) -> usize {
        self.book.lock().map(|b| b.by_email.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, AccountBook>, IdentityError> {
        self.book
            .lock()
            .map_err(|_| IdentityError::Unavailable("account book poisoned".into()))
    }
}

/// Runs bcrypt off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, IdentityError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| IdentityError::Unavailable(e.to_string()))?
        .map_err(|e| IdentityError::Unavailable(e.to_string()))
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<CreatedAccount, IdentityError> {
        let email = email.trim().to_lowercase();
        if self.lock()?.by_email.contains_key(&email) {
            return Err(IdentityError::Rejected("User already registered".into()));
        }

        let password_hash = {
            let password = password.to_string();
            let cost = self.hash_cost;
            blocking(move || hash_password_with_cost(&password, cost)).await?
        };
        let account = LocalAccount {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            confirmed: false,
        };
        let token = Uuid::new_v4().simple().to_string();

        let mut book = self.lock()?;
        if book.by_email.contains_key(&email) {
            return Err(IdentityError::Rejected("User already registered".into()));
        }
        let account_id = account.id.clone();
        book.by_email.insert(email.clone(), account);
        book.pending_tokens.insert(token.clone(), email.clone());

        log::info!(
            "Confirmation link for {}: {}?token_hash={}",
            email,
            redirect_to,
            token
        );
        Ok(CreatedAccount {
            account_id,
            pending_confirmation: true,
        })
    }

    async fn verify_confirmation_token(&self, token: &str) -> Result<Account, IdentityError> {
        let mut book = self.lock()?;
        let email = book
            .pending_tokens
            .remove(token)
            .ok_or_else(|| IdentityError::Rejected("Token has expired or is invalid".into()))?;
        let account = book
            .by_email
            .get_mut(&email)
            .ok_or_else(|| IdentityError::Rejected("User not found".into()))?;
        account.confirmed = true;
        Ok(Account {
            account_id: account.id.clone(),
            email: account.email.clone(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let email = email.trim().to_lowercase();
        let account = self
            .lock()?
            .by_email
            .get(&email)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("Invalid login credentials".into()))?;

        let valid = {
            let password = password.to_string();
            let hash = account.password_hash.clone();
            blocking(move || verify_password(&password, &hash)).await?
        };
        if !valid {
            return Err(IdentityError::Rejected("Invalid login credentials".into()));
        }
        if !account.confirmed {
            return Err(IdentityError::Rejected("Email not confirmed".into()));
        }
        Ok(Account {
            account_id: account.id,
            email: account.email,
        })
    }
}

pub struct LocalObjectStorage {
    public_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl LocalObjectStorage {
    pub fn new(public_url: &str) -> Self {
        Self {
            public_url: public_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .map(|o| o.contains_key(&format!("{}/{}", bucket, key)))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let path = format!("{}/{}", bucket, key);
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError("object map poisoned".into()))?;
        if objects.contains_key(&path) {
            return Err(StorageError(format!("{} already exists", path)));
        }
        objects.insert(path.clone(), bytes);
        Ok(format!("{}/{}", self.public_url, path))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError("object map poisoned".into()))?;
        objects.remove(&format!("{}/{}", bucket, key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn accounts_stay_pending_until_confirmed() {
        let provider = LocalIdentityProvider::with_hash_cost(4);
        let created = provider
            .create_account("a@example.com", "Strong1!", "http://site/signup/profile")
            .await
            .unwrap();
        assert!(created.pending_confirmation);

        let err = provider.sign_in("a@example.com", "Strong1!").await.unwrap_err();
        assert_eq!(err.to_string(), "Email not confirmed");

        let token = provider.pending_confirmation_token("a@example.com").unwrap();
        let account = provider.verify_confirmation_token(&token).await.unwrap();
        assert_eq!(account.account_id, created.account_id);

        let signed_in = provider.sign_in("a@example.com", "Strong1!").await.unwrap();
        assert_eq!(signed_in.account_id, created.account_id);

        assert!(provider.verify_confirmation_token(&token).await.is_err());
    }

    #[actix_web::test]
    async fn wrong_password_is_rejected_after_hashing_off_thread() {
        let provider = LocalIdentityProvider::with_hash_cost(4);
        provider
            .create_account("b@example.com", "Strong1!", "/")
            .await
            .unwrap();
        let token = provider.pending_confirmation_token("b@example.com").unwrap();
        provider.verify_confirmation_token(&token).await.unwrap();

        let err = provider.sign_in("b@example.com", "Wrong1!!").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(provider.sign_in("b@example.com", "Strong1!").await.is_ok());
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected_with_provider_message() {
        let provider = LocalIdentityProvider::with_hash_cost(4);
        provider
            .create_account("a@example.com", "Strong1!", "/")
            .await
            .unwrap();
        let err = provider
            .create_account("A@example.com", "Strong1!", "/")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
        assert_eq!(provider.account_count(), 1);
    }

    #[actix_web::test]
    async fn local_storage_issues_public_urls() {
        let storage = LocalObjectStorage::new("http://localhost/storage/");
        let url = storage
            .store_object("post-images", "p/1.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost/storage/post-images/p/1.png");
        assert!(storage.contains("post-images", "p/1.png"));
        storage.delete_object("post-images", "p/1.png").await.unwrap();
        assert_eq!(storage.object_count(), 0);
    }
}
