//! Per-user Hevy API key storage.
//!
//! Keys are stored trimmed and never empty. The store is keyed by an opaque
//! caller identity resolved by the HTTP layer.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CredentialError;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The stored key for `user_id`, if any.
    async fn get(&self, user_id: &str) -> Result<Option<String>, CredentialError>;

    /// Store (or replace) the key for `user_id`.
    async fn save(&self, user_id: &str, api_key: &str) -> Result<(), CredentialError>;

    /// Remove the key for `user_id`. Returns whether one existed.
    async fn delete(&self, user_id: &str) -> Result<bool, CredentialError>;
}

/// Process-local credential store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    keys: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.keys.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, api_key: &str) -> Result<(), CredentialError> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        self.keys
            .write()
            .await
            .insert(user_id.to_string(), key.to_string());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, CredentialError> {
        Ok(self.keys.write().await.remove(user_id).is_some())
    }
}

/// Mask a key for display, keeping only its last four characters.
pub fn mask_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    let visible = chars.len().min(4);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - visible), tail)
}
