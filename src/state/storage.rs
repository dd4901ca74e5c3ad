//! Session storage implementation
//!
//! Durable storage keeps the bearer credential and the user record; ephemeral
//! storage keeps markers that must not outlive the browsing session. Both are
//! plain key-value stores; `SessionStore` knows which keys live where.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error};
use crate::config::{StorageBackend, StorageConfig};
use crate::models::SessionUser;
use crate::utils::errors::{PortalError, Result};

/// Minimal string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store; also the per-tab session scope
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Redis-backed durable store
#[derive(Clone)]
pub struct RedisStore {
    connection_manager: redis::aio::ConnectionManager,
    prefix: String,
    ttl_seconds: u64,
}

impl RedisStore {
    /// Connect using the storage configuration
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let url = config.redis_url.as_deref().ok_or_else(|| {
            PortalError::Config("Redis URL is required for the redis storage backend".to_string())
        })?;
        let client = redis::Client::open(url)?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            prefix: config.prefix.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection_manager.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let full_key = self.full_key(key);
        if self.ttl_seconds > 0 {
            conn.set_ex::<_, _, ()>(&full_key, value, self.ttl_seconds).await?;
        } else {
            conn.set::<_, _, ()>(&full_key, value).await?;
        }
        debug!(key = %full_key, "Stored value in Redis");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: u32 = conn.del(self.full_key(key)).await?;
        Ok(())
    }
}

/// Open the durable store selected by configuration
pub async fn open_durable_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Redis => Ok(Arc::new(RedisStore::new(config).await?)),
    }
}

/// Typed access to the session keys
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
    profile_check_key: String,
}

impl SessionStore {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            durable,
            ephemeral,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
            profile_check_key: config.profile_check_key.clone(),
        }
    }

    /// Load the persisted credential pair
    ///
    /// Returns `None` unless both halves are present and the user record parses.
    pub async fn load(&self) -> Result<Option<(String, SessionUser)>> {
        let token = self.durable.get(&self.token_key).await?;
        let user = self.durable.get(&self.user_key).await?;

        match (token, user) {
            (Some(token), Some(raw)) if !token.is_empty() => {
                match serde_json::from_str::<SessionUser>(&raw) {
                    Ok(user) => Ok(Some((token, user))),
                    Err(e) => {
                        error!(error = %e, "Stored user record is unreadable");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Persist credential and user record together
    pub async fn save(&self, token: &str, user: &SessionUser) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        self.durable.set(&self.user_key, &serialized).await?;
        if let Err(e) = self.durable.set(&self.token_key, token).await {
            // never leave a user record without its credential
            let _ = self.durable.remove(&self.user_key).await;
            return Err(e);
        }
        Ok(())
    }

    /// Remove credential and user record
    pub async fn clear(&self) -> Result<()> {
        let token_result = self.durable.remove(&self.token_key).await;
        let user_result = self.durable.remove(&self.user_key).await;
        token_result?;
        user_result
    }

    /// Student number the profile check already ran for, if any
    pub async fn profile_checked_for(&self) -> Result<Option<String>> {
        self.ephemeral.get(&self.profile_check_key).await
    }

    pub async fn mark_profile_checked(&self, student_number: &str) -> Result<()> {
        self.ephemeral.set(&self.profile_check_key, student_number).await
    }

    pub async fn clear_profile_check(&self) -> Result<()> {
        self.ephemeral.remove(&self.profile_check_key).await
    }
}
