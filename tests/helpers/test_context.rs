//! Test context for unified test setup
//!
//! Wires an `AppContext` against a mock backend with in-memory storage, and
//! offers a store wrapper that counts writes per key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use lms_portal::config::Settings;
use lms_portal::models::SessionUser;
use lms_portal::services::HttpTransport;
use lms_portal::state::{AppContext, KeyValueStore, MemoryStore};
use lms_portal::Result;

use super::backend_mock::LmsMockServer;

/// Memory store that records how often each key was removed
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    removals: Mutex<HashMap<String, usize>>,
}

impl RecordingStore {
    pub fn removals_of(&self, key: &str) -> usize {
        self.removals.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.get(key).await.unwrap().is_some()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        *self.removals.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
        self.inner.remove(key).await
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub backend: LmsMockServer,
    pub ctx: AppContext,
    pub durable: Arc<RecordingStore>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    /// Create a context after adjusting the default settings
    pub async fn with_settings(adjust: impl FnOnce(&mut Settings)) -> Self {
        let _ = tracing_subscriber::fmt::try_init();

        let backend = LmsMockServer::new().await;
        let mut settings = Settings::default();
        settings.api.base_url = backend.base_url();
        settings.api.timeout_seconds = 5;
        adjust(&mut settings);

        let durable = Arc::new(RecordingStore::default());
        let transport = Arc::new(HttpTransport::new(&settings.api).expect("Failed to build transport"));
        let ctx = AppContext::build(settings, durable.clone(), transport);

        Self { backend, ctx, durable }
    }

    pub async fn sign_in(&self, token: &str, user: SessionUser) {
        self.ctx
            .session
            .establish(token.to_string(), user)
            .await
            .expect("Failed to establish session");
    }
}
