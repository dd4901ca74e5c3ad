//! Session ownership
//!
//! `SessionManager` is the single owner of the signed-in principal. Readers take
//! cheap snapshots; every transition (establish, logout, expiry) is serialized
//! and advances the epoch so that responses to requests issued under an older
//! session cannot act on the current one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tokio::sync::Mutex;
use tracing::warn;
use crate::models::SessionUser;
use crate::state::storage::SessionStore;
use crate::utils::errors::Result;
use crate::utils::logging::log_session_event;

/// A logged-in principal: credential and user record, always together
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Point-in-time view of the session
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub epoch: u64,
}

pub struct SessionManager {
    store: SessionStore,
    snapshot: RwLock<SessionSnapshot>,
    transitions: Mutex<()>,
    /// Set while a persisted pair that must not come back could not be removed
    wipe_pending: AtomicBool,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            snapshot: RwLock::new(SessionSnapshot::default()),
            transitions: Mutex::new(()),
            wipe_pending: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn epoch(&self) -> u64 {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner()).epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    /// Bearer credential and the epoch it belongs to
    pub fn credential(&self) -> (Option<String>, u64) {
        let snapshot = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        (snapshot.session.as_ref().map(|s| s.token.clone()), snapshot.epoch)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .session
            .as_ref()
            .map(|s| s.user.clone())
    }

    fn replace(&self, session: Option<Session>) -> u64 {
        let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        snapshot.session = session;
        snapshot.epoch += 1;
        snapshot.epoch
    }

    /// Load the persisted session, wiping a half-present pair
    pub async fn restore(&self) -> Result<Option<Session>> {
        let _guard = self.transitions.lock().await;

        let session = if self.wipe_pending.load(Ordering::SeqCst) {
            // the persisted pair was rejected; never bring it back
            self.wipe_persisted().await;
            None
        } else {
            match self.store.load().await? {
                Some((token, user)) => Some(Session { token, user }),
                None => {
                    self.store.clear().await?;
                    None
                }
            }
        };

        let epoch = self.replace(session.clone());
        let user_id = session.as_ref().map(|s| s.user.id.clone());
        log_session_event("restored", user_id.as_deref(), epoch);
        Ok(session)
    }

    /// Start a new session after a successful login
    pub async fn establish(&self, token: String, user: SessionUser) -> Result<u64> {
        let _guard = self.transitions.lock().await;

        self.store.save(&token, &user).await?;
        self.wipe_pending.store(false, Ordering::SeqCst);
        self.store.clear_profile_check().await?;

        let user_id = user.id.clone();
        let epoch = self.replace(Some(Session { token, user }));
        log_session_event("established", Some(&user_id), epoch);
        Ok(epoch)
    }

    /// Explicit logout
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.transitions.lock().await;

        let epoch = self.replace(None);
        self.wipe_pending.store(true, Ordering::SeqCst);
        self.store.clear().await?;
        self.wipe_pending.store(false, Ordering::SeqCst);
        self.store.clear_profile_check().await?;
        log_session_event("logged_out", None, epoch);
        Ok(())
    }

    /// Expire the session that was current at `epoch`
    ///
    /// Returns `true` for exactly one caller per epoch; later callers holding the
    /// same (now stale) epoch get `false` and must not repeat the side effects.
    /// Advancing the epoch is the claim: a failed storage wipe does not undo it,
    /// the pair is instead kept from being restored until a wipe succeeds.
    pub async fn expire(&self, epoch: u64) -> bool {
        let _guard = self.transitions.lock().await;

        let user_id = {
            let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            if snapshot.epoch != epoch {
                return false;
            }
            snapshot.epoch += 1;
            snapshot.session.take().map(|s| s.user.id)
        };

        self.wipe_persisted().await;
        if let Err(e) = self.store.clear_profile_check().await {
            warn!(error = %e, "Failed to clear profile-check marker");
        }
        log_session_event("expired", user_id.as_deref(), epoch + 1);
        true
    }

    /// Whether a rejected pair is still waiting to be removed from storage
    pub fn wipe_pending(&self) -> bool {
        self.wipe_pending.load(Ordering::SeqCst)
    }

    /// Remove the persisted pair, retrying once; remembers a failure
    async fn wipe_persisted(&self) {
        self.wipe_pending.store(true, Ordering::SeqCst);
        for attempt in 1..=2 {
            match self.store.clear().await {
                Ok(()) => {
                    self.wipe_pending.store(false, Ordering::SeqCst);
                    return;
                }
                Err(e) => warn!(attempt, error = %e, "Failed to wipe persisted session"),
            }
        }
    }
}
