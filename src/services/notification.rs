//! Notification service implementation
//!
//! User-visible, dismissible notices ("toasts"). The session core only posts
//! them; whatever renders the UI reads the active list.

use std::sync::Mutex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Sink for user-visible notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notification statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_posted: u64,
    pub total_dismissed: u64,
    pub active: usize,
}

/// Bounded in-memory list of active notifications
#[derive(Debug)]
pub struct NotificationCenter {
    entries: Mutex<Vec<Notification>>,
    stats: Mutex<NotificationStats>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(20)
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            stats: Mutex::new(NotificationStats::default()),
            capacity: capacity.max(1),
        }
    }

    /// Active notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Dismiss a notification; `false` if it was not active
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|n| n.id != id);
        let removed = entries.len() != before;
        if removed {
            self.stats.lock().unwrap_or_else(|e| e.into_inner()).total_dismissed += 1;
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn stats(&self) -> NotificationStats {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner()).clone();
        stats.active = self.entries.lock().unwrap_or_else(|e| e.into_inner()).len();
        stats
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => error!(message = %notification.message, "Notification posted"),
            NotificationLevel::Warning => warn!(message = %notification.message, "Notification posted"),
            _ => info!(message = %notification.message, "Notification posted"),
        }

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(notification);
        if entries.len() > self.capacity {
            let overflow = entries.len() - self.capacity;
            entries.drain(..overflow);
        }
        self.stats.lock().unwrap_or_else(|e| e.into_inner()).total_posted += 1;
    }
}
